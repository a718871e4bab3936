use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, ValidationError};

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let status = match &err {
            DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DomainError::EmailAlreadyUsed => StatusCode::CONFLICT,
            DomainError::UserNotFound => StatusCode::NOT_FOUND,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        DomainError::from(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(DomainError::InvalidInput(ValidationError::InvalidEmail), StatusCode::BAD_REQUEST)]
    #[case(DomainError::EmailAlreadyUsed, StatusCode::CONFLICT)]
    #[case(DomainError::UserNotFound, StatusCode::NOT_FOUND)]
    #[case(
        DomainError::Internal("connection reset".to_string()),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    fn test_status_mapping(#[case] err: DomainError, #[case] expected: StatusCode) {
        assert_eq!(ApiError::from(err).status, expected);
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let err = ApiError::from(DomainError::Internal("password column missing".to_string()));
        assert_eq!(err.message, "Something went wrong. Please try again later.");
    }
}
