use std::sync::Arc;

use crate::{
    domain::{
        error::ValidationError,
        models::{query::UserQueryInput, user::UserId},
        repositories::{
            credit_card_repository::CreditCardRepository, photo_repository::PhotoRepository,
            user_repository::UserRepository,
        },
        services::{password_service::PasswordHasher, photo_storage::PhotoStorage},
    },
    presentation::{
        error::ApiError,
        middleware::api_key::{ApiKey, require_api_key},
        multipart::FormData,
    },
    usecase::{
        query_user_usecase::QueryUserUsecase,
        register_user_usecase::{RegisterUserCommand, RegisterUserUsecase},
        update_user_usecase::{UpdateUserCommand, UpdateUserUsecase},
        user_projection::UserView,
    },
};
use axum::{
    Json, Router,
    extract::{
        Multipart, Path, Query, State, multipart::MultipartRejection, rejection::PathRejection,
    },
    middleware,
    routing::{get, patch, post},
};
use serde::{Deserialize, Serialize};

// Request

/// query string for the user list
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListUsersParams {
    pub q: Option<String>,
    pub ob: Option<String>,
    pub sb: Option<String>,
    pub of: Option<String>,
    pub lt: Option<String>,
}

impl From<ListUsersParams> for UserQueryInput {
    fn from(params: ListUsersParams) -> Self {
        // unparsable numbers fall back to the defaults
        let number =
            |raw: Option<String>| -> Option<i64> { raw.and_then(|v| v.trim().parse().ok()) };
        Self {
            search: params.q,
            order_by: params.ob,
            sort: params.sb,
            offset: number(params.of),
            limit: number(params.lt),
        }
    }
}

// Response

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: UserId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListUsersResponse {
    pub count: usize,
    pub rows: Vec<UserView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub success: bool,
}

/* Router Function and Handler Function */

/// Router for everything under `/user`. Every route requires the API key.
pub fn create_user_router<
    U: UserRepository + Send + Sync + 'static + Clone,
    C: CreditCardRepository + Send + Sync + 'static + Clone,
    P: PhotoRepository + Send + Sync + 'static + Clone,
    H: PasswordHasher + Send + Sync + 'static + Clone,
    S: PhotoStorage + Send + Sync + 'static + Clone,
>(
    register_service: RegisterUserUsecase<U, C, P, H, S>,
    update_service: UpdateUserUsecase<U, C, P, H, S>,
    query_service: QueryUserUsecase<U>,
    api_key: ApiKey,
) -> Router {
    let state = AppState {
        register_service: Arc::new(register_service),
        update_service: Arc::new(update_service),
        query_service: Arc::new(query_service),
    };

    Router::new()
        .route("/", patch(update::<U, C, P, H, S>))
        .route("/register", post(register::<U, C, P, H, S>))
        .route("/list", get(list::<U, C, P, H, S>))
        .route("/{user_id}", get(find::<U, C, P, H, S>))
        .route_layer(middleware::from_fn_with_state(api_key, require_api_key))
        .with_state(state)
}

pub struct AppState<
    U: UserRepository,
    C: CreditCardRepository,
    P: PhotoRepository,
    H: PasswordHasher,
    S: PhotoStorage,
> {
    pub register_service: Arc<RegisterUserUsecase<U, C, P, H, S>>,
    pub update_service: Arc<UpdateUserUsecase<U, C, P, H, S>>,
    pub query_service: Arc<QueryUserUsecase<U>>,
}

impl<U, C, P, H, S> Clone for AppState<U, C, P, H, S>
where
    U: UserRepository,
    C: CreditCardRepository,
    P: PhotoRepository,
    H: PasswordHasher,
    S: PhotoStorage,
{
    fn clone(&self) -> Self {
        Self {
            register_service: Arc::clone(&self.register_service),
            update_service: Arc::clone(&self.update_service),
            query_service: Arc::clone(&self.query_service),
        }
    }
}

// handler function

/// handler function for register
async fn register<
    U: UserRepository + Send + Sync,
    C: CreditCardRepository + Send + Sync,
    P: PhotoRepository + Send + Sync,
    H: PasswordHasher + Send + Sync,
    S: PhotoStorage + Send + Sync,
>(
    State(state): State<AppState<U, C, P, H, S>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::new(e.status(), e.body_text()))?;
    let form = FormData::read(&mut multipart).await?;

    let user_id = state
        .register_service
        .register(RegisterUserCommand::from(form))
        .await?;

    Ok(Json(RegisterResponse { user_id }))
}

/// handler function for partial update
async fn update<
    U: UserRepository + Send + Sync,
    C: CreditCardRepository + Send + Sync,
    P: PhotoRepository + Send + Sync,
    H: PasswordHasher + Send + Sync,
    S: PhotoStorage + Send + Sync,
>(
    State(state): State<AppState<U, C, P, H, S>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::new(e.status(), e.body_text()))?;
    let form = FormData::read(&mut multipart).await?;
    let command = UpdateUserCommand::try_from(form)?;

    state.update_service.update(command).await?;

    Ok(Json(UpdateResponse { success: true }))
}

/// handler function for the user list
async fn list<
    U: UserRepository + Send + Sync,
    C: CreditCardRepository + Send + Sync,
    P: PhotoRepository + Send + Sync,
    H: PasswordHasher + Send + Sync,
    S: PhotoStorage + Send + Sync,
>(
    State(state): State<AppState<U, C, P, H, S>>,
    Query(params): Query<ListUsersParams>,
) -> Result<Json<ListUsersResponse>, ApiError> {
    let rows = state.query_service.list_users(params.into()).await?;

    Ok(Json(ListUsersResponse {
        count: rows.len(),
        rows,
    }))
}

/// handler function for a single user
async fn find<
    U: UserRepository + Send + Sync,
    C: CreditCardRepository + Send + Sync,
    P: PhotoRepository + Send + Sync,
    H: PasswordHasher + Send + Sync,
    S: PhotoStorage + Send + Sync,
>(
    State(state): State<AppState<U, C, P, H, S>>,
    user_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<UserView>, ApiError> {
    let Path(user_id) = user_id.map_err(|_| ApiError::from(ValidationError::InvalidUserId))?;

    let user = state.query_service.get_user(UserId::new(user_id)).await?;

    Ok(Json(user))
}
