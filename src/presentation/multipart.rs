//! Turning `multipart/form-data` bodies into use case commands.

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::{
    domain::{error::ValidationError, models::photo::Upload, models::user::UserId},
    presentation::error::ApiError,
    usecase::{
        register_user_usecase::{CreditCardInput, RegisterUserCommand},
        update_user_usecase::{CreditCardChanges, UpdateUserCommand},
    },
};

const PHOTOS_FIELD: &str = "photos";

/// Text fields by name plus every file sent under `photos`.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    uploads: Vec<Upload>,
}

impl FormData {
    pub async fn read(multipart: &mut Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            ApiError::new(e.status(), format!("Failed to read multipart field: {}", e))
        })? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == PHOTOS_FIELD {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content = field.bytes().await.map_err(|e| {
                    ApiError::new(e.status(), format!("Failed to read file '{}': {}", file_name, e))
                })?;
                form.uploads.push(Upload {
                    content_type,
                    file_name,
                    content: content.to_vec(),
                });
            } else {
                let value = field.text().await.map_err(|e| {
                    ApiError::new(e.status(), format!("Failed to read field '{}': {}", name, e))
                })?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    fn take(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }
}

impl From<FormData> for RegisterUserCommand {
    fn from(mut form: FormData) -> Self {
        let mut field = |name: &str| form.take(name).unwrap_or_default();
        let name = field("name");
        let address = field("address");
        let email = field("email");
        let password = field("password");
        let credit_card = CreditCardInput {
            card_type: field("creditcard_type"),
            number: field("creditcard_number"),
            holder_name: field("creditcard_name"),
            expiry: field("creditcard_expired"),
            cvv: field("creditcard_cvv"),
        };

        Self {
            name,
            address,
            email,
            password,
            credit_card,
            uploads: form.uploads,
        }
    }
}

impl TryFrom<FormData> for UpdateUserCommand {
    type Error = ValidationError;

    fn try_from(mut form: FormData) -> Result<Self, Self::Error> {
        let user_id = form
            .take("user_id")
            .filter(|id| !id.trim().is_empty())
            .ok_or(ValidationError::Required("user_id"))?;
        let user_id = user_id
            .trim()
            .parse()
            .map(UserId::new)
            .map_err(|_| ValidationError::InvalidUserId)?;

        let mut command = Self::new(user_id);
        command.name = form.take("name");
        command.address = form.take("address");
        command.email = form.take("email");
        command.password = form.take("password");
        command.credit_card = CreditCardChanges {
            card_type: form.take("creditcard_type"),
            number: form.take("creditcard_number"),
            holder_name: form.take("creditcard_name"),
            expiry: form.take("creditcard_expired"),
            cvv: form.take("creditcard_cvv"),
        };
        command.uploads = form.uploads;
        Ok(command)
    }
}
