use serde::{Deserialize, Serialize};
use validator::Validate;

use super::not_blank;
use crate::error::{AppError, FieldErrors};
use crate::repos::users::User;
use crate::services::users::ProfileChanges;

/// `POST /api/user/create`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[validate(length(min = 5, message = "Ensure this field has at least 5 characters."))]
    pub password: Option<String>,
    #[validate(
        length(min = 1, max = 255, message = "Ensure this field has between 1 and 255 characters."),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,
}

/// Validated registration fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl CreateUserRequest {
    pub fn into_account(self) -> Result<NewAccount, AppError> {
        let mut errors = FieldErrors::new();
        super::require(&self.email, "email", &mut errors);
        super::require(&self.password, "password", &mut errors);
        super::require(&self.name, "name", &mut errors);

        match (self.email, self.password, self.name) {
            (Some(email), Some(password), Some(name)) if errors.is_empty() => Ok(NewAccount {
                email,
                password,
                name: name.trim().to_string(),
            }),
            _ => Err(AppError::invalid_fields(errors)),
        }
    }
}

/// `POST /api/user/token`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(custom(function = "not_blank"))]
    pub email: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub password: Option<String>,
}

impl TokenRequest {
    pub fn into_credentials(self) -> Result<(String, String), AppError> {
        let mut errors = FieldErrors::new();
        super::require(&self.email, "email", &mut errors);
        super::require(&self.password, "password", &mut errors);

        match (self.email, self.password) {
            (Some(email), Some(password)) if errors.is_empty() => Ok((email, password)),
            _ => Err(AppError::invalid_fields(errors)),
        }
    }
}

/// `PATCH`/`PUT /api/user/me`. `email` is accepted but never applied.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateMeRequest {
    #[validate(length(min = 5, message = "Ensure this field has at least 5 characters."))]
    pub password: Option<String>,
    #[validate(
        length(min = 1, max = 255, message = "Ensure this field has between 1 and 255 characters."),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,
}

impl UpdateMeRequest {
    pub fn into_changes(self, require_all: bool) -> Result<ProfileChanges, AppError> {
        if require_all {
            let mut errors = FieldErrors::new();
            super::require(&self.name, "name", &mut errors);
            super::require(&self.password, "password", &mut errors);
            if !errors.is_empty() {
                return Err(AppError::invalid_fields(errors));
            }
        }

        Ok(ProfileChanges {
            name: self.name.map(|n| n.trim().to_string()),
            password: self.password,
        })
    }
}

/// Public view of a user; never includes the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub email: String,
    pub name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            name: user.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}
