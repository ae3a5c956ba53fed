use sea_orm::ConnectionTrait;
use tracing::{debug, info};

use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};
use crate::logging::pii::Redacted;
use crate::logging::security;
use crate::repos::users::{self, User, UserUpdate};

const INVALID_CREDENTIALS: &str = "Unable to authenticate with provided credentials.";

/// Lowercase the domain part of an address; the local part is kept as typed.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Profile changes for the authenticated user. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub password: Option<String>,
}

/// User account service: registration, credential checks, profile edits.
#[derive(Debug, Default)]
pub struct UserService;

impl UserService {
    pub fn new() -> Self {
        Self
    }

    /// Register a new active user with a hashed password.
    pub async fn register<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<User, AppError> {
        let email = normalize_email(email);

        if users::find_user_by_email(conn, &email).await?.is_some() {
            return Err(DomainError::conflict(
                ConflictKind::UniqueEmail,
                "A user with this email already exists.",
            )
            .into());
        }

        let password_hash = hash_password(password)?;
        // Unique index still guards a concurrent registration
        let user = users::create_user(conn, &email, name, &password_hash).await?;

        info!(user_id = user.id, email = %Redacted(&user.email), "user registered");
        Ok(user)
    }

    /// Check credentials. Unknown email, wrong password and inactive
    /// accounts all fail the same way.
    pub async fn authenticate<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let email = normalize_email(email);
        let invalid = || {
            AppError::from(DomainError::validation(
                ValidationKind::InvalidCredentials,
                INVALID_CREDENTIALS,
            ))
        };

        let Some(user) = users::find_user_by_email(conn, &email).await? else {
            security::login_failed("unknown_email", &email);
            return Err(invalid());
        };

        if !verify_password(password, &user.password_hash) {
            security::login_failed("bad_password", &email);
            return Err(invalid());
        }

        if !user.is_active {
            security::login_failed("inactive", &email);
            return Err(invalid());
        }

        debug!(user_id = user.id, "credentials accepted");
        Ok(user)
    }

    pub async fn update_profile<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user: &User,
        changes: ProfileChanges,
    ) -> Result<User, AppError> {
        if changes.name.is_none() && changes.password.is_none() {
            return Ok(user.clone());
        }

        let mut dto = UserUpdate::new(user.id);
        if let Some(name) = changes.name {
            dto = dto.with_name(name);
        }
        if let Some(password) = changes.password {
            dto = dto.with_password_hash(hash_password(&password)?);
            info!(user_id = user.id, "password changed");
        }

        Ok(users::update_user(conn, dto).await?)
    }
}
