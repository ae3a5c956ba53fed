//! User repository functions for domain layer (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;

use crate::adapters::users_sea as users_adapter;
use crate::errors::domain::DomainError;

pub use users_adapter::UserUpdate;

/// User domain model
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
    name: &str,
    password_hash: &str,
) -> Result<User, DomainError> {
    let dto = users_adapter::UserCreate::new(email, name, password_hash);
    let user = users_adapter::create_user(conn, dto).await?;
    Ok(User::from(user))
}

pub async fn find_user_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_user_by_id(conn, user_id).await?;
    Ok(user.map(User::from))
}

pub async fn find_user_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_user_by_email(conn, email).await?;
    Ok(user.map(User::from))
}

pub async fn update_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserUpdate,
) -> Result<User, DomainError> {
    let user = users_adapter::update_user(conn, dto).await?;
    Ok(User::from(user))
}

impl From<crate::entities::users::Model> for User {
    fn from(model: crate::entities::users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            password_hash: model.password_hash,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
