//! DTOs for users_sea adapter.

/// DTO for creating a new user.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

impl UserCreate {
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            password_hash: password_hash.into(),
        }
    }
}

/// DTO for updating the mutable profile fields of a user.
///
/// `None` leaves the column untouched.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub id: i64,
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub is_active: Option<bool>,
}

impl UserUpdate {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            name: None,
            password_hash: None,
            is_active: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_password_hash(mut self, password_hash: impl Into<String>) -> Self {
        self.password_hash = Some(password_hash.into());
        self
    }

    pub fn with_is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }
}
