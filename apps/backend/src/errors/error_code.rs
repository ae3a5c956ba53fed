//! Error codes for the recipe API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the recipe API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication
    /// Authentication required
    Unauthorized,
    /// Missing or malformed Bearer token
    UnauthorizedMissingBearer,
    /// Invalid JWT token
    UnauthorizedInvalidJwt,
    /// JWT token has expired
    UnauthorizedExpiredJwt,

    // Request Validation
    /// One or more fields failed validation
    ValidationError,
    /// Malformed request (bad JSON, wrong types)
    BadRequest,
    /// Email/password pair did not authenticate
    InvalidCredentials,
    /// Invalid email address
    InvalidEmail,

    // Resource Not Found
    /// Recipe not found (or not owned by the requester)
    RecipeNotFound,
    /// Tag not found (or not owned by the requester)
    TagNotFound,
    /// Ingredient not found (or not owned by the requester)
    IngredientNotFound,
    /// User not found
    UserNotFound,
    /// General not found error
    NotFound,

    // Conflicts
    /// Unique email constraint
    UniqueEmail,
    /// The user already has a tag with this name
    DuplicateTag,
    /// The user already has an ingredient with this name
    DuplicateIngredient,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Database timeout
    DbTimeout,
    /// Foreign key constraint violation
    FkViolation,
    /// Check constraint violation
    CheckViolation,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// The exact string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",

            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidEmail => "INVALID_EMAIL",

            Self::RecipeNotFound => "RECIPE_NOT_FOUND",
            Self::TagNotFound => "TAG_NOT_FOUND",
            Self::IngredientNotFound => "INGREDIENT_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::UniqueEmail => "UNIQUE_EMAIL",
            Self::DuplicateTag => "DUPLICATE_TAG",
            Self::DuplicateIngredient => "DUPLICATE_INGREDIENT",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::FkViolation => "FK_VIOLATION",
            Self::CheckViolation => "CHECK_VIOLATION",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
