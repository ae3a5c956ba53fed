use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use super::claims::Claims;
use crate::logging::security;
use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Mint a signed access token for `user_id`, valid for `security.token_ttl_secs`.
pub fn mint_access_token(
    user_id: i64,
    email: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal("Failed to get current time"))?
        .as_secs() as i64;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        iat,
        exp: iat + security.token_ttl_secs,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verify signature, expiry, and algorithm; return the claims.
pub fn verify_access_token(token: &str, security: &SecurityConfig) -> Result<Claims, AppError> {
    // Default Validation checks exp; algorithm is pinned to the configured one.
    let validation = Validation::new(security.algorithm);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => {
            security::token_rejected("expired");
            AppError::unauthorized_expired_jwt()
        }
        ErrorKind::InvalidSignature => {
            security::token_rejected("invalid_signature");
            AppError::unauthorized_invalid_jwt()
        }
        _ => {
            security::token_rejected("malformed");
            AppError::unauthorized_invalid_jwt()
        }
    })
}
