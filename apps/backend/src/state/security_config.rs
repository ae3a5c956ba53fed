use jsonwebtoken::Algorithm;

/// Access tokens live for 15 minutes.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 15 * 60;

/// JWT signing and verification settings.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// HMAC secret used to sign and verify tokens
    pub jwt_secret: Vec<u8>,
    /// Pinned algorithm; tokens signed with anything else are rejected
    pub algorithm: Algorithm,
    /// Lifetime of minted tokens, in seconds
    pub token_ttl_secs: i64,
}

impl SecurityConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }

    pub fn with_token_ttl_secs(mut self, ttl: i64) -> Self {
        self.token_ttl_secs = ttl;
        self
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(b"default_secret_for_tests_only".to_vec())
    }
}
