use tracing::warn;

use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// Log a failed token request.
pub fn login_failed(reason: &str, email: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_LOGIN_FAILED",
        %trace_id,
        email = %Redacted(email),
        reason,
        "Authentication failure"
    );
}

/// Log a rejected bearer token.
pub fn token_rejected(reason: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_TOKEN_REJECTED",
        %trace_id,
        reason,
        "Bearer token rejected"
    );
}
