//! Test helpers for generating unique test data
//!
//! ULID-based values keep tests isolated when they share a database.

use ulid::Ulid;

/// Generate a unique string in the format `{prefix}-{ulid}`.
///
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let id1 = unique_str("tag");
/// let id2 = unique_str("tag");
/// assert_ne!(id1, id2);
/// assert!(id1.starts_with("tag-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique email in the format `{prefix}-{ulid}@example.test`.
///
/// The local part is lowercased so it survives email normalization unchanged.
///
/// ```
/// use backend_test_support::unique_helpers::unique_email;
///
/// let email = unique_email("cook");
/// assert!(email.starts_with("cook-"));
/// assert!(email.ends_with("@example.test"));
/// ```
pub fn unique_email(prefix: &str) -> String {
    format!(
        "{}-{}@example.test",
        prefix,
        Ulid::new().to_string().to_lowercase()
    )
}
