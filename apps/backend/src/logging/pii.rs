//! Redaction of personal data and credentials in log output.

use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};

#[allow(clippy::unwrap_used)]
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap());

// header.payload.signature, base64url segments
#[allow(clippy::unwrap_used)]
static JWT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\beyJ[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\b").unwrap()
});

// argon2 PHC strings: $argon2id$v=19$m=...,t=...,p=...$salt$hash
#[allow(clippy::unwrap_used)]
static PASSWORD_HASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$argon2(?:id|i|d)\$[^\s]+").unwrap());

/// Mask emails (keep the first character of the local part and the
/// domain), bearer tokens, and password hashes.
pub fn redact(input: &str) -> String {
    let out = EMAIL.replace_all(input, |caps: &Captures| {
        let full = &caps[0];
        match full.split_once('@') {
            Some((local, domain)) => match local.chars().next() {
                Some(first) => format!("{first}***@{domain}"),
                None => format!("@{domain}"),
            },
            None => full.to_string(),
        }
    });
    let out = JWT.replace_all(&out, "[REDACTED_TOKEN]");
    PASSWORD_HASH
        .replace_all(&out, "[REDACTED_HASH]")
        .into_owned()
}

/// Display wrapper that applies `redact` when formatted.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}
