use chrono::{SecondsFormat, Utc};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Canonical form of an email address: trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Current UTC time as RFC 3339 with microseconds and a `Z` suffix.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
