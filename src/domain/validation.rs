use crate::error::{MarketError, Result};
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Checks the simple `local@domain.tld` shape used throughout the forms.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Returns the trimmed value, or a validation error carrying `message` when
/// the field is absent or blank.
pub fn required_trimmed(value: Option<&str>, message: &str) -> Result<String> {
    match value.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_string()),
        _ => Err(MarketError::Validation(message.to_string())),
    }
}

/// Trims an optional free-text field; blank input collapses to `None`.
pub fn optional_trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Validates a student's contact email: present, non-blank, well-formed.
///
/// The shape check runs on the value as submitted, so surrounding
/// whitespace is rejected; only the accepted value is trimmed.
pub fn student_email(value: Option<&str>) -> Result<String> {
    let email = required_trimmed(value, "Student email is required")?;
    if !value.is_some_and(is_valid_email) {
        return Err(MarketError::Validation("Invalid email address".to_string()));
    }
    Ok(email)
}

/// Deserializes any JSON value, keeping it only when it is a string.
///
/// Form payloads come from untrusted clients; a number where a string is
/// expected is treated as a missing field rather than a parse failure, so
/// the caller still gets the field-level message.
pub fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    })
}

/// Parses a JSON request body, mapping any decode failure to a validation
/// error instead of a framework rejection.
pub fn parse_json<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> Result<T> {
    serde_json::from_slice(bytes)
        .map_err(|_| MarketError::Validation("Invalid JSON body".to_string()))
}
