//! Phone number normalization and validation.
//!
//! Inbound messages arrive with whatever sender format the transport
//! reports ("+15551234567", "15551234567", "5551234567", sometimes an
//! email-style iMessage handle). User lookup needs one canonical form.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty value where one is required.
    Empty(&'static str),
    /// Phone number doesn't look like a dialable number.
    InvalidPhone(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
            ValidationError::InvalidPhone(msg) => write!(f, "Invalid phone number: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Normalize a sender address to canonical E.164-style form.
///
/// Rules (NANP-biased, matching what the message poller reports):
/// - already `+`-prefixed: returned as-is
/// - email-style handles: returned as-is (they won't match a phone row)
/// - 11 digits starting with `1`: prefixed with `+`
/// - 10 digits: prefixed with `+1`
/// - anything else: returned as-is
pub fn normalize_phone(raw: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with('+') || raw.contains('@') {
        return raw.to_string();
    }

    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 11 && digits.starts_with('1') {
        return format!("+{}", digits);
    }
    if digits.len() == 10 {
        return format!("+1{}", digits);
    }

    raw.to_string()
}

/// Validate a phone number for storage (must normalize to `+` followed by
/// 10 to 15 digits).
pub fn validate_phone(raw: &str) -> Result<String, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::Empty("phone"));
    }

    let normalized = normalize_phone(raw);
    let rest = match normalized.strip_prefix('+') {
        Some(rest) => rest,
        None => {
            return Err(ValidationError::InvalidPhone(
                "must start with a country code".to_string(),
            ))
        }
    };

    if rest.len() < 10 || rest.len() > 15 || !rest.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidPhone(format!(
            "unexpected format: {}",
            raw
        )));
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_passthrough_for_e164() {
        assert_eq!(normalize_phone("+15551234567"), "+15551234567");
        assert_eq!(normalize_phone("+447911123456"), "+447911123456");
    }

    #[test]
    fn test_normalize_adds_country_code_marker() {
        assert_eq!(normalize_phone("15551234567"), "+15551234567");
        assert_eq!(normalize_phone("5551234567"), "+15551234567");
        assert_eq!(normalize_phone("(555) 123-4567"), "+15551234567");
    }

    #[test]
    fn test_normalize_leaves_email_handles_alone() {
        assert_eq!(normalize_phone("user@example.com"), "user@example.com");
    }

    #[test]
    fn test_normalize_leaves_unrecognized_alone() {
        assert_eq!(normalize_phone("12345"), "12345");
    }

    #[test]
    fn test_validate_phone() {
        assert_eq!(validate_phone("5551234567").unwrap(), "+15551234567");
        assert!(validate_phone("").is_err());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("user@example.com").is_err());
    }
}
