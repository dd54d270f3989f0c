//! Internal helpers for record normalization and validation.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every entity enforces the same text invariants.

use crate::{EngineError, ResultEngine};

/// Reject empty or over-long required text.
pub(crate) fn require_text(value: &str, label: &str, max_len: usize) -> ResultEngine<()> {
    if value.is_empty() {
        return Err(EngineError::ConstraintViolation(format!(
            "{label} must not be empty"
        )));
    }
    limit_text(value, label, max_len)
}

/// Reject text longer than the column allows.
pub(crate) fn limit_text(value: &str, label: &str, max_len: usize) -> ResultEngine<()> {
    if value.chars().count() > max_len {
        return Err(EngineError::ConstraintViolation(format!(
            "{label} longer than {max_len} characters"
        )));
    }
    Ok(())
}

/// Trim optional text and collapse blanks to `None`.
pub(crate) fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_optional_text_is_none() {
        assert_eq!(normalize_optional_text(Some("   ".to_string())), None);
        assert_eq!(
            normalize_optional_text(Some(" food ".to_string())),
            Some("food".to_string())
        );
    }

    #[test]
    fn required_text_limits() {
        assert!(require_text("", "name", 5).is_err());
        assert!(require_text("abcdef", "name", 5).is_err());
        assert!(require_text("abc", "name", 5).is_ok());
    }
}
