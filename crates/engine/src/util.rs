//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}

/// Reject zero or negative amounts before any store access.
pub(crate) fn ensure_positive(amount_minor: i64, label: &str) -> ResultEngine<()> {
    if amount_minor <= 0 {
        return Err(EngineError::InvalidAmount(format!(
            "{label} amount must be > 0"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_uuid_labels_errors() {
        assert_eq!(
            parse_uuid("nope", "goal").unwrap_err(),
            EngineError::InvalidId("invalid goal id".to_string())
        );
        assert!(parse_uuid(&Uuid::new_v4().to_string(), "goal").is_ok());
    }

    #[test]
    fn ensure_positive_rejects_zero() {
        assert!(ensure_positive(1, "deposit").is_ok());
        assert_eq!(
            ensure_positive(0, "deposit").unwrap_err(),
            EngineError::InvalidAmount("deposit amount must be > 0".to_string())
        );
    }
}
