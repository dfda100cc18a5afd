// Domain error model
//
// Deterministic business failures only (validation, structural invariants,
// missing references). Infrastructure errors stay in anyhow at the edges.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Error kinds raised by the domain model.
///
/// The variants are language-neutral tags; the interaction layer translates
/// them for display. A constructor that returns one of these has not mutated
/// anything: parallel structures are validated before either side changes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A field failed its domain constraint (negative money, empty name,
    /// malformed number or date).
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    /// Two parallel lists that describe the same memberships disagree on
    /// length.
    #[error("{left} and {right} must have the same length ({left_len} vs {right_len})")]
    LengthMismatch {
        left: &'static str,
        right: &'static str,
        left_len: usize,
        right_len: usize,
    },

    /// A referenced entity does not exist. Surfaced by the storage layer;
    /// aggregate computations never raise it, they skip the reference.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },
}

impl DomainError {
    pub fn invalid_value(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }

    pub fn length_mismatch(
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    ) -> Self {
        Self::LengthMismatch {
            left,
            right,
            left_len,
            right_len,
        }
    }

    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_display() {
        let err = DomainError::invalid_value("price", "cannot be negative");
        assert!(matches!(err, DomainError::InvalidValue { .. }));
        assert_eq!(
            err.to_string(),
            "invalid value for price: cannot be negative"
        );
    }

    #[test]
    fn test_length_mismatch_display() {
        let err = DomainError::length_mismatch("gear_list", 2, "gear_amount", 1);
        assert_eq!(
            err.to_string(),
            "gear_list and gear_amount must have the same length (2 vs 1)"
        );
    }

    #[test]
    fn test_not_found_display() {
        let err = DomainError::not_found("gear", 42);
        assert_eq!(err.to_string(), "gear with id 42 not found");
    }
}
