//! Custom error types for bizledger
//!
//! Every failure in the crate is reported through [`LedgerError`]. None of
//! them is fatal: each one belongs to a single operation and is returned to
//! whoever started it.

use thiserror::Error;

/// The main error type for bizledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Malformed input (dates, amounts, enum names)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// The persistence gateway rejected or failed an operation
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// The entry classifier could not be reached or returned garbage
    #[error("Classifier error: {0}")]
    Classifier(String),
}

impl LedgerError {
    /// Create a "not found" error for cash-flow entries
    pub fn cash_flow_entry_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Cash-flow entry",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for operational costs
    pub fn operational_cost_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Operational cost",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for debts
    pub fn debt_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Debt",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a gateway failure
    pub fn is_gateway(&self) -> bool {
        matches!(self, Self::Gateway(_))
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for bizledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = LedgerError::debt_not_found("debt-1234abcd");
        assert_eq!(err.to_string(), "Debt not found: debt-1234abcd");
        assert!(err.is_not_found());
        assert!(!err.is_gateway());
    }

    #[test]
    fn test_gateway_error() {
        let err = LedgerError::Gateway("connection refused".into());
        assert_eq!(err.to_string(), "Gateway error: connection refused");
        assert!(err.is_gateway());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let ledger_err: LedgerError = io_err.into();
        assert!(matches!(ledger_err, LedgerError::Io(_)));
    }
}
