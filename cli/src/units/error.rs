use thiserror::Error;

use crate::units::types::UnitCategory;

/// Expected failures of the unit engine. Returned as values, never raised.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    #[error("Unrecognized unit '{input}'")]
    UnresolvedUnit { input: String },

    #[error("Invalid quantity: {quantity} (must be greater than zero)")]
    InvalidQuantity { quantity: f64 },

    #[error("Invalid amount: {amount} (must be zero or more)")]
    InvalidAmount { amount: f64 },

    #[error("Cannot convert between {from} and {to}")]
    CategoryMismatch { from: UnitCategory, to: UnitCategory },
}

impl UnitError {
    /// Short machine-readable tag, used by the wasm bindings and JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            UnitError::UnresolvedUnit { .. } => "UnresolvedUnit",
            UnitError::InvalidQuantity { .. } => "InvalidQuantity",
            UnitError::InvalidAmount { .. } => "InvalidAmount",
            UnitError::CategoryMismatch { .. } => "CategoryMismatch",
        }
    }

    /// Kind tag and message together, e.g. "UnresolvedUnit: Unrecognized unit 'bushel'"
    pub fn tagged_message(&self) -> String {
        format!("{}: {}", self.kind(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_message() {
        let err = UnitError::UnresolvedUnit {
            input: "bushel".to_string(),
        };
        assert_eq!(err.tagged_message(), "UnresolvedUnit: Unrecognized unit 'bushel'");

        let err = UnitError::InvalidQuantity { quantity: 0.0 };
        assert!(err.tagged_message().starts_with("InvalidQuantity: Invalid quantity: 0"));
    }
}
