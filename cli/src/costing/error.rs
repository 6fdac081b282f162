use crate::records::error::StoreError;
use crate::records::validation::ValidationResult;
use crate::units::UnitError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CostingError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Save refused; the validation result carries the field-level messages
    #[error("{kind} '{id}' not saved ({} errors)", .validation.error_count())]
    Rejected {
        kind: &'static str,
        id: String,
        validation: ValidationResult,
    },

    #[error("{location}: {source}")]
    Unit {
        location: String,
        #[source]
        source: UnitError,
    },

    #[error("Ingredient '{ingredient_id}' has no price yet")]
    MissingPrice { ingredient_id: String },
}
