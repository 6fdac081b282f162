//! Unit standardization and cost engine.
//!
//! Maps free-text purchase units ("Pounds", "gal", "each") onto a static
//! vocabulary, converts quantities into the reference unit of their category
//! and computes cost per reference unit. Pure functions only; nothing here
//! touches I/O or keeps state between calls.

pub mod cost;
pub mod detector;
pub mod error;
pub mod formatter;
pub mod normalizer;
pub mod suggestions;
pub mod table;
pub mod types;
pub mod validator;

pub use cost::{
    calculate_standardized_cost, convert_quantity, convert_unit_cost, standardize_line_item,
};
pub use detector::{looks_like_quantity_string, split_quantity_and_unit};
pub use error::UnitError;
pub use formatter::{
    format_currency, format_quantity, format_unit_cost, DisplayCost, UnitFormatter,
    UnitPreferences,
};
pub use normalizer::{get_standard_unit_for_unit, get_unit_category, normalize_unit, resolve};
pub use suggestions::{get_unit_suggestions, UnitSuggestions};
pub use table::UNIT_TABLE_VERSION;
pub use types::{
    StandardizedCost, StandardizedLineItem, UnitCategory, UnitDescriptor, UnitResolution,
    UnitValidation,
};
pub use validator::{accepted_unit_examples, validate_category, validate_unit};
