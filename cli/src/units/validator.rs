use crate::units::error::UnitError;
use crate::units::normalizer::normalize_unit;
use crate::units::table::units_in_category;
use crate::units::types::{UnitCategory, UnitResolution, UnitValidation};

/// How many example symbols to list per category in messages
const EXAMPLES_PER_CATEGORY: usize = 4;

/// "weight (oz, lb, g, kg); volume (fl oz, tsp, tbsp, cup); count (ea, dz)"
pub fn accepted_unit_examples() -> String {
    UnitCategory::ALL
        .iter()
        .map(|category| {
            let symbols: Vec<&str> = units_in_category(*category)
                .take(EXAMPLES_PER_CATEGORY)
                .map(|d| d.symbol)
                .collect();
            format!("{} ({})", category, symbols.join(", "))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Message shown next to a field holding an unrecognized unit
pub fn unresolved_unit_message(input: &str) -> String {
    if input.trim().is_empty() {
        format!("Unit is required. Accepted units: {}", accepted_unit_examples())
    } else {
        format!(
            "Unrecognized unit '{}'. Accepted units: {}",
            input,
            accepted_unit_examples()
        )
    }
}

/// Check free-text unit input. Always returns a result, whatever the input.
pub fn validate_unit(input: &str) -> UnitValidation {
    match normalize_unit(input) {
        UnitResolution::Resolved(_) => UnitValidation {
            valid: true,
            message: None,
        },
        UnitResolution::Unresolved(original) => UnitValidation {
            valid: false,
            message: Some(unresolved_unit_message(&original)),
        },
    }
}

/// Require `unit` to resolve to a unit of `expected` category
pub fn validate_category(unit: &str, expected: UnitCategory) -> Result<(), UnitError> {
    let descriptor = normalize_unit(unit)
        .descriptor()
        .ok_or_else(|| UnitError::UnresolvedUnit {
            input: unit.to_string(),
        })?;

    if descriptor.category != expected {
        return Err(UnitError::CategoryMismatch {
            from: descriptor.category,
            to: expected,
        });
    }

    Ok(())
}
