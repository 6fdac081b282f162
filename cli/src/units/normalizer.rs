use crate::units::table;
use crate::units::types::{UnitCategory, UnitDescriptor, UnitResolution};
use log::debug;

/// Lowercase, trim, drop periods and collapse inner whitespace
/// ("  Fl. Oz. " -> "fl oz")
pub fn clean_unit_text(input: &str) -> String {
    input
        .to_lowercase()
        .replace('.', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve free-text unit input to a known unit
///
/// Tries the cleaned text first, then the same text with one trailing "s"
/// removed, so plurals like "gallons" or "cups" resolve without their own
/// table entries.
pub fn normalize_unit(input: &str) -> UnitResolution {
    let cleaned = clean_unit_text(input);
    if cleaned.is_empty() {
        return UnitResolution::Unresolved(input.to_string());
    }

    let found = table::lookup(&cleaned).or_else(|| {
        cleaned
            .strip_suffix('s')
            .filter(|singular| !singular.is_empty())
            .and_then(table::lookup)
    });

    match found {
        Some(descriptor) => UnitResolution::Resolved(descriptor),
        None => {
            debug!("Unit '{}' did not match any known spelling", input);
            UnitResolution::Unresolved(input.to_string())
        }
    }
}

/// Descriptor for `unit`, if it resolves
pub fn resolve(unit: &str) -> Option<&'static UnitDescriptor> {
    normalize_unit(unit).descriptor()
}

/// Category of `unit`, `None` when unresolved
pub fn get_unit_category(unit: &str) -> Option<UnitCategory> {
    resolve(unit).map(|d| d.category)
}

/// Reference-unit symbol of the category `unit` belongs to
pub fn get_standard_unit_for_unit(unit: &str) -> Option<&'static str> {
    resolve(unit).map(|d| d.reference_unit())
}
