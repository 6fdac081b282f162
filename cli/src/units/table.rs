//! Static unit vocabulary.
//!
//! Every unit belongs to exactly one category and carries its factor to the
//! category's reference unit (ounce, fluid ounce, each). Factors are the
//! standard US customary and metric definitions.

use crate::units::types::{UnitCategory, UnitDescriptor};
use lazy_static::lazy_static;
use std::collections::HashMap;

/// Bumped whenever a symbol, synonym or factor changes
pub const UNIT_TABLE_VERSION: u32 = 1;

const GRAMS_PER_OUNCE: f64 = 28.349523125;
const MILLILITERS_PER_FLUID_OUNCE: f64 = 29.5735295625;

pub static UNITS: [UnitDescriptor; 15] = [
    // Weight (reference: oz)
    UnitDescriptor {
        symbol: "oz",
        name: "ounce",
        category: UnitCategory::Weight,
        to_reference_factor: 1.0,
    },
    UnitDescriptor {
        symbol: "lb",
        name: "pound",
        category: UnitCategory::Weight,
        to_reference_factor: 16.0,
    },
    UnitDescriptor {
        symbol: "g",
        name: "gram",
        category: UnitCategory::Weight,
        to_reference_factor: 1.0 / GRAMS_PER_OUNCE,
    },
    UnitDescriptor {
        symbol: "kg",
        name: "kilogram",
        category: UnitCategory::Weight,
        to_reference_factor: 1000.0 / GRAMS_PER_OUNCE,
    },
    // Volume (reference: fl oz)
    UnitDescriptor {
        symbol: "fl oz",
        name: "fluid ounce",
        category: UnitCategory::Volume,
        to_reference_factor: 1.0,
    },
    UnitDescriptor {
        symbol: "tsp",
        name: "teaspoon",
        category: UnitCategory::Volume,
        to_reference_factor: 1.0 / 6.0,
    },
    UnitDescriptor {
        symbol: "tbsp",
        name: "tablespoon",
        category: UnitCategory::Volume,
        to_reference_factor: 0.5,
    },
    UnitDescriptor {
        symbol: "cup",
        name: "cup",
        category: UnitCategory::Volume,
        to_reference_factor: 8.0,
    },
    UnitDescriptor {
        symbol: "pt",
        name: "pint",
        category: UnitCategory::Volume,
        to_reference_factor: 16.0,
    },
    UnitDescriptor {
        symbol: "qt",
        name: "quart",
        category: UnitCategory::Volume,
        to_reference_factor: 32.0,
    },
    UnitDescriptor {
        symbol: "gal",
        name: "gallon",
        category: UnitCategory::Volume,
        to_reference_factor: 128.0,
    },
    UnitDescriptor {
        symbol: "ml",
        name: "milliliter",
        category: UnitCategory::Volume,
        to_reference_factor: 1.0 / MILLILITERS_PER_FLUID_OUNCE,
    },
    UnitDescriptor {
        symbol: "l",
        name: "liter",
        category: UnitCategory::Volume,
        to_reference_factor: 1000.0 / MILLILITERS_PER_FLUID_OUNCE,
    },
    // Count (reference: ea)
    UnitDescriptor {
        symbol: "ea",
        name: "each",
        category: UnitCategory::Count,
        to_reference_factor: 1.0,
    },
    UnitDescriptor {
        symbol: "dz",
        name: "dozen",
        category: UnitCategory::Count,
        to_reference_factor: 12.0,
    },
];

/// Accepted spellings (already cleaned: lowercase, single spaces, no periods) -> symbol
const SYNONYMS: &[(&str, &str)] = &[
    ("oz", "oz"),
    ("ozs", "oz"),
    ("ounce", "oz"),
    ("ounces", "oz"),
    ("lb", "lb"),
    ("lbs", "lb"),
    ("pound", "lb"),
    ("pounds", "lb"),
    ("#", "lb"),
    ("g", "g"),
    ("gr", "g"),
    ("gm", "g"),
    ("gram", "g"),
    ("grams", "g"),
    ("kg", "kg"),
    ("kgs", "kg"),
    ("kilo", "kg"),
    ("kilogram", "kg"),
    ("fl oz", "fl oz"),
    ("floz", "fl oz"),
    ("fluid ounce", "fl oz"),
    ("tsp", "tsp"),
    ("teaspoon", "tsp"),
    ("tbsp", "tbsp"),
    ("tbs", "tbsp"),
    ("tablespoon", "tbsp"),
    ("cup", "cup"),
    ("c", "cup"),
    ("pt", "pt"),
    ("pint", "pt"),
    ("qt", "qt"),
    ("quart", "qt"),
    ("gal", "gal"),
    ("gallon", "gal"),
    ("ml", "ml"),
    ("milliliter", "ml"),
    ("millilitre", "ml"),
    ("l", "l"),
    ("lt", "l"),
    ("liter", "l"),
    ("litre", "l"),
    ("ea", "ea"),
    ("each", "ea"),
    ("unit", "ea"),
    ("piece", "ea"),
    ("pc", "ea"),
    ("pcs", "ea"),
    ("count", "ea"),
    ("ct", "ea"),
    ("dz", "dz"),
    ("doz", "dz"),
    ("dozen", "dz"),
];

lazy_static! {
    /// Spelling -> descriptor
    static ref SYNONYM_MAP: HashMap<&'static str, &'static UnitDescriptor> = SYNONYMS
        .iter()
        .filter_map(|(spelling, symbol)| descriptor_for_symbol(symbol).map(|d| (*spelling, d)))
        .collect();

    /// Every spelling, sorted alphabetically (autocomplete candidates)
    pub static ref SPELLINGS: Vec<&'static str> = {
        let mut spellings: Vec<&'static str> = SYNONYMS.iter().map(|(spelling, _)| *spelling).collect();
        spellings.sort_unstable();
        spellings.dedup();
        spellings
    };
}

/// Exact lookup of a canonical symbol
pub fn descriptor_for_symbol(symbol: &str) -> Option<&'static UnitDescriptor> {
    UNITS.iter().find(|d| d.symbol == symbol)
}

/// Exact lookup of a cleaned spelling
pub fn lookup(spelling: &str) -> Option<&'static UnitDescriptor> {
    SYNONYM_MAP.get(spelling).copied()
}

/// Units of one category, in table order
pub fn units_in_category(category: UnitCategory) -> impl Iterator<Item = &'static UnitDescriptor> {
    UNITS.iter().filter(move |d| d.category == category)
}
