use serde::{Deserialize, Serialize};
use std::fmt;

/// Family of units that convert into each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    Weight,
    Volume,
    Count,
}

impl UnitCategory {
    pub const ALL: [UnitCategory; 3] = [
        UnitCategory::Weight,
        UnitCategory::Volume,
        UnitCategory::Count,
    ];

    /// Symbol of the unit every member of this category converts into
    pub fn reference_unit(self) -> &'static str {
        match self {
            UnitCategory::Weight => "oz",
            UnitCategory::Volume => "fl oz",
            UnitCategory::Count => "ea",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UnitCategory::Weight => "weight",
            UnitCategory::Volume => "volume",
            UnitCategory::Count => "count",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "weight" | "mass" => Some(UnitCategory::Weight),
            "volume" => Some(UnitCategory::Volume),
            "count" => Some(UnitCategory::Count),
            _ => None,
        }
    }
}

impl fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recognized unit of measure
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitDescriptor {
    /// Canonical short form (e.g., "lb", "fl oz", "ea")
    pub symbol: &'static str,
    /// Singular display name (e.g., "pound")
    pub name: &'static str,
    pub category: UnitCategory,
    /// Multiplier from one of this unit to the category's reference unit
    pub to_reference_factor: f64,
}

impl UnitDescriptor {
    pub fn reference_unit(&self) -> &'static str {
        self.category.reference_unit()
    }

    pub fn is_reference(&self) -> bool {
        self.symbol == self.reference_unit()
    }
}

/// Outcome of resolving free-text unit input
#[derive(Debug, Clone, PartialEq)]
pub enum UnitResolution {
    /// Matched a known unit
    Resolved(&'static UnitDescriptor),
    /// No match (original text kept for display)
    Unresolved(String),
}

impl UnitResolution {
    pub fn descriptor(&self) -> Option<&'static UnitDescriptor> {
        match self {
            UnitResolution::Resolved(descriptor) => Some(descriptor),
            UnitResolution::Unresolved(_) => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, UnitResolution::Resolved(_))
    }
}

/// Result of `validate_unit`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Cost of one reference unit
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardizedCost {
    pub standardized_cost: f64,
    pub reference_unit: &'static str,
}

/// Derived view of a raw invoice or recipe line. Computed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardizedLineItem {
    pub raw_quantity: f64,
    pub raw_unit: String,
    /// Canonical symbol when the unit resolved
    pub normalized_unit: Option<&'static str>,
    pub category: Option<UnitCategory>,
    pub reference_quantity: Option<f64>,
    pub line_amount: f64,
    /// Cost per reference unit, absent when it cannot be computed
    pub standardized_cost: Option<f64>,
    pub reference_unit: Option<&'static str>,
}

impl StandardizedLineItem {
    pub fn is_resolved(&self) -> bool {
        self.normalized_unit.is_some()
    }
}
