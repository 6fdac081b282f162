use crate::units::cost::convert_unit_cost;
use crate::units::normalizer::resolve;
use crate::units::types::{StandardizedCost, UnitCategory};
use log::warn;
use serde::{Deserialize, Serialize};

/// Display unit preferences, one optional unit per category (e.g., weight = "lb")
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct UnitPreferences {
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub volume: Option<String>,
    #[serde(default)]
    pub count: Option<String>,
}

impl UnitPreferences {
    pub fn get(&self, category: UnitCategory) -> Option<&str> {
        match category {
            UnitCategory::Weight => self.weight.as_deref(),
            UnitCategory::Volume => self.volume.as_deref(),
            UnitCategory::Count => self.count.as_deref(),
        }
    }
}

/// A cost re-expressed for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayCost {
    pub value: f64,
    pub unit: String,
    pub text: String,
}

/// "$1,234.50"
pub fn format_currency(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}${}.{}", sign, grouped, cents)
}

/// Per-unit costs under one currency unit keep four decimals
pub fn format_unit_cost(cost: f64) -> String {
    if cost.abs() < 1.0 {
        format!("${:.4}", cost)
    } else {
        format_currency(cost)
    }
}

/// "2.5 lb", "12 ea"
pub fn format_quantity(quantity: f64, unit: &str) -> String {
    let number = format!("{:.3}", quantity);
    let number = number.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", number, unit)
}

/// Formats standardized costs in the unit a reader expects
pub struct UnitFormatter {
    preferences: UnitPreferences,
}

impl Default for UnitFormatter {
    fn default() -> Self {
        Self::new(UnitPreferences::default())
    }
}

impl UnitFormatter {
    pub fn new(preferences: UnitPreferences) -> Self {
        Self { preferences }
    }

    /// Re-express a reference-unit cost in the preferred unit
    ///
    /// Precedence: `override_unit`, then the category preference, then the
    /// reference unit itself. A preferred unit from another category (or one
    /// that does not resolve) is skipped with a warning.
    pub fn display_cost(&self, cost: &StandardizedCost, override_unit: Option<&str>) -> DisplayCost {
        let category = resolve(cost.reference_unit).map(|d| d.category);
        let preferred = override_unit.or_else(|| {
            category.and_then(|c| self.preferences.get(c))
        });

        if let Some(unit) = preferred {
            match convert_unit_cost(cost.standardized_cost, cost.reference_unit, unit) {
                Ok(value) => {
                    let symbol = resolve(unit).map(|d| d.symbol).unwrap_or(unit);
                    return DisplayCost {
                        value,
                        unit: symbol.to_string(),
                        text: format!("{} / {}", format_unit_cost(value), symbol),
                    };
                }
                Err(e) => {
                    warn!(
                        "Cannot show cost per '{}', falling back to {}: {}",
                        unit, cost.reference_unit, e
                    );
                }
            }
        }

        DisplayCost {
            value: cost.standardized_cost,
            unit: cost.reference_unit.to_string(),
            text: format!(
                "{} / {}",
                format_unit_cost(cost.standardized_cost),
                cost.reference_unit
            ),
        }
    }
}
