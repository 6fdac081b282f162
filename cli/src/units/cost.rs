use crate::units::error::UnitError;
use crate::units::normalizer::normalize_unit;
use crate::units::types::{StandardizedCost, StandardizedLineItem, UnitDescriptor, UnitResolution};

fn resolve_or_err(unit: &str) -> Result<&'static UnitDescriptor, UnitError> {
    match normalize_unit(unit) {
        UnitResolution::Resolved(descriptor) => Ok(descriptor),
        UnitResolution::Unresolved(input) => Err(UnitError::UnresolvedUnit { input }),
    }
}

/// Cost of one reference unit (oz, fl oz or ea) for a purchased line
///
/// Checks run in order: unit, quantity, reference quantity, amount. The
/// result is full precision; round only for display.
pub fn calculate_standardized_cost(
    quantity: f64,
    unit: &str,
    amount: f64,
) -> Result<StandardizedCost, UnitError> {
    let descriptor = resolve_or_err(unit)?;

    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(UnitError::InvalidQuantity { quantity });
    }

    let reference_quantity = quantity * descriptor.to_reference_factor;
    if reference_quantity == 0.0 {
        return Err(UnitError::InvalidQuantity { quantity });
    }

    if !amount.is_finite() || amount < 0.0 {
        return Err(UnitError::InvalidAmount { amount });
    }

    Ok(StandardizedCost {
        standardized_cost: amount / reference_quantity,
        reference_unit: descriptor.reference_unit(),
    })
}

/// Convert `value` from one unit to another of the same category
pub fn convert_quantity(value: f64, from_unit: &str, to_unit: &str) -> Result<f64, UnitError> {
    let from = resolve_or_err(from_unit)?;
    let to = resolve_or_err(to_unit)?;

    if from.category != to.category {
        return Err(UnitError::CategoryMismatch {
            from: from.category,
            to: to.category,
        });
    }

    Ok(value * from.to_reference_factor / to.to_reference_factor)
}

/// Convert a cost per `from_unit` into a cost per `to_unit`
pub fn convert_unit_cost(cost: f64, from_unit: &str, to_unit: &str) -> Result<f64, UnitError> {
    // $/lb -> $/oz divides by 16, the inverse of the quantity conversion
    let per_unit = convert_quantity(1.0, to_unit, from_unit)?;
    Ok(cost * per_unit)
}

/// Derived view of a raw line; unresolved units and bad quantities leave
/// the computed fields empty instead of failing
pub fn standardize_line_item(quantity: f64, unit: &str, amount: f64) -> StandardizedLineItem {
    let descriptor = normalize_unit(unit).descriptor();
    let reference_quantity = descriptor
        .map(|d| quantity * d.to_reference_factor)
        .filter(|q| q.is_finite());
    let cost = calculate_standardized_cost(quantity, unit, amount).ok();

    StandardizedLineItem {
        raw_quantity: quantity,
        raw_unit: unit.to_string(),
        normalized_unit: descriptor.map(|d| d.symbol),
        category: descriptor.map(|d| d.category),
        reference_quantity,
        line_amount: amount,
        standardized_cost: cost.as_ref().map(|c| c.standardized_cost),
        reference_unit: descriptor.map(|d| d.reference_unit()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::types::UnitCategory;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_pounds_cost_per_ounce() {
        let cost = calculate_standardized_cost(10.0, "lb", 50.0).unwrap();
        assert_eq!(cost.standardized_cost, 0.3125);
        assert_eq!(cost.reference_unit, "oz");
    }

    #[test]
    fn test_gallon_cost_per_fluid_ounce() {
        let cost = calculate_standardized_cost(2.0, "Gallons", 25.6).unwrap();
        assert!(approx(cost.standardized_cost, 0.1));
        assert_eq!(cost.reference_unit, "fl oz");
    }

    #[test]
    fn test_dozen_cost_per_each() {
        let cost = calculate_standardized_cost(3.0, "dozen", 9.0).unwrap();
        assert!(approx(cost.standardized_cost, 0.25));
        assert_eq!(cost.reference_unit, "ea");
    }

    #[test]
    fn test_zero_amount_is_allowed() {
        let cost = calculate_standardized_cost(4.0, "ea", 0.0).unwrap();
        assert_eq!(cost.standardized_cost, 0.0);
    }

    #[test]
    fn test_invalid_quantity() {
        assert_eq!(
            calculate_standardized_cost(0.0, "lb", 50.0),
            Err(UnitError::InvalidQuantity { quantity: 0.0 })
        );
        assert!(matches!(
            calculate_standardized_cost(-1.0, "lb", 50.0),
            Err(UnitError::InvalidQuantity { .. })
        ));
        assert!(matches!(
            calculate_standardized_cost(f64::NAN, "lb", 50.0),
            Err(UnitError::InvalidQuantity { .. })
        ));
        // Underflows to a zero reference quantity
        assert!(matches!(
            calculate_standardized_cost(5e-324, "g", 1.0),
            Err(UnitError::InvalidQuantity { .. })
        ));
    }

    #[test]
    fn test_unresolved_unit_checked_first() {
        assert_eq!(
            calculate_standardized_cost(5.0, "bushels-of-nonsense", 10.0),
            Err(UnitError::UnresolvedUnit {
                input: "bushels-of-nonsense".to_string()
            })
        );
        assert!(matches!(
            calculate_standardized_cost(0.0, "nonsense", 10.0),
            Err(UnitError::UnresolvedUnit { .. })
        ));
    }

    #[test]
    fn test_negative_amount() {
        assert!(matches!(
            calculate_standardized_cost(1.0, "lb", -3.0),
            Err(UnitError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_convert_quantity() {
        assert!(approx(convert_quantity(2.0, "lb", "oz").unwrap(), 32.0));
        assert!(approx(convert_quantity(1.0, "gal", "qt").unwrap(), 4.0));
        assert!(approx(convert_quantity(1000.0, "g", "kg").unwrap(), 1.0));
        assert_eq!(
            convert_quantity(1.0, "lb", "gal"),
            Err(UnitError::CategoryMismatch {
                from: UnitCategory::Weight,
                to: UnitCategory::Volume,
            })
        );
    }

    #[test]
    fn test_convert_unit_cost() {
        // $3.20/lb is $0.20/oz
        assert!(approx(convert_unit_cost(3.2, "lb", "oz").unwrap(), 0.2));
        assert!(approx(convert_unit_cost(0.2, "oz", "lb").unwrap(), 3.2));
    }

    #[test]
    fn test_standardize_line_item() {
        let item = standardize_line_item(10.0, "Pounds", 50.0);
        assert_eq!(item.normalized_unit, Some("lb"));
        assert_eq!(item.reference_quantity, Some(160.0));
        assert_eq!(item.standardized_cost, Some(0.3125));
        assert!(item.is_resolved());

        let item = standardize_line_item(3.0, "crate", 12.0);
        assert!(!item.is_resolved());
        assert_eq!(item.standardized_cost, None);
        assert_eq!(item.raw_unit, "crate");

        let item = standardize_line_item(0.0, "lb", 12.0);
        assert_eq!(item.reference_quantity, Some(0.0));
        assert_eq!(item.standardized_cost, None);
    }
}
