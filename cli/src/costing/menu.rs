use crate::costing::error::CostingError;
use crate::records::error::StoreError;
use crate::records::models::{Dataset, MenuItem};
use crate::records::validation::{FieldPath, ValidationResult};
use crate::units::validator::unresolved_unit_message;
use crate::units::{calculate_standardized_cost, normalize_unit, resolve, UnitError};
use serde::Serialize;

/// Cost of one recipe component
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentCost {
    pub ingredient_id: String,
    pub ingredient_name: String,
    pub quantity: f64,
    pub unit: String,
    pub reference_quantity: f64,
    pub reference_unit: &'static str,
    pub cost_per_reference: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuCosting {
    pub menu_item_id: String,
    pub name: String,
    pub price: f64,
    pub total_cost: f64,
    pub food_cost_pct: Option<f64>,
    pub lines: Vec<ComponentCost>,
}

/// Field-level checks run before a menu item is stored
pub fn validate_menu_item(menu_item: &MenuItem) -> ValidationResult {
    let mut validation = ValidationResult::new();

    if menu_item.name.trim().is_empty() {
        validation.add_error(
            "Name is required",
            Some(FieldPath::record(&menu_item.id).field("name")),
        );
    }
    if !menu_item.price.is_finite() || menu_item.price < 0.0 {
        validation.add_error(
            format!("Price cannot be negative (got {})", menu_item.price),
            Some(FieldPath::record(&menu_item.id).field("price")),
        );
    }

    for (idx, component) in menu_item.components.iter().enumerate() {
        let location = |field: &str| {
            Some(FieldPath::record(&menu_item.id).element("components", idx).field(field))
        };
        if !normalize_unit(&component.unit).is_resolved() {
            validation.add_error(unresolved_unit_message(&component.unit), location("unit"));
        }
        if !component.quantity.is_finite() || component.quantity <= 0.0 {
            validation.add_error(
                format!("Quantity must be greater than zero (got {})", component.quantity),
                location("quantity"),
            );
        }
    }

    validation
}

/// Insert or replace a menu item. Refused when a component unit does not resolve.
pub fn save_menu_item(dataset: &mut Dataset, menu_item: MenuItem) -> Result<(), CostingError> {
    let validation = validate_menu_item(&menu_item);
    if !validation.is_valid() {
        return Err(CostingError::Rejected {
            kind: "Menu item",
            id: menu_item.id,
            validation,
        });
    }

    match dataset.menu_item_mut(&menu_item.id) {
        Some(existing) => *existing = menu_item,
        None => dataset.menu_items.push(menu_item),
    }
    Ok(())
}

/// Price each component from its ingredient's latest purchase price
///
/// An ingredient's `last_price` is the price of one of its own units, so its
/// cost per reference unit is that price spread over one unit's reference
/// quantity. Components must be measured in the same category as the
/// ingredient.
pub fn cost_menu_item(dataset: &Dataset, menu_item_id: &str) -> Result<MenuCosting, CostingError> {
    let menu_item = dataset
        .menu_item(menu_item_id)
        .ok_or_else(|| StoreError::not_found("Menu item", menu_item_id))?;

    let mut lines = Vec::with_capacity(menu_item.components.len());
    for (idx, component) in menu_item.components.iter().enumerate() {
        let location = FieldPath::record(&menu_item.id)
            .element("components", idx)
            .to_string();
        let unit_err = |source: UnitError| CostingError::Unit {
            location: location.clone(),
            source,
        };

        let ingredient = dataset
            .ingredient(&component.ingredient_id)
            .ok_or_else(|| StoreError::not_found("Ingredient", &component.ingredient_id))?;
        let price = ingredient
            .last_price
            .ok_or_else(|| CostingError::MissingPrice {
                ingredient_id: ingredient.id.clone(),
            })?;

        let ingredient_unit = resolve(&ingredient.unit).ok_or_else(|| {
            unit_err(UnitError::UnresolvedUnit {
                input: ingredient.unit.clone(),
            })
        })?;
        let per_reference =
            calculate_standardized_cost(1.0, &ingredient.unit, price).map_err(unit_err)?;

        let descriptor = resolve(&component.unit).ok_or_else(|| {
            unit_err(UnitError::UnresolvedUnit {
                input: component.unit.clone(),
            })
        })?;
        if descriptor.category != ingredient_unit.category {
            return Err(unit_err(UnitError::CategoryMismatch {
                from: descriptor.category,
                to: ingredient_unit.category,
            }));
        }
        if !component.quantity.is_finite() || component.quantity <= 0.0 {
            return Err(unit_err(UnitError::InvalidQuantity {
                quantity: component.quantity,
            }));
        }

        let reference_quantity = component.quantity * descriptor.to_reference_factor;
        lines.push(ComponentCost {
            ingredient_id: ingredient.id.clone(),
            ingredient_name: ingredient.name.clone(),
            quantity: component.quantity,
            unit: component.unit.clone(),
            reference_quantity,
            reference_unit: per_reference.reference_unit,
            cost_per_reference: per_reference.standardized_cost,
            cost: per_reference.standardized_cost * reference_quantity,
        });
    }

    let total_cost: f64 = lines.iter().map(|line| line.cost).sum();
    let food_cost_pct = (menu_item.price > 0.0).then(|| total_cost / menu_item.price * 100.0);

    Ok(MenuCosting {
        menu_item_id: menu_item.id.clone(),
        name: menu_item.name.clone(),
        price: menu_item.price,
        total_cost,
        food_cost_pct,
        lines,
    })
}

/// Recompute `MenuItem.cost` and store it through `save_menu_item`, so an
/// item that fails validation is left untouched
pub fn update_menu_item_cost(
    dataset: &mut Dataset,
    menu_item_id: &str,
) -> Result<MenuCosting, CostingError> {
    let costing = cost_menu_item(dataset, menu_item_id)?;
    let mut menu_item = dataset
        .menu_item(menu_item_id)
        .cloned()
        .ok_or_else(|| StoreError::not_found("Menu item", menu_item_id))?;
    menu_item.cost = Some(costing.total_cost);
    save_menu_item(dataset, menu_item)?;
    Ok(costing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::models::{Ingredient, MenuComponent};

    fn ingredient(id: &str, name: &str, unit: &str, price: Option<f64>) -> Ingredient {
        Ingredient {
            id: id.to_string(),
            restaurant_id: "r-1".to_string(),
            name: name.to_string(),
            unit: unit.to_string(),
            last_price: price,
            last_ordered_at: None,
        }
    }

    fn component(ingredient_id: &str, quantity: f64, unit: &str) -> MenuComponent {
        MenuComponent {
            ingredient_id: ingredient_id.to_string(),
            quantity,
            unit: unit.to_string(),
        }
    }

    fn menu_item(components: Vec<MenuComponent>) -> MenuItem {
        MenuItem {
            id: "m-1".to_string(),
            restaurant_id: "r-1".to_string(),
            name: "Chicken bowl".to_string(),
            price: 12.0,
            cost: None,
            components,
        }
    }

    fn test_dataset(components: Vec<MenuComponent>) -> Dataset {
        Dataset {
            ingredients: vec![
                ingredient("ing-1", "Chicken thigh", "lb", Some(4.0)),
                ingredient("ing-2", "Olive oil", "gal", Some(32.0)),
                ingredient("ing-3", "Lime", "ea", None),
            ],
            menu_items: vec![menu_item(components)],
            ..Default::default()
        }
    }

    #[test]
    fn test_cost_is_sum_of_components() {
        // 6 oz chicken at $4/lb = $1.50; 2 tbsp oil at $32/gal = $0.25*2*0.5 = $0.25
        let dataset = test_dataset(vec![
            component("ing-1", 6.0, "oz"),
            component("ing-2", 2.0, "tbsp"),
        ]);
        let costing = cost_menu_item(&dataset, "m-1").unwrap();

        assert_eq!(costing.lines.len(), 2);
        assert!((costing.lines[0].cost - 1.5).abs() < 1e-9);
        assert!((costing.lines[1].cost - 0.25).abs() < 1e-9);
        assert!((costing.total_cost - 1.75).abs() < 1e-9);
        let pct = costing.food_cost_pct.unwrap();
        assert!((pct - 1.75 / 12.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_category_mismatch_names_component() {
        let dataset = test_dataset(vec![component("ing-1", 1.0, "cup")]);
        let err = cost_menu_item(&dataset, "m-1").unwrap_err();
        match err {
            CostingError::Unit { location, source } => {
                assert_eq!(location, "m-1/components[0]");
                assert!(matches!(source, UnitError::CategoryMismatch { .. }));
            }
            other => panic!("Expected unit error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_price() {
        let dataset = test_dataset(vec![component("ing-3", 1.0, "ea")]);
        assert!(matches!(
            cost_menu_item(&dataset, "m-1"),
            Err(CostingError::MissingPrice { .. })
        ));
    }

    #[test]
    fn test_update_menu_item_cost() {
        let mut dataset = test_dataset(vec![component("ing-1", 8.0, "oz")]);
        update_menu_item_cost(&mut dataset, "m-1").unwrap();
        let item = dataset.menu_item("m-1").unwrap();
        assert_eq!(item.cost, Some(2.0));
        assert!((item.food_cost_pct().unwrap() - 2.0 / 12.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_update_cost_refuses_invalid_item() {
        let mut dataset = test_dataset(vec![component("ing-1", 8.0, "oz")]);
        dataset.menu_items[0].name = "  ".to_string();

        let err = update_menu_item_cost(&mut dataset, "m-1").unwrap_err();
        match err {
            CostingError::Rejected { validation, .. } => {
                assert_eq!(validation.issues_at("m-1/name").count(), 1);
            }
            other => panic!("Expected rejection, got {:?}", other),
        }
        assert_eq!(dataset.menu_item("m-1").unwrap().cost, None);
    }

    #[test]
    fn test_save_refuses_unresolved_component_unit() {
        let mut dataset = test_dataset(vec![]);
        let bad = menu_item(vec![component("ing-1", 2.0, "handful")]);
        let err = save_menu_item(&mut dataset, bad).unwrap_err();
        match err {
            CostingError::Rejected { validation, .. } => {
                let issue = validation.issues_at("m-1/components[0]/unit").next().unwrap();
                assert!(issue.message.contains("'handful'"));
            }
            other => panic!("Expected rejection, got {:?}", other),
        }
        assert!(dataset.menu_item("m-1").unwrap().components.is_empty());
    }

    #[test]
    fn test_save_replaces_existing() {
        let mut dataset = test_dataset(vec![]);
        let updated = menu_item(vec![component("ing-1", 5.0, "oz")]);
        save_menu_item(&mut dataset, updated).unwrap();
        assert_eq!(dataset.menu_items.len(), 1);
        assert_eq!(dataset.menu_item("m-1").unwrap().components.len(), 1);
    }
}
