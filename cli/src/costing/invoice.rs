use crate::costing::error::CostingError;
use crate::records::error::StoreError;
use crate::records::models::{ActivityLog, ActivityType, Dataset, Invoice};
use crate::records::validation::{FieldPath, ValidationResult};
use crate::units::validator::unresolved_unit_message;
use crate::units::{convert_unit_cost, normalize_unit, StandardizedLineItem};
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeMap;

/// Allowed gap between the invoice total and the sum of its lines
const TOTAL_TOLERANCE: f64 = 0.01;

/// Outcome of a successful invoice save
#[derive(Debug, Clone, Serialize)]
pub struct SaveReport {
    pub invoice_id: String,
    pub items_costed: usize,
    pub ingredients_updated: Vec<String>,
    /// Non-blocking issues (pending fields, totals, skipped ingredient updates)
    pub validation: ValidationResult,
}

pub fn standardize_invoice(invoice: &Invoice) -> Vec<StandardizedLineItem> {
    invoice.items.iter().map(|item| item.standardized()).collect()
}

/// Check an invoice before it is persisted
///
/// Errors block the save: unresolved units, non-positive quantities and
/// negative amounts. Pending fields and mismatched totals are warnings.
pub fn validate_invoice(invoice: &Invoice) -> ValidationResult {
    let mut validation = ValidationResult::new();

    for (idx, item) in invoice.items.iter().enumerate() {
        let location = |field: &str| {
            Some(FieldPath::record(&invoice.id).element("items", idx).field(field))
        };

        if !normalize_unit(&item.unit).is_resolved() {
            validation.add_error(
                format!("{}: {}", item.item_name, unresolved_unit_message(&item.unit)),
                location("unit"),
            );
        }

        if !item.quantity.is_finite() || item.quantity <= 0.0 {
            validation.add_error(
                format!(
                    "{}: quantity must be greater than zero (got {})",
                    item.item_name, item.quantity
                ),
                location("quantity"),
            );
        }

        if !item.amount.is_finite() || item.amount < 0.0 {
            validation.add_error(
                format!("{}: amount cannot be negative (got {})", item.item_name, item.amount),
                location("amount"),
            );
        }
    }

    let missing = invoice.missing_fields();
    if !missing.is_empty() {
        validation.add_warning(
            format!("Invoice is pending, missing: {}", missing.join(", ")),
            Some(FieldPath::record(&invoice.id)),
        );
    }

    if let Some(amount) = invoice.amount {
        let items_total = invoice.items_total();
        if !invoice.items.is_empty() && (items_total - amount).abs() > TOTAL_TOLERANCE {
            validation.add_warning(
                format!(
                    "Line items total {:.2} but invoice amount is {:.2}",
                    items_total, amount
                ),
                Some(FieldPath::record(&invoice.id).field("amount")),
            );
        }
    }

    validation
}

/// Validate and persist an invoice's line costing into the dataset
///
/// Each line gets `unit_cost = amount / quantity`. Linked ingredients take
/// the line's price converted into the ingredient's own unit, unless they
/// already carry a price from a later invoice.
pub fn apply_invoice(
    dataset: &mut Dataset,
    invoice_id: &str,
    now: DateTime<Utc>,
) -> Result<SaveReport, CostingError> {
    let invoice = dataset
        .invoice(invoice_id)
        .cloned()
        .ok_or_else(|| StoreError::not_found("Invoice", invoice_id))?;

    let mut validation = validate_invoice(&invoice);
    if !validation.is_valid() {
        return Err(CostingError::Rejected {
            kind: "Invoice",
            id: invoice.id.clone(),
            validation,
        });
    }

    let mut ingredients_updated = Vec::new();
    let unit_costs: Vec<f64> = invoice
        .items
        .iter()
        .map(|item| item.amount / item.quantity)
        .collect();

    for (idx, (item, unit_cost)) in invoice.items.iter().zip(&unit_costs).enumerate() {
        let Some(ingredient_id) = &item.ingredient_id else {
            continue;
        };
        let location = Some(
            FieldPath::record(&invoice.id)
                .element("items", idx)
                .field("ingredient_id"),
        );

        let Some(ingredient) = dataset.ingredient_mut(ingredient_id) else {
            validation.add_warning(
                format!("Ingredient '{}' does not exist, price not recorded", ingredient_id),
                location,
            );
            continue;
        };

        let is_older = match (invoice.invoice_date, ingredient.last_ordered_at) {
            (Some(date), Some(last)) => date < last,
            _ => false,
        };
        if is_older {
            continue;
        }

        match convert_unit_cost(*unit_cost, &item.unit, &ingredient.unit) {
            Ok(price) => {
                ingredient.last_price = Some(price);
                if invoice.invoice_date.is_some() {
                    ingredient.last_ordered_at = invoice.invoice_date;
                }
                ingredients_updated.push(ingredient.id.clone());
            }
            Err(e) => {
                warn!("Not updating ingredient '{}': {}", ingredient.id, e);
                validation.add_warning(
                    format!(
                        "{} is bought in '{}' but '{}' is tracked in '{}': {}",
                        item.item_name, item.unit, ingredient.name, ingredient.unit, e
                    ),
                    location,
                );
            }
        }
    }

    if let Some(stored) = dataset.invoice_mut(invoice_id) {
        for (item, unit_cost) in stored.items.iter_mut().zip(&unit_costs) {
            item.unit_cost = Some(*unit_cost);
        }
    }

    let mut metadata = BTreeMap::new();
    metadata.insert("invoice_id".to_string(), invoice.id.clone());
    metadata.insert("items".to_string(), invoice.items.len().to_string());
    dataset.append_activity(ActivityLog {
        id: String::new(),
        activity_type: ActivityType::InvoiceSaved,
        title: format!(
            "Invoice {} saved",
            invoice.invoice_number.as_deref().unwrap_or(&invoice.id)
        ),
        subtitle: invoice.supplier.clone(),
        details: Some(format!("{} ingredient prices updated", ingredients_updated.len())),
        timestamp: now,
        metadata,
    });

    info!(
        "Saved invoice {} ({} items, {} ingredients updated)",
        invoice.id,
        invoice.items.len(),
        ingredients_updated.len()
    );

    Ok(SaveReport {
        invoice_id: invoice.id,
        items_costed: unit_costs.len(),
        ingredients_updated,
        validation,
    })
}
