//! Dashboard aggregates over a loaded dataset.

use crate::records::models::Dataset;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

const TOP_SUPPLIERS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierSpend {
    pub supplier: String,
    pub spend: f64,
    pub invoice_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub restaurant_count: usize,
    pub invoice_count: usize,
    pub pending_count: usize,
    pub total_spend: f64,
    pub average_invoice_amount: Option<f64>,
    pub current_month_spend: f64,
    pub previous_month_spend: f64,
    /// None when the previous month had no spend
    pub month_over_month_pct: Option<f64>,
    pub top_suppliers: Vec<SupplierSpend>,
    pub ingredient_count: usize,
    pub average_food_cost_pct: Option<f64>,
}

fn month_key(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}

fn previous_month(today: NaiveDate) -> (i32, u32) {
    if today.month() == 1 {
        (today.year() - 1, 12)
    } else {
        (today.year(), today.month() - 1)
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

pub fn dashboard_stats(dataset: &Dataset, today: NaiveDate) -> DashboardStats {
    let current = month_key(today);
    let previous = previous_month(today);

    let amounts: Vec<f64> = dataset.invoices.iter().filter_map(|i| i.amount).collect();

    let mut current_month_spend = 0.0;
    let mut previous_month_spend = 0.0;
    let mut by_supplier: HashMap<&str, (f64, usize)> = HashMap::new();

    for invoice in &dataset.invoices {
        let Some(amount) = invoice.amount else {
            continue;
        };
        if let Some(date) = invoice.invoice_date {
            let key = month_key(date);
            if key == current {
                current_month_spend += amount;
            } else if key == previous {
                previous_month_spend += amount;
            }
        }
        if let Some(supplier) = invoice.supplier.as_deref().map(str::trim) {
            if !supplier.is_empty() {
                let entry = by_supplier.entry(supplier).or_insert((0.0, 0));
                entry.0 += amount;
                entry.1 += 1;
            }
        }
    }

    let mut top_suppliers: Vec<SupplierSpend> = by_supplier
        .into_iter()
        .map(|(supplier, (spend, invoice_count))| SupplierSpend {
            supplier: supplier.to_string(),
            spend,
            invoice_count,
        })
        .collect();
    top_suppliers.sort_by(|a, b| {
        b.spend
            .total_cmp(&a.spend)
            .then_with(|| a.supplier.cmp(&b.supplier))
    });
    top_suppliers.truncate(TOP_SUPPLIERS);

    let month_over_month_pct = if previous_month_spend > 0.0 {
        Some((current_month_spend - previous_month_spend) / previous_month_spend * 100.0)
    } else {
        None
    };

    let food_costs: Vec<f64> = dataset
        .menu_items
        .iter()
        .filter_map(|m| m.food_cost_pct())
        .collect();

    DashboardStats {
        restaurant_count: dataset.restaurants.len(),
        invoice_count: dataset.invoices.len(),
        pending_count: dataset.pending_invoices().count(),
        total_spend: amounts.iter().sum(),
        average_invoice_amount: mean(&amounts),
        current_month_spend,
        previous_month_spend,
        month_over_month_pct,
        top_suppliers,
        ingredient_count: dataset.ingredients.len(),
        average_food_cost_pct: mean(&food_costs),
    }
}

impl fmt::Display for DashboardStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use crate::units::format_currency;

        writeln!(f, "Restaurants:      {}", self.restaurant_count)?;
        writeln!(
            f,
            "Invoices:         {} ({} pending)",
            self.invoice_count, self.pending_count
        )?;
        writeln!(f, "Total spend:      {}", format_currency(self.total_spend))?;
        if let Some(avg) = self.average_invoice_amount {
            writeln!(f, "Average invoice:  {}", format_currency(avg))?;
        }
        write!(
            f,
            "This month:       {}",
            format_currency(self.current_month_spend)
        )?;
        match self.month_over_month_pct {
            Some(pct) => writeln!(f, " ({:+.1}% vs last month)", pct)?,
            None => writeln!(f)?,
        }
        writeln!(f, "Ingredients:      {}", self.ingredient_count)?;
        if let Some(pct) = self.average_food_cost_pct {
            writeln!(f, "Avg food cost:    {:.1}%", pct)?;
        }
        if !self.top_suppliers.is_empty() {
            writeln!(f, "Top suppliers:")?;
            for s in &self.top_suppliers {
                writeln!(
                    f,
                    "  {:<24} {:>12}  ({} invoices)",
                    s.supplier,
                    format_currency(s.spend),
                    s.invoice_count
                )?;
            }
        }
        Ok(())
    }
}
