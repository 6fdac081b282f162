use crate::units::{standardize_line_item, StandardizedLineItem};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Anything stored in a collection file
pub trait Record {
    fn id(&self) -> &str;
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |s| s.trim().is_empty())
}

// Active restaurant client
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Restaurant {
    pub id: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Invoice {
    pub id: String,
    pub restaurant_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,

    /// Invoice total as printed on the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,

    // Reference to the uploaded image/PDF; storage lives elsewhere
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    // TOML uses [[invoices.items]]; keep last so tables follow plain values
    #[serde(default)]
    pub items: Vec<InvoiceItem>,
}

impl Invoice {
    /// Required fields that are still empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(&self.invoice_number) {
            missing.push("invoice_number");
        }
        if self.invoice_date.is_none() {
            missing.push("invoice_date");
        }
        if is_blank(&self.supplier) {
            missing.push("supplier");
        }
        if self.amount.is_none() {
            missing.push("amount");
        }
        missing
    }

    /// Pending is derived on read: any required field absent.
    /// Clearing a field later makes the invoice pending again.
    pub fn is_pending(&self) -> bool {
        !self.missing_fields().is_empty()
    }

    pub fn items_total(&self) -> f64 {
        self.items.iter().map(|item| item.amount).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InvoiceItem {
    pub id: String,
    pub item_name: String,
    pub quantity: f64,
    /// Free text as entered
    pub unit: String,
    /// Line total
    pub amount: f64,

    /// amount / quantity, filled in when the invoice is saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredient_id: Option<String>,
}

impl InvoiceItem {
    pub fn standardized(&self) -> StandardizedLineItem {
        standardize_line_item(self.quantity, &self.unit, self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Ingredient {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    /// Unit `last_price` is quoted in
    pub unit: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_price: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_ordered_at: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MenuComponent {
    pub ingredient_id: String,
    pub quantity: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MenuItem {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    pub price: f64,

    /// Derived from linked ingredient costs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,

    #[serde(default)]
    pub components: Vec<MenuComponent>,
}

impl MenuItem {
    /// cost / price as a percentage
    pub fn food_cost_pct(&self) -> Option<f64> {
        match self.cost {
            Some(cost) if self.price > 0.0 => Some(cost / self.price * 100.0),
            _ => None,
        }
    }
}

// Sales prospect, tracked separately from active restaurants
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProspectiveClient {
    pub id: String,
    pub business_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_contacted_date: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    ProspectCreated,
    ProspectUpdated,
    ProspectDeleted,
    InvoiceSaved,
}

/// Append-only audit entry
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ActivityLog {
    pub id: String,
    pub activity_type: ActivityType,
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    pub timestamp: DateTime<Utc>,

    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

macro_rules! impl_record {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Record for $ty {
                fn id(&self) -> &str {
                    &self.id
                }
            }
        )*
    };
}

impl_record!(
    Restaurant,
    Invoice,
    InvoiceItem,
    Ingredient,
    MenuItem,
    ProspectiveClient,
    ActivityLog,
);

/// Every collection, held in memory
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    pub restaurants: Vec<Restaurant>,
    pub invoices: Vec<Invoice>,
    pub ingredients: Vec<Ingredient>,
    pub menu_items: Vec<MenuItem>,
    pub prospects: Vec<ProspectiveClient>,
    pub activity: Vec<ActivityLog>,
}

fn find<'a, T: Record>(records: &'a [T], id: &str) -> Option<&'a T> {
    records.iter().find(|r| r.id() == id)
}

fn find_mut<'a, T: Record>(records: &'a mut [T], id: &str) -> Option<&'a mut T> {
    records.iter_mut().find(|r| r.id() == id)
}

/// Next free "<prefix>-<n>" id, one past the highest numeric suffix in use
pub fn next_id<T: Record>(records: &[T], prefix: &str) -> String {
    let highest = records
        .iter()
        .filter_map(|r| r.id().strip_prefix(prefix)?.strip_prefix('-')?.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format!("{}-{}", prefix, highest + 1)
}

impl Dataset {
    pub fn restaurant(&self, id: &str) -> Option<&Restaurant> {
        find(&self.restaurants, id)
    }

    pub fn invoice(&self, id: &str) -> Option<&Invoice> {
        find(&self.invoices, id)
    }

    pub fn invoice_mut(&mut self, id: &str) -> Option<&mut Invoice> {
        find_mut(&mut self.invoices, id)
    }

    pub fn ingredient(&self, id: &str) -> Option<&Ingredient> {
        find(&self.ingredients, id)
    }

    pub fn ingredient_mut(&mut self, id: &str) -> Option<&mut Ingredient> {
        find_mut(&mut self.ingredients, id)
    }

    pub fn menu_item(&self, id: &str) -> Option<&MenuItem> {
        find(&self.menu_items, id)
    }

    pub fn menu_item_mut(&mut self, id: &str) -> Option<&mut MenuItem> {
        find_mut(&mut self.menu_items, id)
    }

    pub fn prospect(&self, id: &str) -> Option<&ProspectiveClient> {
        find(&self.prospects, id)
    }

    pub fn prospect_mut(&mut self, id: &str) -> Option<&mut ProspectiveClient> {
        find_mut(&mut self.prospects, id)
    }

    /// Invoices with at least one required field missing
    pub fn pending_invoices(&self) -> impl Iterator<Item = &Invoice> {
        self.invoices.iter().filter(|i| i.is_pending())
    }

    pub fn append_activity(&mut self, mut entry: ActivityLog) -> &ActivityLog {
        if entry.id.is_empty() {
            entry.id = next_id(&self.activity, "a");
        }
        self.activity.push(entry);
        &self.activity[self.activity.len() - 1]
    }
}
