// Registry of record collections: file names, TOML keys and the text
// fields list search runs over

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Restaurants,
    Invoices,
    Ingredients,
    MenuItems,
    Prospects,
    Activity,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::Restaurants,
        Collection::Invoices,
        Collection::Ingredients,
        Collection::MenuItems,
        Collection::Prospects,
        Collection::Activity,
    ];

    /// Key of the array of tables inside the collection file
    pub fn key(self) -> &'static str {
        match self {
            Collection::Restaurants => "restaurants",
            Collection::Invoices => "invoices",
            Collection::Ingredients => "ingredients",
            Collection::MenuItems => "menu_items",
            Collection::Prospects => "prospects",
            Collection::Activity => "activity",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.toml", self.key())
    }

    /// Singular noun for messages
    pub fn record_kind(self) -> &'static str {
        match self {
            Collection::Restaurants => "Restaurant",
            Collection::Invoices => "Invoice",
            Collection::Ingredients => "Ingredient",
            Collection::MenuItems => "Menu item",
            Collection::Prospects => "Prospect",
            Collection::Activity => "Activity",
        }
    }

    /// Accepts the key, a file name, or a few UI spellings
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        let name = name.strip_suffix(".toml").unwrap_or(&name);
        match name {
            "restaurants" | "clients" => Some(Collection::Restaurants),
            "invoices" => Some(Collection::Invoices),
            "ingredients" => Some(Collection::Ingredients),
            "menu_items" | "menu-items" | "menu" => Some(Collection::MenuItems),
            "prospects" | "prospective_clients" => Some(Collection::Prospects),
            "activity" | "activity_log" => Some(Collection::Activity),
            _ => None,
        }
    }

    /// Text fields a search term is matched against
    pub fn searchable_fields(self) -> &'static [&'static str] {
        match self {
            Collection::Restaurants => &["name", "contact_name", "email"],
            Collection::Invoices => &["invoice_number", "supplier"],
            Collection::Ingredients => &["name", "unit"],
            Collection::MenuItems => &["name"],
            Collection::Prospects => &["business_name", "contact_name", "email", "city"],
            Collection::Activity => &["title", "subtitle"],
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
