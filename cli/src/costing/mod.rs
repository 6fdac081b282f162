//! Invoice and menu-item costing on top of the unit engine.

pub mod error;
pub mod invoice;
pub mod menu;

pub use error::CostingError;
pub use invoice::{apply_invoice, standardize_invoice, validate_invoice, SaveReport};
pub use menu::{
    cost_menu_item, save_menu_item, update_menu_item_cost, validate_menu_item, ComponentCost,
    MenuCosting,
};
