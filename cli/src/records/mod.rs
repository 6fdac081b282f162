pub mod collection;
pub mod error;
pub mod loader;
pub mod models;
pub mod validation;

#[cfg(test)]
mod tests;

pub use collection::*;
pub use error::*;
pub use loader::*;
pub use models::*;
pub use validation::*;
