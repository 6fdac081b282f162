pub mod executor;
pub mod formatter;
pub mod parser;

#[cfg(test)]
mod tests;

pub use executor::*;
pub use formatter::*;
pub use parser::*;
