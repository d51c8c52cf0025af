//! CLI command implementations

mod generate;
mod models;

pub use generate::GenerateCommand;
pub use models::ModelsCommand;
