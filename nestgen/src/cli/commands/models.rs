//! Model discovery command

use crate::scaffold::{list_models, ScaffoldError};
use anyhow::{Context, Result};
use console::style;
use std::fs;
use std::path::PathBuf;

/// List the models declared in a schema
pub struct ModelsCommand {
    schema: PathBuf,
}

impl ModelsCommand {
    /// Create a new models command
    #[must_use]
    pub const fn new(schema: PathBuf) -> Self {
        Self { schema }
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be read or declares no model.
    pub fn execute(&self) -> Result<()> {
        let schema = fs::read_to_string(&self.schema)
            .with_context(|| format!("Failed to read schema: {}", self.schema.display()))?;
        let models = list_models(&schema);
        if models.is_empty() {
            return Err(ScaffoldError::NoModels)
                .with_context(|| format!("Nothing found in {}", self.schema.display()));
        }

        println!(
            "\n{} {}:",
            style("Models in").cyan().bold(),
            style(self.schema.display()).bold()
        );
        for model in &models {
            println!(
                "  {} {}",
                style(model.raw()).green(),
                style(format!("→ {}/", model.lower())).dim()
            );
        }

        Ok(())
    }
}
