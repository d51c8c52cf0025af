//! nestgen CLI
//!
//! Subcommands:
//! - `generate` - Generate artifacts for one entity
//! - `generate-all` - Generate artifacts for every model in the schema
//! - `models` - List the models found in the schema

pub mod commands;

use crate::config::NestgenConfig;
use crate::scaffold::Target;
use anyhow::Result;
use clap::{Args, Subcommand};
use commands::{GenerateCommand, ModelsCommand};
use std::path::PathBuf;

/// Overrides for configured paths
#[derive(Debug, Clone, Default, Args)]
pub struct PathOverrides {
    /// Prisma schema (default from config: `prisma/schema.prisma`)
    #[arg(long)]
    pub schema: Option<PathBuf>,
    /// Output root for entity directories (default: `src/modules`)
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Root module to patch (default: `src/shared/app.module.ts`)
    #[arg(long)]
    pub registry: Option<PathBuf>,
}

impl PathOverrides {
    /// Apply the overrides on top of a loaded configuration
    #[must_use]
    pub fn apply(&self, config: &NestgenConfig) -> NestgenConfig {
        let mut config = config.clone();
        if let Some(schema) = &self.schema {
            config.paths.schema.clone_from(schema);
        }
        if let Some(output) = &self.output {
            config.paths.output_dir.clone_from(output);
        }
        if let Some(registry) = &self.registry {
            config.paths.registry.clone_from(registry);
        }
        config
    }
}

/// nestgen subcommand
#[derive(Subcommand)]
pub enum Command {
    /// Generate DTOs, entity, service and module for one entity
    Generate {
        /// Entity name as declared in the schema (any case)
        entity: String,
        /// Path overrides
        #[command(flatten)]
        paths: PathOverrides,
    },
    /// Generate artifacts for every model in the schema
    GenerateAll {
        /// Path overrides
        #[command(flatten)]
        paths: PathOverrides,
    },
    /// List models declared in the schema
    Models {
        /// Prisma schema (default from config)
        #[arg(long)]
        schema: Option<PathBuf>,
    },
}

/// Run a nestgen command
///
/// # Errors
///
/// Returns an error if the command fails or any entity could not be generated
pub fn run(command: Command, config: &NestgenConfig) -> Result<()> {
    match command {
        Command::Generate { entity, paths } => {
            let config = paths.apply(config);
            GenerateCommand::new(Target::Single(entity), config.pipeline_options()).execute()?;
        }
        Command::GenerateAll { paths } => {
            let config = paths.apply(config);
            GenerateCommand::new(Target::All, config.pipeline_options()).execute()?;
        }
        Command::Models { schema } => {
            let schema = schema.unwrap_or_else(|| config.paths.schema.clone());
            ModelsCommand::new(schema).execute()?;
        }
    }

    Ok(())
}
