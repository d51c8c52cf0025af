//! nestgen CLI - NestJS artifacts from a Prisma schema
//!
//! # Usage
//!
//! ```bash
//! nestgen generate Post
//! nestgen generate-all
//! nestgen models
//! nestgen --config ci/nestgen.toml generate-all --output build/modules
//! ```

use anyhow::Result;
use clap::Parser;
use nestgen::{cli::Command, NestgenConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nestgen")]
#[command(version)]
#[command(about = "Generate NestJS DTOs, entities, services and modules from a Prisma schema", long_about = None)]
struct Cli {
    /// Configuration file (default: ./nestgen.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    nestgen::observability::init(cli.verbose)?;
    let config = NestgenConfig::load(cli.config.as_deref())?;

    nestgen::cli::run(cli.command, &config)
}
