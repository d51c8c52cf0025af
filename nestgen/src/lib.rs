//! nestgen: NestJS artifact generator for Prisma schemas
//!
//! Reads the `model` blocks of a Prisma schema and writes, per entity:
//! - Create and update DTOs with `class-validator` decorators
//! - A plain entity class
//! - A data-access service with create, list, get, update and delete
//! - A module descriptor wiring controller, service and persistence
//!
//! The entity's module is then imported into the application's root module,
//! once, however many times generation is repeated.
//!
//! # Quick Start
//!
//! ```rust
//! use nestgen::scaffold::{GenerationSettings, ScaffoldGenerator};
//!
//! let schema = "model Comment { id Int text String createdAt DateTime? }";
//! let generator = ScaffoldGenerator::from_schema(schema, "comment", GenerationSettings::default())?;
//! let files = generator.generate()?;
//! assert_eq!(files.len(), 5);
//! # Ok::<(), nestgen::scaffold::ScaffoldError>(())
//! ```
//!
//! # Features
//!
//! - `cli` - the `nestgen` command-line tool (default)

pub mod config;
pub mod observability;
pub mod scaffold;

#[cfg(feature = "cli")]
pub mod cli;

pub use config::NestgenConfig;
pub use scaffold::{Pipeline, ScaffoldError, ScaffoldResult, Target};
