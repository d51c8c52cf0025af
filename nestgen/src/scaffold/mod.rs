//! Schema-driven artifact generation
//!
//! This module turns one `model` block of a Prisma schema into the NestJS
//! files that back it: create and update DTOs, an entity class, a
//! data-access service and a module descriptor. The root module of the
//! application is then patched so the new module is imported exactly once.

pub mod error;
pub mod field_type;
pub mod generator;
pub mod helpers;
pub mod pipeline;
pub mod registry;
pub mod relations;
pub mod render;
pub mod schema;
pub mod templates;
pub mod type_map;

pub use error::{ScaffoldError, ScaffoldResult};
pub use field_type::FieldDefinition;
pub use generator::{GeneratedFile, GenerationSettings, PersistenceSettings, ScaffoldGenerator};
pub use helpers::{ModelName, TemplateHelpers};
pub use pipeline::{
    BatchReport, EntityOutcome, EntityReport, ExternalScaffolder, Pipeline, PipelineOptions,
    RegistryOutcome, RunEvent, Target,
};
pub use registry::{register_entity, RegistryPatch, RegistrySettings};
pub use relations::{extract_relations, RelationMap};
pub use render::{render_fields, RenderMode, RenderOptions, RenderedField};
pub use schema::{extract_model, list_models, ModelBody};
pub use type_map::map_type;
