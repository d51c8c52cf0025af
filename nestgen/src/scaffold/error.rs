//! Scaffold error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for scaffold operations.
pub type ScaffoldResult<T> = Result<T, ScaffoldError>;

/// Errors that can occur while generating artifacts for an entity.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// The requested model has no `model <Name> { ... }` block in the schema.
    #[error("model '{name}' not found in schema")]
    ModelNotFound {
        /// Name as requested by the caller
        name: String,
    },

    /// Discovery mode found no model declarations at all.
    #[error("no model declarations found in schema")]
    NoModels,

    /// A field line did not tokenize into a name and a type.
    #[error("malformed field line: '{line}'")]
    MalformedFieldLine {
        /// The offending line, trimmed
        line: String,
    },

    /// The registry document has no `imports: [...]` block.
    #[error("registry has no imports list block")]
    RegistryBlockNotFound,

    /// Filesystem failure.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Template rendering failed.
    #[error("failed to render template '{name}': {source}")]
    Template {
        /// Template name
        name: String,
        /// Underlying error
        #[source]
        source: minijinja::Error,
    },

    /// The external scaffolder exited unsuccessfully.
    #[error("external scaffolder failed: {0}")]
    ExternalCommand(String),
}

impl ScaffoldError {
    /// Wrap an I/O error with the path it happened at
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error only aborts the current entity of a batch
    #[must_use]
    pub const fn is_entity_scoped(&self) -> bool {
        matches!(self, Self::ModelNotFound { .. })
    }
}
