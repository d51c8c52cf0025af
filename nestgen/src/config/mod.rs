//! Configuration management for nestgen
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `NESTGEN_` prefix, `__` for nesting)
//! 2. The file given with `--config`, otherwise `./nestgen.toml`
//! 3. `~/.config/nestgen/config.toml` (user config, XDG)
//! 4. Hardcoded defaults (fallback)
//!
//! Environment variable format: `NESTGEN_SECTION__FIELD_NAME`
//! - Example: `NESTGEN_PATHS__SCHEMA=db/schema.prisma`
//!
//! # Example Configuration
//!
//! ```toml
//! # nestgen.toml
//! [paths]
//! schema = "prisma/schema.prisma"
//! output_dir = "src/modules"
//! registry = "src/shared/app.module.ts"
//! controller_template = "templates/controller.template.txt"
//!
//! [generation]
//! extension = "ts"
//! preserve_field_case = false
//!
//! [persistence]
//! service_class = "PrismaService"
//! service_import = "../../shared/services/prisma.service"
//! accessor = "prisma"
//!
//! [registry]
//! import_prefix = "../modules"
//!
//! [external]
//! command = ["nest", "generate"]
//! kinds = ["module", "service", "controller"]
//! ```

use crate::scaffold::{
    ExternalScaffolder, GenerationSettings, PersistenceSettings, PipelineOptions,
    RegistrySettings, RenderOptions,
};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Local configuration file looked up in the working directory
pub const LOCAL_CONFIG: &str = "nestgen.toml";

/// Input and output locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Prisma schema document
    pub schema: PathBuf,
    /// Root under which entity directories are generated
    pub output_dir: PathBuf,
    /// Root module patched with each entity's module
    pub registry: PathBuf,
    /// Controller template with `{{name}}` / `{{name-lower}}` placeholders
    pub controller_template: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            schema: PathBuf::from("prisma/schema.prisma"),
            output_dir: PathBuf::from("src/modules"),
            registry: PathBuf::from("src/shared/app.module.ts"),
            controller_template: PathBuf::from("templates/controller.template.txt"),
        }
    }
}

/// Artifact output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// File extension of generated artifacts
    pub extension: String,
    /// Keep field names as written instead of lower-casing them
    pub preserve_field_case: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            extension: "ts".to_string(),
            preserve_field_case: false,
        }
    }
}

/// External scaffolder settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalSettings {
    /// Program and leading arguments; unset disables the hook
    pub command: Option<Vec<String>>,
    /// Kinds generated per entity
    pub kinds: Vec<String>,
}

impl Default for ExternalSettings {
    fn default() -> Self {
        Self {
            command: None,
            kinds: vec![
                "module".to_string(),
                "service".to_string(),
                "controller".to_string(),
            ],
        }
    }
}

/// Complete nestgen configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NestgenConfig {
    /// Input and output locations
    pub paths: PathSettings,
    /// Artifact output settings
    pub generation: GenerationConfig,
    /// Persistence collaborator used by services and modules
    pub persistence: PersistenceSettings,
    /// Registry import settings
    pub registry: RegistrySettings,
    /// External scaffolder hook
    pub external: ExternalSettings,
}

impl NestgenConfig {
    /// Load configuration from all sources
    ///
    /// `explicit` replaces `./nestgen.toml` when given; it must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The explicit configuration file does not exist
    /// - A configuration file contains invalid TOML
    /// - A value has the wrong type after merging
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new()
            // 4. Start with defaults (lowest priority)
            .merge(Toml::string(&toml::to_string(&Self::default())?));

        // 3. User config: ~/.config/nestgen/config.toml
        let user_config = Self::recommended_path();
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }

        // 2. Explicit or local config
        match explicit {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Configuration file not found: {}", path.display());
                }
                figment = figment.merge(Toml::file(path));
            }
            None => {
                let local_config = PathBuf::from(LOCAL_CONFIG);
                if local_config.exists() {
                    figment = figment.merge(Toml::file(&local_config));
                }
            }
        }

        // 1. Environment variables (highest priority, double underscore for nesting)
        figment = figment.merge(Env::prefixed("NESTGEN_").split("__").lowercase(true));

        let config = figment.extract()?;
        Ok(config)
    }

    /// Load configuration from a specific file, defaults and environment only
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file contains invalid TOML or mistyped values.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let config = Figment::new()
            .merge(Toml::string(&toml::to_string(&Self::default())?))
            .merge(Toml::file(path))
            .merge(Env::prefixed("NESTGEN_").split("__").lowercase(true))
            .extract()?;

        Ok(config)
    }

    /// User configuration path (`~/.config/nestgen/config.toml` on Linux)
    #[must_use]
    pub fn recommended_path() -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from(LOCAL_CONFIG),
            |config_dir| config_dir.join("nestgen").join("config.toml"),
        )
    }

    /// Artifact settings for the generator
    #[must_use]
    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            extension: self.generation.extension.clone(),
            render: RenderOptions {
                preserve_field_case: self.generation.preserve_field_case,
            },
            persistence: self.persistence.clone(),
        }
    }

    /// Pipeline options for this configuration
    #[must_use]
    pub fn pipeline_options(&self) -> PipelineOptions {
        let external = self
            .external
            .command
            .as_ref()
            .filter(|command| !command.is_empty())
            .map(|command| ExternalScaffolder {
                command: command.clone(),
                kinds: self.external.kinds.clone(),
            });

        PipelineOptions {
            schema: self.paths.schema.clone(),
            output_dir: self.paths.output_dir.clone(),
            registry: self.paths.registry.clone(),
            controller_template: Some(self.paths.controller_template.clone()),
            generation: self.generation_settings(),
            registry_settings: self.registry.clone(),
            external,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = NestgenConfig::default();
        assert_eq!(config.paths.schema, PathBuf::from("prisma/schema.prisma"));
        assert_eq!(config.paths.output_dir, PathBuf::from("src/modules"));
        assert_eq!(config.generation.extension, "ts");
        assert!(!config.generation.preserve_field_case);
        assert_eq!(config.persistence.accessor, "prisma");
        assert_eq!(config.registry.import_prefix, "../modules");
        assert!(config.external.command.is_none());
        assert_eq!(config.external.kinds, ["module", "service", "controller"]);
    }

    #[test]
    fn test_defaults_serialize_to_toml() {
        let text = toml::to_string(&NestgenConfig::default()).unwrap();
        assert!(text.contains("[paths]"));
        assert!(text.contains("[persistence]"));
    }

    #[test]
    fn test_recommended_path() {
        let path = NestgenConfig::recommended_path();
        assert!(path.to_str().unwrap().ends_with("config.toml") || path.ends_with(LOCAL_CONFIG));
    }

    #[test]
    fn test_load_from_nonexistent_file() {
        let config = NestgenConfig::load_from(Path::new("/nonexistent/nestgen.toml")).unwrap();
        assert_eq!(config.generation.extension, "ts");
    }

    #[test]
    fn test_load_from_toml_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nestgen.toml");
        fs::write(
            &config_path,
            r#"
[paths]
schema = "db/schema.prisma"

[generation]
preserve_field_case = true

[external]
command = ["nest", "generate"]
"#,
        )
        .unwrap();

        let config = NestgenConfig::load_from(&config_path).unwrap();
        assert_eq!(config.paths.schema, PathBuf::from("db/schema.prisma"));
        assert_eq!(config.paths.output_dir, PathBuf::from("src/modules"));
        assert!(config.generation.preserve_field_case);
        assert_eq!(
            config.external.command,
            Some(vec!["nest".to_string(), "generate".to_string()])
        );
    }

    #[test]
    fn test_load_with_missing_explicit_file() {
        let result = NestgenConfig::load(Some(Path::new("/nonexistent/nestgen.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nestgen.toml");
        fs::write(&config_path, "[generation]\npreserve_field_case = \"maybe\"\n").unwrap();
        assert!(NestgenConfig::load_from(&config_path).is_err());
    }

    #[test]
    fn test_pipeline_options() {
        let mut config = NestgenConfig::default();
        assert!(config.pipeline_options().external.is_none());

        config.external.command = Some(vec!["nest".to_string(), "g".to_string()]);
        config.generation.preserve_field_case = true;
        let options = config.pipeline_options();
        let external = options.external.unwrap();
        assert_eq!(external.command, ["nest", "g"]);
        assert_eq!(external.kinds.len(), 3);
        assert!(options.generation.render.preserve_field_case);
        assert_eq!(
            options.controller_template,
            Some(PathBuf::from("templates/controller.template.txt"))
        );
    }

    #[test]
    fn test_empty_command_disables_hook() {
        let mut config = NestgenConfig::default();
        config.external.command = Some(Vec::new());
        assert!(config.pipeline_options().external.is_none());
    }
}
