//! Generation pipeline
//!
//! One pipeline serves both call patterns: a single named entity, or every
//! model discovered in the schema. The schema is read once per run; each
//! entity is then processed to completion, registry patch included, before
//! the next begins.
//!
//! Per entity:
//! 1. extract the model and render all artifacts in memory
//! 2. delete and recreate `<output>/<e>`
//! 3. run the external scaffolder, if configured
//! 4. write the controller from its template, if present
//! 5. write the five artifacts
//! 6. patch the registry document
//!
//! A missing model fails only that entity, and nothing is touched on disk
//! for it. Filesystem, template and external command failures abort the run.

use super::error::{ScaffoldError, ScaffoldResult};
use super::generator::{GenerationSettings, ScaffoldGenerator};
use super::helpers::ModelName;
use super::registry::{register_entity, RegistrySettings};
use super::schema::list_models;
use super::templates::replace_placeholders;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// Which entities a run processes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// One entity, looked up by name ignoring case
    Single(String),
    /// Every top-level model in the schema, in document order
    All,
}

/// External skeleton generator run inside the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalScaffolder {
    /// Program and leading arguments, e.g. `["nest", "generate"]`
    pub command: Vec<String>,
    /// Kinds generated per entity, each run as `<command...> <kind> <lower>`
    pub kinds: Vec<String>,
}

impl ExternalScaffolder {
    fn run(&self, cwd: &Path, lower: &str) -> ScaffoldResult<()> {
        let Some((program, args)) = self.command.split_first() else {
            return Ok(());
        };

        for kind in &self.kinds {
            let cmdline = format!("{} {kind} {lower}", self.command.join(" "));
            debug!(command = %cmdline, cwd = %cwd.display(), "running external scaffolder");

            let status = Command::new(program)
                .args(args)
                .arg(kind)
                .arg(lower)
                .current_dir(cwd)
                .status()
                .map_err(|err| ScaffoldError::ExternalCommand(format!("{cmdline}: {err}")))?;

            if !status.success() {
                return Err(ScaffoldError::ExternalCommand(format!(
                    "{cmdline} exited with {status}"
                )));
            }
        }
        Ok(())
    }
}

/// Everything a pipeline run needs besides the target
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Schema document
    pub schema: PathBuf,
    /// Root under which entity directories are created
    pub output_dir: PathBuf,
    /// Registry document patched after each entity
    pub registry: PathBuf,
    /// Optional controller template
    pub controller_template: Option<PathBuf>,
    /// Artifact settings
    pub generation: GenerationSettings,
    /// Registry import settings
    pub registry_settings: RegistrySettings,
    /// Optional external scaffolder
    pub external: Option<ExternalScaffolder>,
}

/// What the registry patch did for one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryOutcome {
    /// Import line inserted
    pub import_added: bool,
    /// Module appended to the imports list
    pub entry_added: bool,
    /// Imports list found
    pub block_found: bool,
}

/// Files written for one entity
#[derive(Debug, Clone)]
pub struct EntityReport {
    /// Entity name forms
    pub name: ModelName,
    /// Artifacts written, with their descriptions
    pub files: Vec<(PathBuf, String)>,
    /// Controller rendered from the template, if any
    pub controller: Option<PathBuf>,
    /// Registry patch result
    pub registry: RegistryOutcome,
}

/// One entity's result within a run
#[derive(Debug)]
pub struct EntityOutcome {
    /// Entity name as requested or discovered
    pub requested: String,
    /// Report, or the entity-scoped error that stopped it
    pub result: ScaffoldResult<EntityReport>,
}

/// Results of a whole run
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Outcomes in processing order
    pub outcomes: Vec<EntityOutcome>,
}

impl BatchReport {
    /// Whether every entity succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    /// Entities that failed
    pub fn failures(&self) -> impl Iterator<Item = &EntityOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    /// Number of entities that succeeded
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Number of entities that failed
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Progress of a run, reported by [`Pipeline::run_with`]
#[derive(Debug, Clone, Copy)]
pub enum RunEvent<'a> {
    /// Entity names about to be processed, in order
    Resolved(&'a [String]),
    /// Processing of one entity begins
    Started(&'a str),
    /// One entity finished, with a report or an entity-scoped error
    Finished(&'a EntityOutcome),
}

/// The generation pipeline
#[derive(Debug, Clone)]
pub struct Pipeline {
    options: PipelineOptions,
}

impl Pipeline {
    /// Create a pipeline
    #[must_use]
    pub const fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    /// Options the pipeline runs with
    #[must_use]
    pub const fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Read the schema document
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be read.
    pub fn read_schema(&self) -> ScaffoldResult<String> {
        let path = &self.options.schema;
        debug!(path = %path.display(), "reading schema");
        fs::read_to_string(path).map_err(|err| ScaffoldError::io(path, err))
    }

    /// Entity names a target expands to
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::NoModels`] when `Target::All` finds no model.
    pub fn resolve(schema: &str, target: &Target) -> ScaffoldResult<Vec<String>> {
        match target {
            Target::Single(name) => Ok(vec![name.clone()]),
            Target::All => {
                let names: Vec<String> = list_models(schema)
                    .into_iter()
                    .map(|name| name.raw().to_string())
                    .collect();
                if names.is_empty() {
                    return Err(ScaffoldError::NoModels);
                }
                Ok(names)
            }
        }
    }

    /// Run the pipeline over a target
    ///
    /// Entity-scoped failures are recorded in the report and the batch
    /// continues.
    ///
    /// # Errors
    ///
    /// Returns an error on any fatal condition: unreadable schema, no models
    /// in batch mode, filesystem or template failure, or a failed external
    /// command.
    pub fn run(&self, target: &Target) -> ScaffoldResult<BatchReport> {
        self.run_with(target, |_| {})
    }

    /// Run the pipeline, reporting each step to `on_event` as it happens
    ///
    /// # Errors
    ///
    /// Same as [`Pipeline::run`]. No event follows a fatal error.
    pub fn run_with<F>(&self, target: &Target, mut on_event: F) -> ScaffoldResult<BatchReport>
    where
        F: FnMut(RunEvent<'_>),
    {
        let schema = self.read_schema()?;
        let names = Self::resolve(&schema, target)?;
        info!(count = names.len(), "processing entities");
        on_event(RunEvent::Resolved(&names));

        let mut report = BatchReport::default();
        for requested in names {
            on_event(RunEvent::Started(&requested));
            let outcome = match self.process_entity(&schema, &requested) {
                Err(err) if !err.is_entity_scoped() => return Err(err),
                result => EntityOutcome { requested, result },
            };
            on_event(RunEvent::Finished(&outcome));
            report.outcomes.push(outcome);
        }
        Ok(report)
    }

    /// Generate and write everything for one entity
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::ModelNotFound`] before touching the disk when
    /// the entity is absent, or any fatal error met while writing.
    pub fn process_entity(&self, schema: &str, requested: &str) -> ScaffoldResult<EntityReport> {
        let generator =
            ScaffoldGenerator::from_schema(schema, requested, self.options.generation.clone())?;
        let files = generator.generate()?;
        let name = generator.name().clone();
        info!(
            entity = %name,
            relations = generator.relations().len(),
            "generating artifacts"
        );

        let entity_dir = self.options.output_dir.join(name.lower());
        recreate_dir(&entity_dir)?;

        if let Some(external) = &self.options.external {
            external.run(&self.options.output_dir, name.lower())?;
        }

        let controller = self.write_controller(&name)?;

        let mut written = Vec::with_capacity(files.len());
        for file in files {
            let path = self.options.output_dir.join(&file.path);
            write_file(&path, &file.content)?;
            debug!(path = %path.display(), "wrote {}", file.description);
            written.push((path, file.description));
        }

        let registry = self.patch_registry(&name)?;

        Ok(EntityReport {
            name,
            files: written,
            controller,
            registry,
        })
    }

    /// Render the controller template into the entity directory
    fn write_controller(&self, name: &ModelName) -> ScaffoldResult<Option<PathBuf>> {
        let Some(template_path) = &self.options.controller_template else {
            return Ok(None);
        };
        if !template_path.exists() {
            warn!(
                path = %template_path.display(),
                entity = %name,
                "controller template not found, skipping controller"
            );
            return Ok(None);
        }

        let template = fs::read_to_string(template_path)
            .map_err(|err| ScaffoldError::io(template_path, err))?;
        let lower = name.lower();
        let path = self.options.output_dir.join(lower).join(format!(
            "{lower}.controller.{}",
            self.options.generation.extension
        ));
        write_file(&path, &replace_placeholders(&template, name))?;
        Ok(Some(path))
    }

    /// Read-modify-write the registry, writing only when it changed
    fn patch_registry(&self, name: &ModelName) -> ScaffoldResult<RegistryOutcome> {
        let path = &self.options.registry;
        let document = fs::read_to_string(path).map_err(|err| ScaffoldError::io(path, err))?;
        let patch = register_entity(&document, name, &self.options.registry_settings);

        if let Some(err) = patch.missing_block() {
            warn!(path = %path.display(), entity = %name, "{err}, import line only");
        }
        if patch.changed() {
            fs::write(path, &patch.document).map_err(|err| ScaffoldError::io(path, err))?;
            debug!(
                path = %path.display(),
                import_added = patch.import_added,
                entry_added = patch.entry_added,
                "registry updated"
            );
        } else {
            debug!(path = %path.display(), entity = %name, "registry already up to date");
        }

        Ok(RegistryOutcome {
            import_added: patch.import_added,
            entry_added: patch.entry_added,
            block_found: patch.block_found,
        })
    }
}

/// Delete a directory if present and create it empty
fn recreate_dir(dir: &Path) -> ScaffoldResult<()> {
    if dir.exists() {
        debug!(path = %dir.display(), "removing previous output");
        fs::remove_dir_all(dir).map_err(|err| ScaffoldError::io(dir, err))?;
    }
    fs::create_dir_all(dir).map_err(|err| ScaffoldError::io(dir, err))
}

fn write_file(path: &Path, content: &str) -> ScaffoldResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| ScaffoldError::io(parent, err))?;
    }
    fs::write(path, content).map_err(|err| ScaffoldError::io(path, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_single_keeps_name() {
        let names = Pipeline::resolve("", &Target::Single("post".to_string())).unwrap();
        assert_eq!(names, ["post"]);
    }

    #[test]
    fn test_resolve_all_in_order() {
        let schema = "model B { x Int }\nmodel A { y Int }";
        assert_eq!(Pipeline::resolve(schema, &Target::All).unwrap(), ["B", "A"]);
    }

    #[test]
    fn test_resolve_all_without_models() {
        let result = Pipeline::resolve("enum Role { A }", &Target::All);
        assert!(matches!(result, Err(ScaffoldError::NoModels)));
    }

    #[test]
    fn test_batch_report_counts() {
        let report = BatchReport {
            outcomes: vec![EntityOutcome {
                requested: "Ghost".to_string(),
                result: Err(ScaffoldError::ModelNotFound {
                    name: "Ghost".to_string(),
                }),
            }],
        };
        assert!(!report.is_success());
        assert_eq!(report.succeeded(), 0);
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn test_empty_external_command_is_noop() {
        let external = ExternalScaffolder {
            command: Vec::new(),
            kinds: vec!["module".to_string()],
        };
        assert!(external.run(Path::new("."), "post").is_ok());
    }
}
