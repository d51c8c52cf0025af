//! Artifact generation command
//!
//! ```bash
//! nestgen generate Post
//! nestgen generate-all --schema db/schema.prisma --output src/features
//! ```

use crate::scaffold::{EntityOutcome, EntityReport, Pipeline, PipelineOptions, RunEvent, Target};
use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Generate artifacts for one entity or all of them
pub struct GenerateCommand {
    target: Target,
    pipeline: Pipeline,
}

impl GenerateCommand {
    /// Create a new generate command
    #[must_use]
    pub const fn new(target: Target, options: PipelineOptions) -> Self {
        Self {
            target,
            pipeline: Pipeline::new(options),
        }
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error on any fatal pipeline failure, or when at least one
    /// entity could not be generated.
    pub fn execute(&self) -> Result<()> {
        let progress = self.progress_bar()?;
        let result = self.pipeline.run_with(&self.target, |event| match event {
            RunEvent::Resolved(names) => {
                progress.suspend(|| Self::print_header(names.len()));
                progress.set_length(names.len() as u64);
            }
            RunEvent::Started(requested) => progress.set_message(requested.to_string()),
            RunEvent::Finished(outcome) => {
                progress.suspend(|| Self::print_outcome(outcome));
                progress.inc(1);
            }
        });

        let report = match result {
            Ok(report) => report,
            Err(err) => {
                progress.abandon();
                return Err(err).with_context(|| {
                    format!(
                        "Failed to generate from {}",
                        self.pipeline.options().schema.display()
                    )
                });
            }
        };
        progress.finish_and_clear();

        let failed = report.failed();
        println!(
            "\n{} {} generated, {} failed",
            style("Summary:").bold(),
            style(report.succeeded()).green().bold(),
            if failed == 0 {
                style(failed).dim()
            } else {
                style(failed).red().bold()
            }
        );

        if failed > 0 {
            anyhow::bail!("{failed} of {} entities failed", report.outcomes.len());
        }
        Ok(())
    }

    /// Progress bar for batch runs; hidden for a single entity
    fn progress_bar(&self) -> Result<ProgressBar> {
        if matches!(self.target, Target::Single(_)) {
            return Ok(ProgressBar::hidden());
        }
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{bar:30.cyan/blue} {pos}/{len} {msg}")
                .context("Failed to set progress style")?,
        );
        Ok(bar)
    }

    fn print_header(count: usize) {
        println!(
            "\n{} {} {}",
            style("Generating").cyan().bold(),
            style(count).green().bold(),
            style(if count == 1 { "entity..." } else { "entities..." })
                .cyan()
                .bold()
        );
    }

    fn print_outcome(outcome: &EntityOutcome) {
        match &outcome.result {
            Ok(report) => Self::print_report(report),
            Err(err) => println!(
                "\n{} {}: {}",
                style("✗").red().bold(),
                style(&outcome.requested).bold(),
                style(err).red()
            ),
        }
    }

    fn print_report(report: &EntityReport) {
        println!("\n{}", style(report.name.formatted()).green().bold());

        for (path, description) in &report.files {
            println!(
                "  {} {} ({})",
                style("✓").green(),
                style(path.display()).dim(),
                style(description).dim()
            );
        }

        if let Some(controller) = &report.controller {
            println!(
                "  {} {} ({})",
                style("✓").green(),
                style(controller.display()).dim(),
                style("Controller from template").dim()
            );
        }

        let module = report.name.module_class();
        let registry = report.registry;
        if !registry.block_found {
            println!(
                "  {} imports list not found, added import line for {} only",
                style("!").yellow().bold(),
                style(&module).yellow()
            );
        } else if registry.import_added || registry.entry_added {
            println!(
                "  {} registered {}",
                style("✓").green(),
                style(&module).cyan()
            );
        } else {
            println!(
                "  {} {} already registered",
                style("·").dim(),
                style(&module).dim()
            );
        }
    }
}
