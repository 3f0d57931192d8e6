//! `doctex build` command implementation.

use std::path::PathBuf;

use clap::Args;
use doctex_config::{CliSettings, Config};
use doctex_variant::Variant;
use rayon::prelude::*;

use super::select_handbooks;
use crate::error::CliError;
use crate::output::Output;
use crate::pipeline::Pipeline;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover doctex.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Variant for every handbook: simplified or traditional (overrides config).
    #[arg(long, env = "DOCTEX_VARIANT")]
    variant: Option<Variant>,

    /// Build only the handbook with this name or slug.
    #[arg(long)]
    handbook: Option<String>,

    /// Output directory for `.tex` files (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Image directory (overrides config).
    #[arg(long)]
    image_dir: Option<PathBuf>,

    /// Module registry source, JSON or TOML (overrides config).
    #[arg(long)]
    modules: Option<PathBuf>,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            variant: self.variant,
            image_dir: self.image_dir,
            module_config: self.modules,
            output_dir: self.output_dir,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let handbooks = select_handbooks(&config, self.handbook.as_deref())?;

        let (pipeline, fallback) = Pipeline::from_config(&config);
        if let Some(err) = fallback {
            output.warning(&format!("Module registry rejected, using built-in modules: {err}"));
        }

        output.info(&format!("Images: {}", config.paths.image_dir.display()));
        output.info(&format!("Output: {}", config.paths.output_dir.display()));

        let results: Vec<_> = handbooks
            .par_iter()
            .map(|handbook| (handbook, pipeline.build(handbook)))
            .collect();

        let mut failed = 0;
        for (handbook, result) in &results {
            match result {
                Ok(report) => {
                    output.success(&format!(
                        "{} ({}): {} sections -> {}",
                        handbook.name,
                        handbook.variant,
                        report.sections,
                        report.output.display()
                    ));
                    for warning in &report.structure {
                        output.warning(&format!("  {warning}"));
                    }
                    for warning in &report.assembly {
                        output.warning(&format!("  {warning}"));
                    }
                }
                Err(err) => {
                    failed += 1;
                    output.error(&format!("{} ({}): {err}", handbook.name, handbook.variant));
                }
            }
        }

        output.separator();
        let total = results.len();
        if failed > 0 {
            return Err(CliError::Failed { failed, total });
        }
        output.highlight(&format!("Built {total} handbook(s)"));
        Ok(())
    }
}
