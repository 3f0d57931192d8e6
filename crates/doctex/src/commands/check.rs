//! `doctex check` command implementation.

use std::path::PathBuf;

use clap::Args;
use doctex_config::{CliSettings, Config};
use doctex_markup::Severity;
use doctex_variant::Variant;

use super::select_handbooks;
use crate::error::CliError;
use crate::output::Output;
use crate::pipeline::Pipeline;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Path to configuration file (default: auto-discover doctex.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Check only the handbook with this name or slug.
    #[arg(long)]
    handbook: Option<String>,

    /// Variant for every handbook (overrides config).
    #[arg(long, env = "DOCTEX_VARIANT")]
    variant: Option<Variant>,
}

impl CheckArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            variant: self.variant,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let handbooks = select_handbooks(&config, self.handbook.as_deref())?;

        let (pipeline, fallback) = Pipeline::from_config(&config);
        if let Some(err) = fallback {
            output.warning(&format!("Module registry rejected: {err}"));
        }

        let mut errors = 0;
        let mut warnings = 0;
        for handbook in handbooks {
            output.highlight(&handbook.name);
            let report = pipeline.check(handbook)?;
            for (ordinal, issue) in &report.lint {
                let line = format!("  paragraph {ordinal}: {issue}");
                match issue.severity {
                    Severity::Error => output.error(&line),
                    Severity::Warning => output.warning(&line),
                }
            }
            for warning in &report.structure {
                output.warning(&format!("  {warning}"));
            }
            for warning in &report.assembly {
                output.warning(&format!("  {warning}"));
            }
            errors += report.errors();
            warnings += report.warnings();
        }

        output.separator();
        if errors > 0 {
            return Err(CliError::Validation(format!(
                "{errors} error(s), {warnings} warning(s)"
            )));
        }
        output.success(&format!("No errors, {warnings} warning(s)"));
        Ok(())
    }
}
