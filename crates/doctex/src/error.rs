//! CLI error types.

use std::path::PathBuf;

use doctex_config::ConfigError;
use doctex_figures::FigureError;
use doctex_source::SourceError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("{0}")]
    Figures(#[from] FigureError),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{failed} of {total} handbooks failed")]
    Failed { failed: usize, total: usize },

    #[error("{0}")]
    Validation(String),
}
