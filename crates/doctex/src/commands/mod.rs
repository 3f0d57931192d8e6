//! CLI command implementations.

mod build;
mod check;
mod tree;

pub(crate) use build::BuildArgs;
pub(crate) use check::CheckArgs;
pub(crate) use tree::TreeArgs;

use doctex_config::{Config, HandbookConfig};

use crate::error::CliError;

/// Handbooks selected by `--handbook`, all configured ones without it.
fn select_handbooks<'a>(
    config: &'a Config,
    name: Option<&str>,
) -> Result<Vec<&'a HandbookConfig>, CliError> {
    match name {
        Some(name) => Ok(vec![config.handbook(name)?]),
        None => Ok(config.handbooks_resolved.iter().collect()),
    }
}
