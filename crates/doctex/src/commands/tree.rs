//! `doctex tree` command implementation.

use std::path::PathBuf;

use clap::Args;
use doctex_config::Config;
use doctex_sections::SectionTree;

use super::select_handbooks;
use crate::error::CliError;
use crate::output::Output;
use crate::pipeline::Pipeline;

/// Arguments for the tree command.
#[derive(Args)]
pub(crate) struct TreeArgs {
    /// Path to configuration file (default: auto-discover doctex.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print only the handbook with this name or slug.
    #[arg(long)]
    handbook: Option<String>,
}

impl TreeArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;
        let handbooks = select_handbooks(&config, self.handbook.as_deref())?;
        let (pipeline, _) = Pipeline::from_config(&config);

        for handbook in handbooks {
            let parsed = pipeline.parse(handbook)?;
            output.highlight(&handbook.name);
            for line in outline(&parsed.tree) {
                output.print(&line);
            }
            for warning in &parsed.warnings {
                output.warning(&format!("  {warning}"));
            }

            let stats = parsed.tree.statistics();
            let depths: Vec<String> = stats
                .per_depth
                .iter()
                .map(|(depth, count)| format!("depth {depth}: {count}"))
                .collect();
            output.print_dim(&format!(
                "{} sections ({}), {} untitled, {} paragraphs",
                stats.total,
                depths.join(", "),
                stats.placeholders,
                stats.paragraphs
            ));
        }
        Ok(())
    }
}

/// One indented `numbering title` line per section, root excluded.
fn outline(tree: &SectionTree) -> Vec<String> {
    tree.preorder()
        .into_iter()
        .skip(1)
        .map(|id| {
            let node = tree.node(id);
            let indent = "  ".repeat(node.depth.saturating_sub(1));
            let title = if node.placeholder {
                "(untitled)"
            } else {
                node.title.as_str()
            };
            format!("{indent}{} {title}", node.numbering_label())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use doctex_sections::{ParagraphRecord, build_tree};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_outline() {
        let outcome = build_tree(&[
            ParagraphRecord::heading("急救", 1, 0),
            ParagraphRecord::heading("止血", 2, 1),
            ParagraphRecord::heading("包扎", 4, 2),
            ParagraphRecord::heading("锻炼", 1, 3),
        ]);

        assert_eq!(
            outline(&outcome.tree),
            vec![
                "1 急救",
                "  1.1 止血",
                "    1.1.1 (untitled)",
                "      1.1.1.1 包扎",
                "2 锻炼",
            ]
        );
    }
}
