//! Handbook pipeline: paragraph source to section tree to LaTeX.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use doctex_config::{Config, HandbookConfig};
use doctex_document::{Assembly, AssemblyContext, AssemblyWarning, assemble};
use doctex_figures::AssetIndex;
use doctex_latex::{LatexOptions, render_document};
use doctex_markup::{LintIssue, Severity, TermTable, lint};
use doctex_modules::{ModuleRegistry, RegistryError, RegistryLoad};
use doctex_sections::{ParagraphRecord, SectionTree, StructureWarning, build_tree};
use doctex_source::read_source;

use crate::error::CliError;

/// Inputs shared by every handbook of a run.
///
/// Read-only once built, so handbooks can be processed in parallel.
pub(crate) struct Pipeline {
    registry: ModuleRegistry,
    terms: TermTable,
    latex: LatexOptions,
    image_dir: PathBuf,
    output_dir: PathBuf,
}

/// A handbook read and reconstructed into a section tree.
pub(crate) struct ParsedHandbook {
    pub paragraphs: Vec<ParagraphRecord>,
    pub tree: SectionTree,
    /// Source and tree-building warnings, in that order.
    pub warnings: Vec<StructureWarning>,
}

/// Outcome of a written handbook.
#[derive(Debug)]
pub(crate) struct BuildReport {
    pub output: PathBuf,
    pub sections: usize,
    pub structure: Vec<StructureWarning>,
    pub assembly: Vec<AssemblyWarning>,
}

/// Outcome of a checked handbook.
#[derive(Debug)]
pub(crate) struct CheckReport {
    /// Lint issues with the ordinal of their paragraph.
    pub lint: Vec<(usize, LintIssue)>,
    pub structure: Vec<StructureWarning>,
    pub assembly: Vec<AssemblyWarning>,
}

impl CheckReport {
    /// Number of error-level lint issues.
    pub(crate) fn errors(&self) -> usize {
        self.lint
            .iter()
            .filter(|(_, issue)| issue.severity == Severity::Error)
            .count()
    }

    /// Number of non-error findings.
    pub(crate) fn warnings(&self) -> usize {
        self.lint.len() - self.errors() + self.structure.len() + self.assembly.len()
    }
}

impl Pipeline {
    /// Build the shared inputs from configuration.
    ///
    /// Returns the reason the module registry source was rejected, if it
    /// was; the built-in registry is used in that case.
    pub(crate) fn from_config(config: &Config) -> (Self, Option<RegistryError>) {
        let load = match &config.paths.module_config {
            Some(path) => ModuleRegistry::load(path),
            None => RegistryLoad {
                registry: ModuleRegistry::builtin(),
                fallback: None,
            },
        };
        let terms = config
            .terms
            .as_ref()
            .map_or_else(TermTable::default, TermTable::from_map);
        let latex = LatexOptions {
            document_class: config.latex.document_class.clone(),
            font_size: config.latex.font_size,
            figure_position: config.latex.figure_position.clone(),
            figure_width: config.latex.figure_width.clone(),
            image_prefix: config.latex.image_prefix.clone(),
            ..LatexOptions::default()
        };

        let pipeline = Self {
            registry: load.registry,
            terms,
            latex,
            image_dir: config.paths.image_dir.clone(),
            output_dir: config.paths.output_dir.clone(),
        };
        (pipeline, load.fallback)
    }

    /// Read the handbook source and build its section tree.
    pub(crate) fn parse(&self, handbook: &HandbookConfig) -> Result<ParsedHandbook, CliError> {
        let source = read_source(&handbook.source, handbook.chapters.as_deref())?;
        let outcome = build_tree(&source.paragraphs);

        let mut warnings = source.warnings;
        warnings.extend(outcome.warnings);
        Ok(ParsedHandbook {
            paragraphs: source.paragraphs,
            tree: outcome.tree,
            warnings,
        })
    }

    /// Assemble a parsed handbook against a fresh snapshot of the image directory.
    pub(crate) fn assemble(
        &self,
        handbook: &HandbookConfig,
        tree: &SectionTree,
    ) -> Result<Assembly, CliError> {
        let assets = AssetIndex::scan(&self.image_dir)?;
        let context = AssemblyContext {
            registry: &self.registry,
            assets: &assets,
            terms: &self.terms,
            convert_script: handbook.convert,
        };
        Ok(assemble(tree, handbook.variant, &context))
    }

    /// Render a handbook and write `<output>/<slug>[_traditional].tex`.
    pub(crate) fn build(&self, handbook: &HandbookConfig) -> Result<BuildReport, CliError> {
        let started = Instant::now();
        let parsed = self.parse(handbook)?;
        let assembly = self.assemble(handbook, &parsed.tree)?;

        let mut options = self.latex.clone();
        options.cover = handbook.cover.clone().filter(|cover| {
            let exists = cover.is_file();
            if !exists {
                tracing::warn!(handbook = %handbook.name, cover = %cover.display(), "Cover not found, omitted");
            }
            exists
        });
        let tex = render_document(&assembly.blocks, &options);

        let output = self.output_dir.join(handbook.output_file_name());
        let write_err = |source| CliError::Write {
            path: output.clone(),
            source,
        };
        fs::create_dir_all(&self.output_dir).map_err(write_err)?;
        fs::write(&output, tex).map_err(write_err)?;

        let sections = parsed.tree.statistics().total;
        tracing::info!(
            handbook = %handbook.name,
            variant = %handbook.variant,
            sections,
            blocks = assembly.blocks.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "Handbook written"
        );
        Ok(BuildReport {
            output,
            sections,
            structure: parsed.warnings,
            assembly: assembly.warnings,
        })
    }

    /// Lint and assemble a handbook without writing anything.
    pub(crate) fn check(&self, handbook: &HandbookConfig) -> Result<CheckReport, CliError> {
        let parsed = self.parse(handbook)?;
        let lint = parsed
            .paragraphs
            .iter()
            .flat_map(|p| lint(&p.text).into_iter().map(|issue| (p.ordinal, issue)))
            .collect();
        let assembly = self.assemble(handbook, &parsed.tree)?;
        Ok(CheckReport {
            lint,
            structure: parsed.warnings,
            assembly: assembly.warnings,
        })
    }
}
