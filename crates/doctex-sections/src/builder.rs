//! Paragraph stream to section tree.

use std::fmt;

use crate::ParagraphRecord;
use crate::tree::{BodyParagraph, NodeId, SectionTree};

/// A structural anomaly found while building the tree.
///
/// None of these stop the build; they describe how the input was repaired.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StructureWarning {
    /// A heading jumped more than one level below its nearest ancestor.
    /// `inserted` placeholder sections were synthesized to fill the gap.
    SkippedLevel {
        ordinal: usize,
        from: usize,
        to: usize,
        inserted: usize,
    },
    /// A paragraph carried a negative level and was treated as body text.
    NonPositiveLevel { ordinal: usize, level: i32 },
    /// A serial document whose parent serial is absent from the source.
    MissingParentSerial { serial: String, parent: String },
}

impl fmt::Display for StructureWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkippedLevel {
                ordinal,
                from,
                to,
                inserted,
            } => write!(
                f,
                "paragraph {ordinal}: heading level jumps from {from} to {to}, \
                 inserted {inserted} untitled section(s)"
            ),
            Self::NonPositiveLevel { ordinal, level } => write!(
                f,
                "paragraph {ordinal}: level {level} is not a heading level, treated as body text"
            ),
            Self::MissingParentSerial { serial, parent } => {
                write!(f, "document {serial} has no parent document {parent}")
            }
        }
    }
}

/// Result of [`build_tree`].
#[derive(Debug)]
pub struct BuildOutcome {
    pub tree: SectionTree,
    pub warnings: Vec<StructureWarning>,
}

/// Incremental section tree builder.
///
/// Keeps a stack of the currently open sections, one per depth. A heading
/// at depth `D` closes every open section at depth `>= D`, fills any gap
/// below `D` with placeholders, and opens a new section. Body paragraphs
/// go to the deepest open section.
#[derive(Debug)]
pub struct SectionTreeBuilder {
    tree: SectionTree,
    stack: Vec<NodeId>,
    warnings: Vec<StructureWarning>,
}

impl Default for SectionTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionTreeBuilder {
    /// Create a builder holding only the root.
    #[must_use]
    pub fn new() -> Self {
        let tree = SectionTree::new();
        let root = tree.root();
        Self {
            tree,
            stack: vec![root],
            warnings: Vec::new(),
        }
    }

    /// Consume one paragraph.
    pub fn push(&mut self, paragraph: &ParagraphRecord) {
        if paragraph.level < 0 {
            tracing::warn!(
                ordinal = paragraph.ordinal,
                level = paragraph.level,
                "Heading level is not positive, treating as body text"
            );
            self.warnings.push(StructureWarning::NonPositiveLevel {
                ordinal: paragraph.ordinal,
                level: paragraph.level,
            });
        }

        match paragraph.heading_depth() {
            Some(depth) => self.open_section(paragraph, depth),
            None => {
                let current = self.current();
                self.tree.push_content(
                    current,
                    BodyParagraph {
                        text: paragraph.text.clone(),
                        ordinal: paragraph.ordinal,
                    },
                );
            }
        }
    }

    /// Record a warning found outside the paragraph stream.
    pub fn warn(&mut self, warning: StructureWarning) {
        self.warnings.push(warning);
    }

    /// Finish building.
    #[must_use]
    pub fn finish(self) -> BuildOutcome {
        BuildOutcome {
            tree: self.tree,
            warnings: self.warnings,
        }
    }

    fn current(&self) -> NodeId {
        self.stack.last().copied().unwrap_or_else(|| self.tree.root())
    }

    fn current_depth(&self) -> usize {
        self.tree.node(self.current()).depth
    }

    fn open_section(&mut self, paragraph: &ParagraphRecord, depth: usize) {
        while self.stack.len() > 1 && self.current_depth() >= depth {
            self.stack.pop();
        }

        let from = self.current_depth();
        if from + 1 < depth {
            let inserted = depth - from - 1;
            tracing::warn!(
                ordinal = paragraph.ordinal,
                from,
                to = depth,
                "Heading level skipped, inserting untitled sections"
            );
            self.warnings.push(StructureWarning::SkippedLevel {
                ordinal: paragraph.ordinal,
                from,
                to: depth,
                inserted,
            });
            for _ in 0..inserted {
                let parent = self.current();
                let placeholder = self.tree.add_child(parent, String::new(), true, None);
                self.stack.push(placeholder);
            }
        }

        let parent = self.current();
        let node = self.tree.add_child(
            parent,
            paragraph.text.trim().to_owned(),
            false,
            Some(paragraph.ordinal),
        );
        self.stack.push(node);
    }
}

/// Build a section tree from an ordered paragraph stream.
#[must_use]
pub fn build_tree(paragraphs: &[ParagraphRecord]) -> BuildOutcome {
    let mut builder = SectionTreeBuilder::new();
    for paragraph in paragraphs {
        builder.push(paragraph);
    }
    let outcome = builder.finish();
    tracing::debug!(
        paragraphs = paragraphs.len(),
        sections = outcome.tree.len() - 1,
        warnings = outcome.warnings.len(),
        "Built section tree"
    );
    outcome
}
