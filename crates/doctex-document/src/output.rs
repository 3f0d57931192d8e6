use std::path::PathBuf;

use doctex_modules::ModuleColor;

/// A figure after resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FigureBlock {
    /// Label in the active variant, shared with cross references.
    pub label: String,
    pub caption: String,
    /// Resolved image path, `None` when the figure is missing.
    pub path: Option<PathBuf>,
}

/// Inline content of a body paragraph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputInline {
    Text(String),
    Emphasis(String),
    Footnote(String),
    /// Reference to a label; `prefix` is written before the reference.
    CrossRef {
        label: String,
        prefix: Option<&'static str>,
    },
    Subtitle {
        text: String,
        minor: bool,
    },
    Module {
        category: String,
        color: ModuleColor,
        body: Vec<OutputInline>,
    },
    List {
        ordered: bool,
        items: Vec<Vec<OutputInline>>,
    },
    /// Figure nested inside a module body or list item.
    Figure(FigureBlock),
    LineBreak,
}

/// One block of the assembled document, in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputBlock {
    Heading {
        depth: usize,
        numbering: Vec<u32>,
        title: String,
    },
    Paragraph {
        ordinal: usize,
        content: Vec<OutputInline>,
    },
    Figure {
        ordinal: usize,
        figure: FigureBlock,
    },
}
