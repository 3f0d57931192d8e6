use doctex_modules::ModuleColor;

/// Why a text block passed through unchanged.
///
/// Ordered by severity so that merging two text blocks keeps the worse one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Advisory {
    /// A well-formed span named a category the registry does not know.
    UnknownCategory,
    /// An unterminated opener or a stray closer.
    Malformed,
}

/// A rewritten piece of paragraph content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InlineBlock {
    /// Plain text, verbatim from the source.
    Text {
        text: String,
        advisory: Option<Advisory>,
    },
    /// Color-coded module box.
    Module {
        category: String,
        color: ModuleColor,
        body: Vec<InlineBlock>,
    },
    /// Footnote attached at the current position.
    Footnote { body: String },
    /// Figure embedding, resolved later.
    Figure { name: String, caption: String },
    /// Cross reference, resolved later. `prefixed` is true when the source
    /// already writes the figure prefix right before the reference.
    CrossRef { name: String, prefixed: bool },
    /// Emphasized text.
    Emphasis { text: String },
    /// Subtitle line; `minor` for the smaller form.
    Subtitle { text: String, minor: bool },
    /// Bulleted or numbered list.
    List {
        ordered: bool,
        items: Vec<Vec<InlineBlock>>,
    },
    /// Explicit line break.
    LineBreak,
}

impl InlineBlock {
    /// Plain text without an advisory.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            advisory: None,
        }
    }

    /// Advisory of a text block.
    #[must_use]
    pub fn advisory(&self) -> Option<Advisory> {
        match self {
            Self::Text { advisory, .. } => *advisory,
            _ => None,
        }
    }
}

/// Every advisory in `blocks`, including nested module bodies and list items.
#[must_use]
pub fn collect_advisories(blocks: &[InlineBlock]) -> Vec<Advisory> {
    fn walk(blocks: &[InlineBlock], out: &mut Vec<Advisory>) {
        for block in blocks {
            match block {
                InlineBlock::Text {
                    advisory: Some(advisory),
                    ..
                } => out.push(*advisory),
                InlineBlock::Module { body, .. } => walk(body, out),
                InlineBlock::List { items, .. } => {
                    for item in items {
                        walk(item, out);
                    }
                }
                _ => {}
            }
        }
    }

    let mut out = Vec::new();
    walk(blocks, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advisory_ordering() {
        assert!(Advisory::Malformed > Advisory::UnknownCategory);
        assert!(Some(Advisory::UnknownCategory) > None);
    }

    #[test]
    fn test_collect_advisories_nested() {
        let blocks = vec![
            InlineBlock::plain("a"),
            InlineBlock::Module {
                category: "名词解释".to_owned(),
                color: ModuleColor::Green,
                body: vec![InlineBlock::Text {
                    text: "【坏".to_owned(),
                    advisory: Some(Advisory::Malformed),
                }],
            },
            InlineBlock::List {
                ordered: false,
                items: vec![vec![InlineBlock::Text {
                    text: "【未知：x】".to_owned(),
                    advisory: Some(Advisory::UnknownCategory),
                }]],
            },
        ];
        assert_eq!(
            collect_advisories(&blocks),
            vec![Advisory::Malformed, Advisory::UnknownCategory]
        );
    }
}
