//! Bracket span lexer.
//!
//! Scans a paragraph once, left to right, and reports every bracketed span
//! with its byte offsets. Text between spans is not tokenized.

use doctex_modules::{ModuleColor, ModuleRegistry};
use doctex_variant::{Variant, VariantProfile};

/// Kind of a recognized span.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// `【category：body】` with a registered category.
    Module {
        category: String,
        color: ModuleColor,
        body: String,
    },
    /// `【category】`: the rest of the paragraph is the module body.
    ModuleOpen {
        category: String,
        color: ModuleColor,
    },
    /// `【脚注：body】`
    Footnote { body: String },
    /// `【图片：name】`: the rest of the paragraph is the caption.
    Figure { name: String },
    /// `【引用：name】`
    CrossRef { name: String },
    /// `【加粗：text】` or a bare `【text】`.
    Emphasis { text: String },
    /// `【小标题：text】` carries its text; `【小标题】` takes the rest.
    Subtitle { text: Option<String>, minor: bool },
    /// `【无序】` / `【有序】`: the rest of the paragraph holds the items.
    List { ordered: bool },
    /// `【换行】`
    LineBreak,
    /// Well-formed span with a keyword that is neither built in nor registered.
    Unknown { category: String },
    /// Unterminated opener or stray closer.
    Malformed,
}

impl TokenKind {
    /// True for forms that take the rest of the paragraph as their content.
    #[must_use]
    pub fn consumes_rest(&self) -> bool {
        matches!(
            self,
            Self::ModuleOpen { .. }
                | Self::Figure { .. }
                | Self::Subtitle { text: None, .. }
                | Self::List { .. }
        )
    }
}

/// A recognized span with byte offsets into the paragraph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkupToken {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

/// Lex every bracketed span in `text`.
///
/// An opener is matched with depth counting, so brackets nested inside a
/// span stay literal text of that span. An opener that never closes turns
/// the text up to the next opener (or the end) into a [`TokenKind::Malformed`]
/// token and scanning resumes there.
#[must_use]
pub fn lex(text: &str, variant: Variant, registry: &ModuleRegistry) -> Vec<MarkupToken> {
    let profile = variant.profile();
    let open_len = profile.open.len_utf8();
    let close_len = profile.close.len_utf8();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(rel) = text[pos..].find([profile.open, profile.close]) {
        let start = pos + rel;
        let rest = &text[start..];

        if rest.starts_with(profile.close) {
            pos = start + close_len;
            tokens.push(MarkupToken {
                kind: TokenKind::Malformed,
                start,
                end: pos,
            });
            continue;
        }

        match matching_close(rest, profile) {
            Some(close_at) => {
                let content = &rest[open_len..close_at];
                pos = start + close_at + close_len;
                tokens.push(MarkupToken {
                    kind: classify(content, variant, profile, registry),
                    start,
                    end: pos,
                });
            }
            None => {
                pos = rest[open_len..]
                    .find(profile.open)
                    .map_or(text.len(), |next| start + open_len + next);
                tokens.push(MarkupToken {
                    kind: TokenKind::Malformed,
                    start,
                    end: pos,
                });
            }
        }
    }

    tokens
}

/// Byte offset of the closer matching the opener at the start of `s`.
fn matching_close(s: &str, profile: &VariantProfile) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        if c == profile.open {
            depth += 1;
        } else if c == profile.close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

fn classify(
    content: &str,
    variant: Variant,
    profile: &VariantProfile,
    registry: &ModuleRegistry,
) -> TokenKind {
    if let Some((head, body)) = profile.split_head(content) {
        let head = head.trim();
        let body = body.trim().to_owned();
        return if head == profile.figure {
            TokenKind::Figure { name: body }
        } else if head == profile.reference {
            TokenKind::CrossRef { name: body }
        } else if head == profile.emphasis {
            TokenKind::Emphasis { text: body }
        } else if head == profile.footnote {
            TokenKind::Footnote { body }
        } else if head == profile.subtitle {
            TokenKind::Subtitle {
                text: Some(body),
                minor: false,
            }
        } else if head == profile.minor_subtitle {
            TokenKind::Subtitle {
                text: Some(body),
                minor: true,
            }
        } else if let Some(entry) = registry.resolve(head, variant) {
            TokenKind::Module {
                category: entry.category,
                color: entry.color,
                body,
            }
        } else {
            TokenKind::Unknown {
                category: head.to_owned(),
            }
        };
    }

    let name = content.trim();
    if name == profile.line_break {
        TokenKind::LineBreak
    } else if let Some(ordered) = profile.list_kind(name) {
        TokenKind::List { ordered }
    } else if name == profile.subtitle {
        TokenKind::Subtitle {
            text: None,
            minor: false,
        }
    } else if name == profile.minor_subtitle {
        TokenKind::Subtitle {
            text: None,
            minor: true,
        }
    } else if let Some(entry) = registry.resolve(name, variant) {
        TokenKind::ModuleOpen {
            category: entry.category,
            color: entry.color,
        }
    } else {
        TokenKind::Emphasis {
            text: name.to_owned(),
        }
    }
}
