//! Token stream to inline blocks.

use std::mem;
use std::ops::Range;

use doctex_modules::{ModuleColor, ModuleRegistry};
use doctex_variant::{Variant, VariantProfile};

use crate::block::{Advisory, InlineBlock};
use crate::lexer::{MarkupToken, TokenKind, lex};

/// Rewrites paragraph text into [`InlineBlock`]s for one variant.
///
/// Holds only shared references, so one rewriter can serve every paragraph
/// of a document.
#[derive(Clone, Copy, Debug)]
pub struct Rewriter<'a> {
    variant: Variant,
    profile: &'static VariantProfile,
    registry: &'a ModuleRegistry,
}

impl<'a> Rewriter<'a> {
    #[must_use]
    pub fn new(variant: Variant, registry: &'a ModuleRegistry) -> Self {
        Self {
            variant,
            profile: variant.profile(),
            registry,
        }
    }

    /// The variant this rewriter targets.
    #[must_use]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Rewrite one paragraph.
    #[must_use]
    pub fn rewrite(&self, text: &str) -> Vec<InlineBlock> {
        let tokens = lex(text, self.variant, self.registry);
        self.rewrite_span(text, 0..text.len(), tokens)
    }

    /// Rewrite `text[span]`, given the tokens that lie inside it in order.
    ///
    /// A bare module opener collects everything after it into its body, so
    /// open modules are kept on a stack and wrapped once the span ends.
    fn rewrite_span(
        &self,
        text: &str,
        span: Range<usize>,
        tokens: Vec<MarkupToken>,
    ) -> Vec<InlineBlock> {
        let mut sink = BlockSink::default();
        let mut open: Vec<(BlockSink, String, ModuleColor)> = Vec::new();
        let mut pos = span.start;
        let mut tokens = tokens.into_iter();

        while let Some(token) = tokens.next() {
            sink.text(&text[pos..token.start]);
            pos = token.end;
            let rest = &text[token.end..span.end];
            let consumes_rest = token.kind.consumes_rest();

            match token.kind {
                TokenKind::Module {
                    category,
                    color,
                    body,
                } => {
                    let mut inner = BlockSink::default();
                    inner.text(&body);
                    sink.push(InlineBlock::Module {
                        category,
                        color,
                        body: inner.finish(),
                    });
                }
                TokenKind::ModuleOpen { category, color } => {
                    open.push((mem::take(&mut sink), category, color));
                    continue;
                }
                TokenKind::Footnote { body } => {
                    if !body.is_empty() {
                        sink.push(InlineBlock::Footnote { body });
                    }
                }
                TokenKind::Figure { name } => {
                    let caption = match rest.trim() {
                        "" => name.clone(),
                        caption => caption.to_owned(),
                    };
                    sink.push(InlineBlock::Figure { name, caption });
                }
                TokenKind::CrossRef { name } => {
                    let prefixed = text[span.start..token.start].ends_with(self.profile.figure_prefix);
                    sink.push(InlineBlock::CrossRef { name, prefixed });
                }
                TokenKind::Emphasis { text: emphasis } => {
                    if !emphasis.is_empty() {
                        sink.push(InlineBlock::Emphasis { text: emphasis });
                    }
                }
                TokenKind::Subtitle { text: title, minor } => {
                    let title = title.unwrap_or_else(|| rest.trim().to_owned());
                    sink.push(InlineBlock::Subtitle { text: title, minor });
                }
                TokenKind::List { ordered } => {
                    let mut remaining: Vec<MarkupToken> = tokens.by_ref().collect();
                    let items = split_items(text, token.end..span.end, self.profile)
                        .into_iter()
                        .map(|item| {
                            let taken = remaining.iter().take_while(|t| t.start < item.end).count();
                            let inside = remaining
                                .drain(..taken)
                                .filter(|t| t.start >= item.start)
                                .collect();
                            self.rewrite_span(text, item, inside)
                        })
                        .collect();
                    sink.push(InlineBlock::List { ordered, items });
                }
                TokenKind::LineBreak => sink.push(InlineBlock::LineBreak),
                TokenKind::Unknown { .. } => {
                    sink.verbatim(&text[token.start..token.end], Advisory::UnknownCategory);
                }
                TokenKind::Malformed => {
                    sink.verbatim(&text[token.start..token.end], Advisory::Malformed);
                }
            }

            if consumes_rest {
                pos = span.end;
                break;
            }
        }

        sink.text(&text[pos..span.end]);
        let mut blocks = sink.finish();
        while let Some((mut outer, category, color)) = open.pop() {
            outer.push(InlineBlock::Module {
                category,
                color,
                body: blocks,
            });
            blocks = outer.finish();
        }
        blocks
    }
}

/// Rewrite one paragraph with a throwaway [`Rewriter`].
#[must_use]
pub fn rewrite(text: &str, variant: Variant, registry: &ModuleRegistry) -> Vec<InlineBlock> {
    Rewriter::new(variant, registry).rewrite(text)
}

/// Split list content in `text[span]` on item separators outside brackets.
///
/// Returns the trimmed, non-empty item ranges.
fn split_items(text: &str, span: Range<usize>, profile: &VariantProfile) -> Vec<Range<usize>> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = span.start;
    for (i, c) in text[span.clone()].char_indices() {
        let i = span.start + i;
        if c == profile.open {
            depth += 1;
        } else if c == profile.close {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && profile.list_separators.contains(&c) {
            items.push(start..i);
            start = i + c.len_utf8();
        }
    }
    items.push(start..span.end);
    items
        .into_iter()
        .filter_map(|item| {
            let raw = &text[item.clone()];
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return None;
            }
            let lead = raw.len() - raw.trim_start().len();
            Some(item.start + lead..item.start + lead + trimmed.len())
        })
        .collect()
}

/// Accumulates blocks, merging adjacent text and splitting on `//`.
#[derive(Default)]
struct BlockSink {
    blocks: Vec<InlineBlock>,
}

impl BlockSink {
    fn push(&mut self, block: InlineBlock) {
        self.blocks.push(block);
    }

    /// Append text, turning `//` into line breaks unless it follows `:`.
    fn text(&mut self, text: &str) {
        let mut start = 0;
        for (i, _) in text.match_indices("//") {
            if text[..i].ends_with(':') {
                continue;
            }
            self.append_text(&text[start..i], None);
            self.blocks.push(InlineBlock::LineBreak);
            start = i + 2;
        }
        self.append_text(&text[start..], None);
    }

    /// Append source text unchanged, flagged with `advisory`.
    fn verbatim(&mut self, text: &str, advisory: Advisory) {
        self.append_text(text, Some(advisory));
    }

    fn append_text(&mut self, text: &str, advisory: Option<Advisory>) {
        if text.is_empty() {
            return;
        }
        if let Some(InlineBlock::Text {
            text: last,
            advisory: last_advisory,
        }) = self.blocks.last_mut()
        {
            last.push_str(text);
            *last_advisory = (*last_advisory).max(advisory);
            return;
        }
        self.blocks.push(InlineBlock::Text {
            text: text.to_owned(),
            advisory,
        });
    }

    fn finish(self) -> Vec<InlineBlock> {
        self.blocks
    }
}
