//! Section tree to output blocks.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use doctex_figures::{AssetIndex, FigureAsset, Resolution};
use doctex_markup::{Advisory, InlineBlock, Rewriter, TermTable};
use doctex_modules::ModuleRegistry;
use doctex_sections::SectionTree;
use doctex_variant::{Variant, convert};

use crate::output::{FigureBlock, OutputBlock, OutputInline};

/// Shared read-only inputs of an assembly.
#[derive(Clone, Copy, Debug)]
pub struct AssemblyContext<'a> {
    pub registry: &'a ModuleRegistry,
    pub assets: &'a AssetIndex,
    pub terms: &'a TermTable,
    /// Convert headings and body text to the target script before rewriting.
    pub convert_script: bool,
}

/// What went wrong in one paragraph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WarningKind {
    /// Markup passed through as text.
    Markup { advisory: Advisory, text: String },
    /// A figure name matched no asset; a placeholder was emitted.
    UnresolvedFigure { name: String },
}

/// A non-fatal problem found during assembly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssemblyWarning {
    /// Ordinal of the source paragraph.
    pub ordinal: usize,
    pub kind: WarningKind,
}

impl fmt::Display for AssemblyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WarningKind::Markup {
                advisory: Advisory::Malformed,
                text,
            } => write!(f, "paragraph {}: malformed markup in {text:?}", self.ordinal),
            WarningKind::Markup {
                advisory: Advisory::UnknownCategory,
                text,
            } => write!(f, "paragraph {}: unknown module in {text:?}", self.ordinal),
            WarningKind::UnresolvedFigure { name } => {
                write!(f, "paragraph {}: figure {name:?} not found", self.ordinal)
            }
        }
    }
}

/// Assembled document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assembly {
    pub blocks: Vec<OutputBlock>,
    pub warnings: Vec<AssemblyWarning>,
}

/// Paragraph rewritten but not yet resolved.
enum Pending {
    Heading(OutputBlock),
    Paragraph {
        ordinal: usize,
        blocks: Vec<InlineBlock>,
    },
}

/// Assemble `tree` into output blocks for `variant`.
///
/// Nodes are visited in pre-order: heading, then the node's own
/// paragraphs, then its children. Placeholder sections emit no heading.
#[must_use]
pub fn assemble(tree: &SectionTree, variant: Variant, context: &AssemblyContext<'_>) -> Assembly {
    let rewriter = Rewriter::new(variant, context.registry);
    let prepare = |text: &str| -> String {
        let text = if context.convert_script {
            Cow::Owned(convert(text, variant))
        } else {
            Cow::Borrowed(text)
        };
        context.terms.apply(&text).into_owned()
    };

    let mut pending = Vec::new();
    for id in tree.preorder() {
        let node = tree.node(id);
        if node.depth > 0 && !node.placeholder {
            let title = if context.convert_script {
                convert(&node.title, variant)
            } else {
                node.title.clone()
            };
            pending.push(Pending::Heading(OutputBlock::Heading {
                depth: node.depth,
                numbering: node.numbering.clone(),
                title,
            }));
        }
        for paragraph in &node.content {
            pending.push(Pending::Paragraph {
                ordinal: paragraph.ordinal,
                blocks: rewriter.rewrite(&prepare(&paragraph.text)),
            });
        }
    }

    let mut names = BTreeSet::new();
    for item in &pending {
        if let Pending::Paragraph { blocks, .. } = item {
            collect_names(blocks, &mut names);
        }
    }
    let resolved = context
        .assets
        .resolve_all(names.iter().map(String::as_str), variant);

    let mut emitter = Emitter {
        variant,
        resolved: &resolved,
        warnings: Vec::new(),
    };
    let mut blocks = Vec::with_capacity(pending.len());
    for item in pending {
        match item {
            Pending::Heading(heading) => blocks.push(heading),
            Pending::Paragraph {
                ordinal,
                blocks: inline,
            } => emitter.paragraph(ordinal, inline, &mut blocks),
        }
    }

    tracing::debug!(
        %variant,
        blocks = blocks.len(),
        figures = resolved.len(),
        warnings = emitter.warnings.len(),
        "Assembled document"
    );
    Assembly {
        blocks,
        warnings: emitter.warnings,
    }
}

/// Figure and cross reference names, including nested ones.
fn collect_names(blocks: &[InlineBlock], names: &mut BTreeSet<String>) {
    for block in blocks {
        match block {
            InlineBlock::Figure { name, .. } | InlineBlock::CrossRef { name, .. } => {
                names.insert(name.trim().to_owned());
            }
            InlineBlock::Module { body, .. } => collect_names(body, names),
            InlineBlock::List { items, .. } => {
                for item in items {
                    collect_names(item, names);
                }
            }
            _ => {}
        }
    }
}

struct Emitter<'r> {
    variant: Variant,
    resolved: &'r BTreeMap<String, FigureAsset>,
    warnings: Vec<AssemblyWarning>,
}

impl Emitter<'_> {
    /// Emit one paragraph, lifting top-level figures out as their own blocks.
    fn paragraph(&mut self, ordinal: usize, inline: Vec<InlineBlock>, out: &mut Vec<OutputBlock>) {
        let mut content = Vec::new();
        for block in inline {
            if let InlineBlock::Figure { name, caption } = block {
                if !content.is_empty() {
                    out.push(OutputBlock::Paragraph {
                        ordinal,
                        content: std::mem::take(&mut content),
                    });
                }
                let figure = self.figure(ordinal, &name, caption);
                out.push(OutputBlock::Figure { ordinal, figure });
            } else {
                content.push(self.inline(ordinal, block));
            }
        }
        if !content.is_empty() {
            out.push(OutputBlock::Paragraph { ordinal, content });
        }
    }

    fn inline(&mut self, ordinal: usize, block: InlineBlock) -> OutputInline {
        match block {
            InlineBlock::Text { text, advisory } => {
                if let Some(advisory) = advisory {
                    self.warn(
                        ordinal,
                        WarningKind::Markup {
                            advisory,
                            text: text.clone(),
                        },
                    );
                }
                OutputInline::Text(text)
            }
            InlineBlock::Module {
                category,
                color,
                body,
            } => OutputInline::Module {
                category,
                color,
                body: self.inlines(ordinal, body),
            },
            InlineBlock::Footnote { body } => OutputInline::Footnote(body),
            InlineBlock::Figure { name, caption } => {
                OutputInline::Figure(self.figure(ordinal, &name, caption))
            }
            InlineBlock::CrossRef { name, prefixed } => {
                let is_figure = self
                    .resolved
                    .get(name.trim())
                    .is_some_and(FigureAsset::is_resolved);
                OutputInline::CrossRef {
                    label: self.label(&name),
                    prefix: (is_figure && !prefixed).then_some(self.variant.profile().figure_prefix),
                }
            }
            InlineBlock::Emphasis { text } => OutputInline::Emphasis(text),
            InlineBlock::Subtitle { text, minor } => OutputInline::Subtitle { text, minor },
            InlineBlock::List { ordered, items } => OutputInline::List {
                ordered,
                items: items
                    .into_iter()
                    .map(|item| self.inlines(ordinal, item))
                    .collect(),
            },
            InlineBlock::LineBreak => OutputInline::LineBreak,
        }
    }

    fn inlines(&mut self, ordinal: usize, blocks: Vec<InlineBlock>) -> Vec<OutputInline> {
        blocks
            .into_iter()
            .map(|block| self.inline(ordinal, block))
            .collect()
    }

    fn figure(&mut self, ordinal: usize, name: &str, caption: String) -> FigureBlock {
        let path = match self.resolved.get(name.trim()).map(|asset| &asset.resolution) {
            Some(Resolution::Resolved { path, .. }) => Some(path.clone()),
            _ => {
                self.warn(
                    ordinal,
                    WarningKind::UnresolvedFigure {
                        name: name.trim().to_owned(),
                    },
                );
                None
            }
        };
        FigureBlock {
            label: self.label(name),
            caption,
            path,
        }
    }

    fn label(&self, name: &str) -> String {
        convert(name.trim(), self.variant)
    }

    fn warn(&mut self, ordinal: usize, kind: WarningKind) {
        let warning = AssemblyWarning { ordinal, kind };
        tracing::warn!(ordinal, "{warning}");
        self.warnings.push(warning);
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use doctex_modules::ModuleColor;
    use doctex_sections::{ParagraphRecord, build_tree};
    use pretty_assertions::assert_eq;

    use super::*;

    struct Fixture {
        registry: ModuleRegistry,
        assets: AssetIndex,
        terms: TermTable,
    }

    impl Fixture {
        fn new(assets: &[&str]) -> Self {
            Self {
                registry: ModuleRegistry::builtin(),
                assets: AssetIndex::from_names(assets),
                terms: TermTable::default(),
            }
        }

        fn context(&self) -> AssemblyContext<'_> {
            AssemblyContext {
                registry: &self.registry,
                assets: &self.assets,
                terms: &self.terms,
                convert_script: false,
            }
        }
    }

    fn heading(depth: usize, numbering: &[u32], title: &str) -> OutputBlock {
        OutputBlock::Heading {
            depth,
            numbering: numbering.to_vec(),
            title: title.to_owned(),
        }
    }

    fn text(ordinal: usize, text: &str) -> OutputBlock {
        OutputBlock::Paragraph {
            ordinal,
            content: vec![OutputInline::Text(text.to_owned())],
        }
    }

    #[test]
    fn test_preorder_heading_then_content_then_children() {
        let tree = build_tree(&[
            ParagraphRecord::body("前言", 0),
            ParagraphRecord::heading("急救", 1, 1),
            ParagraphRecord::body("章首", 2),
            ParagraphRecord::heading("止血", 2, 3),
            ParagraphRecord::body("按压", 4),
            ParagraphRecord::heading("包扎", 2, 5),
            ParagraphRecord::heading("锻炼", 1, 6),
        ])
        .tree;
        let fixture = Fixture::new(&[]);

        let assembly = assemble(&tree, Variant::Simplified, &fixture.context());

        assert_eq!(
            assembly.blocks,
            vec![
                text(0, "前言"),
                heading(1, &[1], "急救"),
                text(2, "章首"),
                heading(2, &[1, 1], "止血"),
                text(4, "按压"),
                heading(2, &[1, 2], "包扎"),
                heading(1, &[2], "锻炼"),
            ]
        );
        assert!(assembly.warnings.is_empty());
    }

    #[test]
    fn test_placeholder_heading_skipped_but_descended() {
        let tree = build_tree(&[
            ParagraphRecord::heading("章", 1, 0),
            ParagraphRecord::heading("小节", 3, 1),
            ParagraphRecord::body("内容", 2),
        ])
        .tree;
        let fixture = Fixture::new(&[]);

        let assembly = assemble(&tree, Variant::Simplified, &fixture.context());

        assert_eq!(
            assembly.blocks,
            vec![
                heading(1, &[1], "章"),
                heading(3, &[1, 1, 1], "小节"),
                text(2, "内容"),
            ]
        );
    }

    #[test]
    fn test_figures_resolve_and_lift() {
        let tree = build_tree(&[
            ParagraphRecord::heading("章", 1, 0),
            ParagraphRecord::body("如圖【引用：图1】。見下【圖片：图1】胸外按壓", 1),
        ])
        .tree;
        let fixture = Fixture::new(&["圖1.png"]);

        let assembly = assemble(&tree, Variant::Traditional, &fixture.context());

        assert_eq!(
            assembly.blocks[1..].to_vec(),
            vec![
                OutputBlock::Paragraph {
                    ordinal: 1,
                    content: vec![
                        OutputInline::Text("如圖".to_owned()),
                        OutputInline::CrossRef {
                            label: "圖1".to_owned(),
                            prefix: None,
                        },
                        OutputInline::Text("。見下".to_owned()),
                    ],
                },
                OutputBlock::Figure {
                    ordinal: 1,
                    figure: FigureBlock {
                        label: "圖1".to_owned(),
                        caption: "胸外按壓".to_owned(),
                        path: Some(PathBuf::from("圖1.png")),
                    },
                },
            ]
        );
        assert!(assembly.warnings.is_empty());
    }

    #[test]
    fn test_cross_reference_prefix() {
        let tree = build_tree(&[ParagraphRecord::body("见【引用：止血】与【引用：第一节】", 0)]).tree;
        let fixture = Fixture::new(&["止血.png"]);

        let assembly = assemble(&tree, Variant::Simplified, &fixture.context());

        assert_eq!(
            assembly.blocks,
            vec![OutputBlock::Paragraph {
                ordinal: 0,
                content: vec![
                    OutputInline::Text("见".to_owned()),
                    OutputInline::CrossRef {
                        label: "止血".to_owned(),
                        prefix: Some("图"),
                    },
                    OutputInline::Text("与".to_owned()),
                    OutputInline::CrossRef {
                        label: "第一节".to_owned(),
                        prefix: None,
                    },
                ],
            }]
        );
    }

    #[test]
    fn test_unresolved_figure_is_placeholder_with_warning() {
        let tree = build_tree(&[ParagraphRecord::body("【图片：不存在】", 0)]).tree;
        let fixture = Fixture::new(&[]);

        let assembly = assemble(&tree, Variant::Simplified, &fixture.context());

        assert_eq!(
            assembly.blocks,
            vec![OutputBlock::Figure {
                ordinal: 0,
                figure: FigureBlock {
                    label: "不存在".to_owned(),
                    caption: "不存在".to_owned(),
                    path: None,
                },
            }]
        );
        assert_eq!(
            assembly.warnings,
            vec![AssemblyWarning {
                ordinal: 0,
                kind: WarningKind::UnresolvedFigure {
                    name: "不存在".to_owned()
                },
            }]
        );
    }

    #[test]
    fn test_markup_advisories_become_warnings() {
        let tree = build_tree(&[
            ParagraphRecord::body("前面【名词解释：缺少结尾", 0),
            ParagraphRecord::body("【乱写：x】", 1),
        ])
        .tree;
        let fixture = Fixture::new(&[]);

        let assembly = assemble(&tree, Variant::Simplified, &fixture.context());

        assert_eq!(assembly.blocks, vec![
            text(0, "前面【名词解释：缺少结尾"),
            text(1, "【乱写：x】"),
        ]);
        let kinds: Vec<Advisory> = assembly
            .warnings
            .iter()
            .filter_map(|w| match w.kind {
                WarningKind::Markup { advisory, .. } => Some(advisory),
                WarningKind::UnresolvedFigure { .. } => None,
            })
            .collect();
        assert_eq!(kinds, vec![Advisory::Malformed, Advisory::UnknownCategory]);
    }

    #[test]
    fn test_terms_and_script_conversion() {
        let tree = build_tree(&[
            ParagraphRecord::heading("体温", 1, 0),
            ParagraphRecord::body("【名词解释：劳动派遣】", 1),
        ])
        .tree;
        let fixture = Fixture::new(&[]);
        let context = fixture.context();

        let simplified = assemble(&tree, Variant::Simplified, &context);
        assert_eq!(
            simplified.blocks[1],
            OutputBlock::Paragraph {
                ordinal: 1,
                content: vec![OutputInline::Module {
                    category: "名词解释".to_owned(),
                    color: ModuleColor::Green,
                    body: vec![OutputInline::Text("劳务派遣".to_owned())],
                }],
            }
        );

        let converting = AssemblyContext {
            convert_script: true,
            ..context
        };
        let traditional = assemble(&tree, Variant::Traditional, &converting);
        assert_eq!(traditional.blocks[0], heading(1, &[1], "體溫"));
        assert!(matches!(
            &traditional.blocks[1],
            OutputBlock::Paragraph { content, .. }
                if matches!(&content[0], OutputInline::Module { category, .. } if category == "名詞解釋")
        ));
    }

    #[test]
    fn test_assemble_is_idempotent() {
        let tree = build_tree(&[
            ParagraphRecord::heading("章", 1, 0),
            ParagraphRecord::heading("节", 3, 1),
            ParagraphRecord::body("【实用建议】多喝水【脚注：温水】//休息", 2),
            ParagraphRecord::body("【无序】甲；乙【图片：缺图】", 3),
            ParagraphRecord::body("坏【", 4),
        ])
        .tree;
        let fixture = Fixture::new(&["图1.png"]);

        let first = assemble(&tree, Variant::Simplified, &fixture.context());
        let second = assemble(&tree, Variant::Simplified, &fixture.context());

        assert_eq!(first, second);
        assert_eq!(format!("{first:?}"), format!("{second:?}"));
    }
}
