//! Inline markup for doctex handbooks.
//!
//! Paragraph text carries bracketed markup spans delimited by `【` and `】`:
//!
//! | Form | Meaning |
//! |------|---------|
//! | `【名词解释：body】` | Module box of a registered category |
//! | `【名词解释】rest` | Module box holding the rest of the paragraph |
//! | `【脚注：body】` | Footnote at this position |
//! | `【图片：name】caption` | Figure, the rest of the paragraph is its caption |
//! | `【引用：name】` | Cross reference |
//! | `【加粗：text】`, `【text】` | Emphasis |
//! | `【小标题：text】`, `【小标题】rest` | Subtitle (also the minor form) |
//! | `【无序】a；b`, `【有序】a；b` | List |
//! | `【换行】`, `//` | Line break |
//!
//! Keywords are spelled per [`Variant`](doctex_variant::Variant); the
//! grammar is the same for both. Rewriting never fails: malformed spans
//! and unknown categories pass through as text carrying an [`Advisory`].
//!
//! Figure names and cross references are not resolved here. They are
//! emitted as [`InlineBlock::Figure`] and [`InlineBlock::CrossRef`] for a
//! later resolution pass.

mod block;
mod lexer;
mod lint;
mod rewrite;
mod terms;

pub use block::{Advisory, InlineBlock, collect_advisories};
pub use lexer::{MarkupToken, TokenKind, lex};
pub use lint::{LintIssue, LintKind, Severity, lint};
pub use rewrite::{Rewriter, rewrite};
pub use terms::TermTable;
