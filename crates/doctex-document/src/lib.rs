//! Document assembly for doctex.
//!
//! [`assemble`] walks a [`SectionTree`](doctex_sections::SectionTree) in
//! pre-order and produces the ordered [`OutputBlock`] sequence consumed by
//! the output writer. Body paragraphs are rewritten first; every figure and
//! cross reference found is then resolved in one batch against the
//! [`AssetIndex`](doctex_figures::AssetIndex) before blocks are emitted.
//!
//! Assembly never fails. Malformed markup, unknown module categories and
//! unresolved figures become [`AssemblyWarning`]s next to the output.

mod assemble;
mod output;

pub use assemble::{Assembly, AssemblyContext, AssemblyWarning, WarningKind, assemble};
pub use output::{FigureBlock, OutputBlock, OutputInline};
