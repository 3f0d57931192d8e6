//! Figure asset resolution for doctex.
//!
//! Markup names figures by a logical name without extension, written in
//! whichever script the author used. [`AssetIndex`] is an immutable
//! snapshot of the available image files; [`AssetIndex::resolve`] maps a
//! logical name to one of them, trying in order:
//!
//! 1. the name as written,
//! 2. the name converted to the other script form,
//! 3. a normalized form that ignores width, spacing and script differences.
//!
//! Ties resolve to the lexically first file name.

mod index;
mod normalize;
mod resolve;

pub use index::{AssetIndex, FigureError, IMAGE_EXTENSIONS};
pub use normalize::normalize_name;
pub use resolve::{FigureAsset, MatchKind, Resolution};
