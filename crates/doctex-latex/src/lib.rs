//! LaTeX output for doctex.
//!
//! [`render_body`] turns an assembled block sequence into LaTeX source;
//! [`render_document`] wraps it in the handbook preamble (document class,
//! colour definitions, the `module` box environment and the subtitle
//! counter).

mod escape;
mod preamble;
mod writer;

pub use escape::{escape, label};
pub use preamble::LatexOptions;
pub use writer::{render_body, render_document};
