//! Section tree reconstruction for doctex.
//!
//! The upstream reader produces a flat, ordered stream of
//! [`ParagraphRecord`]s where each record carries a heading level
//! (`0` for body text). [`build_tree`] turns that stream into a
//! [`SectionTree`] whose nodes carry multi-part numbering paths such as
//! `[2, 3, 1]`, assigned purely from document position.
//!
//! # Example
//!
//! ```
//! use doctex_sections::{ParagraphRecord, build_tree};
//!
//! let paragraphs = vec![
//!     ParagraphRecord::heading("急救", 1, 0),
//!     ParagraphRecord::heading("止血", 2, 1),
//!     ParagraphRecord::body("按压伤口。", 2),
//! ];
//! let outcome = build_tree(&paragraphs);
//! let tree = outcome.tree;
//!
//! let node = tree.find_by_numbering(&[1, 1]).unwrap();
//! assert_eq!(tree.node(node).title, "止血");
//! assert_eq!(tree.node(node).content.len(), 1);
//! assert!(outcome.warnings.is_empty());
//! ```
//!
//! Handbook sources that arrive as per-section documents named by serial
//! (`7-2-3`) are flattened into the same paragraph stream with
//! [`serial_documents_to_paragraphs`].

mod builder;
mod paragraph;
mod serial;
mod tree;

pub use builder::{BuildOutcome, SectionTreeBuilder, StructureWarning, build_tree};
pub use paragraph::ParagraphRecord;
pub use serial::{
    Serial, SerialDocument, SerialError, SerialFlattening, serial_documents_to_paragraphs,
};
pub use tree::{BodyParagraph, NodeId, SectionNode, SectionTree, TreeStatistics};
