//! Serial-named section documents.
//!
//! Handbook sources are written one document per section, named by a
//! serial such as `7-2-3` (chapter, section, subsection). Trailing zero
//! parts mark a shallower section: `7-0-0` is a chapter, `7-2-0` a section.
//! Serials only fix document order; final numbering is reassigned by
//! position when the tree is built.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::{ParagraphRecord, StructureWarning};

/// Number of parts in a serial.
const PARTS: usize = 3;

/// Serial parsing and ordering error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SerialError {
    /// Not of the form `chapter-section-subsection` with numeric parts.
    #[error("Malformed serial: {0:?}")]
    Malformed(String),
    /// All parts are zero.
    #[error("Serial {0} names no section")]
    Zero(String),
    /// A non-zero part follows a zero part (`7-0-3`).
    #[error("Serial {0} has a gap")]
    Gap(String),
    /// Two documents share a serial.
    #[error("Duplicate serial: {0}")]
    Duplicate(Serial),
}

/// A `chapter-section-subsection` serial.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Serial([u32; PARTS]);

impl Serial {
    /// Parse a serial such as `7-2-3`.
    ///
    /// Missing trailing parts count as zero, so `7` and `7-2` are accepted.
    pub fn parse(text: &str) -> Result<Self, SerialError> {
        let text = text.trim();
        let malformed = || SerialError::Malformed(text.to_owned());

        let mut parts = [0; PARTS];
        let mut count = 0;
        for piece in text.split('-') {
            if count == PARTS {
                return Err(malformed());
            }
            parts[count] = piece.trim().parse().map_err(|_| malformed())?;
            count += 1;
        }

        if parts.iter().all(|&part| part == 0) {
            return Err(SerialError::Zero(text.to_owned()));
        }
        let depth = parts.iter().take_while(|&&part| part != 0).count();
        if parts[depth..].iter().any(|&part| part != 0) {
            return Err(SerialError::Gap(text.to_owned()));
        }
        Ok(Self(parts))
    }

    /// Heading depth: the number of leading non-zero parts.
    #[must_use]
    pub fn depth(self) -> usize {
        self.0.iter().take_while(|&&part| part != 0).count()
    }

    /// Serial of the enclosing section, `None` for a chapter.
    #[must_use]
    pub fn parent(self) -> Option<Self> {
        let depth = self.depth();
        if depth <= 1 {
            return None;
        }
        let mut parts = self.0;
        parts[depth - 1] = 0;
        Some(Self(parts))
    }

    /// The raw parts.
    #[must_use]
    pub fn parts(self) -> [u32; PARTS] {
        self.0
    }
}

impl FromStr for Serial {
    type Err = SerialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [chapter, section, subsection] = self.0;
        write!(f, "{chapter}-{section}-{subsection}")
    }
}

/// One serial-named section document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SerialDocument {
    pub serial: Serial,
    pub title: String,
    /// Body paragraphs in source order.
    pub paragraphs: Vec<String>,
}

/// Result of [`serial_documents_to_paragraphs`].
#[derive(Debug)]
pub struct SerialFlattening {
    pub paragraphs: Vec<ParagraphRecord>,
    pub warnings: Vec<StructureWarning>,
}

/// Order documents by serial and flatten them into one paragraph stream.
///
/// Each document contributes a heading at its serial depth followed by its
/// body paragraphs. Ordinals are assigned sequentially. A document whose
/// parent serial is absent is kept and reported.
pub fn serial_documents_to_paragraphs(
    mut documents: Vec<SerialDocument>,
) -> Result<SerialFlattening, SerialError> {
    documents.sort_by_key(|doc| doc.serial);

    let mut seen = BTreeSet::new();
    for doc in &documents {
        if !seen.insert(doc.serial) {
            return Err(SerialError::Duplicate(doc.serial));
        }
    }

    let mut warnings = Vec::new();
    let mut paragraphs = Vec::new();
    for doc in documents {
        if let Some(parent) = doc.serial.parent()
            && !seen.contains(&parent)
        {
            tracing::warn!(serial = %doc.serial, parent = %parent, "Document has no parent document");
            warnings.push(StructureWarning::MissingParentSerial {
                serial: doc.serial.to_string(),
                parent: parent.to_string(),
            });
        }

        let depth = i32::try_from(doc.serial.depth()).unwrap_or(i32::MAX);
        paragraphs.push(ParagraphRecord::heading(doc.title, depth, paragraphs.len()));
        for text in doc.paragraphs {
            paragraphs.push(ParagraphRecord::body(text, paragraphs.len()));
        }
    }

    Ok(SerialFlattening {
        paragraphs,
        warnings,
    })
}
