//! Paragraph stream readers for doctex.
//!
//! Two source layouts are supported:
//!
//! - a JSON file holding an array of paragraph records
//!   (`{"text": "...", "level": 1}`),
//! - a directory of serial-named UTF-8 text documents (`7-2-3.txt`), one per
//!   section. The first non-empty line is the section title and every
//!   following non-empty line is a body paragraph.
//!
//! A source that cannot be read at all is an error. Everything inside a
//! readable source is handled downstream without failing.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use doctex_sections::{
    ParagraphRecord, Serial, SerialDocument, SerialError, StructureWarning,
    serial_documents_to_paragraphs,
};

/// Extension of serial documents.
const DOCUMENT_EXTENSION: &str = "txt";

/// Source read error.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Source path does not exist.
    #[error("Source not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error reading a source file or directory.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// JSON paragraph file is invalid.
    #[error("Invalid paragraph file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A document name or the document set is not a valid serial layout.
    #[error("{}: {source}", path.display())]
    Serial {
        path: PathBuf,
        #[source]
        source: SerialError,
    },
    /// A serial document has no title line.
    #[error("Document has no content: {}", .0.display())]
    EmptyDocument(PathBuf),
}

/// Paragraph stream read from a source.
#[derive(Debug)]
pub struct LoadedSource {
    pub paragraphs: Vec<ParagraphRecord>,
    /// Structural problems found while reading (serial documents only).
    pub warnings: Vec<StructureWarning>,
    /// Number of documents read: 1 for a JSON file.
    pub documents: usize,
}

/// Read a paragraph stream from a JSON file or a serial document directory.
///
/// `chapters` restricts a serial directory to documents of the listed
/// chapters; it is ignored for JSON sources.
pub fn read_source(path: &Path, chapters: Option<&[u32]>) -> Result<LoadedSource, SourceError> {
    let metadata = fs::metadata(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            SourceError::NotFound(path.to_path_buf())
        } else {
            SourceError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    if metadata.is_dir() {
        let documents = read_serial_dir(path, chapters)?;
        let count = documents.len();
        let flattening =
            serial_documents_to_paragraphs(documents).map_err(|source| SourceError::Serial {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(
            path = %path.display(),
            documents = count,
            paragraphs = flattening.paragraphs.len(),
            "Read serial documents"
        );
        Ok(LoadedSource {
            paragraphs: flattening.paragraphs,
            warnings: flattening.warnings,
            documents: count,
        })
    } else {
        Ok(LoadedSource {
            paragraphs: read_paragraphs_json(path)?,
            warnings: Vec::new(),
            documents: 1,
        })
    }
}

/// Read a JSON array of paragraph records.
///
/// Ordinals that are not strictly increasing are replaced by positions.
pub fn read_paragraphs_json(path: &Path) -> Result<Vec<ParagraphRecord>, SourceError> {
    let content = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut paragraphs: Vec<ParagraphRecord> =
        serde_json::from_str(&content).map_err(|source| SourceError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    let ordered = paragraphs.windows(2).all(|w| w[0].ordinal < w[1].ordinal);
    if !ordered {
        for (i, paragraph) in paragraphs.iter_mut().enumerate() {
            paragraph.ordinal = i;
        }
    }
    Ok(paragraphs)
}

/// Read every serial document in `dir`.
///
/// Hidden files, `~` temp files, subdirectories and files with another
/// extension are skipped. Documents come back in serial order.
pub fn read_serial_dir(
    dir: &Path,
    chapters: Option<&[u32]>,
) -> Result<Vec<SerialDocument>, SourceError> {
    let entries = fs::read_dir(dir).map_err(|source| SourceError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut documents = Vec::new();
    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || name.starts_with('~') {
            continue;
        }
        if entry.file_type().is_ok_and(|t| t.is_dir())
            || path.extension().is_none_or(|ext| ext != DOCUMENT_EXTENSION)
        {
            continue;
        }

        let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned());
        let serial = Serial::parse(stem.as_deref().unwrap_or_default()).map_err(|source| {
            SourceError::Serial {
                path: path.clone(),
                source,
            }
        })?;
        if let Some(chapters) = chapters
            && !chapters.contains(&serial.parts()[0])
        {
            continue;
        }

        let content = fs::read_to_string(&path).map_err(|source| SourceError::Io {
            path: path.clone(),
            source,
        })?;
        documents.push(parse_serial_document(serial, &content, &path)?);
    }

    documents.sort_by_key(|doc| doc.serial);
    Ok(documents)
}

/// Split document text into title and body paragraphs.
fn parse_serial_document(
    serial: Serial,
    content: &str,
    path: &Path,
) -> Result<SerialDocument, SourceError> {
    let mut lines = content
        .lines()
        .map(|line| line.trim_start_matches('\u{feff}').trim())
        .filter(|line| !line.is_empty());
    let title = lines
        .next()
        .ok_or_else(|| SourceError::EmptyDocument(path.to_path_buf()))?;
    Ok(SerialDocument {
        serial,
        title: title.to_owned(),
        paragraphs: lines.map(str::to_owned).collect(),
    })
}
