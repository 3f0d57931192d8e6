//! Immutable snapshot of available image files.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::normalize::normalize_name;

/// File extensions recognized as images, in lookup order.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "PNG", "jpg", "JPG", "jpeg", "JPEG"];

/// Asset directory error.
#[derive(Debug, thiserror::Error)]
pub enum FigureError {
    /// The asset directory exists but cannot be listed.
    #[error("Failed to read asset directory {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Index of image files keyed by logical name.
///
/// Built once per document (or batch) and shared read-only.
#[derive(Clone, Debug, Default)]
pub struct AssetIndex {
    root: Option<PathBuf>,
    files: BTreeSet<String>,
    by_stem: BTreeMap<String, BTreeSet<String>>,
    by_normalized: BTreeMap<String, BTreeSet<String>>,
}

impl AssetIndex {
    /// Build an index from bare file names.
    ///
    /// Names without a recognized image extension are ignored.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::default();
        for name in names {
            index.insert(name.as_ref());
        }
        index
    }

    /// Scan an image directory (not recursive).
    ///
    /// Hidden files, `~` temp files and subdirectories are skipped. A
    /// missing directory yields an empty index.
    pub fn scan(dir: &Path) -> Result<Self, FigureError> {
        let mut index = Self {
            root: Some(dir.to_path_buf()),
            ..Self::default()
        };

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(path = %dir.display(), "Asset directory not found");
                return Ok(index);
            }
            Err(source) => {
                return Err(FigureError::Io {
                    path: dir.to_path_buf(),
                    source,
                });
            }
        };

        for entry in entries.filter_map(Result::ok) {
            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || name.starts_with('~') {
                continue;
            }
            index.insert(&name);
        }

        tracing::debug!(path = %dir.display(), files = index.files.len(), "Scanned asset directory");
        Ok(index)
    }

    fn insert(&mut self, file_name: &str) {
        let Some(stem) = image_stem(file_name) else {
            return;
        };
        if !self.files.insert(file_name.to_owned()) {
            return;
        }
        self.by_stem
            .entry(stem.to_owned())
            .or_default()
            .insert(file_name.to_owned());
        self.by_normalized
            .entry(normalize_name(stem))
            .or_default()
            .insert(file_name.to_owned());
    }

    /// Directory the index was scanned from.
    #[must_use]
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Number of indexed files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Indexed file names in lexical order.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(String::as_str)
    }

    /// Whether a file with this exact name is indexed.
    #[must_use]
    pub fn contains_file(&self, file_name: &str) -> bool {
        self.files.contains(file_name)
    }

    /// Filesystem path of an indexed file.
    #[must_use]
    pub fn path_of(&self, file_name: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(file_name),
            None => PathBuf::from(file_name),
        }
    }

    /// Indexed file named exactly `file_name`.
    pub(crate) fn file(&self, file_name: &str) -> Option<&str> {
        self.files.get(file_name).map(String::as_str)
    }

    /// Lexically first file whose stem is exactly `stem`.
    pub(crate) fn first_by_stem(&self, stem: &str) -> Option<&str> {
        self.by_stem.get(stem)?.first().map(String::as_str)
    }

    /// Lexically first file whose normalized stem equals `key`.
    pub(crate) fn first_by_normalized(&self, key: &str) -> Option<&str> {
        self.by_normalized.get(key)?.first().map(String::as_str)
    }
}

/// Stem of `file_name` if its extension is a recognized image extension.
fn image_stem(file_name: &str) -> Option<&str> {
    let (stem, extension) = file_name.rsplit_once('.')?;
    (!stem.is_empty() && IMAGE_EXTENSIONS.contains(&extension)).then_some(stem)
}
