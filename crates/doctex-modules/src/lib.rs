//! Module category registry for doctex.
//!
//! A module is a color-coded box in the output, opened by a bracketed
//! category name such as `【名词解释：...】`. The registry maps category
//! names to [`ModuleColor`]s separately for each script [`Variant`].
//!
//! Sources are JSON (`modules.json`) or TOML files declaring
//! `available_colors`, `modules` and `modules_traditional`:
//!
//! ```json
//! {
//!   "available_colors": ["green", "orange", "red"],
//!   "modules": { "名词解释": "green" },
//!   "modules_traditional": { "名詞解釋": "green" }
//! }
//! ```
//!
//! Loading is all-or-nothing: [`ModuleRegistry::load`] returns the built-in
//! registry whenever any part of the source fails validation, together with
//! the error that caused the fallback.

mod color;
mod source;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use doctex_variant::Variant;

pub use color::{ModuleColor, UnknownColor};
use source::RawModuleSource;

/// Built-in simplified categories.
const DEFAULT_SIMPLIFIED: &[(&str, ModuleColor)] = &[
    ("名词解释", ModuleColor::Green),
    ("操作步骤", ModuleColor::Green),
    ("实用建议", ModuleColor::Orange),
    ("编者的话", ModuleColor::Red),
    ("就医建议", ModuleColor::Red),
];

/// Built-in traditional categories.
const DEFAULT_TRADITIONAL: &[(&str, ModuleColor)] = &[
    ("名詞解釋", ModuleColor::Green),
    ("操作步驟", ModuleColor::Green),
    ("實用建議", ModuleColor::Orange),
    ("編者的話", ModuleColor::Red),
    ("就醫建議", ModuleColor::Red),
];

/// Registry load error.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// I/O error reading the source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parse error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// TOML parse error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// Source file extension is neither `.json` nor `.toml`.
    #[error("Unsupported module source format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    /// Required field is absent or empty.
    #[error("Module source is missing {0}")]
    MissingField(&'static str),
    /// Color name outside the allowed set.
    #[error("Unknown color {color:?} in {field}")]
    UnknownColor {
        /// Field the color appeared in.
        field: String,
        /// The rejected color name.
        color: String,
    },
    /// Color allowed in general but not declared in `available_colors`.
    #[error("Module {category:?} ({variant}) uses {color}, which is not in available_colors")]
    ColorNotAvailable {
        variant: Variant,
        category: String,
        color: ModuleColor,
    },
    /// Category listed twice with different colors.
    #[error("Module {category:?} ({variant}) maps to both {first} and {second}")]
    ConflictingColor {
        variant: Variant,
        category: String,
        first: ModuleColor,
        second: ModuleColor,
    },
    /// Category name is empty.
    #[error("Empty module name in {variant} mapping")]
    EmptyCategory { variant: Variant },
}

/// Where the active registry came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryOrigin {
    /// Built-in defaults.
    BuiltIn,
    /// A validated source file.
    File(PathBuf),
    /// A validated in-memory source.
    Inline,
}

/// A resolved module category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleEntry {
    pub category: String,
    pub color: ModuleColor,
    pub variant: Variant,
}

/// Result of [`ModuleRegistry::load`].
#[derive(Debug)]
pub struct RegistryLoad {
    /// The usable registry (custom or built-in).
    pub registry: ModuleRegistry,
    /// Why the source was rejected, if it was.
    pub fallback: Option<RegistryError>,
}

/// Category to color mapping for both variants.
///
/// Immutable after construction; share it by reference across documents.
#[derive(Clone, Debug)]
pub struct ModuleRegistry {
    simplified: BTreeMap<String, ModuleColor>,
    traditional: BTreeMap<String, ModuleColor>,
    available: Vec<ModuleColor>,
    origin: RegistryOrigin,
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ModuleRegistry {
    /// The built-in registry.
    #[must_use]
    pub fn builtin() -> Self {
        let collect = |entries: &[(&str, ModuleColor)]| {
            entries
                .iter()
                .map(|&(name, color)| (name.to_owned(), color))
                .collect()
        };
        Self {
            simplified: collect(DEFAULT_SIMPLIFIED),
            traditional: collect(DEFAULT_TRADITIONAL),
            available: ModuleColor::ALL.to_vec(),
            origin: RegistryOrigin::BuiltIn,
        }
    }

    /// Parse and validate a JSON source.
    pub fn from_json(content: &str) -> Result<Self, RegistryError> {
        Self::from_raw(RawModuleSource::from_json(content)?, RegistryOrigin::Inline)
    }

    /// Parse and validate a TOML source.
    pub fn from_toml(content: &str) -> Result<Self, RegistryError> {
        Self::from_raw(RawModuleSource::from_toml(content)?, RegistryOrigin::Inline)
    }

    /// Read, parse and validate a source file.
    ///
    /// The format is chosen by extension: `.json` or `.toml`.
    pub fn from_path(path: &Path) -> Result<Self, RegistryError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let raw = match extension.as_deref() {
            Some("json") => RawModuleSource::from_json(&std::fs::read_to_string(path)?)?,
            Some("toml") => RawModuleSource::from_toml(&std::fs::read_to_string(path)?)?,
            _ => return Err(RegistryError::UnsupportedFormat(path.to_path_buf())),
        };
        Self::from_raw(raw, RegistryOrigin::File(path.to_path_buf()))
    }

    /// Load a source file, falling back to the built-in registry on any error.
    ///
    /// The fallback is logged once here and returned to the caller; the
    /// registry in the result is always usable.
    pub fn load(path: &Path) -> RegistryLoad {
        match Self::from_path(path) {
            Ok(registry) => {
                tracing::debug!(
                    path = %path.display(),
                    simplified = registry.simplified.len(),
                    traditional = registry.traditional.len(),
                    "Loaded module registry"
                );
                RegistryLoad {
                    registry,
                    fallback: None,
                }
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "Module source rejected, using built-in modules"
                );
                RegistryLoad {
                    registry: Self::builtin(),
                    fallback: Some(err),
                }
            }
        }
    }

    fn from_raw(raw: RawModuleSource, origin: RegistryOrigin) -> Result<Self, RegistryError> {
        let validated = raw.validate()?;
        Ok(Self {
            simplified: validated.simplified,
            traditional: validated.traditional,
            available: validated.available,
            origin,
        })
    }

    /// Look up a category under `variant`.
    #[must_use]
    pub fn resolve(&self, category: &str, variant: Variant) -> Option<ModuleEntry> {
        let color = *self.mapping(variant).get(category)?;
        Some(ModuleEntry {
            category: category.to_owned(),
            color,
            variant,
        })
    }

    /// Whether `category` names a module under `variant`.
    #[must_use]
    pub fn contains(&self, category: &str, variant: Variant) -> bool {
        self.mapping(variant).contains_key(category)
    }

    /// Categories and colors for `variant`, sorted by name.
    pub fn entries(&self, variant: Variant) -> impl Iterator<Item = (&str, ModuleColor)> {
        self.mapping(variant)
            .iter()
            .map(|(name, &color)| (name.as_str(), color))
    }

    /// Colors declared by the source.
    #[must_use]
    pub fn available_colors(&self) -> &[ModuleColor] {
        &self.available
    }

    /// Where this registry came from.
    #[must_use]
    pub fn origin(&self) -> &RegistryOrigin {
        &self.origin
    }

    fn mapping(&self, variant: Variant) -> &BTreeMap<String, ModuleColor> {
        match variant {
            Variant::Simplified => &self.simplified,
            Variant::Traditional => &self.traditional,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    static_assertions::assert_impl_all!(ModuleRegistry: Send, Sync);

    const CUSTOM: &str = r#"{
        "description": "handbook modules",
        "version": "1.0",
        "available_colors": ["green", "orange", "red"],
        "modules": {"测试模块1": "green", "测试模块2": "orange", "实用建议": "red"},
        "modules_traditional": {"測試模組1": "green", "測試模組2": "orange", "實用建議": "red"}
    }"#;

    #[test]
    fn test_builtin_contains_default_categories() {
        let registry = ModuleRegistry::builtin();
        for name in ["名词解释", "操作步骤", "实用建议", "编者的话", "就医建议"] {
            assert!(registry.contains(name, Variant::Simplified), "{name}");
        }
        for name in ["名詞解釋", "操作步驟", "實用建議", "編者的話", "就醫建議"] {
            assert!(registry.contains(name, Variant::Traditional), "{name}");
        }
        assert_eq!(registry.origin(), &RegistryOrigin::BuiltIn);
    }

    #[test]
    fn test_resolve_is_variant_specific() {
        let registry = ModuleRegistry::builtin();
        assert_eq!(
            registry.resolve("名词解释", Variant::Simplified),
            Some(ModuleEntry {
                category: "名词解释".to_owned(),
                color: ModuleColor::Green,
                variant: Variant::Simplified,
            })
        );
        assert_eq!(registry.resolve("名词解释", Variant::Traditional), None);
    }

    #[test]
    fn test_from_json_applies_custom_source() {
        let registry = ModuleRegistry::from_json(CUSTOM).unwrap();
        assert_eq!(
            registry.resolve("测试模块1", Variant::Simplified).unwrap().color,
            ModuleColor::Green
        );
        assert_eq!(
            registry.resolve("实用建议", Variant::Simplified).unwrap().color,
            ModuleColor::Red
        );
        assert!(!registry.contains("名词解释", Variant::Simplified));
    }

    #[test]
    fn test_load_valid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("modules.json");
        fs::write(&path, CUSTOM).unwrap();

        let load = ModuleRegistry::load(&path);

        assert!(load.fallback.is_none());
        assert_eq!(load.registry.origin(), &RegistryOrigin::File(path));
        assert!(load.registry.contains("測試模組2", Variant::Traditional));
    }

    #[test]
    fn test_load_invalid_color_falls_back_entirely() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("modules.json");
        fs::write(
            &path,
            r#"{
                "available_colors": ["green", "orange", "red"],
                "modules": {"名词解释": "red", "新模块": "purple"},
                "modules_traditional": {"名詞解釋": "red"}
            }"#,
        )
        .unwrap();

        let load = ModuleRegistry::load(&path);

        assert!(matches!(
            load.fallback,
            Some(RegistryError::UnknownColor { .. })
        ));
        assert_eq!(load.registry.origin(), &RegistryOrigin::BuiltIn);
        // The valid custom entry is not partially applied.
        assert_eq!(
            load.registry
                .resolve("名词解释", Variant::Simplified)
                .unwrap()
                .color,
            ModuleColor::Green
        );
        assert!(!load.registry.contains("新模块", Variant::Simplified));
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let load = ModuleRegistry::load(&dir.path().join("missing.json"));
        assert!(matches!(load.fallback, Some(RegistryError::Io(_))));
        assert!(load.registry.contains("就医建议", Variant::Simplified));
    }

    #[test]
    fn test_load_malformed_json_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("modules.json");
        fs::write(&path, "invalid json content").unwrap();

        let load = ModuleRegistry::load(&path);

        assert!(matches!(load.fallback, Some(RegistryError::Json(_))));
        assert_eq!(load.registry.origin(), &RegistryOrigin::BuiltIn);
    }

    #[test]
    fn test_from_path_rejects_unknown_extension() {
        let err = ModuleRegistry::from_path(Path::new("modules.yaml")).unwrap_err();
        assert!(matches!(err, RegistryError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_entries_sorted_by_name() {
        let registry = ModuleRegistry::from_json(CUSTOM).unwrap();
        let names: Vec<&str> = registry
            .entries(Variant::Simplified)
            .map(|(name, _)| name)
            .collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), 3);
    }
}
