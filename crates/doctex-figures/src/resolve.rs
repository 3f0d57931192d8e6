use std::collections::BTreeMap;
use std::path::PathBuf;

use doctex_variant::{Variant, convert};

use crate::index::AssetIndex;
use crate::normalize::normalize_name;

/// How a figure name was matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// The name as written.
    Exact,
    /// The name converted to the other script form.
    CrossVariant,
    /// Width, spacing and script differences ignored.
    Normalized,
}

/// Outcome of resolving one figure name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Resolved {
        file_name: String,
        path: PathBuf,
        kind: MatchKind,
    },
    Unresolved,
}

/// A figure reference with its resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FigureAsset {
    /// Name as written in the markup.
    pub requested: String,
    /// Variant the document is built for.
    pub variant: Variant,
    pub resolution: Resolution,
}

impl FigureAsset {
    /// Resolved file name, `None` when unresolved.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        match &self.resolution {
            Resolution::Resolved { file_name, .. } => Some(file_name),
            Resolution::Unresolved => None,
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self.resolution, Resolution::Resolved { .. })
    }
}

impl AssetIndex {
    /// Resolve a logical figure name for `variant`.
    #[must_use]
    pub fn resolve(&self, name: &str, variant: Variant) -> FigureAsset {
        let requested = name.trim();
        let resolution = self
            .lookup(requested, variant)
            .map_or(Resolution::Unresolved, |(file_name, kind)| {
                Resolution::Resolved {
                    path: self.path_of(file_name),
                    file_name: file_name.to_owned(),
                    kind,
                }
            });
        FigureAsset {
            requested: requested.to_owned(),
            variant,
            resolution,
        }
    }

    /// Resolve a batch of names, once per distinct name.
    #[must_use]
    pub fn resolve_all<'n, I>(&self, names: I, variant: Variant) -> BTreeMap<String, FigureAsset>
    where
        I: IntoIterator<Item = &'n str>,
    {
        let mut resolved = BTreeMap::new();
        for name in names {
            let key = name.trim();
            if !resolved.contains_key(key) {
                resolved.insert(key.to_owned(), self.resolve(key, variant));
            }
        }
        resolved
    }

    fn lookup(&self, name: &str, variant: Variant) -> Option<(&str, MatchKind)> {
        if name.is_empty() {
            return None;
        }
        if let Some(file) = self.file(name).or_else(|| self.first_by_stem(name)) {
            return Some((file, MatchKind::Exact));
        }

        let mut tried = vec![name.to_owned()];
        for target in [variant, variant.opposite()] {
            let converted = convert(name, target);
            if tried.contains(&converted) {
                continue;
            }
            if let Some(file) = self.first_by_stem(&converted) {
                return Some((file, MatchKind::CrossVariant));
            }
            tried.push(converted);
        }

        self.first_by_normalized(&normalize_name(name))
            .map(|file| (file, MatchKind::Normalized))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn kind(asset: &FigureAsset) -> Option<MatchKind> {
        match asset.resolution {
            Resolution::Resolved { kind, .. } => Some(kind),
            Resolution::Unresolved => None,
        }
    }

    #[test]
    fn test_exact_match() {
        let index = AssetIndex::from_names(["止血.png"]);
        let asset = index.resolve("止血", Variant::Simplified);
        assert_eq!(asset.file_name(), Some("止血.png"));
        assert_eq!(kind(&asset), Some(MatchKind::Exact));
    }

    #[test]
    fn test_name_with_extension() {
        let index = AssetIndex::from_names(["止血.jpg"]);
        let asset = index.resolve("止血.jpg", Variant::Simplified);
        assert_eq!(asset.file_name(), Some("止血.jpg"));
    }

    #[test]
    fn test_cross_variant_to_requested_script() {
        let index = AssetIndex::from_names(["圖1.png"]);
        let asset = index.resolve("图1", Variant::Traditional);
        assert_eq!(
            asset,
            FigureAsset {
                requested: "图1".to_owned(),
                variant: Variant::Traditional,
                resolution: Resolution::Resolved {
                    file_name: "圖1.png".to_owned(),
                    path: PathBuf::from("圖1.png"),
                    kind: MatchKind::CrossVariant,
                },
            }
        );
    }

    #[test]
    fn test_cross_variant_to_opposite_script() {
        let index = AssetIndex::from_names(["体温.png"]);
        let asset = index.resolve("體溫", Variant::Traditional);
        assert_eq!(asset.file_name(), Some("体温.png"));
        assert_eq!(kind(&asset), Some(MatchKind::CrossVariant));
    }

    #[test]
    fn test_cross_variant_multi_character_terms() {
        let index = AssetIndex::from_names(["驚厥處理.png", "嘔吐.png", "顱骨.png", "紗布.png"]);
        for (name, file) in [
            ("惊厥处理", "驚厥處理.png"),
            ("呕吐", "嘔吐.png"),
            ("颅骨", "顱骨.png"),
            ("纱布", "紗布.png"),
        ] {
            let asset = index.resolve(name, Variant::Traditional);
            assert_eq!(asset.file_name(), Some(file), "{name}");
            assert_eq!(kind(&asset), Some(MatchKind::CrossVariant));
        }
    }

    #[test]
    fn test_exact_wins_over_cross_variant() {
        let index = AssetIndex::from_names(["图1.png", "圖1.png"]);
        let asset = index.resolve("图1", Variant::Traditional);
        assert_eq!(asset.file_name(), Some("图1.png"));
        assert_eq!(kind(&asset), Some(MatchKind::Exact));
    }

    #[test]
    fn test_normalized_match() {
        let index = AssetIndex::from_names(["图 2（a）.png"]);
        let asset = index.resolve("圖2(a)", Variant::Traditional);
        assert_eq!(asset.file_name(), Some("图 2（a）.png"));
        assert_eq!(kind(&asset), Some(MatchKind::Normalized));
    }

    #[test]
    fn test_tie_resolves_lexically_first() {
        let index = AssetIndex::from_names(["图3.png", "图3.jpg"]);
        assert_eq!(
            index.resolve("图3", Variant::Simplified).file_name(),
            Some("图3.jpg")
        );
    }

    #[test]
    fn test_unresolved() {
        let index = AssetIndex::from_names(["a.png"]);
        let asset = index.resolve("不存在", Variant::Simplified);
        assert!(!asset.is_resolved());
        assert_eq!(asset.resolution, Resolution::Unresolved);
        assert!(!index.resolve("  ", Variant::Simplified).is_resolved());
    }

    #[test]
    fn test_resolve_all_dedups() {
        let index = AssetIndex::from_names(["圖1.png"]);
        let resolved = index.resolve_all(["图1", "图1 ", "图2"], Variant::Traditional);
        assert_eq!(resolved.len(), 2);
        assert!(resolved["图1"].is_resolved());
        assert!(!resolved["图2"].is_resolved());
    }
}
