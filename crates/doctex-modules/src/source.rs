//! Raw registry source schema.
//!
//! The source is parsed into plain strings first; all checks happen in
//! [`RawModuleSource::validate`] so that one bad entry rejects the whole
//! source before anything is applied.

use std::collections::BTreeMap;
use std::fmt;

use doctex_variant::Variant;
use serde::Deserialize;
use serde::de::{MapAccess, Visitor};

use crate::{ModuleColor, RegistryError};

/// Registry source as written by the user (JSON or TOML).
#[derive(Debug, Deserialize)]
pub(crate) struct RawModuleSource {
    available_colors: Option<Vec<String>>,
    modules: Option<CategoryEntries>,
    modules_traditional: Option<CategoryEntries>,
}

/// Category to color entries in source order, duplicates included.
///
/// A plain map would silently keep the last of two duplicate keys, which
/// hides a category that maps to two colors.
#[derive(Debug, Default)]
pub(crate) struct CategoryEntries(Vec<(String, String)>);

impl<'de> Deserialize<'de> for CategoryEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = CategoryEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of category names to color names")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((category, color)) = map.next_entry::<String, String>()? {
                    entries.push((category, color));
                }
                Ok(CategoryEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Validated category mappings, one per variant.
#[derive(Debug)]
pub(crate) struct ValidatedSource {
    pub available: Vec<ModuleColor>,
    pub simplified: BTreeMap<String, ModuleColor>,
    pub traditional: BTreeMap<String, ModuleColor>,
}

impl RawModuleSource {
    pub(crate) fn from_json(content: &str) -> Result<Self, RegistryError> {
        Ok(serde_json::from_str(content)?)
    }

    pub(crate) fn from_toml(content: &str) -> Result<Self, RegistryError> {
        Ok(toml::from_str(content)?)
    }

    /// Check every rule and return the mappings only if all of them hold.
    pub(crate) fn validate(self) -> Result<ValidatedSource, RegistryError> {
        let declared = self
            .available_colors
            .ok_or(RegistryError::MissingField("available_colors"))?;
        if declared.is_empty() {
            return Err(RegistryError::MissingField("available_colors"));
        }

        let mut available = Vec::with_capacity(declared.len());
        for name in declared {
            let color = name
                .parse::<ModuleColor>()
                .map_err(|err| RegistryError::UnknownColor {
                    field: "available_colors".to_owned(),
                    color: err.0,
                })?;
            if !available.contains(&color) {
                available.push(color);
            }
        }

        let simplified = self
            .modules
            .ok_or(RegistryError::MissingField("modules"))?;
        let traditional = self
            .modules_traditional
            .ok_or(RegistryError::MissingField("modules_traditional"))?;

        Ok(ValidatedSource {
            simplified: validate_entries(simplified, Variant::Simplified, &available)?,
            traditional: validate_entries(traditional, Variant::Traditional, &available)?,
            available,
        })
    }
}

fn validate_entries(
    entries: CategoryEntries,
    variant: Variant,
    available: &[ModuleColor],
) -> Result<BTreeMap<String, ModuleColor>, RegistryError> {
    let field = match variant {
        Variant::Simplified => "modules",
        Variant::Traditional => "modules_traditional",
    };

    let mut mapping = BTreeMap::new();
    for (category, color_name) in entries.0 {
        let category = category.trim().to_owned();
        if category.is_empty() {
            return Err(RegistryError::EmptyCategory { variant });
        }

        let color = color_name
            .parse::<ModuleColor>()
            .map_err(|err| RegistryError::UnknownColor {
                field: format!("{field}.{category}"),
                color: err.0,
            })?;
        if !available.contains(&color) {
            return Err(RegistryError::ColorNotAvailable {
                variant,
                category,
                color,
            });
        }

        if let Some(&previous) = mapping.get(&category)
            && previous != color
        {
            return Err(RegistryError::ConflictingColor {
                variant,
                category,
                first: previous,
                second: color,
            });
        }
        mapping.insert(category, color);
    }
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<ValidatedSource, RegistryError> {
        RawModuleSource::from_json(json)?.validate()
    }

    #[test]
    fn test_entries_keep_duplicates() {
        let raw: RawModuleSource =
            serde_json::from_str(r#"{"modules": {"a": "red", "a": "green"}}"#).unwrap();
        assert_eq!(raw.modules.unwrap().0.len(), 2);
    }

    #[test]
    fn test_validate_accepts_well_formed_source() {
        let source = parse(
            r#"{
                "available_colors": ["green", "red"],
                "modules": {"测试模块": "green"},
                "modules_traditional": {"測試模組": "red"}
            }"#,
        )
        .unwrap();
        assert_eq!(source.available, vec![ModuleColor::Green, ModuleColor::Red]);
        assert_eq!(source.simplified["测试模块"], ModuleColor::Green);
        assert_eq!(source.traditional["測試模組"], ModuleColor::Red);
    }

    #[test]
    fn test_validate_rejects_missing_traditional_mapping() {
        let err = parse(r#"{"available_colors": ["green"], "modules": {}}"#).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::MissingField("modules_traditional")
        ));
    }

    #[test]
    fn test_validate_rejects_missing_available_colors() {
        let err = parse(r#"{"modules": {}, "modules_traditional": {}}"#).unwrap_err();
        assert!(matches!(err, RegistryError::MissingField("available_colors")));
    }

    #[test]
    fn test_validate_rejects_color_outside_fixed_set() {
        let err = parse(
            r#"{
                "available_colors": ["green", "purple"],
                "modules": {},
                "modules_traditional": {}
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::UnknownColor { color, .. } if color == "purple"));
    }

    #[test]
    fn test_validate_rejects_undeclared_color() {
        let err = parse(
            r#"{
                "available_colors": ["green"],
                "modules": {"实用建议": "orange"},
                "modules_traditional": {}
            }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::ColorNotAvailable {
                color: ModuleColor::Orange,
                ..
            }
        ));
    }

    #[test]
    fn test_validate_rejects_conflicting_duplicate() {
        let err = parse(
            r#"{
                "available_colors": ["green", "red"],
                "modules": {"就医建议": "red", "就医建议": "green"},
                "modules_traditional": {}
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::ConflictingColor { .. }));
    }

    #[test]
    fn test_validate_allows_repeated_identical_entry() {
        let source = parse(
            r#"{
                "available_colors": ["red"],
                "modules": {"就医建议": "red", "就医建议": "red"},
                "modules_traditional": {}
            }"#,
        )
        .unwrap();
        assert_eq!(source.simplified.len(), 1);
    }

    #[test]
    fn test_validate_rejects_empty_category() {
        let err = parse(
            r#"{
                "available_colors": ["red"],
                "modules": {},
                "modules_traditional": {" ": "red"}
            }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::EmptyCategory {
                variant: Variant::Traditional
            }
        ));
    }

    #[test]
    fn test_toml_source() {
        let raw = RawModuleSource::from_toml(
            r#"
available_colors = ["green", "orange"]

[modules]
"名词解释" = "green"

[modules_traditional]
"名詞解釋" = "orange"
"#,
        )
        .unwrap();
        let source = raw.validate().unwrap();
        assert_eq!(source.traditional["名詞解釋"], ModuleColor::Orange);
    }
}
