//! Configuration management for doctex.
//!
//! Parses `doctex.toml` project files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! Path values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `document.source`
//! - `assets.image_dir`
//! - `modules.config`
//! - `output.dir`
//! - `latex.image_prefix`
//! - `handbooks.source`, `handbooks.cover`

mod expand;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use doctex_variant::Variant;
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the variant of every handbook.
    pub variant: Option<Variant>,
    /// Override the image asset directory.
    pub image_dir: Option<PathBuf>,
    /// Override the module registry source.
    pub module_config: Option<PathBuf>,
    /// Override the output directory.
    pub output_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "doctex.toml";

/// Name and slug of the handbook built when none is configured.
const DEFAULT_HANDBOOK: &str = "handbook";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Document defaults.
    pub document: DocumentConfig,
    /// Asset configuration (paths are relative strings from TOML).
    assets: AssetsConfigRaw,
    /// Module registry configuration.
    modules: ModulesConfigRaw,
    /// LaTeX rendering configuration.
    pub latex: LatexConfig,
    /// Output configuration.
    output: OutputConfigRaw,
    /// Term normalisation table. Absent means the built-in table.
    pub terms: Option<BTreeMap<String, String>>,
    /// Handbook definitions.
    handbooks: Vec<HandbookConfigRaw>,

    /// Resolved paths (set after loading).
    #[serde(skip)]
    pub paths: PathsConfig,
    /// Resolved handbooks (set after loading).
    #[serde(skip)]
    pub handbooks_resolved: Vec<HandbookConfig>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Document defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Variant used by handbooks that do not name one.
    pub variant: Variant,
    /// Paragraph source of the default handbook.
    source: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AssetsConfigRaw {
    image_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModulesConfigRaw {
    config: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OutputConfigRaw {
    dir: Option<String>,
}

/// LaTeX rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LatexConfig {
    /// Document class.
    pub document_class: String,
    /// Base font size in points.
    pub font_size: u32,
    /// Float placement specifier for figures.
    pub figure_position: String,
    /// Width of included images.
    pub figure_width: String,
    /// Prefix written before image file names, relative to the output file.
    pub image_prefix: Option<String>,
}

impl Default for LatexConfig {
    fn default() -> Self {
        Self {
            document_class: "elegantbook".to_owned(),
            font_size: 12,
            figure_position: "htbp".to_owned(),
            figure_width: "10cm".to_owned(),
            image_prefix: None,
        }
    }
}

/// Raw handbook entry as parsed from TOML.
#[derive(Debug, Deserialize)]
struct HandbookConfigRaw {
    name: String,
    slug: String,
    source: Option<String>,
    variant: Option<Variant>,
    cover: Option<String>,
    chapters: Option<Vec<u32>>,
    #[serde(default)]
    convert: bool,
}

/// Resolved directories.
#[derive(Debug, Default)]
pub struct PathsConfig {
    /// Default paragraph source.
    pub source: PathBuf,
    /// Directory holding figure images.
    pub image_dir: PathBuf,
    /// Module registry source, built-in defaults when unset.
    pub module_config: Option<PathBuf>,
    /// Directory receiving `.tex` files.
    pub output_dir: PathBuf,
}

/// Resolved handbook definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandbookConfig {
    /// Display name.
    pub name: String,
    /// Output file stem.
    pub slug: String,
    /// Paragraph source: JSON file or serial document directory.
    pub source: PathBuf,
    pub variant: Variant,
    /// Cover PDF included before the table of contents.
    pub cover: Option<PathBuf>,
    /// Chapters kept from a serial source, all when unset.
    pub chapters: Option<Vec<u32>>,
    /// Convert source text from the other script into `variant`.
    pub convert: bool,
}

impl HandbookConfig {
    /// Output file name, `<slug>.tex` or `<slug>_traditional.tex`.
    #[must_use]
    pub fn output_file_name(&self) -> String {
        match self.variant {
            Variant::Simplified => format!("{}.tex", self.slug),
            Variant::Traditional => format!("{}_traditional.tex", self.slug),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`output.dir`").
        field: String,
        /// Error message (e.g., "${`BOOKS`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `doctex.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, so CLI
    /// arguments take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(variant) = settings.variant {
            self.document.variant = variant;
            for handbook in &mut self.handbooks_resolved {
                handbook.variant = variant;
            }
        }
        if let Some(image_dir) = &settings.image_dir {
            self.paths.image_dir.clone_from(image_dir);
        }
        if let Some(module_config) = &settings.module_config {
            self.paths.module_config = Some(module_config.clone());
        }
        if let Some(output_dir) = &settings.output_dir {
            self.paths.output_dir.clone_from(output_dir);
        }
    }

    /// Find a resolved handbook by name or slug.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` listing the known names when none matches.
    pub fn handbook(&self, name: &str) -> Result<&HandbookConfig, ConfigError> {
        self.handbooks_resolved
            .iter()
            .find(|h| h.name == name || h.slug == name)
            .ok_or_else(|| {
                let known: Vec<&str> = self
                    .handbooks_resolved
                    .iter()
                    .map(|h| h.name.as_str())
                    .collect();
                ConfigError::Validation(format!(
                    "unknown handbook {name:?} (configured: {})",
                    known.join(", ")
                ))
            })
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let paths = PathsConfig {
            source: base.join("docs"),
            image_dir: base.join("assets").join("image"),
            module_config: None,
            output_dir: base.join("output"),
        };
        let handbooks_resolved = vec![default_handbook(&paths.source, Variant::default())];
        Self {
            document: DocumentConfig::default(),
            assets: AssetsConfigRaw::default(),
            modules: ModulesConfigRaw::default(),
            latex: LatexConfig::default(),
            output: OutputConfigRaw::default(),
            terms: None,
            handbooks: Vec::new(),
            paths,
            handbooks_resolved,
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_latex()?;
        self.validate_handbooks()?;
        Ok(())
    }

    fn validate_latex(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.latex.document_class, "latex.document_class")?;
        require_non_empty(&self.latex.figure_width, "latex.figure_width")?;
        if self.latex.font_size == 0 {
            return Err(ConfigError::Validation(
                "latex.font_size must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_handbooks(&self) -> Result<(), ConfigError> {
        let mut slugs = BTreeSet::new();
        for handbook in &self.handbooks_resolved {
            require_non_empty(&handbook.name, "handbooks.name")?;
            require_non_empty(&handbook.slug, "handbooks.slug")?;
            if !slugs.insert(handbook.slug.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate handbook slug {:?}",
                    handbook.slug
                )));
            }
            if handbook.chapters.as_ref().is_some_and(Vec::is_empty) {
                return Err(ConfigError::Validation(format!(
                    "handbook {:?} selects no chapters",
                    handbook.name
                )));
            }
        }
        Ok(())
    }

    /// Expand environment variable references in path strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.document.source = expand::expand_opt(self.document.source.as_deref(), "document.source")?;
        self.assets.image_dir =
            expand::expand_opt(self.assets.image_dir.as_deref(), "assets.image_dir")?;
        self.modules.config = expand::expand_opt(self.modules.config.as_deref(), "modules.config")?;
        self.output.dir = expand::expand_opt(self.output.dir.as_deref(), "output.dir")?;
        self.latex.image_prefix =
            expand::expand_opt(self.latex.image_prefix.as_deref(), "latex.image_prefix")?;

        for handbook in &mut self.handbooks {
            handbook.source = expand::expand_opt(handbook.source.as_deref(), "handbooks.source")?;
            handbook.cover = expand::expand_opt(handbook.cover.as_deref(), "handbooks.cover")?;
        }

        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.paths = PathsConfig {
            source: resolve(self.document.source.as_deref(), "docs"),
            image_dir: resolve(self.assets.image_dir.as_deref(), "assets/image"),
            module_config: self.modules.config.as_deref().map(|p| config_dir.join(p)),
            output_dir: resolve(self.output.dir.as_deref(), "output"),
        };

        self.handbooks_resolved = if self.handbooks.is_empty() {
            vec![default_handbook(&self.paths.source, self.document.variant)]
        } else {
            self.handbooks
                .iter()
                .map(|raw| HandbookConfig {
                    name: raw.name.trim().to_owned(),
                    slug: raw.slug.trim().to_owned(),
                    source: raw
                        .source
                        .as_deref()
                        .map_or_else(|| self.paths.source.clone(), |p| config_dir.join(p)),
                    variant: raw.variant.unwrap_or(self.document.variant),
                    cover: raw.cover.as_deref().map(|p| config_dir.join(p)),
                    chapters: raw.chapters.clone(),
                    convert: raw.convert,
                })
                .collect()
        };
    }
}

/// The single handbook built from `[document] source`.
fn default_handbook(source: &Path, variant: Variant) -> HandbookConfig {
    HandbookConfig {
        name: DEFAULT_HANDBOOK.to_owned(),
        slug: DEFAULT_HANDBOOK.to_owned(),
        source: source.to_path_buf(),
        variant,
        cover: None,
        chapters: None,
        convert: false,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const HANDBOOKS: &str = r#"
[document]
variant = "traditional"
source = "docs"

[assets]
image_dir = "assets/image"

[modules]
config = "modules.json"

[latex]
font_size = 11
image_prefix = "../assets/image"

[output]
dir = "build"

[terms]
"劳动派遣" = "劳务派遣"

[[handbooks]]
name = "急救手册"
slug = "first_aid_manual"
cover = "急救手册/cover.pdf"
chapters = [1, 2, 3, 4, 5]

[[handbooks]]
name = "锻炼手册"
slug = "exercise_manual"
source = "exercise.json"
variant = "simplified"
convert = true
"#;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.document.variant, Variant::Simplified);
        assert_eq!(config.paths.source, PathBuf::from("/test/docs"));
        assert_eq!(config.paths.image_dir, PathBuf::from("/test/assets/image"));
        assert_eq!(config.paths.output_dir, PathBuf::from("/test/output"));
        assert_eq!(config.paths.module_config, None);
        assert_eq!(config.latex.document_class, "elegantbook");
        assert_eq!(config.latex.font_size, 12);
        assert_eq!(config.handbooks_resolved.len(), 1);
        assert_eq!(config.handbooks_resolved[0].slug, "handbook");
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.latex.figure_position, "htbp");
        assert_eq!(config.latex.figure_width, "10cm");
        assert!(config.terms.is_none());
    }

    #[test]
    fn test_resolve_handbooks() {
        let mut config: Config = toml::from_str(HANDBOOKS).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.paths.output_dir, PathBuf::from("/project/build"));
        assert_eq!(
            config.paths.module_config,
            Some(PathBuf::from("/project/modules.json"))
        );
        assert_eq!(config.latex.font_size, 11);
        assert_eq!(
            config.terms.as_ref().and_then(|t| t.get("劳动派遣")).map(String::as_str),
            Some("劳务派遣")
        );

        let first_aid = &config.handbooks_resolved[0];
        assert_eq!(first_aid.source, PathBuf::from("/project/docs"));
        assert_eq!(first_aid.variant, Variant::Traditional);
        assert_eq!(
            first_aid.cover,
            Some(PathBuf::from("/project/急救手册/cover.pdf"))
        );
        assert_eq!(first_aid.chapters, Some(vec![1, 2, 3, 4, 5]));
        assert_eq!(first_aid.output_file_name(), "first_aid_manual_traditional.tex");

        let exercise = &config.handbooks_resolved[1];
        assert_eq!(exercise.source, PathBuf::from("/project/exercise.json"));
        assert_eq!(exercise.variant, Variant::Simplified);
        assert!(exercise.convert);
        assert_eq!(exercise.output_file_name(), "exercise_manual.tex");
    }

    #[test]
    fn test_cli_settings_override() {
        let mut config: Config = toml::from_str(HANDBOOKS).unwrap();
        config.resolve_paths(Path::new("/project"));
        config.apply_cli_settings(&CliSettings {
            variant: Some(Variant::Simplified),
            output_dir: Some(PathBuf::from("/tmp/out")),
            ..CliSettings::default()
        });

        assert_eq!(config.paths.output_dir, PathBuf::from("/tmp/out"));
        assert!(
            config
                .handbooks_resolved
                .iter()
                .all(|h| h.variant == Variant::Simplified)
        );
    }

    #[test]
    fn test_find_handbook() {
        let mut config: Config = toml::from_str(HANDBOOKS).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.handbook("急救手册").unwrap().slug, "first_aid_manual");
        assert_eq!(config.handbook("exercise_manual").unwrap().name, "锻炼手册");
        let err = config.handbook("食物手册").unwrap_err();
        assert!(err.to_string().contains("急救手册"));
    }

    #[test]
    fn test_validate_duplicate_slug() {
        let toml = r#"
[[handbooks]]
name = "a"
slug = "same"

[[handbooks]]
name = "b"
slug = "same"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate handbook slug"));
    }

    #[test]
    fn test_validate_empty_name() {
        let toml = r#"
[[handbooks]]
name = "  "
slug = "blank"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validate_latex() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.latex.font_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default_with_base(Path::new("/test"));
        config.latex.figure_width = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_variant_is_parse_error() {
        let result: Result<Config, _> = toml::from_str("[document]\nvariant = \"cantonese\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("doctex.toml");
        std::fs::write(&path, HANDBOOKS).unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.config_path, Some(path));
        assert_eq!(config.handbooks_resolved.len(), 2);
        assert_eq!(config.paths.image_dir, dir.path().join("assets/image"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/doctex.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
