//! Script variants for doctex.
//!
//! Every stage of the pipeline that behaves differently per script takes a
//! [`Variant`] and reads its vocabulary from the matching [`VariantProfile`]
//! instead of carrying a second copy of its logic.
//!
//! # Example
//!
//! ```
//! use doctex_variant::Variant;
//!
//! let variant: Variant = "traditional".parse().unwrap();
//! assert_eq!(variant.profile().footnote, "腳註");
//! assert_eq!(variant.opposite(), Variant::Simplified);
//! ```

mod convert;
mod profile;

use std::fmt;
use std::str::FromStr;

pub use convert::{convert, needs_conversion};
pub use profile::VariantProfile;

/// One of the two supported script forms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Variant {
    /// Simplified Chinese.
    #[default]
    Simplified,
    /// Traditional Chinese.
    Traditional,
}

impl Variant {
    /// Both variants, simplified first.
    pub const ALL: [Variant; 2] = [Variant::Simplified, Variant::Traditional];

    /// The other script form.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Simplified => Self::Traditional,
            Self::Traditional => Self::Simplified,
        }
    }

    /// Vocabulary and glyph profile for this variant.
    #[must_use]
    pub fn profile(self) -> &'static VariantProfile {
        match self {
            Self::Simplified => &profile::SIMPLIFIED,
            Self::Traditional => &profile::TRADITIONAL,
        }
    }

    /// Lowercase name used in configuration files and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simplified => "simplified",
            Self::Traditional => "traditional",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown variant name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown script variant: {0} (expected simplified or traditional)")]
pub struct ParseVariantError(String);

impl FromStr for Variant {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simplified" | "s" | "zh-hans" | "zh-cn" => Ok(Self::Simplified),
            "traditional" | "t" | "zh-hant" | "zh-tw" => Ok(Self::Traditional),
            _ => Err(ParseVariantError(s.to_owned())),
        }
    }
}
