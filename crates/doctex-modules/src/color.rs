//! Module colors.

use std::fmt;
use std::str::FromStr;

/// Colors a module block may use.
///
/// The set is fixed: each value has a frame color and a matching
/// `{name}back` background defined in the document preamble.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModuleColor {
    Green,
    Orange,
    Red,
}

impl ModuleColor {
    /// Every allowed color.
    pub const ALL: [ModuleColor; 3] = [ModuleColor::Green, ModuleColor::Orange, ModuleColor::Red];

    /// Color name as written in configuration and in the document preamble.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Red => "red",
        }
    }

    /// Name of the matching background color.
    #[must_use]
    pub fn background(self) -> String {
        format!("{}back", self.as_str())
    }
}

impl fmt::Display for ModuleColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a color name is outside the allowed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown module color: {0}")]
pub struct UnknownColor(pub String);

impl FromStr for ModuleColor {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|color| color.as_str() == s)
            .ok_or_else(|| UnknownColor(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!("green".parse(), Ok(ModuleColor::Green));
        assert_eq!("red".parse(), Ok(ModuleColor::Red));
        assert_eq!(
            "Green".parse::<ModuleColor>(),
            Err(UnknownColor("Green".to_owned()))
        );
        assert!("purple".parse::<ModuleColor>().is_err());
    }

    #[test]
    fn test_background() {
        assert_eq!(ModuleColor::Orange.background(), "orangeback");
    }
}
