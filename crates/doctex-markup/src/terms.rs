//! Term normalisation applied to body text before rewriting.

use std::borrow::Cow;
use std::collections::BTreeMap;

/// Ordered `from -> to` replacements.
///
/// Longer terms are applied first so that a short term never rewrites
/// part of a longer one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TermTable {
    entries: Vec<(String, String)>,
}

impl Default for TermTable {
    fn default() -> Self {
        Self::new([("劳动派遣", "劳务派遣")])
    }
}

impl TermTable {
    /// Build a table from replacement pairs. Empty source terms are ignored.
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut entries: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(from, to)| (from.into(), to.into()))
            .filter(|(from, _)| !from.is_empty())
            .collect();
        entries.sort_by(|a, b| {
            b.0.chars()
                .count()
                .cmp(&a.0.chars().count())
                .then_with(|| a.0.cmp(&b.0))
        });
        Self { entries }
    }

    /// Table without replacements.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from a configuration map.
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        Self::new(map.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply every replacement, borrowing when nothing matches.
    #[must_use]
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        let mut result = Cow::Borrowed(text);
        for (from, to) in &self.entries {
            if result.contains(from.as_str()) {
                result = Cow::Owned(result.replace(from.as_str(), to));
            }
        }
        result
    }
}
