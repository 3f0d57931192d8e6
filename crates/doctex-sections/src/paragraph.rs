use serde::{Deserialize, Serialize};

/// One paragraph of source content.
///
/// `level` is `0` for body text and `1..` for heading depth. Negative
/// values are tolerated on input and treated as body text by the builder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphRecord {
    /// Raw paragraph text.
    pub text: String,
    /// Heading depth, `0` for body text.
    #[serde(default)]
    pub level: i32,
    /// Position in the source stream.
    #[serde(default)]
    pub ordinal: usize,
}

impl ParagraphRecord {
    /// Create a body paragraph.
    #[must_use]
    pub fn body(text: impl Into<String>, ordinal: usize) -> Self {
        Self {
            text: text.into(),
            level: 0,
            ordinal,
        }
    }

    /// Create a heading paragraph at `level`.
    #[must_use]
    pub fn heading(text: impl Into<String>, level: i32, ordinal: usize) -> Self {
        Self {
            text: text.into(),
            level,
            ordinal,
        }
    }

    /// Heading depth, or `None` for body text and non-positive levels.
    #[must_use]
    pub fn heading_depth(&self) -> Option<usize> {
        usize::try_from(self.level).ok().filter(|&depth| depth > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_depth() {
        assert_eq!(ParagraphRecord::heading("a", 2, 0).heading_depth(), Some(2));
        assert_eq!(ParagraphRecord::body("a", 0).heading_depth(), None);
        assert_eq!(ParagraphRecord::heading("a", -1, 0).heading_depth(), None);
    }

    #[test]
    fn test_deserialize_defaults_level_to_body() {
        let record: ParagraphRecord = serde_json::from_str(r#"{"text": "正文"}"#).unwrap();
        assert_eq!(record, ParagraphRecord::body("正文", 0));
    }
}
