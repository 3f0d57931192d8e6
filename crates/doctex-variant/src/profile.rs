//! Per-variant vocabulary and glyphs.

use crate::Variant;

/// Vocabulary, delimiter glyphs and figure naming for one script form.
///
/// The markup grammar is the same for both variants; only the values in
/// this struct differ.
#[derive(Debug, PartialEq, Eq)]
pub struct VariantProfile {
    /// The variant this profile describes.
    pub variant: Variant,
    /// Opening bracket of a markup span.
    pub open: char,
    /// Closing bracket of a markup span.
    pub close: char,
    /// Characters separating a keyword from its body.
    pub colons: &'static [char],
    /// Characters separating list items.
    pub list_separators: &'static [char],
    /// Footnote keyword.
    pub footnote: &'static str,
    /// Figure embedding keyword.
    pub figure: &'static str,
    /// Cross reference keyword.
    pub reference: &'static str,
    /// Explicit emphasis keyword.
    pub emphasis: &'static str,
    /// Subtitle keyword.
    pub subtitle: &'static str,
    /// Minor subtitle keyword.
    pub minor_subtitle: &'static str,
    /// Line break keyword.
    pub line_break: &'static str,
    /// Names that open an unordered list.
    pub unordered_list: &'static [&'static str],
    /// Names that open an ordered list.
    pub ordered_list: &'static [&'static str],
    /// Word prefixed to a reference that points at a figure.
    pub figure_prefix: &'static str,
}

impl VariantProfile {
    /// Whether `c` separates a keyword from its body.
    #[must_use]
    pub fn is_colon(&self, c: char) -> bool {
        self.colons.contains(&c)
    }

    /// Split `content` at its first colon into `(head, body)`.
    #[must_use]
    pub fn split_head<'a>(&self, content: &'a str) -> Option<(&'a str, &'a str)> {
        let (idx, colon) = content.char_indices().find(|&(_, c)| self.is_colon(c))?;
        Some((&content[..idx], &content[idx + colon.len_utf8()..]))
    }

    /// List kind named by `name`: `Some(true)` for ordered, `Some(false)` for unordered.
    #[must_use]
    pub fn list_kind(&self, name: &str) -> Option<bool> {
        if self.ordered_list.contains(&name) {
            Some(true)
        } else if self.unordered_list.contains(&name) {
            Some(false)
        } else {
            None
        }
    }
}

const COLONS: &[char] = &['：', ':'];
const LIST_SEPARATORS: &[char] = &[';', '；'];

pub(crate) static SIMPLIFIED: VariantProfile = VariantProfile {
    variant: Variant::Simplified,
    open: '【',
    close: '】',
    colons: COLONS,
    list_separators: LIST_SEPARATORS,
    footnote: "脚注",
    figure: "图片",
    reference: "引用",
    emphasis: "加粗",
    subtitle: "小标题",
    minor_subtitle: "小小标题",
    line_break: "换行",
    unordered_list: &["无序", "无序列表", "无序列"],
    ordered_list: &["有序", "有序列表", "有序列"],
    figure_prefix: "图",
};

pub(crate) static TRADITIONAL: VariantProfile = VariantProfile {
    variant: Variant::Traditional,
    open: '【',
    close: '】',
    colons: COLONS,
    list_separators: LIST_SEPARATORS,
    footnote: "腳註",
    figure: "圖片",
    reference: "引用",
    emphasis: "加粗",
    subtitle: "小標題",
    minor_subtitle: "小小標題",
    line_break: "換行",
    unordered_list: &["無序", "無序列表", "無序列"],
    ordered_list: &["有序", "有序列表", "有序列"],
    figure_prefix: "圖",
};

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::convert;

    #[test]
    fn test_split_head_full_width_colon() {
        let profile = Variant::Simplified.profile();
        assert_eq!(
            profile.split_head("名词解释：体温"),
            Some(("名词解释", "体温"))
        );
    }

    #[test]
    fn test_split_head_half_width_colon() {
        let profile = Variant::Simplified.profile();
        assert_eq!(profile.split_head("脚注:见附录"), Some(("脚注", "见附录")));
    }

    #[test]
    fn test_split_head_uses_first_colon() {
        let profile = Variant::Simplified.profile();
        assert_eq!(
            profile.split_head("引用：a:b"),
            Some(("引用", "a:b"))
        );
        assert_eq!(profile.split_head("no colon"), None);
    }

    #[test]
    fn test_list_kind() {
        let profile = Variant::Traditional.profile();
        assert_eq!(profile.list_kind("有序列表"), Some(true));
        assert_eq!(profile.list_kind("無序"), Some(false));
        assert_eq!(profile.list_kind("无序"), None);
    }

    #[test]
    fn test_traditional_vocabulary_is_converted_simplified() {
        let s = Variant::Simplified.profile();
        let t = Variant::Traditional.profile();
        for (simplified, traditional) in [
            (s.footnote, t.footnote),
            (s.figure, t.figure),
            (s.subtitle, t.subtitle),
            (s.line_break, t.line_break),
            (s.figure_prefix, t.figure_prefix),
        ] {
            assert_eq!(convert(traditional, Variant::Simplified), simplified);
        }
    }
}
