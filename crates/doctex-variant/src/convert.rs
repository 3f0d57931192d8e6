//! Conversion between simplified and traditional script.
//!
//! Backed by the `zhconv` phrase and character tables, so multi-character
//! words convert as a unit before single characters fall back. Text with
//! nothing to convert (Latin, digits, shared characters) passes through.

use zhconv::zhconv;

use crate::Variant;

impl Variant {
    fn zhconv_target(self) -> zhconv::Variant {
        match self {
            Self::Simplified => zhconv::Variant::ZhHans,
            Self::Traditional => zhconv::Variant::ZhHant,
        }
    }
}

/// Convert `text` into the script of `target`.
///
/// # Example
///
/// ```
/// use doctex_variant::{Variant, convert};
///
/// assert_eq!(convert("图1", Variant::Traditional), "圖1");
/// assert_eq!(convert("腳註", Variant::Simplified), "脚注");
/// ```
pub fn convert(text: &str, target: Variant) -> String {
    if text.is_ascii() {
        return text.to_owned();
    }
    zhconv(text, target.zhconv_target())
}

/// Whether converting `text` to `target` would change it.
pub fn needs_conversion(text: &str, target: Variant) -> bool {
    !text.is_ascii() && convert(text, target) != text
}
