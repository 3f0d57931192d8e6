use doctex_variant::{Variant, convert};

/// Full-width punctuation folded to its ASCII form.
const WIDTH_FOLDS: &[(char, char)] = &[
    ('（', '('),
    ('）', ')'),
    ('：', ':'),
    ('，', ','),
    ('；', ';'),
    ('。', '.'),
    ('！', '!'),
    ('？', '?'),
    ('－', '-'),
    ('—', '-'),
    ('＿', '_'),
    ('、', ','),
    ('“', '"'),
    ('”', '"'),
    ('‘', '\''),
    ('’', '\''),
    ('《', '<'),
    ('》', '>'),
    ('【', '['),
    ('】', ']'),
];

/// Normalized lookup key for a figure name.
///
/// Folds the name to simplified script, folds full-width punctuation and
/// digits to ASCII, lowercases ASCII letters and drops whitespace.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    convert(name, Variant::Simplified)
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(fold_char)
        .collect()
}

fn fold_char(c: char) -> char {
    if let Some(&(_, ascii)) = WIDTH_FOLDS.iter().find(|&&(wide, _)| wide == c) {
        return ascii;
    }
    // Full-width forms U+FF01..U+FF5E map onto ASCII U+0021..U+007E.
    let folded = match u32::from(c) {
        code @ 0xFF01..=0xFF5E => char::from_u32(code - 0xFEE0).unwrap_or(c),
        _ => c,
    };
    folded.to_ascii_lowercase()
}
