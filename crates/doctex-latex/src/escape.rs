//! Text escaping for LaTeX.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:https?://|www\.)[!-~]+").expect("invalid url regex")
});

/// Trailing punctuation that ends a sentence rather than a URL.
const URL_TRAILING: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '\'', '"'];

/// Escape body text, wrapping URLs in `\url{}`.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    let mut pos = 0;
    for found in URL_PATTERN.find_iter(text) {
        let url = found.as_str().trim_end_matches(URL_TRAILING);
        if url.ends_with("//") || url == "www" {
            continue;
        }
        escape_into(&mut out, &text[pos..found.start()]);
        out.push_str("\\url{");
        for c in url.chars() {
            if matches!(c, '%' | '#' | '{' | '}' | '\\') {
                out.push('\\');
            }
            out.push(c);
        }
        out.push('}');
        pos = found.start() + url.len();
    }
    escape_into(&mut out, &text[pos..]);
    out
}

fn escape_into(out: &mut String, text: &str) {
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '-' if chars.peek() == Some(&'>') => {
                chars.next();
                out.push_str("$\\rightarrow$");
            }
            '<' if chars.peek() == Some(&'-') => {
                chars.next();
                out.push_str("$\\leftarrow$");
            }
            '%' | '&' | '#' | '_' | '$' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '\\' => out.push_str("\\textbackslash{}"),
            '^' => out.push_str("\\^{}"),
            '~' => out.push_str("$\\sim$"),
            '×' => out.push_str("$\\times$"),
            '≤' => out.push_str("$\\le$"),
            '≥' => out.push_str("$\\ge$"),
            '÷' => out.push_str("$\\div$"),
            '≈' => out.push_str("$\\approx$"),
            '°' => out.push_str("$^{\\circ}$"),
            '℃' => out.push_str("$^{\\circ}$C"),
            'α' => out.push_str("$\\alpha$"),
            'β' => out.push_str("$\\beta$"),
            'γ' => out.push_str("$\\gamma$"),
            'δ' => out.push_str("$\\delta$"),
            'Ⅰ'..='Ⅳ' => {
                let numeral = u32::from(c) - u32::from('Ⅰ') + 1;
                let _ = write!(out, "\\uppercase\\expandafter{{\\romannumeral{numeral}}}");
            }
            _ => out.push(c),
        }
    }
}

/// Sanitize a label or reference key.
///
/// Characters that break `\label`/`\ref` are dropped and whitespace is
/// removed, so a figure name and its cross references agree.
#[must_use]
pub fn label(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '\\' | '{' | '}' | '%' | '#' | '~' | '^' | '$' | '&'))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_escape_specials() {
        assert_eq!(escape("50% & #1"), "50\\% \\& \\#1");
        assert_eq!(escape("a_b {x}"), "a\\_b \\{x\\}");
    }

    #[test]
    fn test_escape_symbols() {
        assert_eq!(escape("3×4≈12"), "3$\\times$4$\\approx$12");
        assert_eq!(escape("37℃"), "37$^{\\circ}$C");
        assert_eq!(escape("A->B<-C"), "A$\\rightarrow$B$\\leftarrow$C");
        assert_eq!(escape("1~2"), "1$\\sim$2");
        assert_eq!(
            escape("Ⅱ型"),
            "\\uppercase\\expandafter{\\romannumeral2}型"
        );
    }

    #[test]
    fn test_escape_urls() {
        assert_eq!(
            escape("访问 https://example.com/a_b?x=1%20 获取"),
            "访问 \\url{https://example.com/a_b?x=1\\%20} 获取"
        );
        assert_eq!(escape("见www.example.org。"), "见\\url{www.example.org}。");
        assert_eq!(
            escape("(see http://a.cn)."),
            "(see \\url{http://a.cn})."
        );
    }

    #[test]
    fn test_label_sanitized() {
        assert_eq!(label("图 1{a}"), "图1a");
    }
}
