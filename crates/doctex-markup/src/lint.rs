//! Markup checks that report problems without rewriting.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Two cross references with nothing between them.
static CONSECUTIVE_REFERENCES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"【引用[：:][^】]*】【引用[：:][^】]*】")
        .expect("invalid consecutive reference regex")
});

/// More `】【` joins than this in one paragraph is reported.
const MAX_JOINS: usize = 3;

/// How serious a lint issue is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

/// What a lint issue is about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LintKind {
    /// An opener without a matching closer.
    UnclosedBracket,
    /// A closer without an opener.
    StrayCloser,
    /// Cross references written back to back.
    ConsecutiveReferences,
    /// Too many spans written back to back.
    ExcessiveJoins { count: usize },
}

/// A problem found by [`lint`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LintIssue {
    pub kind: LintKind,
    pub severity: Severity,
    /// Byte offset into the paragraph.
    pub offset: usize,
}

impl fmt::Display for LintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LintKind::UnclosedBracket => write!(f, "unclosed 【 at byte {}", self.offset),
            LintKind::StrayCloser => write!(f, "】 without 【 at byte {}", self.offset),
            LintKind::ConsecutiveReferences => {
                write!(f, "consecutive cross references at byte {}", self.offset)
            }
            LintKind::ExcessiveJoins { count } => {
                write!(f, "{count} back-to-back spans (more than {MAX_JOINS})")
            }
        }
    }
}

/// Check bracket pairing and suspicious sequences in one paragraph.
///
/// Bracket glyphs are the same for both variants.
#[must_use]
pub fn lint(text: &str) -> Vec<LintIssue> {
    let mut issues = Vec::new();

    let mut open = Vec::new();
    for (i, c) in text.char_indices() {
        match c {
            '【' => open.push(i),
            '】' => {
                if open.pop().is_none() {
                    issues.push(LintIssue {
                        kind: LintKind::StrayCloser,
                        severity: Severity::Error,
                        offset: i,
                    });
                }
            }
            _ => {}
        }
    }
    issues.extend(open.into_iter().map(|offset| LintIssue {
        kind: LintKind::UnclosedBracket,
        severity: Severity::Error,
        offset,
    }));

    issues.extend(
        CONSECUTIVE_REFERENCES
            .find_iter(text)
            .map(|found| LintIssue {
                kind: LintKind::ConsecutiveReferences,
                severity: Severity::Warning,
                offset: found.start(),
            }),
    );

    let joins = text.matches("】【").count();
    if joins > MAX_JOINS {
        issues.push(LintIssue {
            kind: LintKind::ExcessiveJoins { count: joins },
            severity: Severity::Warning,
            offset: 0,
        });
    }

    issues.sort_by_key(|issue| issue.offset);
    issues
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_lint_clean_text() {
        assert!(lint("【名词解释：体温】正常").is_empty());
    }

    #[test]
    fn test_lint_unclosed_and_stray() {
        let issues = lint("】前【后");
        assert_eq!(
            issues,
            vec![
                LintIssue {
                    kind: LintKind::StrayCloser,
                    severity: Severity::Error,
                    offset: 0,
                },
                LintIssue {
                    kind: LintKind::UnclosedBracket,
                    severity: Severity::Error,
                    offset: 6,
                },
            ]
        );
    }

    #[test]
    fn test_lint_consecutive_references() {
        let issues = lint("见【引用：甲】【引用:乙】");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, LintKind::ConsecutiveReferences);
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_lint_excessive_joins() {
        let issues = lint("【a】【b】【c】【d】【e】");
        assert_eq!(issues, vec![LintIssue {
            kind: LintKind::ExcessiveJoins { count: 4 },
            severity: Severity::Warning,
            offset: 0,
        }]);
        assert!(lint("【a】【b】【c】【d】").is_empty());
    }

    #[test]
    fn test_lint_issue_display() {
        let issue = LintIssue {
            kind: LintKind::UnclosedBracket,
            severity: Severity::Error,
            offset: 3,
        };
        assert_eq!(issue.to_string(), "unclosed 【 at byte 3");
    }
}
