//! Styled terminal output.

use console::{Style, Term};

/// Message tone, mapped to a terminal style.
#[derive(Clone, Copy)]
enum Tone {
    Plain,
    Success,
    Warning,
    Error,
    Heading,
    Muted,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Self::Plain => Style::new(),
            Self::Success => Style::new().green(),
            Self::Warning => Style::new().yellow(),
            Self::Error => Style::new().red(),
            Self::Heading => Style::new().cyan().bold(),
            Self::Muted => Style::new().dim(),
        }
    }
}

/// Writes status lines to stderr and command results to stdout.
///
/// Write failures are ignored.
pub(crate) struct Output {
    status: Term,
    results: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            status: Term::stderr(),
            results: Term::stdout(),
        }
    }

    fn write(term: &Term, tone: Tone, msg: &str) {
        let _ = term.write_line(&tone.style().apply_to(msg).to_string());
    }

    pub(crate) fn info(&self, msg: &str) {
        Self::write(&self.status, Tone::Plain, msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        Self::write(&self.status, Tone::Success, msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        Self::write(&self.status, Tone::Warning, msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        Self::write(&self.status, Tone::Error, msg);
    }

    /// Handbook name or summary line.
    pub(crate) fn highlight(&self, msg: &str) {
        Self::write(&self.status, Tone::Heading, msg);
    }

    /// Result line on stdout.
    pub(crate) fn print(&self, line: &str) {
        Self::write(&self.results, Tone::Plain, line);
    }

    /// Secondary result line on stdout.
    pub(crate) fn print_dim(&self, line: &str) {
        Self::write(&self.results, Tone::Muted, line);
    }

    pub(crate) fn separator(&self) {
        Self::write(&self.status, Tone::Muted, &"-".repeat(60));
    }
}
