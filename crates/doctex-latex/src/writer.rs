//! Output blocks to LaTeX source.

use std::collections::HashSet;
use std::fmt::Write;
use std::path::Path;

use doctex_document::{FigureBlock, OutputBlock, OutputInline};

use crate::escape::{escape, label};
use crate::preamble::{LatexOptions, write_preamble};

/// Sectioning commands by depth; deeper headings reuse the last one.
const SECTIONING: [&str; 5] = ["chapter", "section", "subsection", "subsubsection", "paragraph"];

/// Sectioning command for a heading depth.
fn sectioning(depth: usize) -> &'static str {
    SECTIONING[depth.clamp(1, SECTIONING.len()) - 1]
}

/// Heading state carried through one body.
#[derive(Default)]
struct Headings {
    /// LaTeX sectioning counters as the emitted commands have left them.
    counters: [u32; SECTIONING.len()],
    labels: HashSet<String>,
}

impl Headings {
    /// Write the heading, first realigning LaTeX counters with `numbering`.
    ///
    /// Placeholder levels emit no command, so their counters are set
    /// explicitly. The label is the title; a repeated title gets the
    /// numbering path as a suffix.
    fn write(&mut self, out: &mut String, depth: usize, numbering: &[u32], title: &str) {
        self.align(out, depth, numbering);
        let _ = writeln!(out, "\\{}{{{}}}", sectioning(depth), escape(title));

        let mut key = label(title);
        if !self.labels.insert(key.clone()) {
            let path: Vec<String> = numbering.iter().map(u32::to_string).collect();
            let _ = write!(key, "-{}", path.join("."));
            self.labels.insert(key.clone());
        }
        let _ = writeln!(out, "\\label{{{key}}}");
        out.push_str("\\setcounter{little_title}{1}\n");
    }

    fn align(&mut self, out: &mut String, depth: usize, numbering: &[u32]) {
        let last = SECTIONING.len() - 1;
        if depth > SECTIONING.len() {
            self.counters[last] = self.counters[last].saturating_add(1);
            return;
        }
        let level = depth.max(1) - 1;
        let Some(path) = numbering.get(..=level) else {
            self.step(level);
            return;
        };

        for (i, &number) in path.iter().enumerate().take(level) {
            if self.counters[i] != number {
                let _ = writeln!(out, "\\setcounter{{{}}}{{{number}}}", SECTIONING[i]);
                self.counters[i] = number;
            }
        }
        let number = path[level];
        if self.counters[level].saturating_add(1) != number {
            let _ = writeln!(
                out,
                "\\setcounter{{{}}}{{{}}}",
                SECTIONING[level],
                number.saturating_sub(1)
            );
        }
        self.counters[level] = number.saturating_sub(1);
        self.step(level);
    }

    /// Mirror `\stepcounter`: advance `level` and reset everything below.
    fn step(&mut self, level: usize) {
        self.counters[level] = self.counters[level].saturating_add(1);
        for counter in &mut self.counters[level + 1..] {
            *counter = 0;
        }
    }
}

/// Render a full document: preamble, body and `\end{document}`.
#[must_use]
pub fn render_document(blocks: &[OutputBlock], options: &LatexOptions) -> String {
    let mut out = String::with_capacity(16384);
    write_preamble(&mut out, options);
    out.push('\n');
    out.push_str(&render_body(blocks, options));
    out.push_str("\\end{document}\n");
    out
}

/// Render the block sequence without preamble.
#[must_use]
pub fn render_body(blocks: &[OutputBlock], options: &LatexOptions) -> String {
    let mut out = String::with_capacity(8192);
    let mut headings = Headings::default();
    for block in blocks {
        match block {
            OutputBlock::Heading {
                depth,
                numbering,
                title,
            } => headings.write(&mut out, *depth, numbering, title),
            OutputBlock::Paragraph { content, .. } => {
                let mut writer = InlineWriter {
                    out: &mut out,
                    options,
                    emphasis_color: &options.emphasis_color,
                };
                writer.inlines(content);
                out.push_str("\\par\n");
            }
            OutputBlock::Figure { figure, .. } => write_figure(&mut out, figure, options),
        }
    }
    out
}

fn write_figure(out: &mut String, figure: &FigureBlock, options: &LatexOptions) {
    let _ = writeln!(out, "\\begin{{figure}}[{}]", options.figure_position);
    out.push_str("\\centering\n");
    match &figure.path {
        Some(path) => {
            let _ = writeln!(
                out,
                "\\includegraphics[width={}]{{{}}}",
                options.figure_width,
                image_path(path, options)
            );
        }
        None => {
            let _ = writeln!(
                out,
                "\\fbox{{\\parbox[c][3cm][c]{{{}}}{{\\centering\\texttt{{{}}}}}}}",
                options.figure_width,
                escape(&figure.label)
            );
        }
    }
    let _ = writeln!(out, "\\caption{{{}}}", escape(&figure.caption));
    let _ = writeln!(out, "\\label{{{}}}", label(&figure.label));
    out.push_str("\\end{figure}\n");
}

fn image_path(path: &Path, options: &LatexOptions) -> String {
    let path = match (&options.image_prefix, path.file_name()) {
        (Some(prefix), Some(file_name)) => {
            let prefix = prefix.trim_end_matches(['/', '\\']);
            format!("{prefix}/{}", file_name.to_string_lossy())
        }
        _ => path.to_string_lossy().into_owned(),
    };
    path.replace('\\', "/")
}

struct InlineWriter<'a> {
    out: &'a mut String,
    options: &'a LatexOptions,
    /// Emphasis takes the module colour inside module boxes.
    emphasis_color: &'a str,
}

impl InlineWriter<'_> {
    fn inlines(&mut self, content: &[OutputInline]) {
        for inline in content {
            self.inline(inline);
        }
    }

    fn inline(&mut self, inline: &OutputInline) {
        match inline {
            OutputInline::Text(text) => self.out.push_str(&escape(text)),
            OutputInline::Emphasis(text) => {
                let _ = write!(
                    self.out,
                    "\\textbf{{\\textcolor{{{}}}{{{}}}}}",
                    self.emphasis_color,
                    escape(text)
                );
            }
            OutputInline::Footnote(body) => {
                let _ = write!(self.out, "\\footnote{{{}}}", escape(body));
            }
            OutputInline::CrossRef { label: key, prefix } => {
                if let Some(prefix) = prefix {
                    self.out.push_str(prefix);
                }
                let _ = write!(self.out, "\\ref{{{}}}", label(key));
            }
            OutputInline::Subtitle { text, minor: false } => {
                self.out.push_str("\n\\vspace{1ex}\n");
                let _ = writeln!(
                    self.out,
                    "\\textbf{{\\textcolor{{{}}}{{\\large \\arabic{{little_title}}、{}}}}}\\par",
                    self.options.subtitle_color,
                    escape(text)
                );
                self.out.push_str("\\refstepcounter{little_title}\n\\vspace{1ex}\n");
            }
            OutputInline::Subtitle { text, minor: true } => {
                self.out.push_str("\n\\vspace{0.4ex}\n");
                let _ = writeln!(
                    self.out,
                    "\\textbf{{\\textcolor{{{}}}{{{}}}}}\\par",
                    self.options.minor_subtitle_color,
                    escape(text)
                );
                self.out.push_str("\\vspace{0.4ex}\n");
            }
            OutputInline::Module {
                category,
                color,
                body,
            } => {
                let color = color.as_str();
                let _ = writeln!(
                    self.out,
                    "\n\\begin{{module}}[colback={color}back,colframe={color},colbacktitle={color}]{{{}}}",
                    escape(category)
                );
                let mut inner = InlineWriter {
                    out: &mut *self.out,
                    options: self.options,
                    emphasis_color: color,
                };
                inner.inlines(body);
                self.out.push_str("\n\\end{module}\n");
            }
            OutputInline::List { ordered, items } => {
                let environment = if *ordered { "enumerate" } else { "itemize" };
                let _ = writeln!(self.out, "\n\\begin{{{environment}}}");
                for item in items {
                    self.out.push_str("\\item ");
                    self.inlines(item);
                    self.out.push('\n');
                }
                let _ = writeln!(self.out, "\\end{{{environment}}}");
            }
            OutputInline::Figure(figure) => {
                self.out.push('\n');
                write_figure(self.out, figure, self.options);
            }
            OutputInline::LineBreak => self.out.push_str("\\par\n"),
        }
    }
}
