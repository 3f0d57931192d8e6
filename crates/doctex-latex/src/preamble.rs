use std::fmt::Write;
use std::path::PathBuf;

/// Colour definitions written into every document.
const COLORS: &[(&str, &str)] = &[
    ("blue", "3c71b7"),
    ("structurecolor", "294C7B"),
    ("blue-deep", "294C7B"),
    ("green", "209f59"),
    ("greenback", "F0FFF4"),
    ("orange", "FF9F43"),
    ("orangeback", "FFFAF0"),
    ("red", "E84445"),
    ("redback", "FFF2F0"),
];

const PACKAGES: &[&str] = &["tcolorbox", "color", "graphicx", "pdfpages", "titletoc", "float", "url"];

const TOC_STYLES: &[&str] = &[
    r"\titlecontents{chapter}[3em]{\bfseries \vspace{7pt}}{\contentslabel{4.5em}}{\hspace*{-1em}}{~\titlerule*[0.6pc]{$.$}~\contentspage}",
    r"\titlecontents{section}[4em]{\vspace{6pt}}{\contentslabel{2.3em}}{\hspace*{-4em}}{~\titlerule*[0.6pc]{$.$}~\contentspage}",
    r"\titlecontents{subsection}[6em]{\vspace{5pt}}{\contentslabel{3em}}{\hspace*{-4em}}{~\titlerule*[0.6pc]{$.$}~\contentspage}",
];

const MODULE_ENVIRONMENT: &str = r"\newtcolorbox{module}[2][]{colback=green!4!white,colframe=green!70!black,colbacktitle=green!70!black,enhanced,attach boxed title to top left={yshift=-2mm,xshift=0.5cm},fonttitle=\bfseries,title={#2},#1}";

/// Layout options for LaTeX output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LatexOptions {
    /// Document class name or path.
    pub document_class: String,
    /// Class options written before the font size.
    pub class_options: Vec<String>,
    /// Base font size in points.
    pub font_size: u32,
    /// Float placement of figures.
    pub figure_position: String,
    /// Width of included images.
    pub figure_width: String,
    /// Directory written in front of image file names. When `None` the
    /// resolved asset path is used as is.
    pub image_prefix: Option<String>,
    /// Colour of emphasis outside module boxes.
    pub emphasis_color: String,
    /// Colour of subtitles.
    pub subtitle_color: String,
    /// Colour of minor subtitles.
    pub minor_subtitle_color: String,
    /// Cover PDF included before the table of contents.
    pub cover: Option<PathBuf>,
    /// Depth of the table of contents.
    pub toc_depth: u32,
}

impl Default for LatexOptions {
    fn default() -> Self {
        Self {
            document_class: "elegantbook".to_owned(),
            class_options: vec!["lang=cn".to_owned(), "scheme=chinese".to_owned()],
            font_size: 12,
            figure_position: "htbp".to_owned(),
            figure_width: "10cm".to_owned(),
            image_prefix: None,
            emphasis_color: "blue".to_owned(),
            subtitle_color: "blue-deep".to_owned(),
            minor_subtitle_color: "blue".to_owned(),
            cover: None,
            toc_depth: 3,
        }
    }
}

/// Write everything up to and including `\mainmatter`.
pub(crate) fn write_preamble(out: &mut String, options: &LatexOptions) {
    let mut class_options = options.class_options.clone();
    class_options.push(format!("{}pt", options.font_size));
    let _ = writeln!(
        out,
        "\\documentclass[{}]{{{}}}",
        class_options.join(","),
        options.document_class
    );
    for package in PACKAGES {
        let _ = writeln!(out, "\\usepackage{{{package}}}");
    }
    for style in TOC_STYLES {
        out.push_str(style);
        out.push('\n');
    }
    for (name, hex) in COLORS {
        let _ = writeln!(out, "\\definecolor{{{name}}}{{HTML}}{{{hex}}}");
    }
    out.push_str(MODULE_ENVIRONMENT);
    out.push('\n');
    out.push_str("\\newcounter{little_title}\n");
    out.push_str("\\setcounter{little_title}{1}\n");
    out.push('\n');
    out.push_str("\\begin{document}\n");
    let _ = writeln!(out, "\\setcounter{{tocdepth}}{{{}}}", options.toc_depth);
    if let Some(cover) = &options.cover {
        let _ = writeln!(
            out,
            "\\includepdf[pages=-]{{{}}}",
            cover.to_string_lossy().replace('\\', "/")
        );
    }
    out.push_str("\\frontmatter\n");
    out.push_str("\\tableofcontents\n");
    out.push_str("\\mainmatter\n");
}

#[cfg(test)]
mod tests {
    use doctex_modules::ModuleColor;

    use super::*;

    #[test]
    fn test_preamble_class_line() {
        let mut out = String::new();
        write_preamble(&mut out, &LatexOptions::default());
        assert!(out.starts_with("\\documentclass[lang=cn,scheme=chinese,12pt]{elegantbook}\n"));
        assert!(out.contains("\\definecolor{greenback}{HTML}{F0FFF4}"));
        assert!(out.contains("\\newcounter{little_title}"));
        assert!(!out.contains("includepdf"));
        assert!(out.ends_with("\\mainmatter\n"));
    }

    #[test]
    fn test_preamble_cover() {
        let options = LatexOptions {
            cover: Some(PathBuf::from("covers/first_aid.pdf")),
            ..LatexOptions::default()
        };
        let mut out = String::new();
        write_preamble(&mut out, &options);
        assert!(out.contains("\\includepdf[pages=-]{covers/first_aid.pdf}"));
    }

    #[test]
    fn test_every_module_color_is_defined() {
        for color in ModuleColor::ALL {
            assert!(COLORS.iter().any(|(name, _)| *name == color.as_str()));
            assert!(COLORS.iter().any(|(name, _)| *name == color.background()));
        }
    }
}
