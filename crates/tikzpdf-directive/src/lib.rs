//! # tikzpdf directive scanner
//!
//! A TikZ fragment can carry its own build instructions as comment lines.
//! This crate finds them:
//!
//! | Line | Effect |
//! |------|--------|
//! | `%\usetikzlibrary{...}`, `%\usepackage{...}`, `%\newcommand...`, `%\renewcommand...`, `%\pgfplotsset...` | line (without `%`) is added to the preamble |
//! | `%\input{name}` | `name` is staged next to the document and `\input{name}` is added to the preamble |
//! | `%extra: source` / `%extra: source, destination` | `source` is staged, optionally under `destination` |
//!
//! Directives are only recognized at the very start of a line.
//!
//! ## Usage
//!
//! ```
//! # use std::path::Path;
//! # use tikzpdf_directive::{scan, ScanError};
//!
//! fn main() -> Result<(), ScanError> {
//!     let source = "%\\usepackage{amsmath}\n\\draw (0,0) circle (1);";
//!
//!     let directives = scan(source, Path::new("."))?;
//!     assert_eq!(directives.preamble(), "\\usepackage{amsmath}\n");
//!     Ok(())
//! }
//! ```

pub mod error;

mod directive;
mod line;
mod span;
mod validate;

pub use directive::{
    DOCUMENT_NAME, Directive, Directives, default_destination, is_contained, is_document_path,
};
pub use error::ScanError;
pub use span::{Span, Spanned};

use std::path::Path;

use log::debug;

use error::Diagnostic;
use validate::Validator;

/// Scan fragment source text for directives.
///
/// Every line is matched independently; a directive never spans lines.
/// Extra-file sources are checked for existence relative to `base_dir`,
/// the directory containing the fragment.
///
/// # Errors
///
/// Returns a [`ScanError`] holding one diagnostic per invalid directive
/// if any directive in the fragment is invalid.
pub fn scan(source: &str, base_dir: &Path) -> Result<Directives, ScanError> {
    let mut validator = Validator::new(base_dir);
    let mut entries = Vec::new();
    let mut offset = 0;

    for raw_line in source.split_inclusive('\n') {
        let line = raw_line.trim_end_matches(|c| c == '\n' || c == '\r');
        let line_span = Span::new(offset..offset + line.len());

        match line::match_line(line) {
            Some(raw) => {
                if let Some(directive) = validator.validate(raw, offset) {
                    entries.push(Spanned::new(directive, line_span));
                }
            }
            None => {
                if let Some(warning) = misplaced_directive(line, line_span) {
                    validator.collector().emit(warning);
                }
            }
        }

        offset += raw_line.len();
    }

    let warnings = validator.into_collector().finish()?;
    for warning in &warnings {
        debug!(span:? = warning.labels().first().map(|l| l.span()); "{warning}");
    }

    let directives = Directives::new(entries, warnings);
    debug!(count = directives.len(); "Directives scanned");
    Ok(directives)
}

/// A directive that would match if it started at the beginning of the line.
fn misplaced_directive(line: &str, line_span: Span) -> Option<Diagnostic> {
    let trimmed = line.trim_start();
    if trimmed.len() == line.len() || line::match_line(trimmed).is_none() {
        return None;
    }

    let start = line_span.start() + (line.len() - trimmed.len());
    Some(
        Diagnostic::warning("directive ignored")
            .with_label(
                Span::new(start..line_span.end()),
                "directives must start at the beginning of the line",
            )
            .with_help("remove the leading whitespace"),
    )
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;
    use error::ErrorCode;

    fn codes(err: &ScanError) -> Vec<ErrorCode> {
        err.diagnostics().iter().filter_map(|d| d.code()).collect()
    }

    #[test]
    fn test_empty_fragment() {
        let directives = scan("", Path::new(".")).unwrap();
        assert!(directives.is_empty());
        assert_eq!(directives.preamble(), "");
        assert!(directives.warnings().is_empty());
    }

    #[test]
    fn test_preamble_in_source_order() {
        let source = "%\\usetikzlibrary{arrows.meta}\n\
                      \\draw (0,0) -- (1,1);\n\
                      %\\pgfplotsset{compat=1.18}\r\n\
                      %\\newcommand{\\R}{\\mathbb{R}}";
        let directives = scan(source, Path::new(".")).unwrap();

        assert_eq!(
            directives.preamble(),
            "\\usetikzlibrary{arrows.meta}\n\
             \\pgfplotsset{compat=1.18}\n\
             \\newcommand{\\R}{\\mathbb{R}}\n"
        );

        let spans: Vec<_> = directives.iter().map(|d| d.span()).collect();
        assert_eq!(spans[0], Span::new(0..29));
        assert_eq!(spans[1].start(), 52);
    }

    #[test]
    fn test_input_stages_file_and_extends_preamble() {
        let source = "%\\usepackage{amsmath}\n%\\input{macros.tex}\n\\draw (0,0);";
        let directives = scan(source, Path::new(".")).unwrap();

        assert_eq!(directives.inputs().collect::<Vec<_>>(), vec!["macros.tex"]);
        assert_eq!(
            directives.preamble(),
            "\\usepackage{amsmath}\n\\input{macros.tex}\n"
        );
    }

    #[test]
    fn test_input_with_separator_fails() {
        let err = scan("%\\input{defs/macros.tex}", Path::new(".")).unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E001]);

        let label = &err.diagnostics()[0].labels()[0];
        assert_eq!(label.span(), Span::new(8..23));
    }

    #[test]
    fn test_input_with_comma_fails() {
        let err = scan("%\\input{a.tex,b.tex}", Path::new(".")).unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E002]);
    }

    #[test]
    fn test_empty_input_fails() {
        let err = scan("%\\input{}", Path::new(".")).unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E003]);
    }

    #[test]
    fn test_extra_file_resolved_against_base_dir() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("data")).unwrap();
        fs::write(dir.path().join("data/points.csv"), "x,y\n").unwrap();

        let source = "%extra: data/points.csv\n%extra: data/points.csv, tables/p.csv";
        let directives = scan(source, dir.path()).unwrap();

        assert_eq!(
            directives.extra_files().collect::<Vec<_>>(),
            vec![
                ("data/points.csv", None),
                ("data/points.csv", Some("tables/p.csv")),
            ]
        );
        assert_eq!(directives.preamble(), "");
    }

    #[test]
    fn test_missing_extra_file_fails() {
        let dir = tempdir().unwrap();
        let err = scan("\\draw (0,0);\n%extra: missing.csv", dir.path()).unwrap_err();

        assert_eq!(codes(&err), vec![ErrorCode::E005]);
        let diag = &err.diagnostics()[0];
        assert!(diag.message().contains("missing.csv"));
        assert_eq!(diag.labels()[0].span(), Span::new(21..32));
    }

    #[test]
    fn test_extra_destination_must_stay_inside() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("points.csv"), "").unwrap();

        let err = scan("%extra: points.csv, ../points.csv", dir.path()).unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E006]);
    }

    #[test]
    fn test_malformed_extra_fails() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("points.csv"), "").unwrap();

        let err = scan("%extra:\n%extra: points.csv,  ", dir.path()).unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E004, ErrorCode::E004]);
    }

    #[test]
    fn test_all_errors_reported_together() {
        let dir = tempdir().unwrap();
        let source = "%\\input{a/b.tex}\n%extra: nope.csv\n%\\input{x,y}";
        let err = scan(source, dir.path()).unwrap_err();

        assert_eq!(
            codes(&err),
            vec![ErrorCode::E001, ErrorCode::E005, ErrorCode::E002]
        );
    }

    #[test]
    fn test_document_name_is_reserved() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("notes.tex"), "NOT THE DOCUMENT").unwrap();
        fs::write(dir.path().join("tikz.tex"), "").unwrap();

        let err = scan("%extra: notes.tex, tikz.tex\n\\draw (0,0);", dir.path()).unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E007]);
        assert_eq!(err.diagnostics()[0].labels()[0].span(), Span::new(19..27));

        let err = scan("%\\input{tikz.tex}\n%extra: ./tikz.tex", dir.path()).unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E007, ErrorCode::E007]);

        let directives = scan("%extra: notes.tex, figures/tikz.tex", dir.path()).unwrap();
        assert_eq!(directives.len(), 1);
    }

    #[test]
    fn test_indented_directive_warns() {
        let directives = scan("  %\\usepackage{amsmath}", Path::new(".")).unwrap();

        assert!(directives.is_empty());
        assert_eq!(directives.warnings().len(), 1);
        assert_eq!(
            directives.warnings()[0].labels()[0].span(),
            Span::new(2..23)
        );
    }

    #[test]
    fn test_ordinary_comments_are_ignored() {
        let source = "% just a comment\n%% \\usepackage{x}\n\\node {%extra: a};";
        let directives = scan(source, Path::new(".")).unwrap();
        assert!(directives.is_empty());
        assert!(directives.warnings().is_empty());
    }
}
