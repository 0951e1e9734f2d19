//! Validation of matched directive lines.
//!
//! Turns a [`RawDirective`] into a [`Directive`], emitting diagnostics for
//! malformed input names, malformed extra-file directives and extra files
//! that are missing on disk.

use std::path::{Path, PathBuf};

use log::trace;

use crate::{
    directive::{DOCUMENT_NAME, Directive, default_destination, is_contained, is_document_path},
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    line::{Arg, RawDirective, trim_arg},
    span::Span,
};

/// Validates directives of one fragment against the fragment's directory.
pub(crate) struct Validator<'a> {
    base_dir: &'a Path,
    collector: DiagnosticCollector,
}

impl<'a> Validator<'a> {
    pub fn new(base_dir: &'a Path) -> Self {
        Self {
            base_dir,
            collector: DiagnosticCollector::new(),
        }
    }

    pub fn collector(&mut self) -> &mut DiagnosticCollector {
        &mut self.collector
    }

    pub fn into_collector(self) -> DiagnosticCollector {
        self.collector
    }

    /// Validate a directive found on the line starting at `line_offset`.
    ///
    /// Returns `None` if the directive is invalid; the reason has been
    /// emitted to the collector.
    pub fn validate(&mut self, raw: RawDirective<'_>, line_offset: usize) -> Option<Directive> {
        match raw {
            RawDirective::Preamble(text) => Some(Directive::Preamble {
                text: text.to_string(),
            }),
            RawDirective::Input(filename) => self.validate_input(filename, line_offset),
            RawDirective::Extra {
                source,
                destination,
            } => self.validate_extra(source, destination, line_offset),
        }
    }

    fn validate_input(&mut self, (filename, range): Arg<'_>, line_offset: usize) -> Option<Directive> {
        let span = Span::new(range).shift(line_offset);
        let mut valid = true;

        if filename.is_empty() {
            self.collector.emit(
                Diagnostic::error(r"`\input` directive names no file")
                    .with_code(ErrorCode::E003)
                    .with_label(span, "file name expected here"),
            );
            return None;
        }

        if filename.contains(['/', '\\']) {
            self.collector.emit(
                Diagnostic::error(format!("`{filename}` is not a flat file name"))
                    .with_code(ErrorCode::E001)
                    .with_label(span, "contains a path separator")
                    .with_help(format!(
                        "use `%extra: {filename}` to stage files from other directories"
                    )),
            );
            valid = false;
        }

        if filename.contains(',') {
            self.collector.emit(
                Diagnostic::error(format!("`{filename}` names more than one file"))
                    .with_code(ErrorCode::E002)
                    .with_label(span, "contains a comma")
                    .with_help(r"write one `%\input{...}` line per file"),
            );
            valid = false;
        }

        if valid && filename == DOCUMENT_NAME {
            self.collector.emit(overwrites_document(span));
            valid = false;
        }

        valid.then(|| Directive::Input {
            filename: filename.to_string(),
        })
    }

    fn validate_extra(
        &mut self,
        source: Arg<'_>,
        destination: Option<Arg<'_>>,
        line_offset: usize,
    ) -> Option<Directive> {
        let (source, source_range) = trim_arg(source);
        let source_span = Span::new(source_range).shift(line_offset);
        let mut valid = true;

        if source.is_empty() {
            self.collector.emit(
                Diagnostic::error("extra-file directive names no file")
                    .with_code(ErrorCode::E004)
                    .with_label(source_span, "file name expected here")
                    .with_help("use `%extra: source` or `%extra: source, destination`"),
            );
            valid = false;
        } else if !self.base_dir.join(source).is_file() {
            trace!(base_dir = self.base_dir.display().to_string(), source; "Extra file lookup failed");
            self.collector.emit(
                Diagnostic::error(format!("extra file `{source}` does not exist"))
                    .with_code(ErrorCode::E005)
                    .with_label(source_span, "not found")
                    .with_help("paths are resolved relative to the fragment's directory"),
            );
            valid = false;
        }

        let mut destination_span = source_span;
        let destination = match destination.map(trim_arg) {
            None => None,
            Some((destination, range)) => {
                let span = Span::new(range).shift(line_offset);
                destination_span = span;
                if destination.is_empty() {
                    self.collector.emit(
                        Diagnostic::error("extra-file directive has an empty destination")
                            .with_code(ErrorCode::E004)
                            .with_label(span, "destination expected after the comma"),
                    );
                    valid = false;
                } else if !is_contained(Path::new(destination)) {
                    self.collector.emit(
                        Diagnostic::error(format!(
                            "destination `{destination}` leaves the build directory"
                        ))
                        .with_code(ErrorCode::E006)
                        .with_label(span, "must be a relative path without `..`")
                        .with_secondary_label(source_span, "staged from here"),
                    );
                    valid = false;
                }
                Some(destination.to_string())
            }
        };

        if valid {
            let (target, span) = match &destination {
                Some(destination) => (PathBuf::from(destination), destination_span),
                None => (default_destination(Path::new(source)), source_span),
            };
            if is_document_path(&target) {
                self.collector.emit(
                    overwrites_document(span).with_help("stage the file under another name"),
                );
                valid = false;
            }
        }

        valid.then(|| Directive::ExtraFile {
            source: source.to_string(),
            destination,
        })
    }
}

fn overwrites_document(span: Span) -> Diagnostic {
    Diagnostic::error(format!("`{DOCUMENT_NAME}` is the generated document"))
        .with_code(ErrorCode::E007)
        .with_label(span, "would replace the document in the build directory")
}
