//! Directive types produced by a scan.

use std::{
    borrow::Cow,
    path::{Component, Path, PathBuf},
};

use crate::{error::Diagnostic, span::Spanned};

/// File name of the generated document inside the build directory.
pub const DOCUMENT_NAME: &str = "tikz.tex";

/// A build instruction embedded in a fragment as a comment line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// A preamble line, stored without its leading `%`.
    Preamble { text: String },

    /// A single flat file to stage and `\input` from the preamble.
    Input { filename: String },

    /// A file to stage, optionally under another relative path.
    ExtraFile {
        source: String,
        destination: Option<String>,
    },
}

impl Directive {
    /// The line this directive contributes to the preamble, if any.
    ///
    /// `Input` directives are emitted as an active `\input{...}` command.
    pub fn preamble_line(&self) -> Option<Cow<'_, str>> {
        match self {
            Directive::Preamble { text } => Some(Cow::Borrowed(text.as_str())),
            Directive::Input { filename } => Some(Cow::Owned(format!(r"\input{{{filename}}}"))),
            Directive::ExtraFile { .. } => None,
        }
    }

    /// Where this directive's file lands inside the build directory, if it
    /// stages one.
    pub fn staged_destination(&self) -> Option<PathBuf> {
        match self {
            Directive::Preamble { .. } => None,
            Directive::Input { filename } => Some(PathBuf::from(filename)),
            Directive::ExtraFile {
                source,
                destination,
            } => Some(match destination {
                Some(destination) => PathBuf::from(destination),
                None => default_destination(Path::new(source)),
            }),
        }
    }
}

/// Destination of a staged file that names no explicit destination.
///
/// A relative path that stays inside the build directory keeps its
/// layout, so `data/points.csv` is reachable under the same name from the
/// document. Anything else is flattened to its file name.
pub fn default_destination(source: &Path) -> PathBuf {
    if is_contained(source) {
        source.to_path_buf()
    } else {
        source
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| source.to_path_buf())
    }
}

/// Returns `true` if `path` is relative and never climbs out of its root.
pub fn is_contained(path: &Path) -> bool {
    path.components().next().is_some()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Returns `true` if staging a file at `destination` would replace the
/// generated document.
pub fn is_document_path(destination: &Path) -> bool {
    let mut components = destination
        .components()
        .filter(|c| !matches!(c, Component::CurDir));
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(name)), None) if name == DOCUMENT_NAME
    )
}

/// All directives found in one fragment, in source line order.
#[derive(Debug, Clone, Default)]
pub struct Directives {
    entries: Vec<Spanned<Directive>>,
    warnings: Vec<Diagnostic>,
}

impl Directives {
    pub(crate) fn new(entries: Vec<Spanned<Directive>>, warnings: Vec<Diagnostic>) -> Self {
        Self { entries, warnings }
    }

    /// Iterate over all directives in source order.
    pub fn iter(&self) -> impl Iterator<Item = &Spanned<Directive>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Accumulated preamble text: one line per preamble or input directive,
    /// each terminated by a newline.
    pub fn preamble(&self) -> String {
        let mut preamble = String::new();
        for line in self.entries.iter().filter_map(|d| d.preamble_line()) {
            preamble.push_str(&line);
            preamble.push('\n');
        }
        preamble
    }

    /// File names of all `\input` directives.
    pub fn inputs(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|d| match d.inner() {
            Directive::Input { filename } => Some(filename.as_str()),
            _ => None,
        })
    }

    /// Source and optional destination of all extra-file directives.
    pub fn extra_files(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().filter_map(|d| match d.inner() {
            Directive::ExtraFile {
                source,
                destination,
            } => Some((source.as_str(), destination.as_deref())),
            _ => None,
        })
    }

    /// Non-fatal diagnostics raised while scanning.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }
}

impl<'a> IntoIterator for &'a Directives {
    type Item = &'a Spanned<Directive>;
    type IntoIter = std::slice::Iter<'a, Spanned<Directive>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
