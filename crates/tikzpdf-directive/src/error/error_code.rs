//! Error codes for directive diagnostics.
//!
//! - `E001`-`E003` - `%\input{...}` directives
//! - `E004`-`E006` - `%extra:` directives
//! - `E007` - either kind

use std::fmt;

/// Error codes for categorizing directive errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Input file name contains a path separator.
    ///
    /// `%\input{...}` only stages a single file next to the document, so
    /// the name must not point into a directory.
    E001,

    /// Input file name contains a comma.
    ///
    /// `\input` takes exactly one file.
    E002,

    /// Input file name is empty.
    E003,

    /// Malformed extra-file directive.
    ///
    /// The source, or the destination after a comma, is empty.
    E004,

    /// Extra-file source does not exist.
    E005,

    /// Extra-file destination leaves the build directory.
    ///
    /// Destinations must be relative paths without `..` components.
    E006,

    /// File would be staged over the generated document.
    ///
    /// The document is written to `tikz.tex` in the build directory; an
    /// `\input` name or extra-file destination may not take its place.
    E007,
}

impl ErrorCode {
    /// Returns the error code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E005 => "E005",
            ErrorCode::E006 => "E006",
            ErrorCode::E007 => "E007",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
