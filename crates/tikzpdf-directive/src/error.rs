//! Diagnostics for directive scanning.
//!
//! Every malformed directive in a fragment produces a [`Diagnostic`] with an
//! [`ErrorCode`], a labeled span pointing into the fragment and, where there
//! is an obvious fix, help text. All diagnostics from one scan are returned
//! together in a [`ScanError`].
//!
//! # Example
//!
//! ```
//! # use tikzpdf_directive::error::{Diagnostic, ErrorCode};
//! # use tikzpdf_directive::Span;
//!
//! let diag = Diagnostic::error("`data/points.csv` is not a flat file name")
//!     .with_code(ErrorCode::E001)
//!     .with_label(Span::new(8..23), "contains a path separator")
//!     .with_help("use `%extra: data/points.csv` to stage files in subdirectories");
//! assert_eq!(diag.code(), Some(ErrorCode::E001));
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod scan_error;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use scan_error::ScanError;
