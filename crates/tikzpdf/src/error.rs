//! Error types for tikzpdf operations.
//!
//! This module provides the main error type [`TikzError`] which wraps
//! the error conditions that can abort a compile.

use std::{io, path::PathBuf};

use thiserror::Error;

use tikzpdf_directive::ScanError;

use crate::toolchain::CompileStatus;

/// The main error type for tikzpdf operations.
///
/// # Diagnostic Variants
///
/// The `Scan` variant carries the fragment source next to the directive
/// diagnostics so that reports can show the offending lines.
#[derive(Debug, Error)]
pub enum TikzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read `{}`: {err}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        err: io::Error,
    },

    #[error("{err}")]
    Scan { err: ScanError, src: String },

    #[error("Failed to stage `{}` as `{}`: {err}", from.display(), to.display())]
    Stage {
        from: PathBuf,
        to: PathBuf,
        #[source]
        err: io::Error,
    },

    #[error("Toolchain error: {0}")]
    Toolchain(String),

    #[error("Failed to write `{}`: {err}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        err: io::Error,
    },

    #[error("Compilation produced no PDF ({status})")]
    Compile {
        status: CompileStatus,
        log_excerpt: Option<String>,
    },
}

impl TikzError {
    /// Create a new `Scan` error with the associated fragment source.
    pub fn new_scan_error(err: ScanError, src: impl Into<String>) -> Self {
        Self::Scan {
            err,
            src: src.into(),
        }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, err: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            err,
        }
    }
}
