//! The ScanError type for wrapping directive diagnostics.

use std::fmt;

use crate::error::Diagnostic;

/// Error type for a failed directive scan.
///
/// Wraps one or more diagnostics.
#[derive(Debug)]
pub struct ScanError {
    diagnostics: Vec<Diagnostic>,
}

impl ScanError {
    /// Create a new scan error from diagnostics.
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// Get all diagnostics in this error.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(first) = self.diagnostics.first() {
            write!(f, "{}", first)?;
            if self.diagnostics.len() > 1 {
                write!(f, " (+{} more)", self.diagnostics.len() - 1)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ScanError {}

impl From<Diagnostic> for ScanError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

impl From<Vec<Diagnostic>> for ScanError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_scan_error_display_single() {
        let err: ScanError = Diagnostic::error("empty file name")
            .with_code(ErrorCode::E003)
            .into();

        assert_eq!(err.to_string(), "error[E003]: empty file name");
    }

    #[test]
    fn test_scan_error_display_multiple() {
        let err: ScanError = vec![
            Diagnostic::error("first error"),
            Diagnostic::error("second error"),
            Diagnostic::error("third error"),
        ]
        .into();

        assert_eq!(err.to_string(), "error: first error (+2 more)");
    }
}
