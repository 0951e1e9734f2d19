//! Collector for accumulating diagnostics during one scan.

use crate::error::{Diagnostic, ScanError};

/// Accumulates diagnostics so that every bad directive in a fragment is
/// reported at once instead of only the first.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Finish collection and return a result.
    ///
    /// - If there are errors, returns `Err(ScanError)` with all diagnostics.
    /// - If there are no errors, returns the warnings that were emitted.
    pub fn finish(self) -> Result<Vec<Diagnostic>, ScanError> {
        if self.has_errors {
            Err(ScanError::new(self.diagnostics))
        } else {
            Ok(self.diagnostics)
        }
    }
}
