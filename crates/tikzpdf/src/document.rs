//! Document assembly.
//!
//! A fragment is embedded into a fixed `article` document that loads TikZ
//! and PGFPlots and crops the page to the picture with `preview`:
//!
//! ```text
//! <header>
//! <preamble>
//! \begin{document}
//! \begin{tikzpicture}
//! <fragment>
//! \end{tikzpicture}
//! \end{document}
//! ```
//!
//! Preamble and fragment are trusted text and are inserted verbatim.

use std::{fmt, ops::Range};

const HEADER: &str = r"\documentclass{article}
\usepackage{tikz}
\usetikzlibrary{3d}
\usetikzlibrary{calc,positioning}
\usepackage{pgfplots}
\pagestyle{empty}
\usepackage[active,tightpage]{preview}
\renewcommand\PreviewBbAdjust{0bp 0bp 0bp 0bp}
\PreviewEnvironment[]{tikzpicture}
\usepackage[T1]{fontenc}
";

/// Template around the preamble and the fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTemplate {
    environment: Option<String>,
}

impl DocumentTemplate {
    /// Create a template wrapping fragments in `environment`.
    pub fn new(environment: Option<String>) -> Self {
        Self { environment }
    }

    /// A template that embeds fragments without a wrapping environment,
    /// for fragments that open their own `tikzpicture`.
    pub fn bare() -> Self {
        Self::new(None)
    }

    /// Build the complete document.
    pub fn assemble(&self, preamble: &str, fragment: &str) -> AssembledDocument {
        let mut text = String::with_capacity(HEADER.len() + preamble.len() + fragment.len() + 128);
        text.push_str(HEADER);

        let preamble_start = text.len();
        text.push_str(preamble);
        let preamble_range = preamble_start..text.len();
        end_line(&mut text);

        text.push_str("\\begin{document}\n");
        if let Some(env) = &self.environment {
            text.push_str(&format!("\\begin{{{env}}}\n"));
        }

        let body_start = text.len();
        text.push_str(fragment);
        let body_range = body_start..text.len();
        end_line(&mut text);

        if let Some(env) = &self.environment {
            text.push_str(&format!("\\end{{{env}}}\n"));
        }
        text.push_str("\\end{document}\n");

        AssembledDocument {
            text,
            preamble: preamble_range,
            body: body_range,
        }
    }
}

impl Default for DocumentTemplate {
    fn default() -> Self {
        Self::new(Some("tikzpicture".to_string()))
    }
}

fn end_line(text: &mut String) {
    if !text.ends_with('\n') {
        text.push('\n');
    }
}

/// A complete, compilable document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledDocument {
    text: String,
    preamble: Range<usize>,
    body: Range<usize>,
}

impl AssembledDocument {
    /// The full document text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The preamble section, exactly as it was passed in.
    pub fn preamble(&self) -> &str {
        &self.text[self.preamble.clone()]
    }

    /// The fragment as embedded in the document body.
    pub fn body(&self) -> &str {
        &self.text[self.body.clone()]
    }
}

impl fmt::Display for AssembledDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
