//! Configuration types for compiling fragments.
//!
//! All types implement [`serde::Deserialize`] and every section falls back
//! to its defaults, so a configuration file only needs the keys it changes:
//!
//! ```toml
//! [compiler]
//! program = "latexmk"
//! args = ["-lualatex", "-cd", "-interaction=batchmode", "-halt-on-error"]
//!
//! [viewer]
//! program = "zathura"
//!
//! [watch]
//! interval_ms = 250
//!
//! [document]
//! environment = ""   # fragments carry their own environment
//! ```
//!
//! # Example
//!
//! ```
//! # use tikzpdf::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.compiler().program(), "latexmk");
//! assert_eq!(config.document().environment(), Some("tikzpicture"));
//! ```

use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    compiler: CompilerConfig,

    #[serde(default)]
    viewer: ViewerConfig,

    #[serde(default)]
    watch: WatchConfig,

    #[serde(default)]
    document: DocumentConfig,
}

impl AppConfig {
    pub fn new(
        compiler: CompilerConfig,
        viewer: ViewerConfig,
        watch: WatchConfig,
        document: DocumentConfig,
    ) -> Self {
        Self {
            compiler,
            viewer,
            watch,
            document,
        }
    }

    /// Returns the compiler configuration.
    pub fn compiler(&self) -> &CompilerConfig {
        &self.compiler
    }

    /// Returns the viewer configuration.
    pub fn viewer(&self) -> &ViewerConfig {
        &self.viewer
    }

    /// Returns the watch configuration.
    pub fn watch(&self) -> &WatchConfig {
        &self.watch
    }

    /// Returns the document configuration.
    pub fn document(&self) -> &DocumentConfig {
        &self.document
    }

    /// Replace the viewer configuration.
    pub fn with_viewer(mut self, viewer: ViewerConfig) -> Self {
        self.viewer = viewer;
        self
    }

    /// Replace the document configuration.
    pub fn with_document(mut self, document: DocumentConfig) -> Self {
        self.document = document;
        self
    }
}

/// The external program that turns `tikz.tex` into `tikz.pdf`.
///
/// The document path is appended after `args`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    program: String,
    args: Vec<String>,
}

impl CompilerConfig {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self::new(
            "latexmk",
            ["-pdf", "-cd", "-interaction=batchmode", "-halt-on-error"]
                .map(String::from)
                .into(),
        )
    }
}

/// The program used to open a finished PDF.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    program: String,
}

impl ViewerConfig {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        if cfg!(target_os = "macos") {
            Self::new("open")
        } else {
            Self::new("xdg-open")
        }
    }
}

/// Polling behaviour of watch mode.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Delay between two polls, in milliseconds.
    interval_ms: u64,

    /// How often a missing file is looked up again within one poll.
    missing_retries: u32,
}

impl WatchConfig {
    pub fn new(interval: Duration, missing_retries: u32) -> Self {
        Self {
            interval_ms: interval.as_millis().try_into().unwrap_or(u64::MAX),
            missing_retries,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn missing_retries(&self) -> u32 {
        self.missing_retries
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval_ms: 100,
            missing_retries: 5,
        }
    }
}

/// Shape of the generated document.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Environment wrapped around the fragment; empty for none.
    environment: String,
}

impl DocumentConfig {
    pub fn new(environment: Option<&str>) -> Self {
        Self {
            environment: environment.unwrap_or_default().to_string(),
        }
    }

    /// Returns the wrapping environment, or `None` if fragments are embedded bare.
    pub fn environment(&self) -> Option<&str> {
        Some(self.environment.as_str()).filter(|env| !env.is_empty())
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self::new(Some("tikzpicture"))
    }
}
