//! The external typesetting toolchain.
//!
//! The toolchain is opaque: it is handed a staged document and reports
//! nothing but whether it succeeded. Its output streams are discarded.

use std::{
    fmt,
    path::Path,
    process::{Command, ExitStatus, Stdio},
};

use log::{debug, info};

use crate::{TikzError, config::CompilerConfig};

/// Exit status of a toolchain run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileStatus {
    code: Option<i32>,
}

impl CompileStatus {
    pub fn success() -> Self {
        Self { code: Some(0) }
    }

    /// A failed run. `code` is `None` if the process was killed by a signal.
    pub fn failure(code: Option<i32>) -> Self {
        Self { code }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }
}

impl From<ExitStatus> for CompileStatus {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

impl fmt::Display for CompileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {code}"),
            None => write!(f, "terminated by signal"),
        }
    }
}

/// Something that compiles a staged document in place.
pub trait Toolchain {
    /// Compile `document`, which lives in `build_dir`, leaving its output
    /// next to it.
    ///
    /// # Errors
    ///
    /// Returns `TikzError::Toolchain` if the toolchain could not be run at
    /// all. A run that fails is reported through the returned status.
    fn compile(&self, build_dir: &Path, document: &Path) -> Result<CompileStatus, TikzError>;
}

/// Runs an external program such as `latexmk` on the document.
#[derive(Debug, Clone)]
pub struct CommandToolchain {
    program: String,
    args: Vec<String>,
}

impl CommandToolchain {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &CompilerConfig) -> Self {
        Self::new(config.program(), config.args().to_vec())
    }
}

impl Toolchain for CommandToolchain {
    fn compile(&self, build_dir: &Path, document: &Path) -> Result<CompileStatus, TikzError> {
        info!(program = self.program; "Compiling document");
        debug!(args:? = self.args, document = document.display().to_string(); "Toolchain command");

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(document)
            .current_dir(build_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|err| TikzError::Toolchain(format!("failed to run `{}`: {err}", self.program)))?;

        let status = CompileStatus::from(status);
        debug!(status = status.to_string(); "Toolchain finished");
        Ok(status)
    }
}
