//! Output collection and viewing.

use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Stdio},
    thread,
};

use log::{info, warn};

use crate::{TikzError, stage::BuildArea, toolchain::CompileStatus};

/// File name of the artifact inside the build directory.
pub const ARTIFACT_NAME: &str = "tikz.pdf";

/// File name of the toolchain's log inside the build directory.
const LOG_NAME: &str = "tikz.log";

/// Lines of the toolchain log kept after the first error line.
const LOG_EXCERPT_LINES: usize = 6;

/// Result of a compile that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOutcome {
    /// The artifact was copied to its destination.
    Produced { artifact: PathBuf },

    /// The toolchain failed or left no artifact; the destination is
    /// untouched.
    NoArtifact {
        status: CompileStatus,
        log_excerpt: Option<String>,
    },
}

impl CompileOutcome {
    pub fn is_produced(&self) -> bool {
        matches!(self, CompileOutcome::Produced { .. })
    }

    /// Path of the written artifact, if one was produced.
    pub fn artifact(&self) -> Option<&Path> {
        match self {
            CompileOutcome::Produced { artifact } => Some(artifact),
            CompileOutcome::NoArtifact { .. } => None,
        }
    }

    /// Treat a missing artifact as an error.
    ///
    /// # Errors
    ///
    /// Returns `TikzError::Compile` for [`CompileOutcome::NoArtifact`].
    pub fn into_result(self) -> Result<PathBuf, TikzError> {
        match self {
            CompileOutcome::Produced { artifact } => Ok(artifact),
            CompileOutcome::NoArtifact {
                status,
                log_excerpt,
            } => Err(TikzError::Compile {
                status,
                log_excerpt,
            }),
        }
    }
}

/// Copy the artifact out of `build` if the toolchain succeeded.
///
/// # Errors
///
/// Returns `TikzError::Output` if the artifact exists but cannot be copied
/// to `output`.
pub fn collect(
    build: &BuildArea,
    status: CompileStatus,
    output: &Path,
) -> Result<CompileOutcome, TikzError> {
    let artifact = build.path().join(ARTIFACT_NAME);

    if !status.is_success() || !artifact.is_file() {
        let log_excerpt = log_excerpt(&build.path().join(LOG_NAME));
        warn!(status = status.to_string(); "No PDF produced");
        return Ok(CompileOutcome::NoArtifact {
            status,
            log_excerpt,
        });
    }

    fs::copy(&artifact, output).map_err(|err| TikzError::Output {
        path: output.to_path_buf(),
        err,
    })?;

    info!(output_path = output.display().to_string(); "PDF written");
    Ok(CompileOutcome::Produced {
        artifact: output.to_path_buf(),
    })
}

/// The first TeX error in a log file and the lines after it.
fn log_excerpt(log: &Path) -> Option<String> {
    let bytes = fs::read(log).ok()?;
    let text = String::from_utf8_lossy(&bytes);

    let lines: Vec<&str> = text
        .lines()
        .skip_while(|line| !line.starts_with('!'))
        .take(LOG_EXCERPT_LINES)
        .collect();

    (!lines.is_empty()).then(|| lines.join("\n"))
}

/// Opens artifacts in an external viewer.
#[derive(Debug, Clone)]
pub struct Viewer {
    program: String,
}

impl Viewer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Launch the viewer on `path` without waiting for it. The process is
    /// reaped on a background thread once it exits.
    ///
    /// Failures are logged and otherwise ignored. Returns whether the viewer
    /// was started.
    pub fn open(&self, path: &Path) -> bool {
        let spawned = Command::new(&self.program)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(mut child) => {
                info!(viewer = self.program, path = path.display().to_string(); "Viewer launched");
                thread::spawn(move || child.wait());
                true
            }
            Err(err) => {
                warn!(viewer = self.program, error = err.to_string(); "Failed to launch viewer");
                false
            }
        }
    }
}
