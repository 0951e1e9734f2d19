//! Build directory staging.
//!
//! Every compile gets its own [`BuildArea`], a fresh temporary directory
//! holding the assembled document and copies of every file it needs. The
//! directory and everything in it are removed when the area is dropped.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, trace};
use tempfile::TempDir;

use tikzpdf_directive::{Directive, Directives, default_destination, is_document_path};

use crate::{TikzError, document::AssembledDocument};

pub use tikzpdf_directive::DOCUMENT_NAME;

/// One file to copy into the build directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    source: PathBuf,
    destination: PathBuf,
}

impl StagedFile {
    /// `destination` is relative to the build directory.
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }
}

/// Ordered list of files to stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagingPlan {
    files: Vec<StagedFile>,
}

impl StagingPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan the files named by `\input` and extra-file directives, with
    /// sources resolved against the fragment directory `base_dir`.
    pub fn from_directives(directives: &Directives, base_dir: &Path) -> Self {
        let mut plan = Self::new();
        for directive in directives {
            let source = match directive.inner() {
                Directive::Input { filename } => filename,
                Directive::ExtraFile { source, .. } => source,
                Directive::Preamble { .. } => continue,
            };
            if let Some(destination) = directive.staged_destination() {
                plan.push(StagedFile::new(base_dir.join(source), destination));
            }
        }
        plan
    }

    /// Add entries of a data-file list. Entries are paths as written,
    /// relative to the working directory.
    pub fn extend_data_files<S: AsRef<str>>(&mut self, entries: &[S]) {
        for entry in entries {
            let entry = Path::new(entry.as_ref());
            self.push(StagedFile::new(entry, default_destination(entry)));
        }
    }

    /// Add a file unless the exact same copy is already planned.
    pub fn push(&mut self, file: StagedFile) {
        if !self.files.contains(&file) {
            self.files.push(file);
        }
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// A disposable build directory owned by a single compile.
#[derive(Debug)]
pub struct BuildArea {
    dir: TempDir,
}

impl BuildArea {
    /// Create a fresh, uniquely named build directory.
    ///
    /// # Errors
    ///
    /// Returns `TikzError::Io` if the directory cannot be created.
    pub fn create() -> Result<Self, TikzError> {
        let dir = tempfile::Builder::new().prefix("tikzpdf-").tempdir()?;
        debug!(build_dir = dir.path().display().to_string(); "Build directory created");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the document inside the build directory.
    pub fn document_path(&self) -> PathBuf {
        self.path().join(DOCUMENT_NAME)
    }

    /// Write the document and copy every planned file.
    ///
    /// Copies follow symbolic links. Intermediate directories of each
    /// destination are created first.
    ///
    /// # Errors
    ///
    /// Returns `TikzError::Stage` for the first file that cannot be copied
    /// or that would replace the document; nothing after it is staged.
    pub fn stage(
        &self,
        document: &AssembledDocument,
        plan: &StagingPlan,
    ) -> Result<PathBuf, TikzError> {
        let document_path = self.document_path();
        fs::write(&document_path, document.as_str())?;

        for file in plan.files() {
            let target = self.path().join(file.destination());
            let stage_error = |err| TikzError::Stage {
                from: file.source().to_path_buf(),
                to: file.destination().to_path_buf(),
                err,
            };

            if is_document_path(file.destination()) {
                return Err(stage_error(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("{DOCUMENT_NAME} is the generated document"),
                )));
            }
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(stage_error)?;
            }
            fs::copy(file.source(), &target).map_err(stage_error)?;

            trace!(
                source = file.source().display().to_string(),
                destination = file.destination().display().to_string();
                "File staged"
            );
        }

        debug!(files = plan.len(); "Build directory staged");
        Ok(document_path)
    }
}
