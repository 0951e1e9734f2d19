//! Inputs of a compile.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, warn};

/// Everything a compile reads and writes, named by path.
///
/// A job holds no file contents; each compile reads its inputs afresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    fragment: PathBuf,
    preamble_file: Option<PathBuf>,
    data_list: Option<PathBuf>,
    output: PathBuf,
    view: bool,
}

impl Job {
    /// A job for `fragment`, writing next to it with a `.pdf` extension.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::path::Path;
    /// # use tikzpdf::Job;
    /// let job = Job::new("figures/cone.tikz");
    /// assert_eq!(job.output(), Path::new("figures/cone.pdf"));
    /// ```
    pub fn new(fragment: impl Into<PathBuf>) -> Self {
        let fragment = fragment.into();
        let output = fragment.with_extension("pdf");
        Self {
            fragment,
            preamble_file: None,
            data_list: None,
            output,
            view: false,
        }
    }

    /// Append the contents of `path` to the preamble.
    pub fn with_preamble_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.preamble_file = Some(path.into());
        self
    }

    /// Stage the files listed in `path`, one per line.
    pub fn with_data_list(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_list = Some(path.into());
        self
    }

    /// Write the artifact to `path` instead of next to the fragment.
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = path.into();
        self
    }

    /// Open the artifact in a viewer after a successful compile.
    pub fn with_view(mut self, view: bool) -> Self {
        self.view = view;
        self
    }

    pub fn fragment(&self) -> &Path {
        &self.fragment
    }

    pub fn preamble_file(&self) -> Option<&Path> {
        self.preamble_file.as_deref()
    }

    pub fn data_list(&self) -> Option<&Path> {
        self.data_list.as_deref()
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn view(&self) -> bool {
        self.view
    }

    /// Directory that relative directive paths are resolved against.
    pub fn base_dir(&self) -> &Path {
        parent_dir(&self.fragment)
    }

    /// Files whose modification should trigger a recompile.
    pub fn watched_files(&self) -> Vec<PathBuf> {
        std::iter::once(&self.fragment)
            .chain(&self.preamble_file)
            .chain(&self.data_list)
            .cloned()
            .collect()
    }
}

/// Directory of `path`, with `.` for bare file names.
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Read a data-file list: one file name per line, surrounding whitespace
/// trimmed, blank lines skipped.
///
/// A list that cannot be read is logged and treated as empty.
pub fn read_data_list(path: &Path) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(content) => {
            let entries: Vec<String> = content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect();
            debug!(path = path.display().to_string(), count = entries.len(); "Data file list read");
            entries
        }
        Err(err) => {
            warn!(
                path = path.display().to_string(),
                error = err.to_string();
                "Missing data file list, staging no data files"
            );
            Vec::new()
        }
    }
}
