//! tikzpdf - compile standalone TikZ fragments into tightly cropped PDFs.
//!
//! A fragment is scanned for embedded directives, wrapped into a minimal
//! document, staged into a disposable build directory together with the
//! files it needs, and compiled by an external toolchain (`latexmk` by
//! default). The resulting PDF is copied next to the fragment.

pub mod collect;
pub mod config;
pub mod document;
pub mod stage;
pub mod toolchain;
pub mod watch;

mod error;
mod job;

pub use tikzpdf_directive as directive;

pub use collect::CompileOutcome;
pub use error::TikzError;
pub use job::{Job, read_data_list};

use std::fs;

use log::{debug, info, trace};

use tikzpdf_directive::Directives;

use collect::Viewer;
use config::AppConfig;
use document::{AssembledDocument, DocumentTemplate};
use stage::{BuildArea, StagingPlan};
use toolchain::{CommandToolchain, Toolchain};

/// Builder for compiling TikZ fragments.
///
/// Every call reads the job's inputs afresh; nothing is carried over from
/// one compile to the next.
///
/// # Examples
///
/// ```rust,no_run
/// use tikzpdf::{Job, PictureBuilder, config::AppConfig};
///
/// let builder = PictureBuilder::new(AppConfig::default());
/// let job = Job::new("figures/cone.tikz").with_preamble_file("preamble.tex");
///
/// let outcome = builder.compile(&job).expect("Failed to compile");
/// if let Some(pdf) = outcome.artifact() {
///     println!("wrote {}", pdf.display());
/// }
/// ```
#[derive(Debug, Default)]
pub struct PictureBuilder {
    config: AppConfig,
}

/// A fragment ready to be staged.
#[derive(Debug, Clone)]
pub struct Prepared {
    source: String,
    directives: Directives,
    document: AssembledDocument,
    plan: StagingPlan,
}

impl Prepared {
    /// The fragment text as it was read.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn directives(&self) -> &Directives {
        &self.directives
    }

    pub fn document(&self) -> &AssembledDocument {
        &self.document
    }

    pub fn plan(&self) -> &StagingPlan {
        &self.plan
    }
}

impl PictureBuilder {
    /// Create a new builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Scan the fragment, assemble the document and plan the staging.
    ///
    /// Directive paths are resolved against the fragment's directory;
    /// data-file list entries are used as written.
    ///
    /// # Errors
    ///
    /// Returns `TikzError::Read` if the fragment or the preamble file cannot
    /// be read, and `TikzError::Scan` for invalid directives. A missing
    /// data-file list is not an error.
    pub fn prepare(&self, job: &Job) -> Result<Prepared, TikzError> {
        info!(fragment = job.fragment().display().to_string(); "Preparing fragment");

        let fragment =
            fs::read_to_string(job.fragment()).map_err(|err| TikzError::read(job.fragment(), err))?;

        let directives = tikzpdf_directive::scan(&fragment, job.base_dir())
            .map_err(|err| TikzError::new_scan_error(err, fragment.as_str()))?;
        trace!(directives:?; "Scanned directives");

        let mut preamble = directives.preamble();
        if let Some(path) = job.preamble_file() {
            let external = fs::read_to_string(path).map_err(|err| TikzError::read(path, err))?;
            preamble.push_str(&external);
        }

        let template = DocumentTemplate::new(self.config.document().environment().map(String::from));
        let document = template.assemble(&preamble, &fragment);

        let mut plan = StagingPlan::from_directives(&directives, job.base_dir());
        if let Some(list) = job.data_list() {
            plan.extend_data_files(&read_data_list(list));
        }
        debug!(directives = directives.len(), staged_files = plan.len(); "Fragment prepared");

        Ok(Prepared {
            source: fragment,
            directives,
            document,
            plan,
        })
    }

    /// Compile with the toolchain from the configuration.
    ///
    /// # Errors
    ///
    /// See [`PictureBuilder::compile_with`].
    pub fn compile(&self, job: &Job) -> Result<CompileOutcome, TikzError> {
        let toolchain = CommandToolchain::from_config(self.config.compiler());
        self.compile_with(job, &toolchain)
    }

    /// Run the whole pipeline with `toolchain`.
    ///
    /// A failing toolchain is not an error: it yields
    /// [`CompileOutcome::NoArtifact`] and leaves the output untouched. The
    /// build directory is removed before this returns.
    ///
    /// # Errors
    ///
    /// Returns `TikzError` if preparation fails, a file cannot be staged,
    /// the toolchain cannot be started or the artifact cannot be written.
    pub fn compile_with(
        &self,
        job: &Job,
        toolchain: &dyn Toolchain,
    ) -> Result<CompileOutcome, TikzError> {
        let prepared = self.prepare(job)?;
        self.build(job, &prepared, toolchain)
    }

    /// Stage and compile a fragment returned by [`PictureBuilder::prepare`].
    ///
    /// # Errors
    ///
    /// See [`PictureBuilder::compile_with`].
    pub fn build(
        &self,
        job: &Job,
        prepared: &Prepared,
        toolchain: &dyn Toolchain,
    ) -> Result<CompileOutcome, TikzError> {
        let build = BuildArea::create()?;
        let document_path = build.stage(&prepared.document, &prepared.plan)?;

        let status = toolchain.compile(build.path(), &document_path)?;
        let outcome = collect::collect(&build, status, job.output())?;

        if job.view() {
            if let Some(artifact) = outcome.artifact() {
                Viewer::new(self.config.viewer().program()).open(artifact);
            }
        }

        Ok(outcome)
    }
}
