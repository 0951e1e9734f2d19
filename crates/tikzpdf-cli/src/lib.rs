//! CLI logic for the tikzpdf tool.
//!
//! This module contains the core CLI logic: configuration loading, the
//! one-shot compile and the watch loop.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use log::info;

use tikzpdf::{
    CompileOutcome, Job, PictureBuilder, TikzError,
    config::{AppConfig, DocumentConfig, ViewerConfig},
    toolchain::{CommandToolchain, Toolchain},
    watch::Watcher,
};

/// Run the tikzpdf CLI application
///
/// Compiles the fragment once and, in watch mode, keeps recompiling it
/// whenever the fragment, the preamble file or the data-file list changes.
///
/// # Errors
///
/// Returns `TikzError` for:
/// - Configuration loading errors
/// - An unreadable fragment or preamble file
/// - Invalid directives
/// - Staging errors
/// - A compile that produced no PDF (outside watch mode)
///
/// In watch mode, errors of individual compiles are reported and watching
/// continues.
pub fn run(args: &Args) -> Result<(), TikzError> {
    info!(
        input_path = args.input,
        watch = args.watch;
        "Processing fragment"
    );

    let app_config = apply_overrides(config::load_config(args.config.as_ref())?, args);
    let builder = PictureBuilder::new(app_config);
    let toolchain = CommandToolchain::from_config(builder.config().compiler());
    let job = args.job();

    if !args.watch {
        let artifact = compile(&builder, &job, &toolchain)?.into_result()?;
        info!(output_file = artifact.display().to_string(); "PDF exported successfully");
        return Ok(());
    }

    let watcher = Watcher::new(job.watched_files(), builder.config().watch());
    let mut recompiler = Recompiler::new(&builder, &toolchain, job);
    watch(&mut recompiler, watcher);
    Ok(())
}

/// Command-line flags take precedence over the configuration file.
fn apply_overrides(mut config: AppConfig, args: &Args) -> AppConfig {
    if let Some(viewer) = &args.viewer {
        config = config.with_viewer(ViewerConfig::new(viewer));
    }
    if args.bare {
        config = config.with_document(DocumentConfig::new(None));
    }
    config
}

/// Prepare, report directive warnings, then stage and compile.
fn compile(
    builder: &PictureBuilder,
    job: &Job,
    toolchain: &dyn Toolchain,
) -> Result<CompileOutcome, TikzError> {
    let prepared = builder.prepare(job)?;
    error_adapter::report_warnings(prepared.directives().warnings(), prepared.source());
    builder.build(job, &prepared, toolchain)
}

/// Compiles a job over and over in watch mode.
///
/// Nothing is returned to the caller: failures are reported and the next
/// change gets a fresh attempt. The viewer is requested until the first
/// compile that produces a PDF.
struct Recompiler<'a> {
    builder: &'a PictureBuilder,
    toolchain: &'a dyn Toolchain,
    job: Job,
    view_pending: bool,
}

impl<'a> Recompiler<'a> {
    fn new(builder: &'a PictureBuilder, toolchain: &'a dyn Toolchain, job: Job) -> Self {
        let view_pending = job.view();
        Self {
            builder,
            toolchain,
            job,
            view_pending,
        }
    }

    /// Returns `true` if a PDF was written.
    fn recompile(&mut self) -> bool {
        let job = self.job.clone().with_view(self.view_pending);
        match compile(self.builder, &job, self.toolchain) {
            Ok(CompileOutcome::Produced { artifact }) => {
                info!(output_file = artifact.display().to_string(); "PDF exported successfully");
                self.view_pending = false;
                true
            }
            Ok(CompileOutcome::NoArtifact {
                status,
                log_excerpt,
            }) => {
                error_adapter::report(&TikzError::Compile {
                    status,
                    log_excerpt,
                });
                false
            }
            Err(err) => {
                error_adapter::report(&err);
                false
            }
        }
    }
}

/// Compile now and after every change until `watcher` is stopped.
fn watch(recompiler: &mut Recompiler<'_>, mut watcher: Watcher) {
    recompiler.recompile();
    watcher.watch(|| {
        info!("Change detected, recompiling");
        recompiler.recompile();
    });
}
