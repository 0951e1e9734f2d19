//! Command-line argument definitions for the tikzpdf CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`].

use clap::Parser;

use tikzpdf::Job;

/// tikzpdf - a tool for TikZ picture development
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the TikZ fragment
    #[arg(value_name = "example.tikz")]
    pub input: String,

    /// LaTeX preamble file appended after the fragment's own directives
    #[arg(short, long, value_name = "preamble.tex")]
    pub preamble: Option<String>,

    /// File listing additional data files, one per line
    #[arg(short, long, value_name = "data.txt")]
    pub data: Option<String>,

    /// Recompile on change
    #[arg(short, long)]
    pub watch: bool,

    /// Open the PDF in a viewer
    #[arg(short, long)]
    pub view: bool,

    /// Viewer executable
    #[arg(long)]
    pub viewer: Option<String>,

    /// Output PDF path [default: input with a .pdf extension]
    #[arg(short, long)]
    pub output: Option<String>,

    /// Do not wrap the fragment in a tikzpicture environment
    #[arg(long)]
    pub bare: bool,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// The compile job described by these arguments.
    pub fn job(&self) -> Job {
        let mut job = Job::new(&self.input).with_view(self.view);
        if let Some(preamble) = &self.preamble {
            job = job.with_preamble_file(preamble);
        }
        if let Some(data) = &self.data {
            job = job.with_data_list(data);
        }
        if let Some(output) = &self.output {
            job = job.with_output(output);
        }
        job
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_short_flags() {
        let args = Args::try_parse_from([
            "tikzpdf", "cone.tikz", "-p", "pre.tex", "-d", "data.txt", "-w", "-v",
        ])
        .unwrap();

        assert_eq!(args.input, "cone.tikz");
        assert_eq!(args.preamble.as_deref(), Some("pre.tex"));
        assert_eq!(args.data.as_deref(), Some("data.txt"));
        assert!(args.watch);
        assert!(args.view);
        assert!(!args.bare);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_job_from_args() {
        let args = Args::try_parse_from(["tikzpdf", "figs/cone.tikz", "--preamble", "pre.tex"])
            .unwrap();
        let job = args.job();

        assert_eq!(job.fragment(), Path::new("figs/cone.tikz"));
        assert_eq!(job.output(), Path::new("figs/cone.pdf"));
        assert_eq!(job.preamble_file(), Some(Path::new("pre.tex")));
        assert!(!job.view());
    }

    #[test]
    fn test_output_override() {
        let args = Args::try_parse_from(["tikzpdf", "cone.tikz", "-o", "out/cone.pdf"]).unwrap();
        assert_eq!(args.job().output(), Path::new("out/cone.pdf"));
    }

    #[test]
    fn test_input_is_required() {
        assert!(Args::try_parse_from(["tikzpdf"]).is_err());
    }
}
