use std::{fs, path::PathBuf};

use tempfile::tempdir;

use tikzpdf::{Job, PictureBuilder};
use tikzpdf_cli::{Args, run};

/// Collects all .tikz files from a directory
fn collect_tikz_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("tikz")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

fn demos_path() -> PathBuf {
    // Demos are at workspace root, relative to workspace not the crate
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn args(input: &str, output: &str) -> Args {
    Args {
        input: input.to_string(),
        preamble: None,
        data: None,
        watch: false,
        view: false,
        viewer: None,
        output: Some(output.to_string()),
        bare: false,
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let valid_demos = collect_tikz_files(demos_path());

    assert!(!valid_demos.is_empty(), "No valid demos found in demos/");

    let builder = PictureBuilder::default();
    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        match builder.prepare(&Job::new(demo_path)) {
            Ok(prepared) => assert!(prepared.document().as_str().ends_with("\\end{document}\n")),
            Err(e) => failed_demos.push((demo_path.clone(), e)),
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid demo(s) failed unexpectedly", failed_demos.len());
    }

    println!("✅ All {} valid demos passed", valid_demos.len());
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let error_demos = collect_tikz_files(demos_path().join("errors"));

    assert!(!error_demos.is_empty(), "No error demos found in demos/errors/");

    let mut unexpectedly_passed = Vec::new();

    for demo_path in &error_demos {
        let output_filename = format!("{}.pdf", demo_path.file_stem().unwrap().to_string_lossy());
        let output_path = temp_dir.path().join(output_filename);

        let args = args(
            &demo_path.to_string_lossy(),
            &output_path.to_string_lossy(),
        );

        // Directive errors are reported before any compiler runs
        if run(&args).is_ok() {
            unexpectedly_passed.push(demo_path.clone());
        }
        assert!(!output_path.exists());
    }

    if !unexpectedly_passed.is_empty() {
        eprintln!("\nError demos that unexpectedly passed:");
        for path in &unexpectedly_passed {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) passed unexpectedly",
            unexpectedly_passed.len()
        );
    }

    println!("✅ All {} error demos failed as expected", error_demos.len());
}

#[cfg(unix)]
#[test]
fn e2e_stand_in_compiler_produces_pdf() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "[compiler]\nprogram = \"sh\"\nargs = [\"-c\", \"cp \\\"$0\\\" tikz.pdf\"]\n",
    )
    .unwrap();

    let output_path = temp_dir.path().join("sine.pdf");
    let mut args = args(
        &demos_path().join("sine.tikz").to_string_lossy(),
        &output_path.to_string_lossy(),
    );
    args.config = Some(config_path.to_string_lossy().to_string());

    run(&args).expect("stand-in compiler should succeed");

    let pdf = fs::read_to_string(&output_path).unwrap();
    assert!(pdf.contains("\\pgfplotsset{compat=1.18}\n\\input{styles.tex}\n"));
    assert!(pdf.contains("\\addplot table {tables/sine.dat};"));
}

#[cfg(unix)]
#[test]
fn e2e_failing_compiler_is_an_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[compiler]\nprogram = \"false\"\nargs = []\n").unwrap();

    let output_path = temp_dir.path().join("circle.pdf");
    let mut args = args(
        &demos_path().join("circle.tikz").to_string_lossy(),
        &output_path.to_string_lossy(),
    );
    args.config = Some(config_path.to_string_lossy().to_string());

    assert!(run(&args).is_err());
    assert!(!output_path.exists());
}
