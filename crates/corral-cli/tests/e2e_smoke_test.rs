use std::{fs, path::PathBuf};

use tempfile::tempdir;

use corral_cli::{Args, run};

/// Returns the workspace-level `demos` directory
fn demos_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

/// Collects all .toml files from a directory
fn collect_toml_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("toml")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

fn dataset_args(input: Option<&PathBuf>, output: PathBuf, config: Option<&PathBuf>) -> Args {
    Args {
        input: input.map(|path| path.to_string_lossy().to_string()),
        output: output.to_string_lossy().to_string(),
        config: config.map(|path| path.to_string_lossy().to_string()),
        log_level: "off".to_string(),
        generate: None,
        seed: 0,
        mutate_flags: None,
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let valid_demos = collect_toml_files(demos_dir());
    let configs = collect_toml_files(demos_dir().join("config"));

    assert!(!valid_demos.is_empty(), "No valid demos found in demos/");
    assert!(!configs.is_empty(), "No demo configs found in demos/config/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        let stem = demo_path.file_stem().unwrap().to_string_lossy().to_string();

        let mut runs = vec![(format!("{stem}.svg"), None)];
        for config_path in &configs {
            let config_stem = config_path.file_stem().unwrap().to_string_lossy();
            runs.push((format!("{stem}_{config_stem}.svg"), Some(config_path)));
        }

        for (output_filename, config) in runs {
            let output_path = temp_dir.path().join(&output_filename);
            let args = dataset_args(Some(demo_path), output_path.clone(), config);

            match run(&args) {
                Ok(()) => {
                    let svg = fs::read_to_string(&output_path).expect("Output should exist");
                    assert!(svg.contains("</svg>"), "{output_filename} is incomplete");
                }
                Err(e) => failed_demos.push((demo_path.clone(), e)),
            }
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid demo run(s) failed unexpectedly", failed_demos.len());
    }

    println!("✅ All {} valid demos passed", valid_demos.len());
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let error_demos = collect_toml_files(demos_dir().join("errors"));

    assert!(
        !error_demos.is_empty(),
        "No error demos found in demos/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for demo_path in &error_demos {
        let output_filename = format!(
            "error_{}.svg",
            demo_path.file_stem().unwrap().to_string_lossy()
        );
        let output_path = temp_dir.path().join(&output_filename);
        let args = dataset_args(Some(demo_path), output_path.clone(), None);

        if run(&args).is_ok() {
            unexpectedly_succeeded.push(demo_path.clone());
        }
        assert!(
            !output_path.exists(),
            "{output_filename} was written despite the error"
        );
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }

    println!(
        "✅ All {} error demos failed as expected",
        error_demos.len()
    );
}

#[test]
fn e2e_generated_population() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("generated.svg");

    let args = Args {
        generate: Some(24),
        seed: 5,
        mutate_flags: Some(0.5),
        ..dataset_args(None, output_path.clone(), None)
    };
    run(&args).expect("Generated population should render");

    let svg = fs::read_to_string(&output_path).expect("Output should exist");
    assert_eq!(svg.matches("<circle").count(), 24);
}

#[test]
fn e2e_missing_source_is_an_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let args = dataset_args(None, temp_dir.path().join("none.svg"), None);

    assert!(run(&args).is_err());
}
