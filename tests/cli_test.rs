use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn fixture_path(filename: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(filename)
}

/// Run the binary inside `dir` with configuration env vars cleared
fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_skincare-analyzer"))
        .args(args)
        .current_dir(dir)
        .env("RUST_LOG", "warn")
        .env_remove("ANALYZER_NAMES_FILE")
        .env_remove("ANALYZER_MODEL_FILE")
        .env_remove("ANALYZER_OUTPUT_FILE")
        .env_remove("OCR_ENGINE")
        .output()
        .expect("Failed to run skincare-analyzer")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Workspace laid out with the default file names
fn workspace(names: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("chemical_names.txt"), names).unwrap();
    fs::copy(
        fixture_path("skincare_model.json"),
        dir.path().join("skincare_model.json"),
    )
    .unwrap();
    dir
}

#[test]
fn test_analyze_writes_one_block_per_name() {
    let dir = workspace("Glycerin\nParaben\n");

    let output = run_in(dir.path(), &["analyze"]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout(&output), "ans.txt generated successfully\n");

    let report = fs::read_to_string(dir.path().join("ans.txt")).unwrap();
    assert_eq!(
        report,
        "Chemical: Glycerin\n\
         - Use: Humectant\n\
         - Benefits: Draws moisture into the skin\n\
         - Disadvantages: Can feel sticky at high concentrations\n\
         \n\
         Chemical: Paraben\n\
         - Use: Preservative\n\
         - Benefits: Extends product shelf life\n\
         - Disadvantages: Possible endocrine disruption\n"
    );
}

#[test]
fn test_analyze_preserves_input_order() {
    let dir = workspace("Retinol\nParaben\nGlycerin\nParaben\n");

    let output = run_in(dir.path(), &["analyze"]);
    assert!(output.status.success());

    let report = fs::read_to_string(dir.path().join("ans.txt")).unwrap();
    let chemicals: Vec<&str> = report
        .lines()
        .filter_map(|line| line.strip_prefix("Chemical: "))
        .collect();
    assert_eq!(chemicals, vec!["Retinol", "Paraben", "Glycerin", "Paraben"]);

    for block in report.split("\n\n") {
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines.len(), 4, "block: {:?}", block);
        assert!(lines[1].starts_with("- Use: ") && lines[1].len() > "- Use: ".len());
        assert!(lines[2].starts_with("- Benefits: ") && lines[2].len() > "- Benefits: ".len());
        assert!(lines[3].starts_with("- Disadvantages: ") && lines[3].len() > "- Disadvantages: ".len());
    }
}

#[test]
fn test_analyze_is_idempotent() {
    let dir = workspace("Glycerin\nRetinol\n");

    assert!(run_in(dir.path(), &["analyze"]).status.success());
    let first = fs::read(dir.path().join("ans.txt")).unwrap();
    assert!(run_in(dir.path(), &["analyze"]).status.success());
    let second = fs::read(dir.path().join("ans.txt")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_analyze_missing_names_file_exits_1() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_in(dir.path(), &["analyze"]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "Error: chemical_names.txt not found\n");
    assert!(!dir.path().join("ans.txt").exists());
}

#[test]
fn test_analyze_with_explicit_paths() {
    let dir = tempfile::tempdir().unwrap();
    let names = dir.path().join("ocr-output.txt");
    let report = dir.path().join("reports").join("retinol.txt");
    fs::create_dir(dir.path().join("reports")).unwrap();
    fs::write(&names, "Retinol").unwrap();

    let output = run_in(
        dir.path(),
        &[
            "analyze",
            "--names",
            names.to_str().unwrap(),
            "--model",
            fixture_path("skincare_model.json").to_str().unwrap(),
            "--output",
            report.to_str().unwrap(),
        ],
    );

    assert!(output.status.success());
    let written = fs::read_to_string(&report).unwrap();
    assert!(written.starts_with("Chemical: Retinol\n- Use: Anti-aging agent\n"));
}

#[test]
fn test_analyze_corrupt_model_fails_without_output() {
    let dir = workspace("Glycerin\n");
    fs::write(dir.path().join("skincare_model.json"), "not a model").unwrap();

    let output = run_in(dir.path(), &["analyze"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("skincare_model.json"));
    assert!(!dir.path().join("ans.txt").exists());
}

#[test]
fn test_ocr_failure_prints_message_and_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("label.png"), b"not really a png").unwrap();

    let output = run_in(dir.path(), &["ocr", "label.png", "--engine", "no-such-engine"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Unknown OCR engine 'no-such-engine'"));
}

#[test]
fn test_ocr_missing_image_reported_before_engine_setup() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("models");

    let output = run_in(
        dir.path(),
        &["ocr", "missing.png", "--model-cache-dir", cache.to_str().unwrap()],
    );

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "No such image file: missing.png\n");
    assert!(!cache.exists());
}
