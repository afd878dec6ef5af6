use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn run(args: &[&str], root: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dupefinder"))
        .args(args)
        .arg(root)
        .env_remove("RUST_LOG")
        .env_remove("DUPEFINDER_IO_THREADS")
        .env("DUPEFINDER_NO_PROGRESS", "true")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_text_report() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"hello").unwrap();
    fs::write(dir.path().join("b.txt"), b"hello").unwrap();
    fs::write(dir.path().join("c.txt"), b"world").unwrap();

    let output = run(&[], dir.path());
    assert_eq!(output.status.code(), Some(0));

    let text = stdout(&output);
    let expected = format!(
        "Scanning {root} ...\n3 file(s) examined\n2 duplicates with hash {hash}:\n  {a}\n  {b}\n\n",
        root = dir.path().display(),
        hash = blake3::hash(b"hello").to_hex(),
        a = dir.path().join("a.txt").display(),
        b = dir.path().join("b.txt").display(),
    );
    assert_eq!(text, expected);
}

#[test]
fn test_empty_directory_report() {
    let dir = tempdir().unwrap();

    let output = run(&[], dir.path());
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).ends_with("0 file(s) examined\n"));
}

#[test]
fn test_no_duplicates_notice() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"one").unwrap();
    fs::write(dir.path().join("b.txt"), b"two!").unwrap();

    let output = run(&["--io-threads", "1"], dir.path());
    assert!(stdout(&output).ends_with("2 file(s) examined\nNo duplicates found\n"));
}

#[test]
fn test_json_report() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"hello").unwrap();
    fs::write(dir.path().join("b.txt"), b"hello").unwrap();

    let output = run(&["--output", "json"], dir.path());
    assert_eq!(output.status.code(), Some(0));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["examined"], 2);
    assert_eq!(value["skipped"], 0);
    assert_eq!(value["duplicate_groups"][0]["count"], 2);
    assert_eq!(value["duplicate_groups"][0]["size"], 5);
}

#[test]
fn test_missing_root_exits_with_invalid_argument() {
    let dir = tempdir().unwrap();
    let output = run(&[], &dir.path().join("missing"));

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[DF002] Error:"));
}

#[test]
fn test_file_root_exits_with_invalid_argument() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("plain.txt");
    fs::write(&file, b"x").unwrap();

    let output = run(&[], &file);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Not a valid directory"));
}

#[test]
fn test_bad_config_file_is_general_error() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, b"{ broken").unwrap();

    let output = run(&["--config", config.to_str().unwrap()], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("[DF001] Error:"));
}

#[test]
fn test_config_file_is_accepted() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("settings.json");
    fs::write(&config, br#"{ "io_threads": 2, "progress": false }"#).unwrap();

    let output = run(&["--config", config.to_str().unwrap()], dir.path());
    assert_eq!(output.status.code(), Some(0));
    // The config file itself is one examined file.
    assert!(stdout(&output).ends_with("1 file(s) examined\n"));
}

#[test]
fn test_missing_path_argument_is_usage_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_dupefinder"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}
