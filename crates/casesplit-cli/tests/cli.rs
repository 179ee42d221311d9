use std::path::Path;

use assert_cmd::Command;
use lopdf::{Document, Object, Stream, dictionary};
use predicates::prelude::*;

fn casesplit(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("casesplit").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home).env_remove("RUST_LOG");
    cmd
}

/// Single blank 72x72 pt page.
fn blank_pdf(path: &Path) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "MediaBox" => vec![0.into(), 0.into(), 72.into(), 72.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

#[test]
fn test_help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    casesplit(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("split"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_split_missing_input_fails() {
    let home = tempfile::tempdir().unwrap();
    let out = home.path().join("out");

    casesplit(home.path())
        .arg("split")
        .arg(home.path().join("missing.pdf"))
        .arg("-o")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    assert!(!out.join("logs").exists());
}

#[test]
fn test_split_rejects_non_pdf() {
    let home = tempfile::tempdir().unwrap();
    let input = home.path().join("notes.pdf");
    std::fs::write(&input, "plain text").unwrap();

    casesplit(home.path())
        .arg("split")
        .arg(&input)
        .arg("-o")
        .arg(home.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("PDF"));
}

#[test]
fn test_split_without_models_fails_and_keeps_run_log() {
    let home = tempfile::tempdir().unwrap();
    let input = home.path().join("scan.pdf");
    blank_pdf(&input);
    let out = home.path().join("out");

    casesplit(home.path())
        .arg("split")
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .arg("--model-dir")
        .arg(home.path().join("no-models"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing model file"));

    let logs: Vec<_> = std::fs::read_dir(out.join("logs")).unwrap().collect();
    assert_eq!(logs.len(), 1);
}

#[test]
fn test_config_show_prints_defaults() {
    let home = tempfile::tempdir().unwrap();
    casesplit(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"dpi\": 200"))
        .stdout(predicate::str::contains("\"bottom_fraction\": 0.1"));
}

#[test]
fn test_config_init_refuses_to_overwrite() {
    let home = tempfile::tempdir().unwrap();
    let path = home.path().join("casesplit.json");

    casesplit(home.path())
        .args(["config", "init", "-o"])
        .arg(&path)
        .assert()
        .success();
    assert!(path.exists());

    casesplit(home.path())
        .args(["config", "init", "-o"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    casesplit(home.path())
        .args(["config", "init", "--force", "-o"])
        .arg(&path)
        .assert()
        .success();
}

#[test]
fn test_explicit_config_is_used() {
    let home = tempfile::tempdir().unwrap();
    let path = home.path().join("custom.json");
    std::fs::write(&path, r#"{"scan": {"dpi": 150}}"#).unwrap();

    casesplit(home.path())
        .arg("--config")
        .arg(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"dpi\": 150"));
}

#[test]
fn test_config_path_points_into_config_home() {
    let home = tempfile::tempdir().unwrap();
    casesplit(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("casesplit"))
        .stdout(predicate::str::contains("not created"));
}
