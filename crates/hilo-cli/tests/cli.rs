//! Runs the `hilo` binary against temporary directories.

use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;

fn hilo(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_hilo"))
        .args(args)
        .current_dir(cwd)
        .env_remove("HILO_LOG")
        .env("HILO_EMBEDDING__BACKEND", "none")
        .output()
        .expect("hilo should start")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn classify_prints_descriptors() {
    let dir = tempfile::tempdir().unwrap();
    let out = hilo(
        dir.path(),
        &["classify", "https://www.youtube.com/watch?v=dQw4w9WgXcQ"],
    );
    assert_eq!(out.status.code(), Some(0));
    let json = stdout_json(&out);
    assert_eq!(json[0]["label"], "[🎥 Video de YouTube - ID: dQw4w9WgXcQ]");
}

#[test]
fn raw_format_is_one_line() {
    let dir = tempfile::tempdir().unwrap();
    let out = hilo(dir.path(), &["--format", "raw", "normalize", "**hola** mundo"]);
    assert_eq!(out.status.code(), Some(0));
    let text = String::from_utf8(out.stdout).unwrap();
    assert_eq!(text.trim_end().lines().count(), 1);
    assert!(text.contains(r#""text":"hola mundo""#));
}

#[test]
fn sentiment_of_a_negated_phrase() {
    let dir = tempfile::tempdir().unwrap();
    let out = hilo(dir.path(), &["sentiment", "no me gusta este producto"]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout_json(&out)["label"], "negative");
}

#[test]
fn unknown_schema_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let listed = hilo(dir.path(), &["schema"]);
    assert_eq!(listed.status.code(), Some(0));
    assert!(
        stdout_json(&listed)
            .as_array()
            .unwrap()
            .iter()
            .any(|n| n == "report")
    );

    let out = hilo(dir.path(), &["schema", "nope"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("unknown schema 'nope'"));
}

#[test]
fn invalid_configuration_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();
    let out = Command::new(env!("CARGO_BIN_EXE_hilo"))
        .arg("config")
        .current_dir(dir.path())
        .env("HILO_PIPELINE__CHANNEL_CAPACITY", "0")
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn analyze_reports_partial_success() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("export");
    std::fs::create_dir(&input).unwrap();
    std::fs::write(
        input.join("chats.json"),
        r#"[{"id": 1, "name": "Ventas"}, {"id": 2, "name": "Sin mensajes"}]"#,
    )
    .unwrap();
    std::fs::write(
        input.join("1.jsonl"),
        concat!(
            r#"{"id": 1, "sender_id": 10, "text": "vendo bici en 150 usd", "date": "2024-05-10T09:00:00Z"}"#,
            "\n",
            r#"{"id": 2, "sender_id": 11, "text": "me interesa", "date": "2024-05-10T09:01:00Z", "reply_to_id": 1}"#,
        ),
    )
    .unwrap();

    let out = hilo(dir.path(), &["-q", "analyze", "--input", "export", "--output", "out"]);
    assert_eq!(out.status.code(), Some(3));
    let json = stdout_json(&out);
    assert_eq!(json["chats"][0]["status"], "complete");
    assert_eq!(json["chats"][1]["status"], "failed");
    assert!(dir.path().join("out/ventas_1_trends.json").exists());
    assert!(dir.path().join("out/report.json").exists());

    let only_first = hilo(
        dir.path(),
        &["-q", "analyze", "--input", "export", "--output", "out", "--chat", "1"],
    );
    assert_eq!(only_first.status.code(), Some(0));
}

#[test]
fn unreadable_export_is_an_ingestion_failure() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("export")).unwrap();
    let out = hilo(dir.path(), &["-q", "analyze", "--input", "export"]);
    assert_eq!(out.status.code(), Some(2));
}
