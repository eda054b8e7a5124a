use assert_cmd::Command;
use tempfile::tempdir;

fn hajj(data_dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("hajj").unwrap();
    cmd.arg("--data-dir").arg(data_dir);
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn status_on_fresh_data_dir() {
    let dir = tempdir().unwrap();
    let out = stdout_of(hajj(dir.path()).arg("status"));
    assert!(out.contains("Introduction to Hajj"));
    assert!(out.contains("Total: 0%"));
    assert!(out.contains("locked (100% remaining)"));
    assert!(dir.path().join("hajj.log").exists());
}

#[test]
fn export_writes_csv_file() {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("progress.csv");
    hajj(dir.path())
        .args(["export", "--output"])
        .arg(&csv_path)
        .assert()
        .success();

    let text = std::fs::read_to_string(&csv_path).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("id,completed,progress,quiz_score,last_accessed")
    );
    assert_eq!(lines.count(), 7);
}

#[test]
fn export_to_stdout() {
    let dir = tempdir().unwrap();
    let out = stdout_of(hajj(dir.path()).arg("export"));
    assert!(out.starts_with("id,completed,progress"));
    assert!(out.contains("\ntawaf,false,0,,"));
}

#[test]
fn lang_is_saved_per_data_dir() {
    let dir = tempdir().unwrap();
    let out = stdout_of(hajj(dir.path()).args(["lang", "ar"]));
    assert!(out.contains("العربية"));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("hajj_language.json")).unwrap(),
        "ar"
    );
}

#[test]
fn sqlite_reset_clears_progress() {
    let dir = tempdir().unwrap();
    let out = stdout_of(hajj(dir.path()).args(["--storage", "sqlite", "reset"]));
    assert!(out.contains("Progress has been reset"));
    assert!(dir.path().join("progress.db").exists());

    let out = stdout_of(hajj(dir.path()).args(["--storage", "sqlite", "status"]));
    assert!(out.contains("Total: 0%"));
}

#[test]
fn tui_refuses_without_tty() {
    let dir = tempdir().unwrap();
    hajj(dir.path()).write_stdin("").assert().failure();
}
