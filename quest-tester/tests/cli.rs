use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "quest-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_writes_json_report_to_file() {
    let exe = env!("CARGO_BIN_EXE_quest-tester");
    let output_path = temp_path("json");
    let status = Command::new(exe)
        .args([
            "--mode",
            "both",
            "--seeds",
            "5",
            "--report",
            "json",
            "--at",
            "2026-02-09T08:00:00+05:30",
            "--output",
        ])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    let value: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    assert_eq!(value["playability"].as_array().unwrap().len(), 7);
    let unlocked = value["schedule"]["levels"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|level| level["unlocked"] == true)
        .count();
    assert_eq!(unlocked, 3);
}

#[test]
fn cli_console_report_prints_banner() {
    let exe = env!("CARGO_BIN_EXE_quest-tester");
    let output = Command::new(exe)
        .args(["--mode", "schedule", "--all-unlocked"])
        .env("NO_COLOR", "1")
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Valentine Quest Tester"));
    assert!(stdout.contains("Override: all levels unlocked"));
}

#[test]
fn cli_rejects_bad_timestamp() {
    let exe = env!("CARGO_BIN_EXE_quest-tester");
    let output = Command::new(exe)
        .args(["--mode", "schedule", "--at", "soon"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("RFC 3339"));
}
