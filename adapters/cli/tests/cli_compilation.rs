use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "rampart"])
        .status()
        .expect("failed to invoke cargo check for rampart CLI binary");

    assert!(status.success(), "cargo check --bin rampart should succeed");
}

#[test]
fn headless_run_reports_json() {
    let output = Command::new(env!("CARGO_BIN_EXE_rampart"))
        .args(["--seed", "3", "--waves", "2", "--invest", "--json"])
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run rampart CLI binary");

    assert!(output.status.success(), "rampart run should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"layout\": \"rampart:v1:"));
    assert!(stdout.contains("\"kind\": \"tesla\""));
}
