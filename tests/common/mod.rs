#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::{SystemTime, UNIX_EPOCH};

use fan_dashboard::sensors::registry::FieldId;

pub struct CmdResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub log_path: PathBuf,
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn resolve_bin_path() -> PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_fandash") {
        return PathBuf::from(path);
    }

    let exe_name = if cfg!(windows) { "fandash.exe" } else { "fandash" };
    let fallback = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .and_then(|deps| deps.parent().map(PathBuf::from))
        .map(|debug_dir| debug_dir.join(exe_name));

    match fallback {
        Some(path) if path.exists() => path,
        _ => panic!("unable to resolve fandash binary path for integration test"),
    }
}

/// Run the binary with a clean environment: no `FANDASH_*` overrides, no
/// `NO_COLOR`, and a `HOME` without a config file.
pub fn run_cli_case(case_name: &str, args: &[&str]) -> CmdResult {
    run_cli_case_with_env(case_name, args, &[])
}

pub fn run_cli_case_with_env(case_name: &str, args: &[&str], env: &[(&str, &str)]) -> CmdResult {
    let root = std::env::temp_dir().join("fandash-test-logs");
    fs::create_dir_all(&root).expect("create temp test log dir");
    let home = tempfile::tempdir().expect("create temp home");

    let log_path = root.join(format!("{}-{}.log", sanitize(case_name), now_millis()));
    let bin_path = resolve_bin_path();

    let mut cmd = Command::new(&bin_path);
    cmd.args(args)
        .env("HOME", home.path())
        .env("RUST_BACKTRACE", "1")
        .env_remove("NO_COLOR");
    for (key, _) in std::env::vars() {
        if key.starts_with("FANDASH_") {
            cmd.env_remove(key);
        }
    }
    for (key, value) in env {
        cmd.env(key, value);
    }
    let output = cmd.output().expect("execute fandash command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let mut log_content = String::new();
    log_content.push_str(&format!("case={case_name}\n"));
    log_content.push_str(&format!("bin={}\n", bin_path.display()));
    log_content.push_str(&format!("args={args:?}\n"));
    log_content.push_str(&format!("env={env:?}\n"));
    log_content.push_str(&format!("status={}\n", output.status));
    log_content.push_str("----- stdout -----\n");
    log_content.push_str(&stdout);
    log_content.push('\n');
    log_content.push_str("----- stderr -----\n");
    log_content.push_str(&stderr);
    log_content.push('\n');
    fs::write(&log_path, log_content).expect("write test log");

    CmdResult {
        status: output.status,
        stdout,
        stderr,
        log_path,
    }
}

/// Populate `dir` with one sysfs-style file per field.
pub fn write_sysfs_tree(dir: &Path, values: &[(FieldId, &str)]) {
    for (id, value) in values {
        fs::write(dir.join(id.sysfs_name()), format!("{value}\n")).expect("write sensor file");
    }
}

/// A complete tree: fan 1 in auto mode, fan 2 on a curve.
pub fn full_sysfs_tree(dir: &Path) {
    write_sysfs_tree(
        dir,
        &[
            (FieldId::Fan1Rpm, "1500"),
            (FieldId::Fan1Mode, "auto"),
            (FieldId::Fan1Level, "72"),
            (FieldId::Fan1RampUp, "3"),
            (FieldId::Fan1RampDown, "1"),
            (FieldId::Fan2Rpm, "3200"),
            (FieldId::Fan2Mode, "curve"),
            (FieldId::Fan2Level, "50"),
            (FieldId::Fan2RampUp, "5"),
            (FieldId::Fan2RampDown, "2"),
            (FieldId::TempCurrent, "55"),
            (FieldId::TempMin, "31"),
            (FieldId::TempMax, "88"),
            (FieldId::PowerMode, "balanced"),
        ],
    );
}
