//! Runs the binary end to end.

use std::fs;
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_site-signals"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("binary should start")
}

#[test]
fn fixed_now_gives_identical_reports() {
    let args = ["--preset", "demo", "--now", "2024-06-15T12:00:00Z"];
    let a = run(&args);
    let b = run(&args);
    assert!(a.status.success(), "stderr: {}", String::from_utf8_lossy(&a.stderr));
    assert_eq!(a.stdout, b.stdout);

    let stdout = String::from_utf8_lossy(&a.stdout);
    for id in ["iceloss-wind", "demand-area", "solar-site", "demand_se3"] {
        assert!(stdout.contains(&format!("--- {id} ---")), "missing {id}");
    }
}

#[test]
fn portfolio_file_with_filters_and_export() {
    let out = std::env::temp_dir().join(format!("site-signals-cli-{}.csv", std::process::id()));
    let out_str = out.to_string_lossy().into_owned();
    let result = run(&[
        "--config",
        concat!(env!("CARGO_MANIFEST_DIR"), "/portfolios/nordic.toml"),
        "--now",
        "2024-06-15T12:00:00+02:00",
        "--search",
        "SOLAR",
        "--out",
        &out_str,
    ]);
    assert!(
        result.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("--- kalmar-solar ---"));
    assert!(!stdout.contains("iceloss-wind"));

    let csv = fs::read_to_string(&out).unwrap();
    fs::remove_file(&out).unwrap();
    // 24 h history + 72 h forecast from the file's window
    assert_eq!(csv.lines().count(), 1 + 97);
}

#[test]
fn invalid_window_exits_non_zero() {
    let result = run(&["--preset", "solar_noon", "--step", "0"]);
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("generator.window.step_hours"), "stderr: {stderr}");
}

#[test]
fn bad_config_file_exits_non_zero() {
    let path = std::env::temp_dir().join(format!("site-signals-bad-{}.toml", std::process::id()));
    fs::write(&path, "[[sites]]\nname = \"X\"\ntype = \"tidal\"\ncapacity_mw = 1.0\nseed = 1\n")
        .unwrap();
    let result = run(&["--config", &path.to_string_lossy()]);
    fs::remove_file(&path).unwrap();
    assert!(!result.status.success());
}

#[test]
fn unknown_preset_exits_non_zero() {
    let result = run(&["--preset", "nope"]);
    assert_eq!(result.status.code(), Some(1));
}
