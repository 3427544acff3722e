/*!
 * Tests running the locali18n binary end to end
 */

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

use crate::common::DEMO_TEXT;

fn run_cli(config_path: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_locali18n"))
        .arg("-c")
        .arg(config_path)
        .args(args)
        .output()
        .expect("Failed to execute locali18n")
}

#[test]
fn test_cli_withPlatformProviderAndNoHost_shouldExitWithCapabilityError() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("conf.json");
    std::fs::write(&config_path, r#"{"provider": "platform"}"#).unwrap();

    let output = run_cli(&config_path, &[]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("platform.translator.create"));
    assert!(stderr.contains("-p mock"));
}

#[test]
fn test_cli_withMockProvider_shouldPrintDemoTranslations() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("conf.json");

    let output = run_cli(&config_path, &["-p", "mock"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("count is 0\t[es] count is 0"));
    assert!(stdout.contains(&format!("{}\t[es] {}", DEMO_TEXT, DEMO_TEXT)));
    // A default config is written on first run
    assert!(config_path.exists());
}

#[test]
fn test_cli_withMockProviderAndRepeatedText_shouldPrintEachLine() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("conf.json");

    let output = run_cli(&config_path, &["-p", "mock", "-t", "fr", "hi", "hi"]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "hi\t[fr] hi\nhi\t[fr] hi\n");
}
