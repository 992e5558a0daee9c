// Integration tests for replay binary
//
// Tests the replay binary CLI behavior:
// - Command-line argument parsing
// - File loading and error handling
// - Different replay modes (--all, --ticks, --validate)
// - Output formatting

use std::path::PathBuf;
use std::process::Command;

/// Helper function to get the path to test fixtures
fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(filename)
}

/// Helper to run replay binary with arguments
/// Runs from the manifest directory so the default Agent.toml is found
fn run_replay(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_replay"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(args)
        .output()
        .expect("Failed to execute replay binary")
}

fn open_field() -> String {
    fixture_path("open_field.jsonl").to_string_lossy().into_owned()
}

#[test]
fn test_replay_help() {
    let output = run_replay(&["--help"]);
    assert!(output.status.success(), "Help command should succeed");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Agent Replay Tool"), "Should show tool name");
    assert!(stderr.contains("USAGE:"), "Should show usage section");
    assert!(stderr.contains("OPTIONS:"), "Should show options section");
    assert!(stderr.contains("EXAMPLES:"), "Should show examples section");
}

#[test]
fn test_replay_no_arguments() {
    let output = run_replay(&[]);
    assert!(!output.status.success(), "Should fail with no arguments");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("USAGE:"), "Should show usage when arguments missing");
}

#[test]
fn test_replay_all_open_field() {
    let output = run_replay(&[&open_field(), "--all"]);

    assert!(
        output.status.success(),
        "Replay all should succeed for open_field.jsonl"
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Loaded 5 log entries"), "Should load 5 entries");
    assert!(stdout.contains("REPLAY REPORT"), "Should show replay report");
    assert!(stdout.contains("Total Decisions: 3"), "Only search ticks count as decisions");
    assert!(stdout.contains("Matches:         3"), "Every search tick should reproduce");
    assert!(stdout.contains("Mismatches:      0"), "Should report no mismatches");
    assert!(stdout.contains("Skipped:         2"), "Reflex and cruise ticks are skipped");
    assert!(
        !stdout.contains("DETAILED MISMATCHES"),
        "Should not show mismatch details when there are none"
    );
}

#[test]
fn test_replay_reports_stale_decisions() {
    let fixture = fixture_path("stale_decisions.jsonl");
    let output = run_replay(&[fixture.to_str().unwrap(), "--all"]);

    assert!(output.status.success(), "Mismatches are reported, not fatal");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Mismatches:      1"), "Tick 1 was logged as plain right");
    assert!(stdout.contains("DETAILED MISMATCHES"), "Should list the mismatch");
    assert!(stdout.contains("Tick 1: right → right+sprint"), "Should show both actions");
}

#[test]
fn test_replay_reports_failed_ticks() {
    let fixture = fixture_path("broken_percept.jsonl");
    let output = run_replay(&[fixture.to_str().unwrap(), "--all"]);

    assert!(output.status.success(), "Failed ticks are reported, not fatal");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Total Decisions: 2"), "Failed ticks still count as decisions");
    assert!(stdout.contains("Matches:         1"), "Tick 0 should reproduce");
    assert!(stdout.contains("Failed:          1"), "Tick 5 has a negative ego row");
    assert!(stdout.contains("FAILED REPLAYS"), "Should list the failure");
    assert!(stdout.contains("Tick 5:"), "Should name the failed tick");
}

#[test]
fn test_replay_specific_ticks() {
    let output = run_replay(&[&open_field(), "--ticks", "0,2"]);

    assert!(output.status.success(), "Replay specific ticks should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Replaying 2 specific tick(s)"),
        "Should indicate replaying specific ticks"
    );
    assert!(stdout.contains("REPLAY REPORT"), "Should show replay report");
}

#[test]
fn test_replay_verbose_mode() {
    let output = run_replay(&[&open_field(), "--all", "--verbose"]);

    assert!(output.status.success(), "Replay with verbose should succeed");

    // Verbose mode outputs to stderr via logging
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("REPLAY REPORT"),
        "Should show replay report even in verbose mode"
    );
}

#[test]
fn test_output_contains_statistics() {
    let output = run_replay(&[&open_field(), "--all"]);

    assert!(output.status.success(), "Replay should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Average Expansions:"),
        "Should show average expansions"
    );
    assert!(
        stdout.contains("Average Computation Time:"),
        "Should show average computation time"
    );
}

#[test]
fn test_validate_expected_actions_success() {
    let output = run_replay(&[&open_field(), "--validate", "0:right+jump+sprint"]);

    assert!(
        output.status.success(),
        "Validate should succeed for correct expected action"
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("All expected actions validated successfully"),
        "Should show success message"
    );
}

#[test]
fn test_validate_expected_actions_failure() {
    // Tick 1 is right+sprint, so expecting a plain step should fail
    let output = run_replay(&[&open_field(), "--validate", "1:right"]);

    assert!(
        !output.status.success(),
        "Validate should fail for incorrect expected action"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Validation failed"),
        "Should show validation failure message"
    );
}

#[test]
fn test_validate_multiple_actions_with_alternatives() {
    let output = run_replay(&[
        &open_field(),
        "--validate",
        "1:right+sprint,2:right|right+sprint,3:right+jump",
    ]);

    assert!(
        output.status.success(),
        "Validate should succeed when each tick matches one alternative"
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Validating 3 expected action(s)"),
        "Should indicate validating 3 actions"
    );
}

#[test]
fn test_nonexistent_log_file() {
    let output = run_replay(&["nonexistent.jsonl", "--all"]);

    assert!(!output.status.success(), "Should fail for nonexistent log file");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Error loading log file"),
        "Should show error message for missing file"
    );
}

#[test]
fn test_missing_mode_argument() {
    let output = run_replay(&[&open_field()]);

    assert!(
        !output.status.success(),
        "Should fail when no mode (--all, --ticks, --validate) specified"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Must specify"), "Should show error about missing mode");
}

#[test]
fn test_invalid_tick_number() {
    let output = run_replay(&[&open_field(), "--ticks", "invalid"]);

    assert!(!output.status.success(), "Should fail for invalid tick number");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Error parsing ticks") || stderr.contains("Invalid tick number"),
        "Should show error about invalid tick number"
    );
}

#[test]
fn test_invalid_key_name() {
    let output = run_replay(&[&open_field(), "--validate", "0:right+fly"]);

    assert!(!output.status.success(), "Should fail for an unknown key");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Error parsing expected actions"),
        "Should show error about the unknown key"
    );
}

#[test]
fn test_custom_config_path_falls_back() {
    let output = run_replay(&[&open_field(), "--all", "--config", "Missing.toml"]);

    // Should succeed even if file doesn't exist (falls back to defaults)
    assert!(
        output.status.success(),
        "Should handle custom config path gracefully"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Using default configuration"));
}

#[test]
fn test_tick_not_found() {
    // open_field.jsonl only has ticks 0 through 4
    let output = run_replay(&[&open_field(), "--ticks", "999"]);

    assert!(!output.status.success(), "Should fail when tick not found in log");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Tick") && stderr.contains("not found"),
        "Should show error about tick not found"
    );
}
