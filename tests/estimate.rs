//! E2E tests for the estimate, brackets and schema commands

use std::process::Command;

/// Estimate from a scenario file: local layer plus US overlay
#[test]
fn estimate_singapore_scenario() {
    let output = Command::new("cargo")
        .args(["run", "--", "estimate", "-s", "tests/data/singapore.json"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);

    assert!(stdout.contains("NET PAY ESTIMATE (Singapore, SGD)"));
    assert!(stdout.contains("Earned (excl. Y1 RSU): 185000.00"));
    assert!(stdout.contains("Total Comp (incl. Y1 RSU): 215000.00"));
    assert!(stdout.contains("Local Tax (SGD): 24000.00"));
    assert!(stdout.contains("Net After Local Tax (SGD): 191000.00"));

    // Overlay: SG tax swamps the small tentative US tax
    assert!(stdout.contains("US OVERLAY (ON)"));
    assert!(stdout.contains("US Tentative Tax (USD): 1947.11"));
    assert!(stdout.contains("FTC Used (USD): 1947.11"));
    assert!(stdout.contains("US Tax Due (USD): 0.00"));
    assert!(stdout.contains("Combined Tax (USD): 17777.78"));
}

/// JSON output carries the formatted figures
#[test]
fn estimate_json_output() {
    let output = Command::new("cargo")
        .args([
            "run",
            "--",
            "estimate",
            "-s",
            "tests/data/singapore.json",
            "--json",
        ])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("\"country\": \"Singapore\""));
    assert!(stdout.contains("\"local_tax\": \"24000.00\""));
    assert!(stdout.contains("\"net_after_local\": \"191000.00\""));
    assert!(stdout.contains("\"us_tax_due\": \"0.00\""));
}

/// CSV export row mirrors the on-screen figures
#[test]
fn estimate_csv_export() {
    let output = Command::new("cargo")
        .args([
            "run",
            "--",
            "estimate",
            "-s",
            "tests/data/singapore.json",
            "--csv",
        ])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("country"));
    assert!(stdout.contains("net_after_local"));
    assert!(stdout.contains("Singapore"));
    assert!(stdout.contains("24000.00"));
}

/// Flags-only invocation without a scenario file
#[test]
fn estimate_from_flags() {
    let output = Command::new("cargo")
        .args([
            "run",
            "--",
            "estimate",
            "--country",
            "korea",
            "--base",
            "270000000",
            "--us-person",
        ])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("NET PAY ESTIMATE (Korea, KRW)"));
    // Flat 21% on 270,000,000
    assert!(stdout.contains("Local Tax (KRW): 56700000.00"));
    // 42,000 USD of Korean tax fully offsets the tentative US tax
    assert!(stdout.contains("US Tax Due (USD): 0.00"));
}

/// Custom bracket CSV overrides the country schedule; rows may be unsorted
/// and percentage-style
#[test]
fn estimate_with_custom_brackets() {
    let output = Command::new("cargo")
        .args([
            "run",
            "--",
            "estimate",
            "-s",
            "tests/data/singapore.json",
            "--brackets",
            "tests/data/custom_brackets.csv",
        ])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    // 10000 @ 10% + 40000 @ 20% + 165000 @ 30%
    assert!(stdout.contains("Local Tax (SGD): 58500.00"));
}

/// India layer shows surcharge and cess
#[test]
fn estimate_india_surcharge_and_cess() {
    let output = Command::new("cargo")
        .args(["run", "--", "estimate", "-s", "tests/data/india.json"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("Surcharge: 138000.00"));
    assert!(stdout.contains("Cess: 60720.00"));
    assert!(stdout.contains("Local Tax (INR): 1578720.00"));
}

/// The overlay is rejected when the work country is the United States
#[test]
fn overlay_rejected_in_united_states() {
    let output = Command::new("cargo")
        .args([
            "run",
            "--",
            "estimate",
            "--country",
            "united-states",
            "--base",
            "200000",
            "--us-person",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("US overlay does not apply"));
}

/// Default schedules round-trip through the brackets command
#[test]
fn brackets_command_table_and_csv() {
    let output = Command::new("cargo")
        .args(["run", "--", "brackets", "--country", "japan"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("DEFAULT BRACKETS (Japan, JPY)"));
    assert!(stdout.contains("45%"));

    let output = Command::new("cargo")
        .args(["run", "--", "brackets", "--country", "japan", "--csv"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("upper_limit,rate"));
    assert!(stdout.contains("1950000,0.05"));
}

/// Schema command documents the input formats
#[test]
fn schema_command_formats() {
    let output = Command::new("cargo")
        .args(["run", "--", "schema", "csv-header"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("upper_limit,rate"));

    let output = Command::new("cargo")
        .args(["run", "--", "schema", "json-schema"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("\"country\""));
    assert!(stdout.contains("\"us_overlay\""));
}

/// HTML report is written to the requested output file
#[test]
fn html_report_written_to_file() {
    let out_path = std::env::temp_dir().join("netpay-e2e-report.html");
    let output = Command::new("cargo")
        .args([
            "run",
            "--",
            "html",
            "-s",
            "tests/data/singapore.json",
            "-o",
            out_path.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    let html = std::fs::read_to_string(&out_path).expect("report file missing");
    assert!(html.contains("Gross to Net Pay Estimate"));
    assert!(html.contains("US Overlay"));
    assert!(html.contains("\"local_tax\":24000.0"));
    let _ = std::fs::remove_file(&out_path);
}
