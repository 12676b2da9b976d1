use std::path::PathBuf;
use std::process::Command;

fn temp_path(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "resonance-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

fn write_temp(label: &str, contents: &str) -> PathBuf {
    let path = temp_path(label);
    std::fs::write(&path, contents).expect("write fixture");
    path
}

const TWO_RESONANCE_CONFIG: &str = r#"{
    "resonances": ["Tide", "Ember"],
    "archetype_names": {"Tempest": ["Tide", "Ember"]},
    "mono_range": [1, 3],
    "neutral_range": [0, 2],
    "dual_exact_count": 1
}"#;

const CLEAN_CATALOG: &str = r#"[
    {"name": "Tide Scout", "resonance": "Tide", "archetype_tags": ["Tempest"]},
    {"name": "Ember Scout", "resonance": "Ember", "rarity": "common"},
    {"name": "Wayfinder Lantern", "resonance": "Neutral"},
    {"name": "Tempest Signpost", "resonance": {"dual": ["Tide", "Ember"]}}
]"#;

const STARCATCHER_CATALOG: &str = r#"[
    {"name": "Tide Scout", "resonance": "Tide"},
    {"name": "Ember Scout", "resonance": "Ember"},
    {"name": "Starcatcher", "resonance": "Stone", "archetype_tags": ["Tempest"]},
    {"name": "Tempest Signpost", "resonance": {"dual": ["Tide", "Ember"]}}
]"#;

#[test]
fn cli_clean_catalog_exits_zero() {
    let exe = env!("CARGO_BIN_EXE_resonance-audit");
    let catalog = write_temp("clean", CLEAN_CATALOG);
    let config = write_temp("config", TWO_RESONANCE_CONFIG);
    let output = Command::new(exe)
        .arg("--catalog")
        .arg(&catalog)
        .arg("--config")
        .arg(&config)
        .output()
        .expect("run cli");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(0), "{stdout}");
    assert!(stdout.contains("No violations"));
}

#[test]
fn cli_violation_exits_one_with_json_report() {
    let exe = env!("CARGO_BIN_EXE_resonance-audit");
    let catalog = write_temp("starcatcher", STARCATCHER_CATALOG);
    let config = write_temp("config", TWO_RESONANCE_CONFIG);
    let report_path = temp_path("report");
    let status = Command::new(exe)
        .arg("--catalog")
        .arg(&catalog)
        .arg("--config")
        .arg(&config)
        .args(["--format", "json", "--output"])
        .arg(&report_path)
        .status()
        .expect("run cli");
    assert_eq!(status.code(), Some(1));

    let content = std::fs::read_to_string(report_path).expect("read output");
    let report: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    assert_eq!(report["summary"]["tag_violations"], 1);
    assert_eq!(report["tag_violations"][0]["card"], "Starcatcher");
    assert_eq!(report["tag_violations"][0]["archetype"], "Tempest");
}

#[test]
fn cli_markdown_includes_round_diff() {
    let exe = env!("CARGO_BIN_EXE_resonance-audit");
    let previous = write_temp("previous", CLEAN_CATALOG);
    let catalog = write_temp("current", STARCATCHER_CATALOG);
    let config = write_temp("config", TWO_RESONANCE_CONFIG);
    let output = Command::new(exe)
        .arg("--catalog")
        .arg(&catalog)
        .arg("--config")
        .arg(&config)
        .arg("--previous")
        .arg(&previous)
        .args(["--format", "markdown"])
        .output()
        .expect("run cli");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("## Changes Since Previous Round"));
    assert!(stdout.contains("- Added: Starcatcher"));
    assert!(stdout.contains("- Removed: Wayfinder Lantern"));
}

#[test]
fn cli_missing_catalog_exits_two() {
    let exe = env!("CARGO_BIN_EXE_resonance-audit");
    let output = Command::new(exe)
        .arg("--catalog")
        .arg(temp_path("does-not-exist"))
        .output()
        .expect("run cli");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read"));
}

#[test]
fn cli_malformed_record_exits_two() {
    let exe = env!("CARGO_BIN_EXE_resonance-audit");
    let catalog = write_temp(
        "malformed",
        r#"[{"name": "Prism", "resonance": ["Tide", "Ember", "Stone"]}]"#,
    );
    let output = Command::new(exe)
        .arg("--catalog")
        .arg(&catalog)
        .output()
        .expect("run cli");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Prism"), "{stderr}");
}

#[test]
fn cli_contradictory_config_exits_two() {
    let exe = env!("CARGO_BIN_EXE_resonance-audit");
    let catalog = write_temp("catalog", CLEAN_CATALOG);
    let config = write_temp("inverted", r#"{"mono_range": [45, 38]}"#);
    let status = Command::new(exe)
        .arg("--catalog")
        .arg(&catalog)
        .arg("--config")
        .arg(&config)
        .status()
        .expect("run cli");
    assert_eq!(status.code(), Some(2));
}
