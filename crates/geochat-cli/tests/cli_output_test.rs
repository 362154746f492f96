//! Runs the geochat binary against a temporary data directory

use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const ENV_KEYS: [&str; 9] = [
    "GEOCHAT_LLM",
    "GEOCHAT_LLM_BASE_URL",
    "GEOCHAT_DATA_DIR",
    "GEOCHAT_MAPPING_FILE",
    "GEOCHAT_REQUEST_TIMEOUT",
    "GEOCHAT_LLM_API_KEY",
    "DEEPSEEK_API_KEY",
    "OPENAI_API_KEY",
    "GOOGLE_MAPS_API_KEY",
];

fn data_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let point = dir.path().join("public/data/geoJSON/Point");
    fs::create_dir_all(point.join("schema")).unwrap();

    let shelters = json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [140.1233, 35.6073]},
                "properties": {"name": "千葉小学校", "capacity": 300}
            },
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [140.0772, 35.6375]},
                "properties": {"name": "稲毛公民館", "capacity": 80}
            }
        ]
    });
    fs::write(point.join("shelter.geojson"), shelters.to_string()).unwrap();

    let schema = json!({"definitions": {"FacilityProperties": {"properties": {
        "name": {"type": "string"},
        "capacity": {"type": "string", "format": "integer"}
    }}}});
    fs::write(point.join("schema/shelter.schema.geojson"), schema.to_string()).unwrap();
    dir
}

fn geochat(cwd: &Path, args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_geochat"));
    command.current_dir(cwd).args(args);
    for key in ENV_KEYS {
        command.env_remove(key);
    }
    command.output().expect("Failed to execute geochat")
}

fn json_stdout(output: &Output) -> Value {
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).expect("Output should be valid JSON")
}

#[test]
fn test_scan_json_lists_datasets() {
    let dir = data_dir();
    let parsed = json_stdout(&geochat(dir.path(), &["scan", "--json"]));

    assert_eq!(parsed["status"], "success");
    assert_eq!(parsed["data"]["stats"]["total"], 1);
    assert_eq!(parsed["data"]["datasets"][0]["name"], "shelter");
    assert_eq!(parsed["data"]["datasets"][0]["schema_summary"]["feature_count"], 2);
}

#[test]
fn test_scan_missing_data_dir_fails() {
    let dir = TempDir::new().unwrap();
    let output = geochat(dir.path(), &["scan", "--data-dir", "nowhere"]);
    assert!(!output.status.success());
}

#[test]
fn test_fields_json() {
    let dir = data_dir();
    let parsed = json_stdout(&geochat(dir.path(), &["fields", "shelter", "--json"]));

    let fields = parsed["data"]["fields"]["shelter"].as_array().unwrap();
    assert_eq!(fields.len(), 2);
    let capacity = fields.iter().find(|f| f["key"] == "capacity").unwrap();
    assert_eq!(capacity["kind"]["kind"], "number");
}

#[test]
fn test_filter_by_capacity_range() {
    let dir = data_dir();
    let parsed = json_stdout(&geochat(
        dir.path(),
        &[
            "filter",
            "--url",
            "/data/geoJSON/Point/shelter.geojson",
            "--criteria",
            r#"{"shelter_capacity": {"min": 100}}"#,
            "--json",
        ],
    ));

    let report = &parsed["data"]["report"]["results"][0];
    assert_eq!(report["visible_count"], 1);
    assert_eq!(report["hidden_count"], 1);
    let visible = &parsed["data"]["features"]["/data/geoJSON/Point/shelter.geojson"]["features"];
    assert_eq!(visible[0]["properties"]["name"], "千葉小学校");
}

#[test]
fn test_config_reports_sources() {
    let dir = data_dir();
    fs::write(dir.path().join("geochat.toml"), "request_timeout_secs = 15\n").unwrap();

    let parsed = json_stdout(&geochat(dir.path(), &["config", "--json", "--llm", "ollama:llama3"]));
    let values = &parsed["data"]["values"];

    assert_eq!(values["request_timeout_secs"]["value"], "15");
    assert_eq!(values["request_timeout_secs"]["source"], "File");
    assert_eq!(values["llm"]["source"], "Cli");
    assert_eq!(values["data_dir"]["source"], "Default");
    assert_eq!(parsed["data"]["credentials"]["llm_api_key"], false);
}

#[test]
fn test_ask_without_llm_key_fails() {
    let dir = data_dir();
    let output = geochat(dir.path(), &["ask", "避難所はどこ", "--llm", "deepseek:deepseek-chat"]);
    assert!(!output.status.success());
}
