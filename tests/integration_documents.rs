use std::path::Path;

use serde_json::{json, Value};
use toolpanel::app::{execute, Command};
use toolpanel::storage::config::RuntimeConfig;
use toolpanel::storage::documents::{load_layout, load_results};
use toolpanel::ResultEntry;

fn write_layout(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("layout.json");
    let layout = json!([
        {
            "model_class": "ToolSection",
            "id": "text_manipulation",
            "name": "Text Manipulation",
            "elems": [
                { "id": "Cut1", "name": "Cut", "score": "Cut1" },
                { "id": "Paste1", "name": "Paste", "score": "Paste1" }
            ]
        },
        {
            "model_class": "ToolSection",
            "id": "mapping",
            "name": "Mapping",
            "elems": [
                {
                    "id": "toolshed.g2.bx.psu.edu/repos/devteam/bowtie2/bowtie2/2.4.2",
                    "name": "Bowtie2",
                    "score": "bowtie2",
                    "tool_shed_repository": { "name": "bowtie2", "owner": "devteam" }
                }
            ]
        },
        {
            "model_class": "ToolSection",
            "id": "expression_tools",
            "name": "Expression Tools",
            "elems": [ { "id": "param_value_from_file", "name": "Parse parameter value" } ]
        },
        { "model_class": "Tool", "id": "upload1", "name": "Upload File" }
    ]);
    std::fs::write(&path, serde_json::to_string_pretty(&layout).expect("encode layout"))
        .expect("write layout");
    path
}

fn write_results(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("results.json");
    std::fs::write(&path, body).expect("write results");
    path
}

fn compact_config() -> RuntimeConfig {
    let mut config = RuntimeConfig::default();
    config.output.pretty = false;
    config
}

fn ids_of(value: &Value) -> Vec<String> {
    value
        .as_array()
        .expect("array output")
        .iter()
        .map(|entry| entry["id"].as_str().expect("id").to_string())
        .collect()
}

#[test]
fn load_layout_reads_sections_and_extra_fields() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let path = write_layout(dir.path());

    let layout = load_layout(&path).expect("load layout");
    assert_eq!(layout.len(), 4);
    assert_eq!(layout[0].extra.get("model_class"), Some(&json!("ToolSection")));
    assert!(layout[3].elems.is_none());
}

#[test]
fn load_layout_reports_the_path_on_bad_json() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let path = dir.path().join("layout.json");
    std::fs::write(&path, "{ not json").expect("write layout");

    let err = load_layout(&path).expect_err("invalid layout should fail");
    assert!(err.to_string().contains("layout.json"));
}

#[test]
fn load_results_accepts_json_null_and_plain_text() {
    let dir = tempfile::tempdir().expect("create tempdir");

    let json_path = write_results(dir.path(), r#"["Cut1", {"id": "upload1"}]"#);
    let results = load_results(&json_path).expect("load json results");
    assert_eq!(
        results,
        Some(vec![
            ResultEntry::from("Cut1"),
            ResultEntry::Object {
                id: "upload1".to_string()
            },
        ])
    );

    let null_path = write_results(dir.path(), "null");
    assert_eq!(load_results(&null_path).expect("load null results"), None);

    let text_path = dir.path().join("results.txt");
    std::fs::write(&text_path, "Cut1\n\n  Paste1  \n").expect("write text results");
    assert_eq!(
        load_results(&text_path).expect("load text results"),
        Some(vec![ResultEntry::from("Cut1"), ResultEntry::from("Paste1")])
    );
}

#[test]
fn load_results_rejects_broken_json_arrays() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let path = write_results(dir.path(), r#"["Cut1", 42]"#);

    let err = load_results(&path).expect_err("non-string entry should fail");
    assert!(format!("{err:#}").contains("failed to parse results file"));
}

#[test]
fn sections_command_filters_and_ranks() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let layout = write_layout(dir.path());
    let results = write_results(
        dir.path(),
        r#"["toolshed.g2.bx.psu.edu/repos/devteam/bowtie2/bowtie2/2.4.2", "Paste1", "upload1"]"#,
    );

    let output = execute(
        &Command::Sections {
            layout,
            results: Some(results),
        },
        &compact_config(),
    )
    .expect("run sections");
    let value: Value = serde_json::from_str(&output).expect("parse output");

    assert_eq!(ids_of(&value), vec!["mapping", "text_manipulation", "upload1"]);
    assert_eq!(ids_of(&value[1]["elems"]), vec!["Paste1"]);
    assert_eq!(value[2]["elems"], json!([]));
}

#[test]
fn sections_command_without_results_echoes_layout() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let layout = write_layout(dir.path());

    let output = execute(
        &Command::Sections {
            layout: layout.clone(),
            results: None,
        },
        &compact_config(),
    )
    .expect("run sections");
    let value: Value = serde_json::from_str(&output).expect("parse output");
    let original: Value =
        serde_json::from_str(&std::fs::read_to_string(&layout).expect("read layout")).expect("parse layout");

    assert_eq!(value, original);
}

#[test]
fn tools_command_flattens_by_score() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let layout = write_layout(dir.path());
    let results = write_results(
        dir.path(),
        r#"["Paste1", "toolshed.g2.bx.psu.edu/repos/devteam/bowtie2/bowtie2/2.4.2", "Cut1", "param_value_from_file"]"#,
    );

    let output = execute(
        &Command::Tools {
            layout,
            results: Some(results),
            include_excluded: false,
        },
        &compact_config(),
    )
    .expect("run tools");
    let value: Value = serde_json::from_str(&output).expect("parse output");

    assert_eq!(
        ids_of(&value),
        vec![
            "Paste1",
            "toolshed.g2.bx.psu.edu/repos/devteam/bowtie2/bowtie2/2.4.2",
            "Cut1"
        ]
    );
}

#[test]
fn tools_command_can_include_expression_tools() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let layout = write_layout(dir.path());
    let results = write_results(dir.path(), r#"["param_value_from_file"]"#);

    let output = execute(
        &Command::Tools {
            layout,
            results: Some(results),
            include_excluded: true,
        },
        &compact_config(),
    )
    .expect("run tools");
    let value: Value = serde_json::from_str(&output).expect("parse output");

    assert_eq!(ids_of(&value), vec!["param_value_from_file"]);
}

#[test]
fn tools_command_without_results_lists_sections() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let layout = write_layout(dir.path());

    let output = execute(
        &Command::Tools {
            layout,
            results: None,
            include_excluded: false,
        },
        &compact_config(),
    )
    .expect("run tools");
    let value: Value = serde_json::from_str(&output).expect("parse output");

    assert_eq!(ids_of(&value), vec!["text_manipulation", "mapping", "upload1"]);
}

#[test]
fn malformed_repository_result_fails_the_command() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let layout = write_layout(dir.path());
    let results = write_results(dir.path(), r#"["toolshed/repos/devteam"]"#);

    let err = execute(
        &Command::Sections {
            layout,
            results: Some(results),
        },
        &compact_config(),
    )
    .expect_err("malformed path should fail");
    assert!(format!("{err:#}").contains("malformed repository path"));
}
