//! Integration tests for configuration-driven pipelines

use eyre::Result;
use itemflow::PipelineConfig;
use serde_json::{Value, json};
use tempfile::TempDir;

const CONFIG: &str = r#"
source:
  type: ndjson
  path: feed.ndjson
actions:
  - type: split
    pointer: /posts
  - type: dedup
    pointer: /id
  - type: match
    pointer: /rating
    pattern: "^(safe|general)$"
  - type: set_meta
    key: origin
    value: feed
  - type: first
    count: 3
export:
  type: ndjson
  path: out/posts.ndjson
  with_meta: true
"#;

fn write_feed(dir: &std::path::Path) -> Result<()> {
    let pages = [
        json!({"page": 1, "posts": [
            {"id": 1, "rating": "safe"},
            {"id": 2, "rating": "explicit"},
            {"id": 3, "rating": "general"}
        ]}),
        json!({"page": 2, "posts": [
            {"id": 3, "rating": "general"},
            {"id": 4, "rating": "safe"},
            {"id": 5, "rating": "safe"}
        ]}),
    ];
    let lines: Vec<String> = pages.iter().map(|p| p.to_string()).collect();
    std::fs::write(dir.join("feed.ndjson"), lines.join("\n"))?;
    Ok(())
}

#[test]
fn test_run_from_config_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_feed(temp_dir.path())?;
    let config_path = temp_dir.path().join("pipeline.yml");
    std::fs::write(&config_path, CONFIG)?;

    let pipeline = PipelineConfig::from_file(&config_path)?.build()?;
    let summary = pipeline.run()?;

    assert_eq!(summary.count, 3);
    assert_eq!(summary.location, temp_dir.path().join("out/posts.ndjson"));

    let content = std::fs::read_to_string(&summary.location)?;
    let items: Vec<Value> = content
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<_, _>>()?;

    let ids: Vec<Value> = items.iter().map(|i| i["data"]["id"].clone()).collect();
    assert_eq!(ids, vec![json!(1), json!(3), json!(4)]);
    assert_eq!(items[0]["meta"]["origin"], json!("feed"));
    assert_eq!(items[2]["meta"]["index"], json!(1));

    Ok(())
}

#[test]
fn test_preview_matches_run_prefix() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_feed(temp_dir.path())?;
    let config_path = temp_dir.path().join("pipeline.yml");
    std::fs::write(&config_path, CONFIG)?;

    let pipeline = PipelineConfig::from_file(&config_path)?.build()?;
    let preview = pipeline.preview(2)?;

    let ids: Vec<Value> = preview.iter().map(|i| i.data["id"].clone()).collect();
    assert_eq!(ids, vec![json!(1), json!(3)]);
    assert!(
        !temp_dir.path().join("out").exists(),
        "Preview must not export anything"
    );

    Ok(())
}

#[test]
fn test_missing_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let err = PipelineConfig::from_file(temp_dir.path().join("nope.yml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}
