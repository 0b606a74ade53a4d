//! File Store Integration Tests
//!
//! Runs the service over the JSON file store with options taken from a
//! config file.

use std::fs;
use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;

use preset_transfer::models::settings::TransferConfigUpdate;
use preset_transfer::services::preset_transfer::select_by_status;
use preset_transfer::{
    ConfigService, DiffStatus, FilePresetStore, InsertRequest, PositionToken, PresetStore,
    PresetTransferService, PromptEntry, TransferRequest, UuidGenerator,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn write_preset(dir: &std::path::Path, name: &str, value: Value) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join(format!("{}.json", name)),
        serde_json::to_string_pretty(&value).unwrap(),
    )
    .unwrap();
}

fn setup() -> (TempDir, ConfigService, PresetTransferService) {
    let temp = TempDir::new().unwrap();
    let presets = temp.path().join("presets");

    let mut config = ConfigService::with_path(temp.path().join("config.json")).unwrap();
    config
        .update_config(TransferConfigUpdate {
            owner_id: Some(7),
            presets_dir: Some(presets.to_string_lossy().into_owned()),
            ..Default::default()
        })
        .unwrap();

    write_preset(
        &presets,
        "Source",
        json!({
            "prompts": [
                { "identifier": "s1", "name": "Greeting", "content": "hello", "role": "assistant" }
            ]
        }),
    );
    write_preset(
        &presets,
        "Target",
        json!({
            "temperature": 1.1,
            "prompts": [
                { "identifier": "t1", "name": "Other", "content": "x" }
            ],
            "prompt_order": [
                { "character_id": 7, "order": [{ "identifier": "t1", "enabled": true }] }
            ]
        }),
    );

    let store = FilePresetStore::new(config.presets_dir().unwrap());
    let service = PresetTransferService::new(Arc::new(store), Arc::new(UuidGenerator))
        .with_options(config.engine_options());
    (temp, config, service)
}

fn read_raw(config: &ConfigService, name: &str) -> Value {
    let path = config.presets_dir().unwrap().join(format!("{}.json", name));
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_lists_presets_from_configured_dir() {
    let (_temp, _config, service) = setup();
    assert_eq!(service.list_presets().await.unwrap(), vec!["Source", "Target"]);
}

#[tokio::test]
async fn test_transfer_writes_through_to_disk() {
    let (_temp, config, service) = setup();

    let records = service.compare("Source", Some("Target")).await.unwrap();
    let report = service
        .transfer(TransferRequest {
            target_preset: "Target".into(),
            entries: select_by_status(&records, &[DiffStatus::New]),
            position: Some(PositionToken::Top),
        })
        .await
        .unwrap();

    let raw = read_raw(&config, "Target");
    assert_eq!(raw["temperature"], json!(1.1));
    assert_eq!(raw["prompts"][1]["name"], json!("Greeting"));
    assert_eq!(raw["prompts"][1]["role"], json!("assistant"));

    // Owner 7 comes from the config file.
    let order = &raw["prompt_order"][0]["order"];
    assert_eq!(order[0]["identifier"], json!(report.created[0].identifier));
    assert_eq!(order[1]["identifier"], json!("t1"));

    let snapshot = service.snapshot("Target").await.unwrap();
    assert_eq!(snapshot.revision, report.revision);
}

#[tokio::test]
async fn test_insert_seeds_missing_owner_list() {
    let (temp, _config, service) = setup();
    let store = FilePresetStore::new(temp.path().join("presets"));
    store
        .save_preset("Empty", &Default::default(), None)
        .await
        .unwrap();

    let report = service
        .insert_entry(InsertRequest {
            target_preset: "Empty".into(),
            entry: PromptEntry {
                name: "Note".into(),
                ..Default::default()
            },
            position: Some(PositionToken::After(5)),
        })
        .await
        .unwrap();

    let document = store.fetch_preset("Empty").await.unwrap();
    let order = &document.owner_order(7).unwrap().order;
    // The seeded list has no eligible entries, so after-5 falls back to bottom.
    assert_eq!(order.len(), 13);
    assert_eq!(order[12].identifier, report.created[0].identifier);
}
