//! Transfer Integration Tests
//!
//! Compare two presets, select entries by status and merge them into the
//! target through the service.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::{json, Value};

use preset_transfer::services::preset_transfer::{compute_revision, select_by_status};
use preset_transfer::{
    CoreError, DiffStatus, DiffSummary, InsertRequest, MemoryPresetStore, PositionToken,
    PresetDocument, PresetTransferService, PromptEntry, SelectedEntry, TransferRequest,
    GLOBAL_OWNER_ID,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn counting_service(store: Arc<MemoryPresetStore>) -> PresetTransferService {
    let counter = AtomicUsize::new(0);
    let ids = move || format!("gen-{}", counter.fetch_add(1, Ordering::SeqCst));
    PresetTransferService::new(store, Arc::new(ids))
}

fn document(value: Value) -> PresetDocument {
    PresetDocument::from_value(value).unwrap()
}

fn source_preset() -> PresetDocument {
    document(json!({
        "prompts": [
            { "identifier": "main", "name": "Main Prompt", "system_prompt": true, "content": "sys" },
            { "identifier": "s-style", "name": "Style", "role": "system", "content": "terse",
              "injection_depth": 4, "injection_position": 0 },
            { "identifier": "s-lore", "name": "Lore", "role": "user", "content": "dragons",
              "injection_depth": 2, "injection_position": 1 },
            { "identifier": "s-rules", "name": "Rules", "role": "system", "content": "be kind",
              "injection_depth": 4, "injection_position": 0 }
        ]
    }))
}

fn target_preset() -> PresetDocument {
    document(json!({
        "openai_model": "gpt-4o",
        "prompts": [
            { "identifier": "main", "name": "Main Prompt", "system_prompt": true, "content": "sys" },
            { "identifier": "chatHistory", "name": "Chat History", "marker": true },
            { "identifier": "t-style", "name": "Style", "role": "system", "content": "verbose",
              "injection_depth": 4, "injection_position": 0 },
            { "identifier": "t-rules", "name": "Rules", "role": "system", "content": "be kind",
              "injection_depth": 4, "injection_position": 0 }
        ],
        "prompt_order": [
            { "character_id": 100000, "order": [{ "identifier": "main", "enabled": true }] },
            { "character_id": GLOBAL_OWNER_ID, "order": [
                { "identifier": "main", "enabled": true },
                { "identifier": "chatHistory", "enabled": true },
                { "identifier": "t-style", "enabled": false },
                { "identifier": "t-rules", "enabled": true }
            ]}
        ]
    }))
}

fn global_order(doc: &PresetDocument) -> Vec<(String, bool)> {
    doc.owner_order(GLOBAL_OWNER_ID)
        .unwrap()
        .order
        .iter()
        .map(|r| (r.identifier.clone(), r.enabled))
        .collect()
}

fn store_with_both() -> Arc<MemoryPresetStore> {
    let store = Arc::new(MemoryPresetStore::new());
    store.insert("Source", source_preset());
    store.insert("Target", target_preset());
    store
}

// ============================================================================
// Compare
// ============================================================================

#[tokio::test]
async fn test_compare_classifies_candidates_only() {
    let service = counting_service(store_with_both());

    let records = service.compare("Source", Some("Target")).await.unwrap();
    let statuses: Vec<(&str, DiffStatus)> =
        records.iter().map(|r| (r.entry.name.as_str(), r.status)).collect();
    assert_eq!(
        statuses,
        vec![
            ("Style", DiffStatus::Different),
            ("Lore", DiffStatus::New),
            ("Rules", DiffStatus::Same),
        ]
    );

    let summary = DiffSummary::from_records(&records);
    assert_eq!((summary.new, summary.same, summary.different), (1, 1, 1));
    assert_eq!(summary.total(), 3);
}

#[tokio::test]
async fn test_compare_without_target_tags_source() {
    let service = counting_service(store_with_both());

    let records = service.compare("Source", None).await.unwrap();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.status == DiffStatus::Source));
}

// ============================================================================
// Transfer
// ============================================================================

#[tokio::test]
async fn test_transfer_new_and_different() {
    let store = store_with_both();
    let service = counting_service(store.clone());

    let records = service.compare("Source", Some("Target")).await.unwrap();
    let selected = select_by_status(&records, &[DiffStatus::New, DiffStatus::Different]);
    assert_eq!(selected.len(), 2);

    let report = service
        .transfer(TransferRequest {
            target_preset: "Target".into(),
            entries: selected,
            position: Some(PositionToken::After(0)),
        })
        .await
        .unwrap();

    assert_eq!(report.overwritten, vec!["Style".to_string()]);
    assert_eq!(report.created.len(), 1);
    assert_eq!(report.created[0].identifier, "gen-0");

    let saved = store.get("Target").unwrap();

    // Overwrite keeps the identifier and order slot.
    let style = saved.entry_by_name("Style").unwrap();
    assert_eq!(style.identifier, "t-style");
    assert_eq!(style.content.as_deref(), Some("terse"));

    let lore = saved.entry_by_identifier("gen-0").unwrap();
    assert_eq!(lore.name, "Lore");
    assert_eq!(lore.injection_depth, Some(2));

    // Style is processed first and re-enabled, so the view is [t-style, t-rules]
    // when Lore is placed after its first element.
    assert_eq!(
        global_order(&saved),
        vec![
            ("main".to_string(), true),
            ("chatHistory".to_string(), true),
            ("t-style".to_string(), true),
            ("gen-0".to_string(), true),
            ("t-rules".to_string(), true),
        ]
    );

    // Other owners and unknown fields are untouched.
    assert_eq!(saved.owner_order(100000).unwrap().order.len(), 1);
    assert_eq!(saved.extra["openai_model"], json!("gpt-4o"));
    assert_eq!(report.revision, compute_revision(&saved).unwrap());
}

#[tokio::test]
async fn test_transfer_top_into_preset_without_order() {
    let store = store_with_both();
    store.insert("Bare", document(json!({ "prompts": [] })));
    let service = counting_service(store.clone());

    let records = service.compare("Source", Some("Bare")).await.unwrap();
    let selected = select_by_status(&records, &[DiffStatus::New]);
    assert_eq!(selected.len(), 3);

    service
        .transfer(TransferRequest {
            target_preset: "Bare".into(),
            entries: selected,
            position: Some(PositionToken::Top),
        })
        .await
        .unwrap();

    let saved = store.get("Bare").unwrap();
    let order = global_order(&saved);
    // Twelve seeded references plus three new ones, each prepended in turn.
    assert_eq!(order.len(), 15);
    assert_eq!(order[0].0, "gen-2");
    assert_eq!(order[1].0, "gen-1");
    assert_eq!(order[2].0, "gen-0");
    assert_eq!(order[3].0, "main");
}

#[tokio::test]
async fn test_transfer_overwrites_same_named_system_prompt() {
    let store = store_with_both();
    let service = counting_service(store.clone());

    let main = PromptEntry {
        name: "Main Prompt".into(),
        content: Some("replaced".into()),
        ..Default::default()
    };
    let report = service
        .transfer(TransferRequest {
            target_preset: "Target".into(),
            entries: vec![SelectedEntry::new(main)],
            position: Some(PositionToken::Bottom),
        })
        .await
        .unwrap();

    assert_eq!(report.overwritten, vec!["Main Prompt".to_string()]);
    assert!(report.created.is_empty());

    let saved = store.get("Target").unwrap();
    let main = saved.entry_by_identifier("main").unwrap();
    assert_eq!(main.content.as_deref(), Some("replaced"));
    assert!(main.is_system_prompt());
    assert_eq!(saved.prompts.iter().filter(|e| e.name == "Main Prompt").count(), 1);
    assert_eq!(global_order(&saved).len(), 4);
}

// ============================================================================
// Insert
// ============================================================================

#[tokio::test]
async fn test_insert_blank_entry_with_existing_name() {
    let store = store_with_both();
    let service = counting_service(store.clone());

    let report = service
        .insert_entry(InsertRequest {
            target_preset: "Target".into(),
            entry: PromptEntry {
                name: "Rules".into(),
                ..Default::default()
            },
            position: Some(PositionToken::Bottom),
        })
        .await
        .unwrap();

    assert!(report.overwritten.is_empty());
    let saved = store.get("Target").unwrap();
    let rules: Vec<_> = saved.prompts.iter().filter(|e| e.name == "Rules").collect();
    assert_eq!(rules.len(), 2);

    let created = saved.entry_by_identifier(&report.created[0].identifier).unwrap();
    assert_eq!(created.content.as_deref(), Some(""));
    assert_eq!(created.injection_depth, Some(4));
    assert_eq!(created.system_prompt, Some(false));
}

#[tokio::test]
async fn test_insert_into_missing_preset() {
    let service = counting_service(store_with_both());

    let err = service
        .insert_entry(InsertRequest {
            target_preset: "Ghost".into(),
            entry: PromptEntry {
                name: "X".into(),
                ..Default::default()
            },
            position: Some(PositionToken::Top),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));
}

#[tokio::test]
async fn test_failed_save_keeps_target_unchanged() {
    let store = store_with_both();
    store.fail_saves(true);
    let service = counting_service(store.clone());

    let records = service.compare("Source", Some("Target")).await.unwrap();
    let err = service
        .transfer(TransferRequest {
            target_preset: "Target".into(),
            entries: select_by_status(&records, &[DiffStatus::New, DiffStatus::Different]),
            position: Some(PositionToken::Bottom),
        })
        .await
        .unwrap_err();

    assert!(err.is_storage_failure());
    assert_eq!(store.get("Target").unwrap(), target_preset());
}
