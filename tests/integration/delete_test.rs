//! Delete Integration Tests
//!
//! Deleting entries by name through the service and the resulting order
//! list pruning across owners.

use std::sync::Arc;

use serde_json::json;

use preset_transfer::{
    CoreError, DeleteRequest, EngineOptions, MemoryPresetStore, PresetDocument,
    PresetTransferService, UuidGenerator, GLOBAL_OWNER_ID,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn preset() -> PresetDocument {
    PresetDocument::from_value(json!({
        "prompts": [
            { "identifier": "main", "name": "Main Prompt", "system_prompt": true },
            { "identifier": "chatHistory", "name": "Chat History", "marker": true },
            { "identifier": "id-lore", "name": "Lore", "content": "dragons" },
            { "identifier": "id-style", "name": "Style", "content": "terse" }
        ],
        "prompt_order": [
            { "character_id": 100000, "order": [
                { "identifier": "id-lore", "enabled": true },
                { "identifier": "stale-Lore-copy", "enabled": true }
            ]},
            { "character_id": GLOBAL_OWNER_ID, "order": [
                { "identifier": "main", "enabled": true },
                { "identifier": "id-lore", "enabled": true },
                { "identifier": "stale-Lore-copy", "enabled": false },
                { "identifier": "id-style", "enabled": true }
            ]}
        ]
    }))
    .unwrap()
}

fn order_ids(doc: &PresetDocument, owner: i64) -> Vec<String> {
    doc.owner_order(owner)
        .unwrap()
        .order
        .iter()
        .map(|r| r.identifier.clone())
        .collect()
}

fn service(store: Arc<MemoryPresetStore>, options: EngineOptions) -> PresetTransferService {
    PresetTransferService::new(store, Arc::new(UuidGenerator)).with_options(options)
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_delete_prunes_every_owner() {
    let store = Arc::new(MemoryPresetStore::new());
    store.insert("P", preset());
    let service = service(store.clone(), EngineOptions::default());

    let report = service
        .delete_entries(DeleteRequest {
            target_preset: "P".into(),
            names: vec!["Lore".into()],
        })
        .await
        .unwrap();

    assert_eq!(report.removed.len(), 1);
    assert_eq!(report.removed[0].identifier, "id-lore");
    // Two exact references plus the dangling one in the global list.
    assert_eq!(report.pruned_references, 3);
    assert_eq!(report.heuristic_matches, 1);

    let saved = store.get("P").unwrap();
    assert!(saved.entry_by_name("Lore").is_none());
    assert_eq!(order_ids(&saved, GLOBAL_OWNER_ID), vec!["main", "id-style"]);
    // The heuristic only runs on the configured owner's list.
    assert_eq!(order_ids(&saved, 100000), vec!["stale-Lore-copy"]);
}

#[tokio::test]
async fn test_delete_without_name_fallback() {
    let store = Arc::new(MemoryPresetStore::new());
    store.insert("P", preset());
    let options = EngineOptions {
        name_containment_fallback: false,
        ..Default::default()
    };
    let service = service(store.clone(), options);

    let report = service
        .delete_entries(DeleteRequest {
            target_preset: "P".into(),
            names: vec!["Lore".into()],
        })
        .await
        .unwrap();

    assert_eq!(report.heuristic_matches, 0);
    let saved = store.get("P").unwrap();
    assert_eq!(
        order_ids(&saved, GLOBAL_OWNER_ID),
        vec!["main", "stale-Lore-copy", "id-style"]
    );
}

#[tokio::test]
async fn test_delete_matches_structural_entries_by_name() {
    let store = Arc::new(MemoryPresetStore::new());
    store.insert("P", preset());
    let service = service(store.clone(), EngineOptions::default());

    let report = service
        .delete_entries(DeleteRequest {
            target_preset: "P".into(),
            names: vec!["Main Prompt".into(), "Chat History".into(), "Missing".into()],
        })
        .await
        .unwrap();

    let removed: Vec<_> = report.removed.iter().map(|r| r.identifier.as_str()).collect();
    assert_eq!(removed, vec!["main", "chatHistory"]);
    assert_eq!(report.pruned_references, 1);

    let saved = store.get("P").unwrap();
    assert_eq!(
        order_ids(&saved, GLOBAL_OWNER_ID),
        vec!["id-lore", "stale-Lore-copy", "id-style"]
    );
}

#[tokio::test]
async fn test_delete_keeps_entries_it_cannot_type() {
    let store = Arc::new(MemoryPresetStore::new());
    store.insert(
        "P",
        PresetDocument::from_value(json!({
            "prompts": [
                { "identifier": "A", "name": "A" },
                { "identifier": "K", "name": "K", "injection_depth": "4" },
                { "identifier": "L", "name": null }
            ],
            "prompt_order": [{
                "character_id": GLOBAL_OWNER_ID,
                "order": [
                    { "identifier": "A", "enabled": true },
                    { "identifier": "K", "enabled": true }
                ]
            }]
        }))
        .unwrap(),
    );
    let service = service(store.clone(), EngineOptions::default());

    service
        .delete_entries(DeleteRequest {
            target_preset: "P".into(),
            names: vec!["A".into()],
        })
        .await
        .unwrap();

    let saved = serde_json::to_value(store.get("P").unwrap()).unwrap();
    assert_eq!(
        saved["prompts"],
        json!([
            { "identifier": "K", "name": "K", "injection_depth": "4" },
            { "identifier": "L", "name": null }
        ])
    );
    assert_eq!(saved["prompt_order"][0]["order"], json!([{ "identifier": "K", "enabled": true }]));
}

#[tokio::test]
async fn test_delete_from_missing_preset() {
    let store = Arc::new(MemoryPresetStore::new());
    let service = service(store.clone(), EngineOptions::default());

    let err = service
        .delete_entries(DeleteRequest {
            target_preset: "Ghost".into(),
            names: vec!["Lore".into()],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));
    assert_eq!(store.save_count(), 0);
}
