//! Settings Models
//!
//! Engine configuration stored in config.json.

use serde::{Deserialize, Serialize};

use preset_transfer_core::{DEFAULT_INJECTION_DEPTH, GLOBAL_OWNER_ID};

use crate::models::transfer::PositionToken;

/// Configuration stored in config.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Owner whose order list transfers and deletes operate on
    #[serde(default = "default_owner_id")]
    pub owner_id: i64,
    /// Placement offered to callers that do not ask the user
    #[serde(default)]
    pub default_position: PositionToken,
    /// Injection depth for new entries that carry none
    #[serde(default = "default_injection_depth")]
    pub default_injection_depth: i64,
    /// Prune dangling order references by name containment on delete
    #[serde(default = "default_true")]
    pub name_containment_fallback: bool,
    /// Directory of `<name>.json` presets; defaults to ~/.preset-transfer/presets
    #[serde(default)]
    pub presets_dir: Option<String>,
}

fn default_owner_id() -> i64 {
    GLOBAL_OWNER_ID
}

fn default_injection_depth() -> i64 {
    DEFAULT_INJECTION_DEPTH
}

fn default_true() -> bool {
    true
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            owner_id: GLOBAL_OWNER_ID,
            default_position: PositionToken::Bottom,
            default_injection_depth: DEFAULT_INJECTION_DEPTH,
            name_containment_fallback: true,
            presets_dir: None,
        }
    }
}

/// Settings update request (partial update)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TransferConfigUpdate {
    pub owner_id: Option<i64>,
    pub default_position: Option<PositionToken>,
    pub default_injection_depth: Option<i64>,
    pub name_containment_fallback: Option<bool>,
    pub presets_dir: Option<String>,
}

impl TransferConfig {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: TransferConfigUpdate) {
        if let Some(owner_id) = update.owner_id {
            self.owner_id = owner_id;
        }
        if let Some(position) = update.default_position {
            self.default_position = position;
        }
        if let Some(depth) = update.default_injection_depth {
            self.default_injection_depth = depth;
        }
        if let Some(fallback) = update.name_containment_fallback {
            self.name_containment_fallback = fallback;
        }
        if let Some(dir) = update.presets_dir {
            self.presets_dir = Some(dir);
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.default_injection_depth < 0 {
            return Err(format!(
                "default_injection_depth must not be negative (got {})",
                self.default_injection_depth
            ));
        }

        if let Some(dir) = &self.presets_dir {
            if dir.trim().is_empty() {
                return Err("presets_dir must not be empty when set".to_string());
            }
        }

        Ok(())
    }
}
