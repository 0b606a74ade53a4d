//! Preset Document Model
//!
//! Serde model of a host preset: the prompt entry collection, the per-owner
//! order lists, and every other field, which is carried through untouched.
//!
//! Unknown keys on the document, on each entry and on each order list land in
//! an `extra` map so a fetch/save cycle keeps them, in their original key
//! order. A known key whose value has an unexpected type is kept in `extra`
//! as well, and array items that are not objects are carried opaquely, so
//! nothing the engine did not touch is lost on save.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::layout::{write_item, FieldReader, ItemLayout, KnownField};

/// Owner id of the global order list, used when no character is selected.
pub const GLOBAL_OWNER_ID: i64 = 100001;

/// Injection depth given to new entries that carry none.
pub const DEFAULT_INJECTION_DEPTH: i64 = 4;

// ============================================================================
// Enumerated Tags
// ============================================================================

/// Message role of a prompt entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PromptRole {
    System,
    User,
    Assistant,
    /// A role this crate does not know; written back verbatim.
    Other(String),
}

impl PromptRole {
    pub fn as_str(&self) -> &str {
        match self {
            PromptRole::System => "system",
            PromptRole::User => "user",
            PromptRole::Assistant => "assistant",
            PromptRole::Other(s) => s,
        }
    }
}

impl Default for PromptRole {
    fn default() -> Self {
        PromptRole::System
    }
}

impl From<String> for PromptRole {
    fn from(s: String) -> Self {
        match s.as_str() {
            "system" => PromptRole::System,
            "user" => PromptRole::User,
            "assistant" => PromptRole::Assistant,
            _ => PromptRole::Other(s),
        }
    }
}

impl From<PromptRole> for String {
    fn from(role: PromptRole) -> String {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for PromptRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the host injects an entry: in list order, or at a chat depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum InjectionPosition {
    Relative,
    Absolute,
    Other(i64),
}

impl Default for InjectionPosition {
    fn default() -> Self {
        InjectionPosition::Relative
    }
}

impl From<i64> for InjectionPosition {
    fn from(value: i64) -> Self {
        match value {
            0 => InjectionPosition::Relative,
            1 => InjectionPosition::Absolute,
            other => InjectionPosition::Other(other),
        }
    }
}

impl From<InjectionPosition> for i64 {
    fn from(position: InjectionPosition) -> i64 {
        match position {
            InjectionPosition::Relative => 0,
            InjectionPosition::Absolute => 1,
            InjectionPosition::Other(v) => v,
        }
    }
}

// ============================================================================
// Entries and Order Lists
// ============================================================================

/// A named prompt entry in a preset's `prompts` collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptEntry {
    /// Opaque id, unique within one document. Never changes after creation.
    pub identifier: String,
    /// Display and match key. Not guaranteed unique.
    pub name: String,
    pub role: Option<PromptRole>,
    pub content: Option<String>,
    pub injection_depth: Option<i64>,
    pub injection_position: Option<InjectionPosition>,
    pub system_prompt: Option<bool>,
    pub marker: Option<bool>,
    pub forbid_overrides: Option<bool>,
    /// Fields this crate does not interpret, plus known fields whose value
    /// had an unexpected type.
    pub extra: Map<String, Value>,
    pub layout: ItemLayout,
}

impl PromptEntry {
    pub fn is_system_prompt(&self) -> bool {
        self.system_prompt.unwrap_or(false)
    }

    pub fn is_marker(&self) -> bool {
        self.marker.unwrap_or(false)
    }

    /// Whether this entry takes part in compare and transfer.
    ///
    /// System prompts, structural markers and entries with a blank name
    /// never do.
    pub fn is_reconciliation_candidate(&self) -> bool {
        !self.is_system_prompt() && !self.is_marker() && !self.name.trim().is_empty()
    }

    fn from_json(value: Value) -> Self {
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Self {
                    layout: ItemLayout::Opaque(other),
                    ..Default::default()
                }
            }
        };
        let mut reader = FieldReader::new(map);
        let identifier = reader.take("identifier").unwrap_or_default();
        let name = reader.take("name").unwrap_or_default();
        let role = reader.take("role");
        let content = reader.take("content");
        let injection_depth = reader.take("injection_depth");
        let injection_position = reader.take("injection_position");
        let system_prompt = reader.take("system_prompt");
        let marker = reader.take("marker");
        let forbid_overrides = reader.take("forbid_overrides");
        let (extra, layout) = reader.finish();
        Self {
            identifier,
            name,
            role,
            content,
            injection_depth,
            injection_position,
            system_prompt,
            marker,
            forbid_overrides,
            extra,
            layout,
        }
    }
}

impl<'de> Deserialize<'de> for PromptEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_json(Value::deserialize(deserializer)?))
    }
}

impl Serialize for PromptEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let known = [
            KnownField::required("identifier", &self.identifier, self.identifier.is_empty()),
            KnownField::required("name", &self.name, self.name.is_empty()),
            KnownField::optional("role", &self.role),
            KnownField::optional("content", &self.content),
            KnownField::optional("injection_depth", &self.injection_depth),
            KnownField::optional("injection_position", &self.injection_position),
            KnownField::optional("system_prompt", &self.system_prompt),
            KnownField::optional("marker", &self.marker),
            KnownField::optional("forbid_overrides", &self.forbid_overrides),
        ];
        write_item(serializer, &self.layout, &known, &self.extra)
    }
}

/// One slot in an owner's order list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderReference {
    pub identifier: String,
    /// Missing reads as false.
    pub enabled: bool,
    pub extra: Map<String, Value>,
    pub layout: ItemLayout,
}

impl OrderReference {
    pub fn new(identifier: impl Into<String>, enabled: bool) -> Self {
        Self {
            identifier: identifier.into(),
            enabled,
            ..Default::default()
        }
    }

    fn from_json(value: Value) -> Self {
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Self {
                    layout: ItemLayout::Opaque(other),
                    ..Default::default()
                }
            }
        };
        let mut reader = FieldReader::new(map);
        let identifier = reader.take("identifier").unwrap_or_default();
        let enabled = reader.take("enabled").unwrap_or(false);
        let (extra, layout) = reader.finish();
        Self {
            identifier,
            enabled,
            extra,
            layout,
        }
    }
}

impl<'de> Deserialize<'de> for OrderReference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_json(Value::deserialize(deserializer)?))
    }
}

impl Serialize for OrderReference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let known = [
            KnownField::required("identifier", &self.identifier, self.identifier.is_empty()),
            KnownField::required("enabled", &self.enabled, !self.enabled),
        ];
        write_item(serializer, &self.layout, &known, &self.extra)
    }
}

/// The ordered entry references of a single owner (character or global).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OwnerOrderList {
    pub character_id: i64,
    pub order: Vec<OrderReference>,
    pub extra: Map<String, Value>,
    pub layout: ItemLayout,
}

impl OwnerOrderList {
    pub fn new(character_id: i64, order: Vec<OrderReference>) -> Self {
        Self {
            character_id,
            order,
            ..Default::default()
        }
    }

    /// Whether the list carried a usable `character_id`.
    pub fn has_owner_id(&self) -> bool {
        match &self.layout {
            ItemLayout::Fresh => true,
            ItemLayout::Keys(_) => {
                self.layout.had_key("character_id") && !self.extra.contains_key("character_id")
            }
            ItemLayout::Opaque(_) => false,
        }
    }

    /// Whether this is the order list of `owner`.
    pub fn is_for(&self, owner: i64) -> bool {
        self.has_owner_id() && self.character_id == owner
    }

    fn from_json(value: Value) -> Self {
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Self {
                    layout: ItemLayout::Opaque(other),
                    ..Default::default()
                }
            }
        };
        let mut reader = FieldReader::new(map);
        let character_id = reader.take("character_id").unwrap_or_default();
        let order = reader.take("order").unwrap_or_default();
        let (extra, layout) = reader.finish();
        Self {
            character_id,
            order,
            extra,
            layout,
        }
    }
}

impl<'de> Deserialize<'de> for OwnerOrderList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_json(Value::deserialize(deserializer)?))
    }
}

impl Serialize for OwnerOrderList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let known = [
            KnownField::required("character_id", &self.character_id, !self.has_owner_id()),
            KnownField::required("order", &self.order, self.order.is_empty()),
        ];
        write_item(serializer, &self.layout, &known, &self.extra)
    }
}

// ============================================================================
// Preset Document
// ============================================================================

/// A whole preset as fetched from and saved to the host store.
///
/// A `prompts` or `prompt_order` value that is not an array reads as empty
/// and is written back unchanged unless the engine fills the collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresetDocument {
    pub prompts: Vec<PromptEntry>,
    pub prompt_order: Vec<OwnerOrderList>,
    /// Every other top-level field (sampler settings etc.), left untouched.
    pub extra: Map<String, Value>,
    pub layout: ItemLayout,
}

impl PresetDocument {
    /// Parse a document from a JSON value.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    /// First entry with the given identifier.
    pub fn entry_by_identifier(&self, identifier: &str) -> Option<&PromptEntry> {
        self.prompts.iter().find(|e| e.identifier == identifier)
    }

    /// First entry with the given name, in collection order.
    pub fn entry_by_name(&self, name: &str) -> Option<&PromptEntry> {
        self.prompts.iter().find(|e| e.name == name)
    }

    pub fn contains_identifier(&self, identifier: &str) -> bool {
        self.prompts.iter().any(|e| e.identifier == identifier)
    }

    /// The order list of `owner`, if the document has one.
    pub fn owner_order(&self, owner: i64) -> Option<&OwnerOrderList> {
        self.prompt_order.iter().find(|o| o.is_for(owner))
    }
}

impl<'de> Deserialize<'de> for PresetDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = match Value::deserialize(deserializer)? {
            Value::Object(map) => map,
            _ => return Err(de::Error::custom("preset document must be a JSON object")),
        };
        let mut reader = FieldReader::new(map);
        let prompts = reader.take("prompts").unwrap_or_default();
        let prompt_order = reader.take("prompt_order").unwrap_or_default();
        let (extra, layout) = reader.finish();
        Ok(Self {
            prompts,
            prompt_order,
            extra,
            layout,
        })
    }
}

impl Serialize for PresetDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let known = [
            KnownField::required("prompts", &self.prompts, self.prompts.is_empty()),
            KnownField::required("prompt_order", &self.prompt_order, self.prompt_order.is_empty()),
        ];
        write_item(serializer, &self.layout, &known, &self.extra)
    }
}
