//! Shape-Preserving JSON Objects
//!
//! Helpers behind the document model's hand-written serde impls. A parsed
//! item remembers the key order it was read with. It also keeps every value
//! it could not type in its `extra` map, under the original key. Writing it
//! back reproduces the original object apart from the fields the engine
//! actually changed. Items that are not JSON objects at all are carried as
//! opaque values and written back verbatim.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// How an item was laid out when it was read.
#[derive(Debug, Clone, Default)]
pub enum ItemLayout {
    /// Built in memory; known fields are written in declaration order.
    #[default]
    Fresh,
    /// Parsed from a JSON object with these keys, in this order.
    Keys(Vec<String>),
    /// Not a JSON object; written back unchanged.
    Opaque(Value),
}

impl ItemLayout {
    pub fn is_opaque(&self) -> bool {
        matches!(self, ItemLayout::Opaque(_))
    }

    /// Whether `key` was present when the item was read.
    pub fn had_key(&self, key: &str) -> bool {
        match self {
            ItemLayout::Fresh => false,
            ItemLayout::Keys(keys) => keys.iter().any(|k| k == key),
            ItemLayout::Opaque(_) => false,
        }
    }
}

/// Key order does not take part in equality; opaque payloads do.
impl PartialEq for ItemLayout {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ItemLayout::Opaque(a), ItemLayout::Opaque(b)) => a == b,
            (ItemLayout::Opaque(_), _) | (_, ItemLayout::Opaque(_)) => false,
            _ => true,
        }
    }
}

impl Eq for ItemLayout {}

// ============================================================================
// Reading
// ============================================================================

/// Pulls typed fields out of a JSON object, keeping what does not fit.
pub(crate) struct FieldReader {
    keys: Vec<String>,
    fields: Map<String, Value>,
}

impl FieldReader {
    pub(crate) fn new(fields: Map<String, Value>) -> Self {
        Self {
            keys: fields.keys().cloned().collect(),
            fields,
        }
    }

    /// Typed value of `key`, or None when absent or of the wrong shape.
    ///
    /// A wrong-shaped value stays behind and ends up in `extra`.
    pub(crate) fn take<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let parsed = T::deserialize(self.fields.get(key)?).ok()?;
        self.fields.remove(key);
        Some(parsed)
    }

    /// Remaining (unknown or untyped) fields and the original layout.
    pub(crate) fn finish(self) -> (Map<String, Value>, ItemLayout) {
        (self.fields, ItemLayout::Keys(self.keys))
    }
}

// ============================================================================
// Writing
// ============================================================================

/// The current typed value of one known field.
pub(crate) struct KnownField {
    key: &'static str,
    value: Option<Value>,
    is_default: bool,
}

impl KnownField {
    /// A field that always has a value; `is_default` marks the value a
    /// missing key would have parsed to.
    pub(crate) fn required<T: Serialize>(key: &'static str, value: &T, is_default: bool) -> Self {
        Self {
            key,
            value: serde_json::to_value(value).ok(),
            is_default,
        }
    }

    pub(crate) fn optional<T: Serialize>(key: &'static str, value: &Option<T>) -> Self {
        Self {
            key,
            value: value.as_ref().and_then(|v| serde_json::to_value(v).ok()),
            is_default: false,
        }
    }

    /// Value to write, if any.
    ///
    /// A set value wins. Otherwise the untyped original is written back. A
    /// default is only written when the key was there to begin with.
    fn resolve(&self, extra: &Map<String, Value>, write_default: bool) -> Option<Value> {
        match &self.value {
            Some(value) if !self.is_default => Some(value.clone()),
            _ => match extra.get(self.key) {
                Some(raw) => Some(raw.clone()),
                None if write_default => self.value.clone(),
                None => None,
            },
        }
    }
}

/// Serialize an item from its known fields, untyped leftovers and layout.
pub(crate) fn write_item<S: Serializer>(
    serializer: S,
    layout: &ItemLayout,
    known: &[KnownField],
    extra: &Map<String, Value>,
) -> Result<S::Ok, S::Error> {
    let mut out = Map::new();

    match layout {
        ItemLayout::Opaque(value) => return value.serialize(serializer),
        ItemLayout::Fresh => {
            for field in known {
                if let Some(value) = field.resolve(extra, true) {
                    out.insert(field.key.to_string(), value);
                }
            }
        }
        ItemLayout::Keys(keys) => {
            for key in keys {
                match known.iter().find(|f| f.key == key) {
                    Some(field) => {
                        if let Some(value) = field.resolve(extra, true) {
                            out.insert(key.clone(), value);
                        }
                    }
                    None => {
                        if let Some(value) = extra.get(key) {
                            out.insert(key.clone(), value.clone());
                        }
                    }
                }
            }
            for field in known.iter().filter(|f| !layout.had_key(f.key)) {
                if let Some(value) = field.resolve(extra, false) {
                    out.insert(field.key.to_string(), value);
                }
            }
        }
    }

    for (key, value) in extra {
        if !out.contains_key(key) && !known.iter().any(|f| f.key == key) {
            out.insert(key.clone(), value.clone());
        }
    }

    out.serialize(serializer)
}
