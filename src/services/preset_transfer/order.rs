//! Order-List Manager
//!
//! Owner order lists and the two index spaces defined over them:
//!
//! - `RawOrder` - every reference in the owner's list, enabled or not,
//!   structural or not. Splices happen here.
//! - `EnabledEligibleView` - only enabled references whose entry exists and
//!   is a reconciliation candidate. `after-K` position tokens count here.
//!
//! The two are separately typed (`RawIndex` / `ViewIndex`) and the only way
//! from one to the other is `EnabledEligibleView::to_raw`.

use std::collections::HashMap;

use preset_transfer_core::{OrderReference, OwnerOrderList, PresetDocument, PromptEntry};

/// Baseline order written for an owner that has no list yet.
///
/// Downstream consumers expect every owner list to start from this sequence.
pub const DEFAULT_ORDER_SEED: &[(&str, bool)] = &[
    ("main", true),
    ("worldInfoBefore", true),
    ("personaDescription", true),
    ("charDescription", true),
    ("charPersonality", true),
    ("scenario", true),
    ("enhanceDefinitions", false),
    ("nsfw", true),
    ("worldInfoAfter", true),
    ("dialogueExamples", true),
    ("chatHistory", true),
    ("jailbreak", true),
];

/// Fresh copy of the baseline order.
pub fn default_order_seed() -> Vec<OrderReference> {
    DEFAULT_ORDER_SEED
        .iter()
        .map(|(id, enabled)| OrderReference::new(*id, *enabled))
        .collect()
}

// ============================================================================
// Index Types
// ============================================================================

/// Position in an owner's raw order list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RawIndex(pub usize);

/// Position in the enabled-eligible view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewIndex(pub usize);

// ============================================================================
// RawOrder
// ============================================================================

/// Mutable handle on one owner's full order list.
#[derive(Debug)]
pub struct RawOrder<'a> {
    refs: &'a mut Vec<OrderReference>,
}

impl<'a> RawOrder<'a> {
    pub fn new(refs: &'a mut Vec<OrderReference>) -> Self {
        Self { refs }
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    pub fn as_slice(&self) -> &[OrderReference] {
        self.refs.as_slice()
    }

    /// Index one past the last reference.
    pub fn end(&self) -> RawIndex {
        RawIndex(self.refs.len())
    }

    /// First raw position holding `identifier`.
    pub fn position_of(&self, identifier: &str) -> Option<RawIndex> {
        self.refs
            .iter()
            .position(|r| r.identifier == identifier)
            .map(RawIndex)
    }

    /// Insert `reference` so that it ends up at `index`.
    ///
    /// Indexes past the end are clamped to an append.
    pub fn insert(&mut self, index: RawIndex, reference: OrderReference) -> RawIndex {
        let at = index.0.min(self.refs.len());
        self.refs.insert(at, reference);
        RawIndex(at)
    }

    /// Turn on the reference for `identifier`, appending one if absent.
    ///
    /// An existing reference keeps its position. Returns true when a new
    /// reference was appended.
    pub fn enable_or_append(&mut self, identifier: &str) -> bool {
        match self.refs.iter_mut().find(|r| r.identifier == identifier) {
            Some(existing) => {
                existing.enabled = true;
                false
            }
            None => {
                self.refs.push(OrderReference::new(identifier, true));
                true
            }
        }
    }
}

/// Locate the order list of `owner`, seeding it with the baseline if absent.
pub fn get_or_create_owner_order(document: &mut PresetDocument, owner: i64) -> RawOrder<'_> {
    let idx = match document
        .prompt_order
        .iter()
        .position(|o| o.is_for(owner))
    {
        Some(idx) => idx,
        None => {
            tracing::debug!("Seeding default order list for owner {}", owner);
            document
                .prompt_order
                .push(OwnerOrderList::new(owner, default_order_seed()));
            document.prompt_order.len() - 1
        }
    };
    RawOrder::new(&mut document.prompt_order[idx].order)
}

// ============================================================================
// EnabledEligibleView
// ============================================================================

/// Read-only projection of an owner's order to enabled candidate entries.
///
/// Each item remembers the raw position it was projected from, so a list
/// holding the same identifier more than once still maps back exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnabledEligibleView {
    items: Vec<ViewItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ViewItem {
    identifier: String,
    raw: RawIndex,
}

impl EnabledEligibleView {
    /// Project the owner's order list of `document`.
    ///
    /// An owner without a list projects to an empty view.
    pub fn project(document: &PresetDocument, owner: i64) -> Self {
        let Some(list) = document.owner_order(owner) else {
            return Self::default();
        };

        // First entry per identifier, matching PresetDocument::entry_by_identifier.
        let mut entries: HashMap<&str, &PromptEntry> = HashMap::new();
        for entry in &document.prompts {
            entries.entry(entry.identifier.as_str()).or_insert(entry);
        }

        let items = list
            .order
            .iter()
            .enumerate()
            .filter(|(_, r)| r.enabled)
            .filter(|(_, r)| {
                entries
                    .get(r.identifier.as_str())
                    .map(|e| e.is_reconciliation_candidate())
                    .unwrap_or(false)
            })
            .map(|(i, r)| ViewItem {
                identifier: r.identifier.clone(),
                raw: RawIndex(i),
            })
            .collect();

        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Identifier at `index`, or None when out of range.
    pub fn identifier(&self, index: ViewIndex) -> Option<&str> {
        self.items.get(index.0).map(|item| item.identifier.as_str())
    }

    pub fn identifiers(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.identifier.as_str()).collect()
    }

    /// Map a view index to the raw position it was projected from.
    ///
    /// None when `index` is out of range or `raw` no longer holds that
    /// reference at that position.
    pub fn to_raw(&self, index: ViewIndex, raw: &RawOrder<'_>) -> Option<RawIndex> {
        let item = self.items.get(index.0)?;
        raw.as_slice()
            .get(item.raw.0)
            .filter(|r| r.identifier == item.identifier)
            .map(|_| item.raw)
    }
}
