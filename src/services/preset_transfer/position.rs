//! Position Resolver
//!
//! Turns a `PositionToken` into a splice point in the owner's raw order list.
//!
//! `after-K` counts in the enabled-eligible view, so the K-th view entry is
//! first mapped back to its raw position and the new reference lands right
//! after it. An out-of-range K, or an anchor that is missing from the raw
//! list, falls back to appending.

use preset_transfer_core::{OrderReference, PresetDocument};

use crate::models::transfer::PositionToken;
use crate::services::preset_transfer::order::{
    get_or_create_owner_order, EnabledEligibleView, RawIndex, RawOrder, ViewIndex,
};

/// Raw index at which a reference placed by `token` is inserted.
pub fn resolve_index(token: PositionToken, view: &EnabledEligibleView, raw: &RawOrder<'_>) -> RawIndex {
    match token {
        PositionToken::Top => RawIndex(0),
        PositionToken::Bottom => raw.end(),
        PositionToken::After(k) => match view.to_raw(ViewIndex(k), raw) {
            Some(anchor) => RawIndex(anchor.0 + 1),
            None => {
                if k >= view.len() {
                    tracing::debug!(
                        "Position after-{} is beyond {} eligible entries, appending",
                        k,
                        view.len()
                    );
                } else {
                    tracing::debug!(
                        "Anchor for after-{} is not in the raw order list, appending",
                        k
                    );
                }
                raw.end()
            }
        },
    }
}

/// Insert `reference` into the owner's order list at the place `token` names.
///
/// Seeds the owner list first if the document has none. Returns the raw
/// index the reference ended up at.
pub fn insert_reference(
    document: &mut PresetDocument,
    owner: i64,
    token: PositionToken,
    reference: OrderReference,
) -> RawIndex {
    // Make sure the list exists before projecting it.
    get_or_create_owner_order(document, owner);
    let view = EnabledEligibleView::project(document, owner);

    let mut raw = get_or_create_owner_order(document, owner);
    let index = resolve_index(token, &view, &raw);
    raw.insert(index, reference)
}
