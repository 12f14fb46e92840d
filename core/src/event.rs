//! Change events emitted by the selection store.
//!
//! RULE: Every store mutation reports what it changed as a list of events.
//! The dashboard reacts to events (e.g. a `SlotAssigned` on `main` rebuilds
//! the Sankey graph); it never diffs store state.

use crate::{selection::Slot, sankey::LinkKey, types::ChainId};
use serde::{Deserialize, Serialize};

/// Variants are appended, never reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SelectionEvent {
    SlotAssigned {
        slot:     Slot,
        chain_id: ChainId,
        /// Chain displaced from the slot, if any.
        previous: Option<ChainId>,
    },
    SlotCleared {
        slot:     Slot,
        chain_id: ChainId,
    },
    SankeyFilterSet {
        key: LinkKey,
    },
    SankeyFilterCleared,
}

impl SelectionEvent {
    pub fn touches_slot(&self, target: Slot) -> bool {
        match self {
            SelectionEvent::SlotAssigned { slot, .. }
            | SelectionEvent::SlotCleared { slot, .. } => *slot == target,
            _ => false,
        }
    }
}

/// True when any event changed the main slot.
pub fn main_changed(events: &[SelectionEvent]) -> bool {
    events.iter().any(|e| e.touches_slot(Slot::Main))
}
