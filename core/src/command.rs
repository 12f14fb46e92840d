//! Inbound UI commands: what a click, drag or drop on the dashboard means.

use crate::{sankey::LinkKey, selection::Slot, types::ChainId};
use serde::{Deserialize, Serialize};

/// All dashboard interactions the core understands.
/// Variants are appended, never reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum DashboardCommand {
    // ── Chain selection ───────────────────────────
    /// Click on a bubble or ranking row: auto-place into the first free slot.
    SelectChain { chain_id: ChainId },
    /// Drop onto a specific slot.
    DropOnSlot { chain_id: ChainId, slot: Slot },
    /// Drop back onto the ranking list.
    DropOnList { chain_id: ChainId },
    ClearSlot { slot: Slot },
    ResetAll,

    // ── Sankey ────────────────────────────────────
    ClickLink { key: LinkKey },
    ClickBackground,

    // ── Ranking ───────────────────────────────────
    SortBy { key: crate::ranking::SortKey },
}
