//! In-memory chain selection: three mutually exclusive slots.
//!
//! INVARIANT: a chain id occupies at most one slot at a time.
//! Every public mutation preserves it and returns the events it produced.

use crate::{
    error::HempError,
    event::SelectionEvent,
    sankey::LinkFilter,
    types::ChainId,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MAIN_COLOR: &str = "#93e729";
pub const SUB1_COLOR: &str = "#bbb143";
pub const SUB2_COLOR: &str = "#3CA7C4";
pub const UNSELECTED_COLOR: &str = "#4B5563";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Main,
    Sub1,
    Sub2,
}

impl Slot {
    /// Auto-placement order.
    pub const ALL: [Slot; 3] = [Slot::Main, Slot::Sub1, Slot::Sub2];

    pub fn name(self) -> &'static str {
        match self {
            Slot::Main => "main",
            Slot::Sub1 => "sub1",
            Slot::Sub2 => "sub2",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Slot::Main => MAIN_COLOR,
            Slot::Sub1 => SUB1_COLOR,
            Slot::Sub2 => SUB2_COLOR,
        }
    }

    fn position(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Slot {
    type Err = HempError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" => Ok(Slot::Main),
            "sub1" => Ok(Slot::Sub1),
            "sub2" => Ok(Slot::Sub2),
            other => Err(HempError::UnknownSlot { name: other.to_string() }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectionInfo {
    pub slot:  Slot,
    pub color: &'static str,
}

/// Color for `info`, or the neutral gray when unselected.
pub fn selection_color(info: Option<SelectionInfo>) -> &'static str {
    info.map(|i| i.color).unwrap_or(UNSELECTED_COLOR)
}

#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    slots:         [Option<ChainId>; 3],
    sankey_filter: Option<LinkFilter>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: Slot) -> Option<&ChainId> {
        self.slots[slot.position()].as_ref()
    }

    pub fn main(&self) -> Option<&ChainId> {
        self.get(Slot::Main)
    }

    pub fn slot_of(&self, chain_id: &str) -> Option<Slot> {
        Slot::ALL
            .into_iter()
            .find(|s| self.get(*s).map(String::as_str) == Some(chain_id))
    }

    pub fn selection_info(&self, chain_id: &str) -> Option<SelectionInfo> {
        self.slot_of(chain_id).map(|slot| SelectionInfo {
            slot,
            color: slot.color(),
        })
    }

    pub fn has_any_selection(&self) -> bool {
        self.slots.iter().any(Option::is_some)
    }

    /// Occupied slots in slot order.
    pub fn selected(&self) -> Vec<(Slot, &ChainId)> {
        Slot::ALL
            .into_iter()
            .filter_map(|s| self.get(s).map(|id| (s, id)))
            .collect()
    }

    /// Place `chain_id`.
    ///
    /// - No target: a chain that already holds a slot stays put; otherwise
    ///   it takes the first empty slot (main → sub1 → sub2), or replaces
    ///   main when all are full.
    /// - With a target: the chain leaves its current slot (if different)
    ///   and takes the target, displacing the previous occupant.
    pub fn apply_selection(&mut self, chain_id: &str, target: Option<Slot>) -> Vec<SelectionEvent> {
        let current = self.slot_of(chain_id);
        let mut events = Vec::new();

        let slot = match target {
            None => {
                if current.is_some() {
                    return events;
                }
                Slot::ALL
                    .into_iter()
                    .find(|s| self.get(*s).is_none())
                    .unwrap_or(Slot::Main)
            }
            Some(target) => {
                if current == Some(target) {
                    return events;
                }
                if let Some(from) = current {
                    events.extend(self.clear_slot(from));
                }
                target
            }
        };

        let previous = self.slots[slot.position()].replace(chain_id.to_string());
        log::debug!("selection: {chain_id} → {slot} (displaced {previous:?})");
        events.push(SelectionEvent::SlotAssigned {
            slot,
            chain_id: chain_id.to_string(),
            previous,
        });
        events
    }

    pub fn clear_slot(&mut self, slot: Slot) -> Vec<SelectionEvent> {
        match self.slots[slot.position()].take() {
            Some(chain_id) => vec![SelectionEvent::SlotCleared { slot, chain_id }],
            None => Vec::new(),
        }
    }

    /// Drop a chain back to the list, wherever it is.
    pub fn remove_chain(&mut self, chain_id: &str) -> Vec<SelectionEvent> {
        match self.slot_of(chain_id) {
            Some(slot) => self.clear_slot(slot),
            None => Vec::new(),
        }
    }

    pub fn reset_all(&mut self) -> Vec<SelectionEvent> {
        Slot::ALL
            .into_iter()
            .flat_map(|slot| self.clear_slot(slot))
            .collect()
    }

    pub fn sankey_filter(&self) -> Option<&LinkFilter> {
        self.sankey_filter.as_ref()
    }

    pub fn set_sankey_filter(&mut self, filter: LinkFilter) -> Vec<SelectionEvent> {
        let key = filter.key.clone();
        self.sankey_filter = Some(filter);
        vec![SelectionEvent::SankeyFilterSet { key }]
    }

    pub fn clear_sankey_filter(&mut self) -> Vec<SelectionEvent> {
        match self.sankey_filter.take() {
            Some(_) => vec![SelectionEvent::SankeyFilterCleared],
            None => Vec::new(),
        }
    }
}
