//! HEMP rank list: chains sorted by score or name, with slot highlights.

use crate::{
    chain::ChainRecord,
    selection::{selection_color, SelectionStore, Slot},
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Pixel width of a full score bar.
pub const MAX_BAR_WIDTH: f64 = 143.0;
const BAR_PX_PER_POINT: f64 = 1.43;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Score,
    Name,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub rank:      usize,
    pub chain_id:  String,
    pub name:      String,
    pub score:     f64,
    pub bar_width: f64,
    pub selection: Option<Slot>,
    pub color:     &'static str,
}

pub fn bar_width(score: f64) -> f64 {
    (score * BAR_PX_PER_POINT).clamp(0.0, MAX_BAR_WIDTH)
}

fn by_name(a: &ChainRecord, b: &ChainRecord) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

/// Score descending (ties by name), or name ascending, case-insensitive.
pub fn sorted_chains(chains: &[ChainRecord], key: SortKey) -> Vec<&ChainRecord> {
    let mut sorted: Vec<&ChainRecord> = chains.iter().collect();
    match key {
        SortKey::Score => sorted.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| by_name(a, b))),
        SortKey::Name => sorted.sort_by(|a, b| by_name(a, b)),
    }
    sorted
}

pub fn build(chains: &[ChainRecord], store: &SelectionStore, key: SortKey) -> Vec<RankingEntry> {
    sorted_chains(chains, key)
        .into_iter()
        .enumerate()
        .map(|(i, chain)| {
            let info = store.selection_info(&chain.id);
            RankingEntry {
                rank: i + 1,
                chain_id: chain.id.clone(),
                name: chain.name.clone(),
                score: chain.score,
                bar_width: bar_width(chain.score),
                selection: info.map(|s| s.slot),
                color: selection_color(info),
            }
        })
        .collect()
}
