//! Radar profile of the selected chains across the five HEMP sub-metrics.

use crate::{
    chain::ChainRecord,
    selection::{SelectionStore, Slot},
};
use serde::Serialize;

pub const INDICATOR_NAMES: [&str; 5] = ["Participation", "Consensus", "Stability", "Rejection", "VIB"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarIndicator {
    pub name: &'static str,
    /// Axis maximum: the largest value of this metric over all chains.
    pub max:  f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarSeries {
    pub slot:     Slot,
    pub chain_id: String,
    pub name:     String,
    pub color:    &'static str,
    pub values:   [f64; 5],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarView {
    pub indicators: Vec<RadarIndicator>,
    pub series:     Vec<RadarSeries>,
}

pub fn indicators(chains: &[ChainRecord]) -> Vec<RadarIndicator> {
    INDICATOR_NAMES
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let max = chains
                .iter()
                .map(|c| c.metrics()[i])
                .fold(0.0f64, f64::max);
            // A zero axis cannot be drawn.
            RadarIndicator {
                name,
                max: if max > 0.0 { max } else { 1.0 },
            }
        })
        .collect()
}

/// One series per occupied slot, in slot order.
pub fn build(chains: &[ChainRecord], store: &SelectionStore) -> RadarView {
    let series = store
        .selected()
        .into_iter()
        .filter_map(|(slot, id)| {
            let chain = chains.iter().find(|c| &c.id == id)?;
            Some(RadarSeries {
                slot,
                chain_id: chain.id.clone(),
                name: chain.name.clone(),
                color: slot.color(),
                values: chain.metrics(),
            })
        })
        .collect();

    RadarView {
        indicators: indicators(chains),
        series,
    }
}
