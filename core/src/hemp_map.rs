//! HEMP map: one bubble per chain at (score, participation).
//!
//! Bubble size comes from the chain's proposal-count quartile bucket,
//! computed over the whole loaded chain set. Selected chains grow by
//! `selected_offset` and are drawn opaque with their slot color; when any
//! chain is selected the others fade.

use crate::{
    bucket::{median, median_band, MedianBand, Quartiles, SizeBucket},
    chain::ChainRecord,
    config::BubbleSizes,
    selection::{SelectionStore, Slot},
};
use serde::Serialize;

pub const OPACITY_SELECTED: f64 = 1.0;
pub const OPACITY_FADED: f64 = 0.3;
pub const OPACITY_IDLE: f64 = 0.85;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BubblePoint {
    pub chain_id:           String,
    pub name:               String,
    pub logo_url:           String,
    /// HEMP score.
    pub x:                  f64,
    /// Participation.
    pub y:                  f64,
    pub proposals:          f64,
    pub size_bucket:        SizeBucket,
    pub size:               f64,
    pub participation_band: MedianBand,
    pub opacity:            f64,
    pub selection:          Option<Slot>,
    pub border_color:       &'static str,
    pub border_width:       f64,
    pub z:                  u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HempMap {
    pub points:               Vec<BubblePoint>,
    /// Proposal-count thresholds; `None` when no chains are loaded.
    pub proposal_quartiles:   Option<Quartiles>,
    pub participation_median: Option<f64>,
}

pub fn bubble_size(bucket: SizeBucket, selected: bool, sizes: &BubbleSizes) -> f64 {
    let base = match bucket {
        SizeBucket::Small  => sizes.small,
        SizeBucket::Medium => sizes.medium,
        SizeBucket::Large  => sizes.large,
        SizeBucket::Huge   => sizes.huge,
    };
    if selected { base + sizes.selected_offset } else { base }
}

pub fn build(chains: &[ChainRecord], store: &SelectionStore, sizes: &BubbleSizes) -> HempMap {
    let counts: Vec<f64> = chains.iter().map(|c| c.proposals).collect();
    let participations: Vec<f64> = chains.iter().map(|c| c.participation).collect();
    let proposal_quartiles = Quartiles::of(&counts);
    let participation_median = median(&participations);
    let any_selected = store.has_any_selection();

    let points = chains
        .iter()
        .map(|chain| {
            let info = store.selection_info(&chain.id);
            let selected = info.is_some();
            let size_bucket = proposal_quartiles
                .map(|q| q.bucket(chain.proposals))
                .unwrap_or(SizeBucket::Small);
            let opacity = if selected {
                OPACITY_SELECTED
            } else if any_selected {
                OPACITY_FADED
            } else {
                OPACITY_IDLE
            };
            BubblePoint {
                chain_id: chain.id.clone(),
                name: chain.name.clone(),
                logo_url: chain.logo_url.clone(),
                x: chain.score,
                y: chain.participation,
                proposals: chain.proposals,
                size_bucket,
                size: bubble_size(size_bucket, selected, sizes),
                participation_band: median_band(
                    chain.participation,
                    participation_median.unwrap_or(0.0),
                ),
                opacity,
                selection: info.map(|i| i.slot),
                border_color: info.map(|i| i.color).unwrap_or("transparent"),
                border_width: if selected { 3.0 } else { 0.0 },
                z: if selected { 10 } else { 2 },
            }
        })
        .collect();

    HempMap {
        points,
        proposal_quartiles,
        participation_median,
    }
}

/// Bubble click target: chains are addressed by display name.
pub fn chain_by_name<'a>(chains: &'a [ChainRecord], name: &str) -> Option<&'a ChainRecord> {
    chains.iter().find(|c| c.name == name)
}
