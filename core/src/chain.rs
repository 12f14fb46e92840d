//! Chain records: one row of the HEMP spreadsheet per chain.
//!
//! Column layout (positional, header row dropped):
//!   0 name | 1 proposals | 2 participation | 3 consensus
//!   4 stability | 5 rejection | 6 vib

use crate::{
    error::HempResult,
    logo::LogoResolver,
    source::{Cell, RowSource},
    types::ChainId,
};
use serde::{Deserialize, Serialize};

/// Neutral bubble/card color for chains that hold no selection slot.
pub const DEFAULT_CHAIN_COLOR: &str = "#A0A0A0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainRecord {
    pub id:            ChainId,
    pub name:          String,
    /// HEMP score: the five sub-metrics summed, rounded to 2 decimals.
    pub score:         f64,
    pub logo_url:      String,
    /// Kept as exported; fractional counts are not rounded.
    pub proposals:     f64,
    pub participation: f64,
    pub consensus:     f64,
    pub stability:     f64,
    pub rejection:     f64,
    pub vib:           f64,
    pub color:         String,
}

impl ChainRecord {
    /// The five HEMP sub-metrics in radar order.
    pub fn metrics(&self) -> [f64; 5] {
        [
            self.participation,
            self.consensus,
            self.stability,
            self.rejection,
            self.vib,
        ]
    }
}

/// Lowercase, trim, collapse whitespace runs into `-`.
pub fn slugify(name: &str) -> ChainId {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Map one data row to a record. Returns `None` when the name cell is empty.
pub fn chain_from_row(row: &[Cell], logos: &dyn LogoResolver) -> Option<ChainRecord> {
    let cell = |i: usize| row.get(i).unwrap_or(&Cell::Empty);

    let name = cell(0).as_text()?;
    let id = slugify(&name);
    let proposals = cell(1).as_number();
    let participation = cell(2).as_number();
    let consensus = cell(3).as_number();
    let stability = cell(4).as_number();
    let rejection = cell(5).as_number();
    let vib = cell(6).as_number();

    let score = round2(participation + consensus + stability + rejection + vib);
    let logo_url = logos.resolve(&id);

    Some(ChainRecord {
        id,
        name,
        score,
        logo_url,
        proposals,
        participation,
        consensus,
        stability,
        rejection,
        vib,
        color: DEFAULT_CHAIN_COLOR.to_string(),
    })
}

/// Transform every data row (header skipped), dropping unnamed rows.
pub fn chains_from_rows(rows: &[Vec<Cell>], logos: &dyn LogoResolver) -> Vec<ChainRecord> {
    let mut dropped = 0usize;
    let chains: Vec<ChainRecord> = rows
        .iter()
        .skip(1)
        .filter_map(|row| {
            let chain = chain_from_row(row, logos);
            if chain.is_none() {
                dropped += 1;
            }
            chain
        })
        .collect();
    if dropped > 0 {
        log::warn!("dropped {dropped} row(s) without a chain name");
    }
    chains
}

/// Read a source and transform it into the flat chain set.
pub fn load_chains(
    source: &mut dyn RowSource,
    logos: &dyn LogoResolver,
) -> HempResult<Vec<ChainRecord>> {
    log::info!("loading chain data from {}", source.describe());
    let rows = source.read_rows()?;
    let chains = chains_from_rows(&rows, logos);
    log::info!("transformed {} chain(s)", chains.len());
    Ok(chains)
}
