//! Proposals table for the main chain, optionally narrowed to the records
//! behind the selected Sankey link.

use crate::{
    proposition::{ProcessingSpeed, PropositionRecord, ProposalResult},
    sankey::LinkFilter,
    types::ProposalId,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Passed,
    Rejected,
    Voting,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub id:              ProposalId,
    pub title:           String,
    #[serde(rename = "type")]
    pub proposal_type:   String,
    pub participation:   String,
    pub status:          String,
    pub status_tone:     StatusTone,
    pub processing_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProposalsTable {
    /// Row count after filtering.
    pub total: usize,
    pub rows:  Vec<TableRow>,
}

/// Exported status, or one derived from the result for placeholders.
pub fn display_status(record: &PropositionRecord) -> String {
    if !record.status.is_empty() {
        return record.status.clone();
    }
    match record.result {
        ProposalResult::Passed   => "PASSED".into(),
        ProposalResult::Rejected => "REJECTED".into(),
        ProposalResult::Failed   => "VOTING PERIOD".into(),
    }
}

/// Exported processing time, or a typical range for the speed bucket.
pub fn display_processing_time(record: &PropositionRecord) -> String {
    if !record.processing_time.is_empty() {
        return record.processing_time.clone();
    }
    match record.processing_speed {
        ProcessingSpeed::Fast   => "1-2 days".into(),
        ProcessingSpeed::Normal => "2-5 days".into(),
        ProcessingSpeed::Slow   => "4-9 days".into(),
    }
}

pub fn status_tone(status: &str) -> StatusTone {
    if status.contains("PASSED") {
        StatusTone::Passed
    } else if status.contains("REJECTED") {
        StatusTone::Rejected
    } else if status.contains("VOTING") {
        StatusTone::Voting
    } else {
        StatusTone::Neutral
    }
}

pub fn row(record: &PropositionRecord) -> TableRow {
    let status = display_status(record);
    TableRow {
        id: record.id,
        title: if record.title.is_empty() {
            "Proposal Title".into()
        } else {
            record.title.clone()
        },
        proposal_type: record.proposal_type.to_string(),
        participation: if record.participation.is_empty() {
            "0.00%".into()
        } else {
            record.participation.clone()
        },
        status_tone: status_tone(&status),
        status,
        processing_time: display_processing_time(record),
    }
}

pub fn build(records: &[PropositionRecord], filter: Option<&LinkFilter>) -> ProposalsTable {
    let rows: Vec<TableRow> = records
        .iter()
        .filter(|r| filter.map_or(true, |f| f.matches(r)))
        .map(row)
        .collect();
    ProposalsTable {
        total: rows.len(),
        rows,
    }
}
