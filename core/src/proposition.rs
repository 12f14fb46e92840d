//! Proposition records: one governance proposal, reduced to the five
//! categorical labels the Sankey flow and proposals table use.
//!
//! Input: one CSV export per chain, columns looked up by header name:
//!   id, title, type, status, ProcessingTime, Participation, Consensus
//! Missing columns behave like empty cells.

use crate::{
    config::{ClassificationThresholds, HempConfig},
    error::{HempError, HempResult},
    types::{ChainId, ProposalId, FALLBACK_ID_BASE},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Chain id → that chain's propositions, in stable key order.
pub type PropositionSet = BTreeMap<ChainId, Vec<PropositionRecord>>;

/// A closed, ordered set of labels for one Sankey column.
pub trait Category: Copy + Eq + fmt::Debug + 'static {
    /// Every variant, in canonical (layout) order.
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    /// Position within `ALL`.
    fn index(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }
}

macro_rules! category_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant,)+
        }

        impl Category for $name {
            const ALL: &'static [Self] = &[$(Self::$variant,)+];

            fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

category_enum!(
    /// Dashboard-level proposal type. Raw message types map onto these
    /// through `HempConfig::type_mapping`.
    ProposalType {
        ParameterChange => "Parameter Change",
        SoftwareUpgrade => "Software Upgrade",
        TextProposal    => "Text Proposal",
        Governance      => "Governance",
        Tokenomics      => "Tokenomics",
        Security        => "Security",
        Other           => "Other",
    }
);

category_enum!(
    ProposalResult {
        Passed   => "Passed",
        Rejected => "Rejected",
        Failed   => "Failed",
    }
);

category_enum!(
    ParticipationLevel {
        High => "High",
        Mid  => "Mid",
        Low  => "Low",
    }
);

category_enum!(
    VoteComposition {
        Consensus => "Consensus",
        Contested => "Contested",
        Polarized => "Polarized",
    }
);

category_enum!(
    ProcessingSpeed {
        Fast   => "Fast",
        Normal => "Normal",
        Slow   => "Slow",
    }
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropositionRecord {
    pub id:                  ProposalId,
    pub title:               String,
    #[serde(rename = "type")]
    pub proposal_type:       ProposalType,
    pub participation_level: ParticipationLevel,
    pub vote_composition:    VoteComposition,
    pub result:              ProposalResult,
    pub processing_speed:    ProcessingSpeed,
    /// e.g. `"PASSED (75.5%)"`. Empty for generated placeholders.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status:              String,
    /// Raw processing-time text, `"-"` when the export had none.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub processing_time:     String,
    /// Participation as a percentage string, e.g. `"61.20%"`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub participation:       String,
}

/// Threshold rules that turn raw export values into category labels.
pub struct Classifier<'a> {
    thresholds:   &'a ClassificationThresholds,
    type_mapping: &'a BTreeMap<String, ProposalType>,
}

impl<'a> Classifier<'a> {
    pub fn new(config: &'a HempConfig) -> Self {
        Self {
            thresholds:   &config.thresholds,
            type_mapping: &config.type_mapping,
        }
    }

    pub fn participation_level(&self, ratio: f64) -> ParticipationLevel {
        if ratio >= self.thresholds.participation_high {
            ParticipationLevel::High
        } else if ratio >= self.thresholds.participation_mid {
            ParticipationLevel::Mid
        } else {
            ParticipationLevel::Low
        }
    }

    pub fn vote_composition(&self, consensus: f64) -> VoteComposition {
        if consensus >= self.thresholds.consensus_high {
            VoteComposition::Consensus
        } else if consensus >= self.thresholds.consensus_mid {
            VoteComposition::Contested
        } else {
            VoteComposition::Polarized
        }
    }

    pub fn processing_speed(&self, processing_time: &str) -> ProcessingSpeed {
        if processing_time.trim().is_empty() {
            return ProcessingSpeed::Normal;
        }
        let hours = processing_hours(processing_time);
        if hours <= self.thresholds.fast_max_hours {
            ProcessingSpeed::Fast
        } else if hours <= self.thresholds.normal_max_hours {
            ProcessingSpeed::Normal
        } else {
            ProcessingSpeed::Slow
        }
    }

    pub fn result(&self, status: &str) -> ProposalResult {
        if status.is_empty() {
            return ProposalResult::Passed;
        }
        let upper = status.to_uppercase();
        if upper.contains("PASSED") {
            ProposalResult::Passed
        } else if upper.contains("REJECTED") {
            ProposalResult::Rejected
        } else {
            ProposalResult::Failed
        }
    }

    pub fn proposal_type(&self, raw: &str) -> ProposalType {
        self.type_mapping
            .get(raw)
            .copied()
            .unwrap_or(ProposalType::Other)
    }

    /// Build a record from raw field values. `line` is the 1-based data line
    /// index, used for the fallback id.
    pub fn classify(&self, raw: &RawProposition<'_>, line: u64) -> PropositionRecord {
        let id = leading_integer(raw.id).unwrap_or(FALLBACK_ID_BASE + line);
        let title = if raw.title.is_empty() {
            format!("Proposal {id}")
        } else {
            raw.title.to_string()
        };
        let participation = parse_ratio(raw.participation);
        let consensus = parse_ratio(raw.consensus);

        PropositionRecord {
            id,
            title,
            proposal_type:       self.proposal_type(raw.proposal_type),
            participation_level: self.participation_level(participation),
            vote_composition:    self.vote_composition(consensus),
            result:              self.result(raw.status),
            processing_speed:    self.processing_speed(raw.processing_time),
            status:              format_status(raw.status, participation),
            processing_time:     if raw.processing_time.is_empty() {
                "-".to_string()
            } else {
                raw.processing_time.to_string()
            },
            participation:       format_participation(participation),
        }
    }
}

/// Field values of one CSV line, borrowed from the record.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawProposition<'r> {
    pub id:              &'r str,
    pub title:           &'r str,
    pub proposal_type:   &'r str,
    pub status:          &'r str,
    pub processing_time: &'r str,
    pub participation:   &'r str,
    pub consensus:       &'r str,
}

/// Total hours from text like `"3 days, 4 hours 30 minutes"`.
/// The first number attached to each unit counts; absent units are 0.
pub fn processing_hours(text: &str) -> f64 {
    let (mut days, mut hours, mut minutes) = (None, None, None);
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        let value: u64 = text[start..i].parse().unwrap_or(0);
        let mut j = i;
        while j < bytes.len() && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        let unit = &text[j..];
        if unit.starts_with("day") {
            days.get_or_insert(value);
        } else if unit.starts_with("hour") {
            hours.get_or_insert(value);
        } else if unit.starts_with("minute") {
            minutes.get_or_insert(value);
        }
    }
    days.unwrap_or(0) as f64 * 24.0 + hours.unwrap_or(0) as f64 + minutes.unwrap_or(0) as f64 / 60.0
}

/// `"PASSED (75.5%)"`, `"REJECTED (12.0%)"`, `"FAILED"`; empty → `"PASSED"`.
pub fn format_status(status: &str, participation: f64) -> String {
    if status.is_empty() {
        return "PASSED".to_string();
    }
    let upper = status.to_uppercase();
    if upper.contains("PASSED") {
        format!("PASSED ({:.1}%)", participation * 100.0)
    } else if upper.contains("REJECTED") {
        format!("REJECTED ({:.1}%)", participation * 100.0)
    } else {
        "FAILED".to_string()
    }
}

pub fn format_participation(participation: f64) -> String {
    format!("{:.2}%", participation * 100.0)
}

fn parse_ratio(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn leading_integer(raw: &str) -> Option<ProposalId> {
    let digits: String = raw.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Parse one chain's CSV export.
pub fn propositions_from_csv<R: Read>(
    reader: R,
    classifier: &Classifier<'_>,
) -> HempResult<Vec<PropositionRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);
    let id_idx = column("id");
    let title_idx = column("title");
    let type_idx = column("type");
    let status_idx = column("status");
    let time_idx = column("ProcessingTime");
    let participation_idx = column("Participation");
    let consensus_idx = column("Consensus");

    let mut propositions = Vec::new();
    for (n, record) in csv_reader.records().enumerate() {
        let record = record?;
        // Whitespace-only line. Comma-only lines still become defaulted records.
        if record.len() == 1 && record.get(0).is_some_and(str::is_empty) {
            continue;
        }
        let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("");
        let raw = RawProposition {
            id:              field(id_idx),
            title:           field(title_idx),
            proposal_type:   field(type_idx),
            status:          field(status_idx),
            processing_time: field(time_idx),
            participation:   field(participation_idx),
            consensus:       field(consensus_idx),
        };
        // Physical line minus the header line; blank lines still count.
        let line = record
            .position()
            .map(|p| p.line().saturating_sub(1))
            .unwrap_or(n as u64 + 1);
        propositions.push(classifier.classify(&raw, line));
    }
    Ok(propositions)
}

pub fn propositions_from_file(
    path: &Path,
    classifier: &Classifier<'_>,
) -> HempResult<Vec<PropositionRecord>> {
    let file = std::fs::File::open(path)?;
    propositions_from_csv(file, classifier)
}

/// Process every configured chain file under `dir`. Missing or unreadable
/// files are logged and skipped.
pub fn load_proposition_dir(dir: &Path, config: &HempConfig) -> PropositionSet {
    let classifier = Classifier::new(config);
    let mut set = PropositionSet::new();
    let mut total = 0usize;

    for (file_name, chain_id) in &config.chain_files {
        let path = dir.join(file_name);
        if !path.is_file() {
            log::warn!("missing proposition file: {}", path.display());
            continue;
        }
        match propositions_from_file(&path, &classifier) {
            Ok(propositions) => {
                log::info!("{chain_id}: {} proposition(s)", propositions.len());
                total += propositions.len();
                set.insert(chain_id.clone(), propositions);
            }
            Err(e) => log::error!("failed to process {}: {e}", path.display()),
        }
    }

    log::info!(
        "processed {total} proposition(s) across {} chain(s) from {}",
        set.len(),
        dir.display()
    );
    set
}

/// An explicit directory must exist; otherwise the first existing candidate.
pub fn resolve_csv_dir(explicit: Option<&Path>, candidates: &[PathBuf]) -> HempResult<PathBuf> {
    if let Some(dir) = explicit {
        if dir.is_dir() {
            return Ok(dir.to_path_buf());
        }
        return Err(HempError::SourceNotFound {
            tried: dir.display().to_string(),
        });
    }
    match candidates.iter().find(|d| d.is_dir()) {
        Some(dir) => {
            log::info!("CSV directory auto-detected: {}", dir.display());
            Ok(dir.clone())
        }
        None => Err(HempError::SourceNotFound {
            tried: candidates
                .iter()
                .map(|d| d.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}
