//! Sankey flow over a chain's propositions.
//!
//! COLUMNS (fixed, left to right):
//!   Type → Result → Participation → Vote Composition → Processing Speed
//!
//! Every proposition contributes 1 to one node per column and 1 to one link
//! per adjacent column pair. Nodes and links are emitted in canonical index
//! order, so the layout does not depend on input order.
//!
//! Link keys are derived from node ids (`"type:Governance->result:Passed"`)
//! and stay stable across rebuilds; `LinkSelection` keys on them.

use crate::proposition::{
    Category, ParticipationLevel, ProcessingSpeed, PropositionRecord, ProposalResult,
    ProposalType, VoteComposition,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Type,
    Result,
    Participation,
    VoteComposition,
    ProcessingSpeed,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Type,
        Column::Result,
        Column::Participation,
        Column::VoteComposition,
        Column::ProcessingSpeed,
    ];

    pub fn depth(self) -> usize {
        self as usize
    }

    /// Stable id prefix used in node ids and link keys.
    pub fn slug(self) -> &'static str {
        match self {
            Column::Type            => "type",
            Column::Result          => "result",
            Column::Participation   => "participation",
            Column::VoteComposition => "vote",
            Column::ProcessingSpeed => "speed",
        }
    }

    pub fn category_count(self) -> usize {
        match self {
            Column::Type            => ProposalType::ALL.len(),
            Column::Result          => ProposalResult::ALL.len(),
            Column::Participation   => ParticipationLevel::ALL.len(),
            Column::VoteComposition => VoteComposition::ALL.len(),
            Column::ProcessingSpeed => ProcessingSpeed::ALL.len(),
        }
    }

    /// Label of the category at `index` within this column.
    pub fn label_at(self, index: usize) -> &'static str {
        fn pick<C: Category>(index: usize) -> &'static str {
            C::ALL.get(index).map(|c| c.label()).unwrap_or("")
        }
        match self {
            Column::Type            => pick::<ProposalType>(index),
            Column::Result          => pick::<ProposalResult>(index),
            Column::Participation   => pick::<ParticipationLevel>(index),
            Column::VoteComposition => pick::<VoteComposition>(index),
            Column::ProcessingSpeed => pick::<ProcessingSpeed>(index),
        }
    }

    /// Category index of `record` within this column.
    pub fn category_of(self, record: &PropositionRecord) -> usize {
        match self {
            Column::Type            => record.proposal_type.index(),
            Column::Result          => record.result.index(),
            Column::Participation   => record.participation_level.index(),
            Column::VoteComposition => record.vote_composition.index(),
            Column::ProcessingSpeed => record.processing_speed.index(),
        }
    }

    /// Global node index of the first category in this column.
    fn offset(self) -> usize {
        Column::ALL[..self.depth()]
            .iter()
            .map(|c| c.category_count())
            .sum()
    }

    fn node_id(self, category: usize) -> String {
        format!("{}:{}", self.slug(), self.label_at(category))
    }
}

fn node_count() -> usize {
    Column::ALL.iter().map(|c| c.category_count()).sum()
}

/// Global node index → (column, category index).
fn locate(global: usize) -> (Column, usize) {
    let mut rest = global;
    for column in Column::ALL {
        if rest < column.category_count() {
            return (column, rest);
        }
        rest -= column.category_count();
    }
    (Column::ProcessingSpeed, 0)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkKey(pub String);

impl fmt::Display for LinkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SankeyNode {
    pub id:     String,
    pub name:   String,
    pub column: Column,
    pub depth:  usize,
    pub index:  usize,
    pub value:  u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SankeyLink {
    pub key:           LinkKey,
    /// Source node id.
    pub source:        String,
    /// Target node id.
    pub target:        String,
    pub source_index:  usize,
    pub target_index:  usize,
    pub value:         u64,
    /// Originating proposal type; only set on links leaving the Type column.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub proposal_type: Option<ProposalType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SankeyGraph {
    pub nodes: Vec<SankeyNode>,
    pub links: Vec<SankeyLink>,
    /// Number of propositions aggregated.
    pub total: u64,
}

impl SankeyGraph {
    pub fn build(records: &[PropositionRecord]) -> Self {
        let mut node_values = vec![0u64; node_count()];
        let mut link_values: BTreeMap<(usize, usize), u64> = BTreeMap::new();

        for record in records {
            let path: Vec<usize> = Column::ALL
                .iter()
                .map(|c| c.offset() + c.category_of(record))
                .collect();
            for &node in &path {
                node_values[node] += 1;
            }
            for pair in path.windows(2) {
                *link_values.entry((pair[0], pair[1])).or_insert(0) += 1;
            }
        }

        let nodes = node_values
            .iter()
            .enumerate()
            .filter(|(_, value)| **value > 0)
            .map(|(index, value)| {
                let (column, category) = locate(index);
                SankeyNode {
                    id: column.node_id(category),
                    name: column.label_at(category).to_string(),
                    column,
                    depth: column.depth(),
                    index,
                    value: *value,
                }
            })
            .collect();

        let links = link_values
            .into_iter()
            .map(|((source_index, target_index), value)| {
                let (source_column, source_category) = locate(source_index);
                let (target_column, target_category) = locate(target_index);
                let source = source_column.node_id(source_category);
                let target = target_column.node_id(target_category);
                let proposal_type = (source_column == Column::Type)
                    .then(|| ProposalType::ALL[source_category]);
                SankeyLink {
                    key: LinkKey(format!("{source}->{target}")),
                    source,
                    target,
                    source_index,
                    target_index,
                    value,
                    proposal_type,
                }
            })
            .collect::<Vec<_>>();

        log::debug!(
            "sankey built: {} record(s), {} node(s), {} link(s)",
            records.len(),
            node_values.iter().filter(|v| **v > 0).count(),
            links.len()
        );

        Self {
            nodes,
            links,
            total: records.len() as u64,
        }
    }

    pub fn link(&self, key: &LinkKey) -> Option<&SankeyLink> {
        self.links.iter().find(|l| &l.key == key)
    }

    pub fn node(&self, id: &str) -> Option<&SankeyNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Links between `column` and the next column.
    pub fn links_from(&self, column: Column) -> impl Iterator<Item = &SankeyLink> {
        let start = column.offset();
        let end = start + column.category_count();
        self.links
            .iter()
            .filter(move |l| (start..end).contains(&l.source_index))
    }
}

/// Proposition filter derived from a selected link: records whose category
/// in `source_column` and `target_column` match the link's endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkFilter {
    pub key:             LinkKey,
    pub source_column:   Column,
    pub source_category: usize,
    pub target_column:   Column,
    pub target_category: usize,
}

impl LinkFilter {
    pub fn from_link(link: &SankeyLink) -> Self {
        let (source_column, source_category) = locate(link.source_index);
        let (target_column, target_category) = locate(link.target_index);
        Self {
            key: link.key.clone(),
            source_column,
            source_category,
            target_column,
            target_category,
        }
    }

    pub fn matches(&self, record: &PropositionRecord) -> bool {
        self.source_column.category_of(record) == self.source_category
            && self.target_column.category_of(record) == self.target_category
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkSelectionChange {
    Selected(LinkKey),
    Cleared,
    Unchanged,
}

/// At most one highlighted link. Click toggles; background click clears.
#[derive(Debug, Clone, Default)]
pub struct LinkSelection {
    selected: Option<LinkKey>,
}

impl LinkSelection {
    pub fn selected(&self) -> Option<&LinkKey> {
        self.selected.as_ref()
    }

    pub fn click_link(&mut self, graph: &SankeyGraph, key: &LinkKey) -> LinkSelectionChange {
        if graph.link(key).is_none() {
            log::debug!("click on unknown link '{key}' ignored");
            return LinkSelectionChange::Unchanged;
        }
        if self.selected.as_ref() == Some(key) {
            self.selected = None;
            LinkSelectionChange::Cleared
        } else {
            self.selected = Some(key.clone());
            LinkSelectionChange::Selected(key.clone())
        }
    }

    pub fn click_background(&mut self) -> LinkSelectionChange {
        match self.selected.take() {
            Some(_) => LinkSelectionChange::Cleared,
            None => LinkSelectionChange::Unchanged,
        }
    }

    /// Keep the selection across a rebuild only if its key still exists.
    pub fn reconcile(&mut self, graph: &SankeyGraph) -> LinkSelectionChange {
        match &self.selected {
            Some(key) if graph.link(key).is_none() => {
                self.selected = None;
                LinkSelectionChange::Cleared
            }
            _ => LinkSelectionChange::Unchanged,
        }
    }

    pub fn filter(&self, graph: &SankeyGraph) -> Option<LinkFilter> {
        self.selected
            .as_ref()
            .and_then(|key| graph.link(key))
            .map(LinkFilter::from_link)
    }
}
