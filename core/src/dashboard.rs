//! The dashboard state: the only mutable state in the crate.
//!
//! FLOW:
//!   DashboardCommand → Dashboard::handle → SelectionStore / LinkSelection
//!   → SelectionEvents → (main changed?) rebuild Sankey → events returned.
//!
//! RULES:
//!   - Chain and proposition data are immutable once loaded, except through
//!     `set_propositions`, which rebuilds the Sankey graph when it touches
//!     the main chain.
//!   - The Sankey graph always reflects the current main chain's
//!     propositions.
//!   - Views are derived on demand; nothing caches chart data except the
//!     Sankey graph, which link keys are resolved against.

use crate::{
    chain::{load_chains, ChainRecord},
    command::DashboardCommand,
    config::HempConfig,
    dummy::generate_propositions,
    error::{HempError, HempResult},
    event::{main_changed, SelectionEvent},
    hemp_map::{self, HempMap},
    logo::DirectoryLogos,
    proposition::{load_proposition_dir, resolve_csv_dir, PropositionRecord, PropositionSet},
    radar::{self, RadarView},
    ranking::{self, RankingEntry, SortKey},
    rng::RngBank,
    sankey::{LinkKey, LinkSelection, LinkSelectionChange, SankeyGraph},
    selection::{SelectionStore, Slot},
    source::{resolve_source, SheetFile},
    table::{self, ProposalsTable},
    types::ChainId,
};
use serde::Serialize;
use std::path::Path;

pub struct Dashboard {
    pub config:            HempConfig,
    chains:                Vec<ChainRecord>,
    propositions:          PropositionSet,
    default_propositions:  Vec<PropositionRecord>,
    pub store:             SelectionStore,
    sankey:                SankeyGraph,
    link_selection:        LinkSelection,
    sort_key:              SortKey,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotView {
    pub main: Option<ChainId>,
    pub sub1: Option<ChainId>,
    pub sub2: Option<ChainId>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub slots:         SlotView,
    pub sort_key:      SortKey,
    pub ranking:       Vec<RankingEntry>,
    pub hemp_map:      HempMap,
    pub radar:         RadarView,
    pub sankey:        SankeyGraph,
    pub selected_link: Option<LinkKey>,
    pub proposals:     ProposalsTable,
}

impl Dashboard {
    pub fn new(config: HempConfig, chains: Vec<ChainRecord>, propositions: PropositionSet) -> Self {
        let bank = RngBank::new(config.dummy.seed);
        let default_propositions =
            generate_propositions(&mut bank.for_default(), config.dummy.fallback_count);
        Self {
            config,
            chains,
            propositions,
            default_propositions,
            store: SelectionStore::new(),
            sankey: SankeyGraph::default(),
            link_selection: LinkSelection::default(),
            sort_key: SortKey::default(),
        }
    }

    /// Load chains from `source` (or the first configured candidate) and
    /// propositions from `csv_dir` (or the first configured candidate).
    /// A missing chain source is fatal; a missing CSV directory only leaves
    /// every chain on placeholder propositions.
    pub fn load(
        config: HempConfig,
        source: Option<&Path>,
        csv_dir: Option<&Path>,
    ) -> HempResult<Self> {
        let source_path = match source {
            Some(p) => resolve_source(&[p.to_path_buf()])?,
            None => resolve_source(&config.chain_sources)?,
        };
        let logos = DirectoryLogos::new(&config.logos);
        let chains = load_chains(&mut SheetFile::new(source_path), &logos)?;

        let propositions = match resolve_csv_dir(csv_dir, &config.csv_dir_candidates) {
            Ok(dir) => load_proposition_dir(&dir, &config),
            Err(e) => {
                log::warn!("no proposition data loaded: {e}");
                PropositionSet::new()
            }
        };

        Ok(Self::new(config, chains, propositions))
    }

    pub fn chains(&self) -> &[ChainRecord] {
        &self.chains
    }

    pub fn chain(&self, id: &str) -> HempResult<&ChainRecord> {
        self.chains
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| HempError::UnknownChain { id: id.to_string() })
    }

    pub fn main_chain(&self) -> Option<&ChainRecord> {
        self.store
            .main()
            .and_then(|id| self.chains.iter().find(|c| &c.id == id))
    }

    /// The chain's own propositions, or the shared placeholder set when the
    /// chain has no export at all. A loaded but empty export stays empty.
    pub fn propositions_for(&self, chain_id: &str) -> &[PropositionRecord] {
        self.propositions
            .get(chain_id)
            .map(Vec::as_slice)
            .unwrap_or(self.default_propositions.as_slice())
    }

    /// Propositions of the main chain; empty when no main chain is set.
    pub fn main_propositions(&self) -> &[PropositionRecord] {
        match self.store.main() {
            Some(id) => self.propositions_for(id),
            None => &[],
        }
    }

    pub fn sankey(&self) -> &SankeyGraph {
        &self.sankey
    }

    pub fn selected_link(&self) -> Option<&LinkKey> {
        self.link_selection.selected()
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    /// Replace one chain's propositions.
    pub fn set_propositions(
        &mut self,
        chain_id: &str,
        records: Vec<PropositionRecord>,
    ) -> HempResult<Vec<SelectionEvent>> {
        self.chain(chain_id)?;
        self.propositions.insert(chain_id.to_string(), records);
        if self.store.main().map(String::as_str) == Some(chain_id) {
            return Ok(self.rebuild_sankey());
        }
        Ok(Vec::new())
    }

    /// Apply one UI command. Unknown chain ids are rejected before any
    /// state changes.
    pub fn handle(&mut self, command: DashboardCommand) -> HempResult<Vec<SelectionEvent>> {
        let mut events = match command {
            DashboardCommand::SelectChain { chain_id } => {
                self.chain(&chain_id)?;
                self.store.apply_selection(&chain_id, None)
            }
            DashboardCommand::DropOnSlot { chain_id, slot } => {
                self.chain(&chain_id)?;
                self.store.apply_selection(&chain_id, Some(slot))
            }
            DashboardCommand::DropOnList { chain_id } => self.store.remove_chain(&chain_id),
            DashboardCommand::ClearSlot { slot } => self.store.clear_slot(slot),
            DashboardCommand::ResetAll => self.store.reset_all(),
            DashboardCommand::ClickLink { key } => {
                let change = self.link_selection.click_link(&self.sankey, &key);
                self.sync_filter(change)
            }
            DashboardCommand::ClickBackground => {
                let change = self.link_selection.click_background();
                self.sync_filter(change)
            }
            DashboardCommand::SortBy { key } => {
                self.sort_key = key;
                Vec::new()
            }
        };

        if main_changed(&events) {
            events.extend(self.rebuild_sankey());
        }
        Ok(events)
    }

    /// Bubble click by display name.
    pub fn click_bubble(&mut self, name: &str) -> HempResult<Vec<SelectionEvent>> {
        let chain_id = hemp_map::chain_by_name(&self.chains, name)
            .map(|c| c.id.clone())
            .ok_or_else(|| HempError::UnknownChain { id: name.to_string() })?;
        self.handle(DashboardCommand::SelectChain { chain_id })
    }

    fn rebuild_sankey(&mut self) -> Vec<SelectionEvent> {
        self.sankey = SankeyGraph::build(self.main_propositions());
        log::debug!(
            "sankey rebuilt for main={:?}: {} link(s)",
            self.store.main(),
            self.sankey.links.len()
        );
        match self.link_selection.reconcile(&self.sankey) {
            // Kept key: re-derive the filter from the live graph.
            LinkSelectionChange::Unchanged => match self.link_selection.filter(&self.sankey) {
                Some(filter) => self.store.set_sankey_filter(filter),
                None => Vec::new(),
            },
            other => self.sync_filter(other),
        }
    }

    fn sync_filter(&mut self, change: LinkSelectionChange) -> Vec<SelectionEvent> {
        match change {
            LinkSelectionChange::Selected(_) => match self.link_selection.filter(&self.sankey) {
                Some(filter) => self.store.set_sankey_filter(filter),
                None => Vec::new(),
            },
            LinkSelectionChange::Cleared => self.store.clear_sankey_filter(),
            LinkSelectionChange::Unchanged => Vec::new(),
        }
    }

    pub fn view(&self) -> DashboardView {
        DashboardView {
            slots: SlotView {
                main: self.store.get(Slot::Main).cloned(),
                sub1: self.store.get(Slot::Sub1).cloned(),
                sub2: self.store.get(Slot::Sub2).cloned(),
            },
            sort_key: self.sort_key,
            ranking: ranking::build(&self.chains, &self.store, self.sort_key),
            hemp_map: hemp_map::build(&self.chains, &self.store, &self.config.bubble),
            radar: radar::build(&self.chains, &self.store),
            sankey: self.sankey.clone(),
            selected_link: self.link_selection.selected().cloned(),
            proposals: table::build(self.main_propositions(), self.store.sankey_filter()),
        }
    }
}
