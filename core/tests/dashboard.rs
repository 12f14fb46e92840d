//! Dashboard state: selection → chart views, Sankey rebuilds, table linkage.

use hemp_core::{
    chain::{load_chains, ChainRecord},
    command::DashboardCommand,
    config::HempConfig,
    dashboard::Dashboard,
    error::HempError,
    event::SelectionEvent,
    hemp_map::{OPACITY_FADED, OPACITY_IDLE, OPACITY_SELECTED},
    logo::KnownLogos,
    proposition::{
        load_proposition_dir, ParticipationLevel, ProcessingSpeed, PropositionRecord,
        PropositionSet, ProposalResult, ProposalType, VoteComposition,
    },
    ranking::SortKey,
    sankey::LinkKey,
    selection::{Slot, MAIN_COLOR, UNSELECTED_COLOR},
    source::{Cell, InMemoryRows},
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn chain_row(name: &str, proposals: f64, metric: f64) -> Vec<Cell> {
    let mut row = vec![Cell::Text(name.into()), Cell::Number(proposals)];
    row.extend(std::iter::repeat(Cell::Number(metric)).take(5));
    row
}

fn chains() -> Vec<ChainRecord> {
    let mut source = InMemoryRows {
        label: "fixture".into(),
        rows: vec![
            vec![Cell::Text("name".into())],
            chain_row("Osmosis", 40.0, 8.0),
            chain_row("Cosmos", 30.0, 10.0),
            chain_row("Akash", 20.0, 6.0),
            chain_row("Kava", 10.0, 4.0),
        ],
    };
    let config = HempConfig::default_test();
    load_chains(&mut source, &KnownLogos::new(["osmosis"], &config.logos)).unwrap()
}

fn proposition(id: u64, proposal_type: ProposalType, result: ProposalResult) -> PropositionRecord {
    PropositionRecord {
        id,
        title: format!("Proposal {id}"),
        proposal_type,
        participation_level: ParticipationLevel::Mid,
        vote_composition: VoteComposition::Contested,
        result,
        processing_speed: ProcessingSpeed::Normal,
        status: String::new(),
        processing_time: String::new(),
        participation: String::new(),
    }
}

fn dashboard() -> Dashboard {
    let mut set = PropositionSet::new();
    set.insert(
        "osmosis".into(),
        vec![
            proposition(1, ProposalType::Governance, ProposalResult::Passed),
            proposition(2, ProposalType::Governance, ProposalResult::Rejected),
            proposition(3, ProposalType::Governance, ProposalResult::Passed),
            proposition(4, ProposalType::Tokenomics, ProposalResult::Passed),
        ],
    );
    set.insert(
        "cosmos".into(),
        vec![
            proposition(10, ProposalType::Security, ProposalResult::Passed),
            proposition(11, ProposalType::Security, ProposalResult::Failed),
        ],
    );
    Dashboard::new(HempConfig::default_test(), chains(), set)
}

fn select(d: &mut Dashboard, id: &str) -> Vec<SelectionEvent> {
    d.handle(DashboardCommand::SelectChain { chain_id: id.into() }).unwrap()
}

fn click(d: &mut Dashboard, key: &str) -> Vec<SelectionEvent> {
    d.handle(DashboardCommand::ClickLink { key: LinkKey(key.into()) }).unwrap()
}

// ── Sankey follows the main chain ─────────────────────────────────────────────

#[test]
fn no_main_chain_means_empty_flow() {
    let d = dashboard();
    let view = d.view();
    assert_eq!(view.sankey.total, 0);
    assert!(view.sankey.links.is_empty());
    assert_eq!(view.proposals.total, 0);
}

#[test]
fn selecting_main_builds_its_sankey() {
    let mut d = dashboard();
    select(&mut d, "osmosis");

    assert_eq!(d.sankey().total, 4);
    assert_eq!(d.main_chain().map(|c| c.name.as_str()), Some("Osmosis"));
    let link = d.sankey().link(&LinkKey("type:Governance->result:Passed".into())).unwrap();
    assert_eq!(link.value, 2);

    // A sub slot does not touch the flow.
    select(&mut d, "cosmos");
    assert_eq!(d.store.get(Slot::Sub1).map(String::as_str), Some("cosmos"));
    assert_eq!(d.sankey().total, 4);
}

#[test]
fn chain_without_data_uses_the_placeholder_set() {
    let mut d = dashboard();
    select(&mut d, "kava");

    let expected = HempConfig::default_test().dummy.fallback_count;
    assert_eq!(d.main_propositions().len(), expected);
    assert_eq!(d.sankey().total, expected as u64);
    assert!(d.main_propositions().iter().all(|p| p.id >= 1000));
}

/// A chain whose export exists but has no rows shows nothing; only a chain
/// with no export at all falls back to placeholders.
#[test]
fn header_only_export_stays_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("akash.csv"),
        "id,title,type,status,ProcessingTime,Participation,Consensus\n",
    )
    .unwrap();
    let config = HempConfig::default_test();
    let set = load_proposition_dir(dir.path(), &config);
    assert_eq!(set.get("akash").map(Vec::len), Some(0));

    let mut d = Dashboard::new(config, chains(), set);
    select(&mut d, "akash");

    let view = d.view();
    assert_eq!(view.proposals.total, 0);
    assert_eq!(view.sankey.total, 0);
    assert!(view.sankey.nodes.is_empty());

    // No export for kava: placeholders.
    d.handle(DashboardCommand::DropOnSlot { chain_id: "kava".into(), slot: Slot::Main })
        .unwrap();
    assert_eq!(d.sankey().total, 20);
}

// ── Sankey ↔ table linkage ────────────────────────────────────────────────────

#[test]
fn link_click_filters_the_table_and_second_click_restores_it() {
    let mut d = dashboard();
    select(&mut d, "osmosis");

    let events = click(&mut d, "type:Governance->result:Passed");
    assert_eq!(
        events,
        [SelectionEvent::SankeyFilterSet { key: LinkKey("type:Governance->result:Passed".into()) }]
    );
    let view = d.view();
    assert_eq!(view.proposals.total, 2);
    let ids: Vec<u64> = view.proposals.rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, [1, 3]);

    assert_eq!(click(&mut d, "type:Governance->result:Passed"), [SelectionEvent::SankeyFilterCleared]);
    assert_eq!(d.view().proposals.total, 4);
}

#[test]
fn background_click_clears_the_filter() {
    let mut d = dashboard();
    select(&mut d, "osmosis");
    click(&mut d, "type:Tokenomics->result:Passed");
    assert_eq!(d.view().proposals.total, 1);

    let events = d.handle(DashboardCommand::ClickBackground).unwrap();
    assert_eq!(events, [SelectionEvent::SankeyFilterCleared]);
    assert!(d.selected_link().is_none());
    assert!(d.store.sankey_filter().is_none());
}

#[test]
fn changing_main_drops_a_link_that_no_longer_exists() {
    let mut d = dashboard();
    select(&mut d, "osmosis");
    click(&mut d, "type:Governance->result:Passed");

    let events = d
        .handle(DashboardCommand::DropOnSlot { chain_id: "cosmos".into(), slot: Slot::Main })
        .unwrap();

    assert_eq!(
        events,
        [
            SelectionEvent::SlotAssigned {
                slot: Slot::Main,
                chain_id: "cosmos".into(),
                previous: Some("osmosis".into()),
            },
            SelectionEvent::SankeyFilterCleared,
        ]
    );
    assert!(d.selected_link().is_none());
    assert_eq!(d.view().proposals.total, 2);
}

#[test]
fn link_shared_by_the_new_main_stays_selected() {
    let mut d = dashboard();
    select(&mut d, "osmosis");
    click(&mut d, "result:Passed->participation:Mid");
    assert_eq!(d.view().proposals.total, 3);

    let events = d
        .handle(DashboardCommand::DropOnSlot { chain_id: "cosmos".into(), slot: Slot::Main })
        .unwrap();

    // The filter is re-derived against the new graph and reported.
    assert_eq!(
        events.last(),
        Some(&SelectionEvent::SankeyFilterSet {
            key: LinkKey("result:Passed->participation:Mid".into()),
        })
    );
    assert_eq!(
        d.selected_link(),
        Some(&LinkKey("result:Passed->participation:Mid".into()))
    );
    let view = d.view();
    assert_eq!(view.proposals.total, 1);
    assert_eq!(view.proposals.rows[0].id, 10);
}

#[test]
fn replacing_main_propositions_rebuilds_the_flow() {
    let mut d = dashboard();
    select(&mut d, "osmosis");
    d.set_propositions("osmosis", vec![proposition(7, ProposalType::Other, ProposalResult::Failed)])
        .unwrap();

    assert_eq!(d.sankey().total, 1);
    assert!(d.sankey().node("type:Other").is_some());
    assert!(d.set_propositions("nope", Vec::new()).is_err());
}

// ── Validation ────────────────────────────────────────────────────────────────

#[test]
fn unknown_chain_is_rejected_without_state_change() {
    let mut d = dashboard();
    let err = d
        .handle(DashboardCommand::SelectChain { chain_id: "atlantis".into() })
        .unwrap_err();
    assert!(matches!(err, HempError::UnknownChain { ref id } if id == "atlantis"));
    assert!(!d.store.has_any_selection());
}

#[test]
fn bubble_click_selects_by_display_name() {
    let mut d = dashboard();
    d.click_bubble("Akash").unwrap();
    assert_eq!(d.store.main().map(String::as_str), Some("akash"));
    assert!(d.click_bubble("akash").is_err(), "ids are not display names");
}

// ── Chart views ───────────────────────────────────────────────────────────────

#[test]
fn hemp_map_sizes_and_fades_bubbles() {
    let mut d = dashboard();

    let idle = d.view().hemp_map;
    assert!(idle.points.iter().all(|p| p.opacity == OPACITY_IDLE));
    let sizes: Vec<f64> = idle.points.iter().map(|p| p.size).collect();
    // Proposal counts 40/30/20/10 → quartiles 17.5/25/32.5.
    assert_eq!(sizes, [60.0, 50.0, 40.0, 30.0]);

    select(&mut d, "akash");
    let map = d.view().hemp_map;
    let akash = map.points.iter().find(|p| p.chain_id == "akash").unwrap();
    assert_eq!(akash.opacity, OPACITY_SELECTED);
    assert_eq!(akash.size, 50.0);
    assert_eq!(akash.border_color, MAIN_COLOR);
    let kava = map.points.iter().find(|p| p.chain_id == "kava").unwrap();
    assert_eq!(kava.opacity, OPACITY_FADED);
    assert_eq!(kava.border_color, "transparent");
}

#[test]
fn ranking_orders_by_score_or_name_with_slot_colors() {
    let mut d = dashboard();
    select(&mut d, "cosmos");

    let view = d.view();
    let order: Vec<&str> = view.ranking.iter().map(|e| e.chain_id.as_str()).collect();
    assert_eq!(order, ["cosmos", "osmosis", "akash", "kava"]);
    assert_eq!(view.ranking[0].score, 50.0);
    assert!((view.ranking[0].bar_width - 71.5).abs() < 1e-9);
    assert_eq!(view.ranking[0].color, MAIN_COLOR);
    assert_eq!(view.ranking[1].color, UNSELECTED_COLOR);

    d.handle(DashboardCommand::SortBy { key: SortKey::Name }).unwrap();
    let view = d.view();
    let order: Vec<&str> = view.ranking.iter().map(|e| e.chain_id.as_str()).collect();
    assert_eq!(order, ["akash", "cosmos", "kava", "osmosis"]);
}

#[test]
fn radar_has_one_series_per_occupied_slot() {
    let mut d = dashboard();
    select(&mut d, "osmosis");
    d.handle(DashboardCommand::DropOnSlot { chain_id: "kava".into(), slot: Slot::Sub2 })
        .unwrap();

    let radar = d.view().radar;
    assert_eq!(radar.indicators.len(), 5);
    assert!(radar.indicators.iter().all(|i| i.max == 10.0));
    let slots: Vec<Slot> = radar.series.iter().map(|s| s.slot).collect();
    assert_eq!(slots, [Slot::Main, Slot::Sub2]);
    assert_eq!(radar.series[1].values, [4.0; 5]);
}

#[test]
fn reset_clears_every_slot_and_the_flow() {
    let mut d = dashboard();
    select(&mut d, "osmosis");
    select(&mut d, "cosmos");

    let events = d.handle(DashboardCommand::ResetAll).unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(d.sankey().total, 0);
    assert!(d.view().radar.series.is_empty());
}

#[test]
fn view_serializes_for_the_front_end() {
    let mut d = dashboard();
    select(&mut d, "osmosis");
    let json = serde_json::to_value(d.view()).unwrap();

    assert_eq!(json["slots"]["main"], "osmosis");
    assert!(json["slots"]["sub1"].is_null());
    assert_eq!(json["sortKey"], "score");
    assert_eq!(json["hempMap"]["points"][0]["logoUrl"], "/logos/osmosis.png");
    assert_eq!(json["proposals"]["rows"][0]["status"], "PASSED");
}
