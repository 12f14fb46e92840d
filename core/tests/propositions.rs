//! Proposition ETL: per-chain CSV exports → categorical proposition records.

use hemp_core::{
    config::HempConfig,
    proposition::{
        load_proposition_dir, processing_hours, propositions_from_csv, resolve_csv_dir,
        Classifier, ParticipationLevel, ProcessingSpeed, ProposalResult, ProposalType,
        VoteComposition,
    },
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const HEADER: &str = "id,title,type,status,ProcessingTime,Participation,Consensus";

fn parse(body: &str) -> Vec<hemp_core::proposition::PropositionRecord> {
    let config = HempConfig::default_test();
    let classifier = Classifier::new(&config);
    let csv = format!("{HEADER}\n{body}");
    propositions_from_csv(csv.as_bytes(), &classifier).expect("valid csv")
}

// ── Classification rules ──────────────────────────────────────────────────────

#[test]
fn thresholds_are_inclusive_at_the_boundary() {
    let config = HempConfig::default_test();
    let c = Classifier::new(&config);

    assert_eq!(c.participation_level(0.6), ParticipationLevel::High);
    assert_eq!(c.participation_level(0.5999), ParticipationLevel::Mid);
    assert_eq!(c.participation_level(0.3), ParticipationLevel::Mid);
    assert_eq!(c.participation_level(0.2999), ParticipationLevel::Low);

    assert_eq!(c.vote_composition(0.8), VoteComposition::Consensus);
    assert_eq!(c.vote_composition(0.5), VoteComposition::Contested);
    assert_eq!(c.vote_composition(0.49), VoteComposition::Polarized);

    assert_eq!(c.processing_speed("3 days"), ProcessingSpeed::Fast);
    assert_eq!(c.processing_speed("3 days 1 minute"), ProcessingSpeed::Normal);
    assert_eq!(c.processing_speed("5 days"), ProcessingSpeed::Normal);
    assert_eq!(c.processing_speed("5 days 1 hour"), ProcessingSpeed::Slow);
    assert_eq!(c.processing_speed(""), ProcessingSpeed::Normal);
}

#[test]
fn result_and_type_follow_the_status_and_message_rules() {
    let config = HempConfig::default_test();
    let c = Classifier::new(&config);

    assert_eq!(c.result(""), ProposalResult::Passed);
    assert_eq!(c.result("PROPOSAL_STATUS_PASSED"), ProposalResult::Passed);
    assert_eq!(c.result("rejected"), ProposalResult::Rejected);
    assert_eq!(c.result("PROPOSAL_STATUS_FAILED"), ProposalResult::Failed);

    assert_eq!(c.proposal_type("MsgExecLegacyContent"), ProposalType::SoftwareUpgrade);
    assert_eq!(c.proposal_type("MsgCommunityPoolSpend"), ProposalType::Governance);
    assert_eq!(c.proposal_type("MsgUpdateParams"), ProposalType::ParameterChange);
    assert_eq!(c.proposal_type("MsgSoftwareUpgrade"), ProposalType::Other);
    assert_eq!(c.proposal_type(""), ProposalType::Other);
}

#[test]
fn processing_text_sums_units() {
    assert_eq!(processing_hours("2 days, 3 hours"), 51.0);
    assert_eq!(processing_hours("90 minutes"), 1.5);
    assert_eq!(processing_hours("no numbers here"), 0.0);
}

// ── CSV parsing ───────────────────────────────────────────────────────────────

#[test]
fn csv_row_becomes_a_fully_labelled_record() {
    let records = parse(
        "42,\"Raise gas limit, again\",MsgUpdateParams,PROPOSAL_STATUS_PASSED,4 days,0.612,0.91\n",
    );
    assert_eq!(records.len(), 1);
    let r = &records[0];

    assert_eq!(r.id, 42);
    assert_eq!(r.title, "Raise gas limit, again");
    assert_eq!(r.proposal_type, ProposalType::ParameterChange);
    assert_eq!(r.participation_level, ParticipationLevel::High);
    assert_eq!(r.vote_composition, VoteComposition::Consensus);
    assert_eq!(r.result, ProposalResult::Passed);
    assert_eq!(r.processing_speed, ProcessingSpeed::Normal);
    assert_eq!(r.status, "PASSED (61.2%)");
    assert_eq!(r.processing_time, "4 days");
    assert_eq!(r.participation, "61.20%");
}

/// A comma-only line is a record with every cell defaulted.
#[test]
fn comma_only_line_becomes_a_defaulted_record() {
    let records = parse(",,,,,,\n");
    assert_eq!(records.len(), 1);
    let r = &records[0];

    assert_eq!(r.id, 1001);
    assert_eq!(r.title, "Proposal 1001");
    assert_eq!(r.proposal_type, ProposalType::Other);
    assert_eq!(r.result, ProposalResult::Passed);
    assert_eq!(r.participation_level, ParticipationLevel::Low);
    assert_eq!(r.vote_composition, VoteComposition::Polarized);
    assert_eq!(r.processing_speed, ProcessingSpeed::Normal);
    assert_eq!(r.status, "PASSED");
    assert_eq!(r.processing_time, "-");
    assert_eq!(r.participation, "0.00%");
}

#[test]
fn missing_values_fall_back() {
    let records = parse(",,,,,,\n   \nabc,,,PROPOSAL_STATUS_FAILED,,x,\n");
    assert_eq!(records.len(), 2, "only the whitespace-only line is skipped");
    let r = &records[1];

    assert_eq!(r.id, 1003, "fallback id counts the skipped line");
    assert_eq!(r.title, "Proposal 1003");
    assert_eq!(r.proposal_type, ProposalType::Other);
    assert_eq!(r.status, "FAILED");
    assert_eq!(r.result, ProposalResult::Failed);
    assert_eq!(r.processing_time, "-");
    assert_eq!(r.participation, "0.00%");
    assert_eq!(r.participation_level, ParticipationLevel::Low);
}

#[test]
fn missing_columns_behave_like_empty_cells() {
    let config = HempConfig::default_test();
    let classifier = Classifier::new(&config);
    let csv = "id,title\n7,Only two columns\n";
    let records = propositions_from_csv(csv.as_bytes(), &classifier).unwrap();

    assert_eq!(records[0].id, 7);
    assert_eq!(records[0].status, "PASSED");
    assert_eq!(records[0].result, ProposalResult::Passed);
    assert_eq!(records[0].processing_speed, ProcessingSpeed::Normal);
}

#[test]
fn record_serializes_with_display_labels() {
    let records = parse("1,Upgrade,MsgExecLegacyContent,,,0.1,0.1\n");
    let json = serde_json::to_value(&records[0]).unwrap();

    assert_eq!(json["type"], "Software Upgrade");
    assert_eq!(json["participationLevel"], "Low");
    assert_eq!(json["voteComposition"], "Polarized");
    assert_eq!(json["processingSpeed"], "Normal");
    assert_eq!(json["status"], "PASSED");
}

// ── Directory processing ──────────────────────────────────────────────────────

#[test]
fn directory_processing_skips_missing_and_broken_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("osmosis.csv"),
        format!("{HEADER}\n1,A,MsgUpdateParams,PASSED,1 day,0.7,0.9\n2,B,,REJECTED,,0.1,0.2\n"),
    )
    .unwrap();
    std::fs::write(dir.path().join("akash.csv"), format!("{HEADER}\n3,C,,,,,\n")).unwrap();
    // Not UTF-8: the csv reader rejects this file.
    std::fs::write(dir.path().join("kava.csv"), b"id,title\n\xff\xfe\"broken\n").unwrap();

    let set = load_proposition_dir(dir.path(), &HempConfig::default_test());

    assert!(!set.contains_key("kava"), "unreadable file is skipped");
    assert!(!set.contains_key("cosmos"), "missing file is skipped");
    // Files on either side of the broken one still load.
    assert_eq!(set["akash"].len(), 1);
    assert_eq!(set["osmosis"].len(), 2);
    assert_eq!(set.len(), 2);
    let keys: Vec<&str> = set.keys().map(String::as_str).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted, "output is keyed in stable order");
}

#[test]
fn csv_dir_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let found = dir.path().join("csv");
    std::fs::create_dir_all(&found).unwrap();

    let candidates = vec![dir.path().join("real_data"), found.clone()];
    assert_eq!(resolve_csv_dir(None, &candidates).unwrap(), found);
    assert!(resolve_csv_dir(Some(dir.path().join("nope").as_path()), &candidates).is_err());
    assert!(resolve_csv_dir(None, &[]).is_err());
}
