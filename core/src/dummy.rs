//! Placeholder propositions for chains without an export.
//!
//! Each label is drawn uniformly from its column. Generated records carry
//! only the categorical fields; the display fields stay empty and the
//! proposals table fills them from the category (see `table`).

use crate::{
    proposition::{
        Category, ParticipationLevel, ProcessingSpeed, PropositionRecord, ProposalResult,
        ProposalType, VoteComposition,
    },
    rng::SeededRng,
    types::FALLBACK_ID_BASE,
};

pub fn generate_propositions(rng: &mut SeededRng, count: usize) -> Vec<PropositionRecord> {
    let propositions: Vec<PropositionRecord> = (0..count)
        .map(|i| {
            let id = FALLBACK_ID_BASE + i as u64;
            PropositionRecord {
                id,
                title:               format!("Proposal {id}"),
                proposal_type:       rng.choose(ProposalType::ALL),
                participation_level: rng.choose(ParticipationLevel::ALL),
                vote_composition:    rng.choose(VoteComposition::ALL),
                result:              rng.choose(ProposalResult::ALL),
                processing_speed:    rng.choose(ProcessingSpeed::ALL),
                status:              String::new(),
                processing_time:     String::new(),
                participation:       String::new(),
            }
        })
        .collect();
    log::debug!("generated {count} placeholder proposition(s) for '{}'", rng.name);
    propositions
}
