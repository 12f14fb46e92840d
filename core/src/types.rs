//! Shared primitive types used across the crate.

/// Slug identifying a chain, e.g. `"gravity-bridge"`.
pub type ChainId = String;

/// Numeric proposal identifier as exported by the chain's governance module.
pub type ProposalId = u64;

/// Id assigned to a proposition row whose id cell is missing or unparsable:
/// `FALLBACK_ID_BASE + line index`.
pub const FALLBACK_ID_BASE: ProposalId = 1000;
