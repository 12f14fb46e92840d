//! hemp-core: chain health analytics behind the HEMP governance dashboard.
//!
//! PIPELINE:
//!   spreadsheet / CSV → row transform (chain, proposition)
//!   → flat record sets → per-chart aggregation (hemp_map, radar, sankey,
//!   ranking, table) → export as generated data modules.
//!
//! The only mutable state is the in-memory selection store owned by
//! `dashboard::Dashboard`.

pub mod bucket;
pub mod chain;
pub mod command;
pub mod config;
pub mod dashboard;
pub mod dummy;
pub mod error;
pub mod event;
pub mod export;
pub mod hemp_map;
pub mod logo;
pub mod proposition;
pub mod radar;
pub mod ranking;
pub mod rng;
pub mod sankey;
pub mod selection;
pub mod source;
pub mod table;
pub mod types;
