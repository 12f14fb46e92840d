//! Generated data modules: the ETL's output format.
//!
//! Each module is a JavaScript file the front end imports directly:
//!
//!   // [auto-generated] ...
//!   // generated at: 2025-12-06 20:27:35 UTC
//!
//!   export const mockChains = [ ... ];
//!
//! JSON bodies use 2-space pretty printing.

use crate::{
    chain::ChainRecord,
    error::HempResult,
    proposition::{PropositionRecord, PropositionSet},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

pub const CHAINS_EXPORT: &str = "mockChains";
pub const PROPOSITIONS_EXPORT: &str = "sankeyMockPropositions";
pub const DEFAULT_PROPOSITIONS_EXPORT: &str = "defaultDummyPropositions";

fn header(description: &str, generated_at: DateTime<Utc>) -> String {
    format!(
        "// [auto-generated] {description}\n// generated at: {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

fn export_const<T: Serialize + ?Sized>(name: &str, value: &T) -> HempResult<String> {
    Ok(format!("export const {name} = {};\n", serde_json::to_string_pretty(value)?))
}

pub fn chains_module(chains: &[ChainRecord], generated_at: DateTime<Utc>) -> HempResult<String> {
    Ok(format!(
        "{}\n{}",
        header("chain records with per-chain logo mapping", generated_at),
        export_const(CHAINS_EXPORT, chains)?
    ))
}

pub fn propositions_module(
    set: &PropositionSet,
    defaults: &[PropositionRecord],
    generated_at: DateTime<Utc>,
) -> HempResult<String> {
    Ok(format!(
        "{}// each proposition has type, participationLevel, voteComposition, result, processingSpeed\n\n{}\n// placeholder set for chains without an export\n{}",
        header("propositions converted from per-chain CSV exports", generated_at),
        export_const(PROPOSITIONS_EXPORT, set)?,
        export_const(DEFAULT_PROPOSITIONS_EXPORT, defaults)?
    ))
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> HempResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Write `content`, creating parent directories as needed.
pub fn write_module(path: &Path, content: &str) -> HempResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    log::info!("wrote {} ({} bytes)", path.display(), content.len());
    Ok(())
}
