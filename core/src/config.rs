use crate::{proposition::ProposalType, types::ChainId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Thresholds used to turn continuous proposal metrics into categories.
/// Every comparison is inclusive at the boundary (`>=` / `<=`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationThresholds {
    pub participation_high: f64,
    pub participation_mid:  f64,
    pub consensus_high:     f64,
    pub consensus_mid:      f64,
    /// Total hours at or below which a proposal counts as "Fast".
    pub fast_max_hours:     f64,
    /// Total hours at or below which a proposal counts as "Normal".
    pub normal_max_hours:   f64,
}

impl Default for ClassificationThresholds {
    fn default() -> Self {
        Self {
            participation_high: 0.6,
            participation_mid:  0.3,
            consensus_high:     0.8,
            consensus_mid:      0.5,
            fast_max_hours:     72.0,  // 3 days
            normal_max_hours:   120.0, // 5 days
        }
    }
}

/// Bubble diameters (px) per proposal-count quartile bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleSizes {
    pub small:           f64,
    pub medium:          f64,
    pub large:           f64,
    pub huge:            f64,
    pub selected_offset: f64,
}

impl Default for BubbleSizes {
    fn default() -> Self {
        Self {
            small:           30.0,
            medium:          40.0,
            large:           50.0,
            huge:            60.0,
            selected_offset: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoConfig {
    /// Directory searched for `{id}.png`.
    pub dir:           PathBuf,
    /// URL prefix the front end serves `dir` under.
    pub public_prefix: String,
    pub fallback:      String,
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            dir:           PathBuf::from("public/logos"),
            public_prefix: "/logos".into(),
            fallback:      "/logos/chainImg.png".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DummyConfig {
    pub seed:           u64,
    /// Size of the placeholder proposition set used when a chain has no data.
    pub fallback_count: usize,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self { seed: 0x4E4D_5000, fallback_count: 100 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HempConfig {
    /// Chain spreadsheets, tried in order. The first existing file wins.
    pub chain_sources:            Vec<PathBuf>,
    /// Directories searched for per-chain CSVs when none is given.
    pub csv_dir_candidates:       Vec<PathBuf>,
    /// CSV file name → chain id.
    pub chain_files:              BTreeMap<String, ChainId>,
    /// Raw governance message type → dashboard proposal type.
    pub type_mapping:             BTreeMap<String, ProposalType>,
    pub thresholds:               ClassificationThresholds,
    pub bubble:                   BubbleSizes,
    pub logos:                    LogoConfig,
    pub dummy:                    DummyConfig,
    pub chains_module_path:       PathBuf,
    pub propositions_module_path: PathBuf,
}

const DEFAULT_CHAINS: [&str; 17] = [
    "agoric", "akash", "axelar", "chihuahua", "cosmos", "dydx",
    "gravity-bridge", "injective", "kava", "osmosis", "persistence",
    "provenance", "secret", "sei", "stargaze", "stride", "terra",
];

impl Default for HempConfig {
    fn default() -> Self {
        let chain_files = DEFAULT_CHAINS
            .iter()
            .map(|id| (format!("{id}.csv"), id.to_string()))
            .collect();

        let type_mapping = [
            ("MsgExecLegacyContent",  ProposalType::SoftwareUpgrade),
            ("MsgCommunityPoolSpend", ProposalType::Governance),
            ("MsgUpdateParams",       ProposalType::ParameterChange),
        ]
        .into_iter()
        .map(|(raw, ty)| (raw.to_string(), ty))
        .collect();

        let mut csv_dir_candidates = vec![
            PathBuf::from("real_data"),
            PathBuf::from("data/csv"),
            PathBuf::from("csv"),
        ];
        if let Some(home) = std::env::var_os("HOME") {
            csv_dir_candidates.push(PathBuf::from(home).join("Downloads"));
        }

        Self {
            chain_sources: vec![
                PathBuf::from("real_data/_HEMP_processed_data.xlsx"),
                PathBuf::from("hemp_data.xlsx"),
            ],
            csv_dir_candidates,
            chain_files,
            type_mapping,
            thresholds:               ClassificationThresholds::default(),
            bubble:                   BubbleSizes::default(),
            logos:                    LogoConfig::default(),
            dummy:                    DummyConfig::default(),
            chains_module_path:       PathBuf::from("src/data/mockData.js"),
            propositions_module_path: PathBuf::from("src/data/sankeyMockData.js"),
        }
    }
}

impl HempConfig {
    /// Load overrides from a JSON file. Missing keys keep their defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: HempConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {path}: {e}"))?;
        log::debug!(
            "config loaded from {path}: {} chain files, {} type mappings",
            config.chain_files.len(),
            config.type_mapping.len()
        );
        Ok(config)
    }

    /// `load` when a path is given, defaults otherwise.
    pub fn load_or_default(path: Option<&str>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Config with a small fixed dummy set and no filesystem search paths,
    /// for unit and integration tests.
    pub fn default_test() -> Self {
        Self {
            chain_sources: Vec::new(),
            csv_dir_candidates: Vec::new(),
            dummy: DummyConfig { seed: 42, fallback_count: 20 },
            ..Self::default()
        }
    }
}
