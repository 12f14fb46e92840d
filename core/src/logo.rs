//! Per-chain logo lookup with a shared fallback image.

use crate::config::LogoConfig;
use std::collections::BTreeSet;
use std::path::PathBuf;

pub trait LogoResolver {
    /// Public URL of the logo for `chain_id`.
    fn resolve(&self, chain_id: &str) -> String;
}

/// Looks for `{dir}/{id}.png` on disk.
pub struct DirectoryLogos {
    dir:           PathBuf,
    public_prefix: String,
    fallback:      String,
}

impl DirectoryLogos {
    pub fn new(config: &LogoConfig) -> Self {
        Self {
            dir:           config.dir.clone(),
            public_prefix: config.public_prefix.trim_end_matches('/').to_string(),
            fallback:      config.fallback.clone(),
        }
    }
}

impl LogoResolver for DirectoryLogos {
    fn resolve(&self, chain_id: &str) -> String {
        let file = format!("{chain_id}.png");
        if !chain_id.is_empty() && self.dir.join(&file).is_file() {
            format!("{}/{file}", self.public_prefix)
        } else {
            log::debug!("no logo for '{chain_id}' in {}, using fallback", self.dir.display());
            self.fallback.clone()
        }
    }
}

/// A fixed set of chain ids known to have logos.
pub struct KnownLogos {
    ids:           BTreeSet<String>,
    public_prefix: String,
    fallback:      String,
}

impl KnownLogos {
    pub fn new<I, S>(ids: I, config: &LogoConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids:           ids.into_iter().map(Into::into).collect(),
            public_prefix: config.public_prefix.trim_end_matches('/').to_string(),
            fallback:      config.fallback.clone(),
        }
    }
}

impl LogoResolver for KnownLogos {
    fn resolve(&self, chain_id: &str) -> String {
        if self.ids.contains(chain_id) {
            format!("{}/{chain_id}.png", self.public_prefix)
        } else {
            self.fallback.clone()
        }
    }
}
