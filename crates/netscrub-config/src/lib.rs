use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use netscrub_core::{ObfuscatorKind, ObfuscatorSet, ReplacementType, TrackerKind, build_obfuscator};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Which obfuscators to run and how
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tracker: TrackerKind,

    #[serde(default = "default_obfuscators", rename = "obfuscate")]
    pub obfuscators: Vec<ObfuscatorConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObfuscatorConfig {
    #[serde(rename = "type")]
    pub kind: ObfuscatorKind,

    #[serde(default)]
    pub replacement_type: ReplacementType,

    /// Replacements from a previous run
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub seed: HashMap<String, String>,
}

impl ObfuscatorConfig {
    pub fn new(kind: ObfuscatorKind, replacement_type: ReplacementType) -> Self {
        Self {
            kind,
            replacement_type,
            seed: HashMap::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tracker: TrackerKind::default(),
            obfuscators: default_obfuscators(),
        }
    }
}

fn default_obfuscators() -> Vec<ObfuscatorConfig> {
    vec![
        ObfuscatorConfig::new(ObfuscatorKind::FastIpv4, ReplacementType::Consistent),
        ObfuscatorConfig::new(ObfuscatorKind::Ipv6, ReplacementType::Consistent),
        ObfuscatorConfig::new(ObfuscatorKind::Mac, ReplacementType::Consistent),
    ]
}

impl Config {
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Load config from a TOML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Build one obfuscator per entry, each with its own tracker. Seeded
    /// entries are initialized before they are returned.
    pub fn build(&self) -> anyhow::Result<ObfuscatorSet> {
        let mut set = ObfuscatorSet::default();

        for entry in &self.obfuscators {
            let obfuscator = build_obfuscator(entry.kind, entry.replacement_type, self.tracker.build());
            if !entry.seed.is_empty() {
                obfuscator
                    .initialize(entry.seed.clone())
                    .with_context(|| format!("Failed to seed {} obfuscator", entry.kind))?;
            }
            set.push(obfuscator);
        }

        info!("Built {} obfuscators ({:?} tracker)", set.len(), self.tracker);
        Ok(set)
    }
}
