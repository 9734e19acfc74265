//! Platform configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{errors::ConfigError, hashers::HashAlgorithm, vault::RemintPolicy};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformConfig {
    /// Seeds the registry id; two platforms with the same name derive the same collection ids.
    #[serde(default = "default_registry_name")]
    pub registry_name: String,

    /// Hash applied to presented secrets at claim time.
    #[serde(default)]
    pub hash: HashAlgorithm,

    /// Whether a claimed commitment may be minted again.
    #[serde(default)]
    pub remint: RemintPolicy,
}

fn default_registry_name() -> String {
    "claim-registry".to_string()
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            registry_name: default_registry_name(),
            hash: HashAlgorithm::default(),
            remint: RemintPolicy::default(),
        }
    }
}

impl PlatformConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
