//! Transfer and naming configuration.

use serde::{Deserialize, Serialize};

/// Tunables for the transfer orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizerConfig {
    /// How many times a catalog write that lost a display-name race is
    /// re-disambiguated and retried.
    #[serde(default = "default_max_name_retries")]
    pub max_name_retries: u32,
    /// How many fresh millisecond suffixes are tried when a blob path is
    /// already occupied by another writer.
    #[serde(default = "default_path_collision_retries")]
    pub path_collision_retries: u32,
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            max_name_retries: default_max_name_retries(),
            path_collision_retries: default_path_collision_retries(),
        }
    }
}

fn default_max_name_retries() -> u32 {
    3
}

fn default_path_collision_retries() -> u32 {
    5
}
