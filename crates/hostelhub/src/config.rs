use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub store: StoreConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub hostel: HostelDefaults,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Realtime database root, e.g. `https://myapp-default-rtdb.firebaseio.com`.
    pub database_url: String,
    /// Database secret or ID token, appended as `?auth=` when present.
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Per-request timeout; a hung store read or write fails after this
    /// instead of blocking the command forever.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Who the CLI operates as. Authentication itself happens outside this
/// tool; an absent uid means every mutating command is rejected before
/// touching the store.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AdminConfig {
    #[serde(default)]
    pub uid: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HostelDefaults {
    #[serde(default = "default_floors")]
    pub floors: u32,
    #[serde(default = "default_rooms_per_floor")]
    pub rooms_per_floor: u32,
}

impl Default for HostelDefaults {
    fn default() -> Self {
        HostelDefaults {
            floors: default_floors(),
            rooms_per_floor: default_rooms_per_floor(),
        }
    }
}

fn default_floors() -> u32 {
    5
}
fn default_rooms_per_floor() -> u32 {
    32
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;
    Ok(config)
}
