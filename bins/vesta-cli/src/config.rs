//! CLI configuration.
//!
//! Layered lowest to highest: built-in defaults, a TOML file
//! (`--config`, or `vesta.toml` in the config dir if present), `VESTA_*`
//! environment variables, then command-line flags (applied in `main`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Snapshot file holding the token state.
    pub state: PathBuf,
    /// Hex address acting as the caller of mutating commands.
    pub caller: Option<String>,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Log output format ("text" or "json").
    pub log_format: String,
    /// Defaults for `vesta init`.
    pub token_name: String,
    pub token_symbol: String,
    pub token_decimals: u8,
    /// Whole-token amount, same syntax as command amounts.
    pub max_supply: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            state: default_state_path(),
            caller: None,
            log_level: "warn".to_string(),
            log_format: "text".to_string(),
            token_name: "Vesta".to_string(),
            token_symbol: "VST".to_string(),
            token_decimals: vesta_core::constants::DEFAULT_DECIMALS,
            max_supply: None,
        }
    }
}

/// `<data dir>/vesta/token.json`, or `./token.json` without a data dir.
pub fn default_state_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vesta")
        .join("token.json")
}

fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("vesta").join("vesta.toml"))
}

/// Load the file and environment layers.
///
/// An explicit `file` must exist; the default config file is optional.
pub fn load(file: Option<&Path>) -> Result<CliConfig> {
    let mut builder = config::Config::builder();
    match file {
        Some(path) => {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        None => {
            if let Some(path) = default_config_file() {
                builder = builder.add_source(config::File::from(path).required(false));
            }
        }
    }
    builder = builder.add_source(config::Environment::with_prefix("VESTA"));

    builder
        .build()
        .context("failed to read configuration")?
        .try_deserialize()
        .context("invalid configuration")
}
