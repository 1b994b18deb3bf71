//! Configuration file loading for graphbind.
//!
//! Discovers and loads `graphbind.toml` from the working directory, or from an explicit path.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "graphbind.toml";

/// Family used when neither the config file nor the CLI names one.
pub const DEFAULT_FAMILY: &str = "entity";

/// Top-level configuration from graphbind.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GraphbindConfig {
    pub decode: DecodeConfig,
    pub encode: EncodeConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Root type family payloads are decoded as.
    pub family: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EncodeConfig {
    /// Serialize only properties changed after decoding.
    pub changed_only: bool,

    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            changed_only: false,
            pretty: true,
        }
    }
}

/// Returns `None` if `dir` has no config file.
pub fn discover_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

pub fn load_config(path: &Utf8Path) -> anyhow::Result<GraphbindConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

pub fn parse_config(contents: &str) -> anyhow::Result<GraphbindConfig> {
    let config: GraphbindConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load the explicit config path if given, otherwise discover one in `dir`, otherwise defaults.
pub fn load_or_default(
    explicit: Option<&Utf8Path>,
    dir: &Utf8Path,
) -> anyhow::Result<GraphbindConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match discover_config(dir) {
        Some(path) => load_config(&path),
        None => Ok(GraphbindConfig::default()),
    }
}

/// Configuration after applying CLI overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedConfig {
    pub family: String,
    pub changed_only: bool,
    pub pretty: bool,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: GraphbindConfig,
}

impl ConfigMerger {
    pub fn new(config: GraphbindConfig) -> Self {
        Self { config }
    }

    /// CLI `family` replaces the file's; boolean flags only ever switch a setting on
    /// (`changed_only`) or off (`compact` turns pretty-printing off).
    pub fn merge(self, cli_family: Option<&str>, cli_changed_only: bool, cli_compact: bool) -> MergedConfig {
        let family = cli_family
            .map(str::to_string)
            .or(self.config.decode.family)
            .unwrap_or_else(|| DEFAULT_FAMILY.to_string());

        MergedConfig {
            family,
            changed_only: cli_changed_only || self.config.encode.changed_only,
            pretty: self.config.encode.pretty && !cli_compact,
        }
    }
}
