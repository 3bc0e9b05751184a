//! Configuration file loading for phonefix.
//!
//! Discovers and loads `phonefix.toml` from a root directory. Explicit
//! overrides take precedence over file values.

use crate::settings::{CheckSettings, SettingsOverrides};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "phonefix.toml";

/// Top-level configuration from phonefix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PhonefixConfig {
    pub scheme: SchemeConfig,
    pub fix: FixConfig,
    pub region: RegionConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchemeConfig {
    /// Move every feature to the `contact:` key scheme.
    pub force_contact: bool,
}

impl Default for SchemeConfig {
    fn default() -> Self {
        Self {
            force_contact: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FixConfig {
    pub autofix: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    /// ISO 3166-1 alpha-2 fallback region.
    pub default: Option<String>,
}

/// Discover the phonefix.toml config file.
///
/// Returns `None` if no config file is found in `root`.
pub fn discover_config(root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a phonefix.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<PhonefixConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<PhonefixConfig> {
    let config: PhonefixConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from `root`, or return default if not found.
pub fn load_or_default(root: &Utf8Path) -> anyhow::Result<PhonefixConfig> {
    match discover_config(root) {
        Some(path) => load_config(&path),
        None => Ok(PhonefixConfig::default()),
    }
}

impl PhonefixConfig {
    pub fn into_settings(self) -> CheckSettings {
        CheckSettings {
            force_contact_scheme: self.scheme.force_contact,
            autofix: self.fix.autofix,
            default_region: self
                .region
                .default
                .map(|r| r.trim().to_ascii_uppercase())
                .filter(|r| !r.is_empty()),
        }
    }

    /// File values, then `overrides` on top.
    pub fn merge(self, overrides: SettingsOverrides) -> CheckSettings {
        self.into_settings().with_overrides(overrides)
    }
}
