use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULTS: &str = include_str!("../../config/default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    pub general: GeneralConfig,
    pub bridge: ChannelConfig,
    #[serde(default)]
    pub platform: PlatformConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    pub log_filter: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelConfig {
    pub channels: Vec<String>,
}

/// Overrides for what the host platform reports about itself.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlatformConfig {
    #[serde(default)]
    pub os_name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl BridgeConfig {
    /// Load configuration with layering: defaults → user config.
    pub fn load() -> Result<Self> {
        Self::load_from(user_config_path().as_deref())
    }

    pub fn load_from(user_path: Option<&Path>) -> Result<Self> {
        let mut merged: toml::Table = toml::from_str(DEFAULTS).context("embedded defaults")?;

        if let Some(path) = user_path.filter(|path| path.exists()) {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let user: toml::Table =
                toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
            merge_tables(&mut merged, user);
        }

        let config: BridgeConfig = toml::Value::Table(merged).try_into()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.bridge.channels.is_empty() {
            bail!("bridge.channels must name at least one channel");
        }
        if let Some(blank) = self.bridge.channels.iter().find(|c| c.trim().is_empty()) {
            bail!("bridge.channels contains a blank channel name: {blank:?}");
        }
        Ok(())
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "hostbridge")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Recursively overlays `overlay` onto `base`; non-table values replace.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        let overlay_table = match value {
            toml::Value::Table(table) => table,
            other => {
                base.insert(key, other);
                continue;
            }
        };

        if let Some(toml::Value::Table(base_table)) = base.get_mut(&key) {
            merge_tables(base_table, overlay_table);
            continue;
        }

        base.insert(key, toml::Value::Table(overlay_table));
    }
}
