//! Configuration management.

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Environment variable pointing at an alternative config file.
pub const CONFIG_ENV: &str = "IPASN_CONFIG";

/// CLI configuration.
///
/// Command-line flags take precedence over everything here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Default output format.
    pub output_format: Option<OutputFormat>,

    /// DNS server to query instead of the system resolver.
    pub server: Option<String>,

    /// DNS-over-HTTPS JSON endpoint.
    pub doh: Option<String>,

    /// Per-lookup timeout in seconds.
    pub timeout: Option<u64>,

    /// Report malformed records as errors.
    #[serde(default)]
    pub strict: bool,

    /// Look up private address space too.
    #[serde(default)]
    pub no_private_filter: bool,

    /// Extra networks to refuse, in CIDR notation.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Config {
    /// Get the config file path.
    pub fn path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }

        let dirs = ProjectDirs::from("", "", "ipasn")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from file.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;

        Ok(())
    }
}
