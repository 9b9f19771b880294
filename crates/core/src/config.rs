//! Engine configuration.
//!
//! Configuration is an explicit value handed to each engine's constructor —
//! never read from ambient global state — so engines stay testable in
//! isolation. Device, precision, and tiling are set once at construction and
//! read-only afterwards; no runtime reconfiguration contract exists.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Compute device handle. Which device a deployment should pick is the
/// host's selection policy; this type only carries the outcome.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Device {
    Cpu,
    Cuda { index: u32 },
}

impl Default for Device {
    fn default() -> Self {
        Self::Cpu
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TilingConfig {
    pub tile_size: u32,
    pub tile_pad: u32,
    pub enabled: bool,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            tile_size: 192,
            tile_pad: 8,
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PaddingConfig {
    pub pre_pad: u32,
    pub mod_pad: Option<u32>,
    pub mod_scale: Option<u32>,
}

impl Default for PaddingConfig {
    fn default() -> Self {
        Self {
            pre_pad: 0,
            mod_pad: None,
            mod_scale: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine identity; registries key variants to engines by this name.
    pub name: String,
    /// Storage root for this engine's weights.
    pub model_dir: Option<PathBuf>,
    /// Remote source the discovery collaborator may resolve against.
    pub model_url: Option<String>,
    /// User-supplied extra search path.
    pub user_dir: Option<PathBuf>,
    pub enabled: bool,
    pub device: Device,
    /// Half precision (fp16) inference hint for concrete engines.
    pub half_precision: bool,
    pub tiling: TilingConfig,
    pub padding: PaddingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            model_dir: None,
            model_url: None,
            user_dir: None,
            enabled: true,
            device: Device::default(),
            half_precision: true,
            tiling: TilingConfig::default(),
            padding: PaddingConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Load from a TOML file; a missing or empty file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read engine config: {}", path.display()))?;

        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        toml::from_str(&raw)
            .with_context(|| format!("failed to parse engine config TOML: {}", path.display()))
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .context("engine config path does not have a parent directory")?;
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory: {}", parent.display()))?;

        let encoded =
            toml::to_string_pretty(self).context("failed to serialize engine config TOML")?;
        fs::write(path, encoded)
            .with_context(|| format!("failed to write engine config: {}", path.display()))?;
        Ok(())
    }
}
