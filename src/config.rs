//! Highlighting configuration persistence
//!
//! Stores preferences in `~/.config/tintcode/config.yaml`

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::engine::OutputFormat;
use crate::marshal::{
    BufferPolicy, RegistryBuffers, DEFAULT_ENUMERATION_CAPACITY, DEFAULT_RESOLVE_CAPACITY,
};
use crate::theme::DEFAULT_THEME;

/// Highlighting configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightConfig {
    /// Preferred theme name (e.g., "InspiredGitHub", "base16-ocean.dark")
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Theme used when `theme` is not in the registry
    #[serde(default = "default_theme")]
    pub fallback_theme: String,

    /// Load newline-preserving grammar variants
    #[serde(default = "default_true")]
    pub newline_variants: bool,

    #[serde(default)]
    pub format: OutputFormat,

    /// Render buffer policy
    #[serde(default)]
    pub buffer: BufferPolicy,

    /// Initial capacity for name enumerations at load time
    #[serde(default = "default_enumeration_capacity")]
    pub enumeration_capacity: usize,

    /// Initial capacity for resolved grammar names
    #[serde(default = "default_resolve_capacity")]
    pub resolve_capacity: usize,
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

fn default_true() -> bool {
    true
}

fn default_enumeration_capacity() -> usize {
    DEFAULT_ENUMERATION_CAPACITY
}

fn default_resolve_capacity() -> usize {
    DEFAULT_RESOLVE_CAPACITY
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            fallback_theme: default_theme(),
            newline_variants: true,
            format: OutputFormat::default(),
            buffer: BufferPolicy::default(),
            enumeration_capacity: default_enumeration_capacity(),
            resolve_capacity: default_resolve_capacity(),
        }
    }
}

impl HighlightConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{:#}", e);
                Self::default()
            }
        }
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))
    }

    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Save config to the default location
    pub fn save(&self) -> anyhow::Result<()> {
        let path = crate::config_paths::config_file()
            .context("No config directory available")?;
        self.save_to(&path)
    }

    /// Save config to a specific file
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory {}", parent.display())
            })?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Buffer policies for registry loading and name resolution
    pub fn registry_buffers(&self) -> RegistryBuffers {
        RegistryBuffers {
            enumeration: BufferPolicy {
                initial_capacity: self.enumeration_capacity,
                max_doublings: self.buffer.max_doublings,
            },
            resolve: BufferPolicy {
                initial_capacity: self.resolve_capacity,
                max_doublings: self.buffer.max_doublings,
            },
        }
    }
}
