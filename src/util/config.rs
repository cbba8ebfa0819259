//! Configuration file support for vkdgen.
//!
//! Settings are read from the file passed with `--config`, or from
//! `vkdgen.toml` in the current directory when present. Command-line flags
//! are merged on top and take precedence.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Name of the configuration file looked up in the current directory.
pub const CONFIG_FILE: &str = "vkdgen.toml";

pub const DEFAULT_PACKAGE_PREFIX: &str = "dvulkan";
pub const DEFAULT_NAME_PREFIX: &str = "DVulkan";
pub const DEFAULT_API: &str = "vulkan";

/// vkdgen configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generated module settings
    pub output: OutputConfig,

    /// Registry selection settings
    pub registry: RegistryConfig,
}

/// Settings of the generated D package.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// D package name (e.g., dvulkan)
    pub package_prefix: Option<String>,

    /// Prefix of generated identifiers (e.g., DVulkan)
    pub name_prefix: Option<String>,

    /// Fail on structure types missing from `VkStructureType`
    #[serde(default)]
    pub strict_struct_types: bool,
}

/// Which parts of the registry are generated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// API name matched against `api`/`supported` attributes
    pub api: Option<String>,

    /// Versions to traverse (regex)
    pub versions: Option<String>,

    /// Versions whose declarations are written (regex)
    pub emit_versions: Option<String>,

    /// Extensions to include (regex)
    pub add_extensions: Option<String>,

    /// Extensions to exclude (regex), applied after `add_extensions`
    pub remove_extensions: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.output.package_prefix.is_some() {
            self.output.package_prefix = other.output.package_prefix;
        }
        if other.output.name_prefix.is_some() {
            self.output.name_prefix = other.output.name_prefix;
        }
        if other.output.strict_struct_types {
            self.output.strict_struct_types = true;
        }

        if other.registry.api.is_some() {
            self.registry.api = other.registry.api;
        }
        if other.registry.versions.is_some() {
            self.registry.versions = other.registry.versions;
        }
        if other.registry.emit_versions.is_some() {
            self.registry.emit_versions = other.registry.emit_versions;
        }
        if other.registry.add_extensions.is_some() {
            self.registry.add_extensions = other.registry.add_extensions;
        }
        if other.registry.remove_extensions.is_some() {
            self.registry.remove_extensions = other.registry.remove_extensions;
        }
    }

    pub fn package_prefix(&self) -> &str {
        self.output
            .package_prefix
            .as_deref()
            .unwrap_or(DEFAULT_PACKAGE_PREFIX)
    }

    pub fn name_prefix(&self) -> &str {
        self.output.name_prefix.as_deref().unwrap_or(DEFAULT_NAME_PREFIX)
    }

    pub fn api(&self) -> &str {
        self.registry.api.as_deref().unwrap_or(DEFAULT_API)
    }

    pub fn versions(&self) -> &str {
        self.registry.versions.as_deref().unwrap_or(".*")
    }

    pub fn emit_versions(&self) -> &str {
        self.registry.emit_versions.as_deref().unwrap_or(".*")
    }

    pub fn add_extensions(&self) -> &str {
        self.registry.add_extensions.as_deref().unwrap_or(".*")
    }

    /// Exclusion pattern, if one is set and non-empty.
    pub fn remove_extensions(&self) -> Option<&str> {
        self.registry
            .remove_extensions
            .as_deref()
            .filter(|pattern| !pattern.is_empty())
    }
}

/// Path of the config file in `dir`.
pub fn project_config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE)
}

/// Load configuration for a run.
///
/// An explicitly requested file must exist and parse. Otherwise
/// `vkdgen.toml` in `cwd` is used when present.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<Config> {
    match explicit {
        Some(path) => Config::load(path),
        None => Ok(Config::load_or_default(&project_config_path(cwd))),
    }
}
