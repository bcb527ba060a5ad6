//! Configuration system
//!
//! Pool manifests describe the descriptor set on disk. They reference
//! templates by name, and [`PoolManifest::resolve`] turns them into
//! [`PoolDescriptor`]s through a [`TemplateCatalog`].
//!
//! ```toml
//! [settings]
//! root_name = "ObjectPool"
//!
//! [[pools]]
//! template = "bullet"
//! count = 32
//! prewarm = "immediate"
//!
//! [[pools]]
//! template = "plasma_bolt"
//! count = 8
//! key = "plasma"
//! ```

pub use serde::{Deserialize, Serialize};

use crate::descriptor::{PoolDescriptor, PrewarmStrategy};
use crate::error::PoolError;
use crate::host::PoolTemplate;
use std::collections::HashMap;
use std::path::Path;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let parse: fn(&str) -> Result<Self, ConfigError> = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str,
            Some("ron") => Self::from_ron_str,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        parse(&contents)
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }

    /// Parse TOML text
    fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Parse RON text
    fn from_ron_str(contents: &str) -> Result<Self, ConfigError> {
        ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A pool entry names a template the catalog does not know
    #[error("Unknown template '{name}' in pool entry #{index}")]
    UnknownTemplate {
        /// Template name as written in the manifest
        name: String,
        /// Position of the entry in the manifest
        index: usize,
    },

    /// A pool entry failed descriptor validation
    #[error("Invalid pool entry: {0}")]
    Invalid(#[from] PoolError),
}

/// Registry-wide settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
    /// Name of the container all pool containers hang under
    pub root_name: String,
    /// Inactive set capacity hint, as a multiple of the prewarm count
    pub capacity_factor: usize,
    /// Default log filter used by [`crate::logging::init_with_level`]
    pub log_level: String,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            root_name: "ObjectPool".to_string(),
            capacity_factor: 2,
            log_level: "info".to_string(),
        }
    }
}

/// One pool as written in a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEntry {
    /// Catalog name of the template
    pub template: String,
    /// Instances to prewarm, at least one
    pub count: usize,
    /// Optional string key; absent or empty means type-keyed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Prewarm strategy
    #[serde(default)]
    pub prewarm: PrewarmStrategy,
}

/// On-disk descriptor set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolManifest {
    /// Registry settings
    #[serde(default)]
    pub settings: PoolSettings,
    /// Pools in declaration order
    #[serde(default)]
    pub pools: Vec<PoolEntry>,
}

impl Config for PoolManifest {}

/// Lookup of templates by name
pub trait TemplateCatalog {
    /// Template type handed to descriptors
    type Template: PoolTemplate;

    /// Template registered under `name`
    fn template(&self, name: &str) -> Option<Self::Template>;
}

impl<T: PoolTemplate + Clone> TemplateCatalog for HashMap<String, T> {
    type Template = T;

    fn template(&self, name: &str) -> Option<T> {
        self.get(name).cloned()
    }
}

impl PoolManifest {
    /// Turn every entry into a validated descriptor, in declaration order
    ///
    /// # Errors
    ///
    /// Fails on the first entry naming an unknown template or declaring a
    /// zero count.
    pub fn resolve<C: TemplateCatalog>(&self, catalog: &C) -> Result<Vec<PoolDescriptor<C::Template>>, ConfigError> {
        self.pools
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let template = catalog.template(&entry.template).ok_or_else(|| ConfigError::UnknownTemplate {
                    name: entry.template.clone(),
                    index,
                })?;

                let mut descriptor = PoolDescriptor::new(template, entry.count)?.with_prewarm(entry.prewarm);
                if let Some(key) = &entry.key {
                    descriptor = descriptor.with_key(key.as_str());
                }
                Ok(descriptor)
            })
            .collect()
    }
}
