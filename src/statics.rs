//! Static defaults read from local configuration.
//!
//! The file mirrors the layout used by the info aggregator:
//!
//! ```yaml
//! compute:
//!   images:
//!     defaults:
//!       minimal_cpu: 1
//!   templates:
//!     defaults:
//!       network: public
//! ```
//!
//! Keys are returned with their `image_` / `template_` prefix when asked.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::config::ProviderOptions;
use crate::error::{ProviderError, Result};
use crate::models::Record;

#[derive(Deserialize, Default, Debug, Clone)]
struct StaticFile {
    #[serde(default)]
    compute: ComputeSection,
}

#[derive(Deserialize, Default, Debug, Clone)]
struct ComputeSection {
    #[serde(default)]
    images: DefaultsSection,
    #[serde(default)]
    templates: DefaultsSection,
}

#[derive(Deserialize, Default, Debug, Clone)]
struct DefaultsSection {
    #[serde(default)]
    defaults: BTreeMap<String, Value>,
}

/// Image and template defaults merged into every record before API data.
#[derive(Debug, Clone, Default)]
pub struct StaticDefaults {
    file: StaticFile,
}

impl StaticDefaults {
    /// Load from `options.static_file`, or start empty when none is set.
    pub fn from_options(options: &ProviderOptions) -> Result<Self> {
        match options.static_file.as_deref() {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|e| ProviderError::StaticConfig {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let defaults = Self::from_yaml_str(&data).map_err(|e| match e {
            ProviderError::StaticConfig { message, .. } => ProviderError::StaticConfig {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })?;
        tracing::debug!(path = %path.display(), "Loaded static defaults");
        Ok(defaults)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        // An empty document means "no defaults"
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let file: StaticFile =
            serde_yaml::from_str(yaml).map_err(|e| ProviderError::StaticConfig {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { file })
    }

    pub fn get_image_defaults(&self, prefix: bool) -> Record {
        with_prefix(&self.file.compute.images.defaults, prefix.then_some("image_"))
    }

    pub fn get_template_defaults(&self, prefix: bool) -> Record {
        with_prefix(
            &self.file.compute.templates.defaults,
            prefix.then_some("template_"),
        )
    }
}

fn with_prefix(defaults: &BTreeMap<String, Value>, prefix: Option<&str>) -> Record {
    defaults
        .iter()
        .map(|(k, v)| match prefix {
            Some(p) => (format!("{p}{k}"), v.clone()),
            None => (k.clone(), v.clone()),
        })
        .collect()
}
