//! Distro filter table.
//!
//! Each entry names a guest OS family, the `DescribeImages` filters that
//! select its images and an optional pattern whose first capture group is
//! the OS version. The built-in table only enables CentOS; a YAML file with
//! the same shape replaces it:
//!
//! ```yaml
//! centos:
//!   version_pattern: "CentOS Linux ([0-9]+) .+"
//!   filters:
//!     - name: architecture
//!       values: [x86_64]
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ProviderOptions;
use crate::error::{ProviderError, Result};
use crate::models::ApiFilter;

pub const CENTOS_PRODUCT_CODE: &str = "aw0evgkw8e5c1q413zgy5pjce";
pub const CENTOS_OWNER_ID: &str = "679593333241";
pub const CENTOS_VERSION_PATTERN: &str = "CentOS Linux ([0-9]+) .+";

/// On-disk form of one distro entry.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DistroEntry {
    #[serde(default)]
    pub version_pattern: Option<String>,
    #[serde(default)]
    pub filters: Vec<ApiFilter>,
}

/// A distro entry with its version pattern compiled.
#[derive(Clone, Debug)]
pub struct DistroRule {
    pub name: String,
    pub filters: Vec<ApiFilter>,
    version_re: Option<Regex>,
}

impl DistroRule {
    pub fn new(name: &str, entry: DistroEntry) -> Result<Self> {
        let version_re = entry
            .version_pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|source| ProviderError::InvalidVersionPattern {
                distro: name.to_string(),
                source,
            })?;
        Ok(Self {
            name: name.to_string(),
            filters: entry.filters,
            version_re,
        })
    }

    /// First capture group of the version pattern in `image_name`, if any.
    pub fn extract_version(&self, image_name: Option<&str>) -> Option<String> {
        let re = self.version_re.as_ref()?;
        let caps = re.captures(image_name?)?;
        caps.get(1).map(|m| m.as_str().to_string())
    }
}

/// Ordered set of distro rules queried by `get_images`.
#[derive(Clone, Debug)]
pub struct DistroTable {
    rules: Vec<DistroRule>,
}

impl DistroTable {
    pub fn builtin() -> Self {
        let centos = DistroEntry {
            version_pattern: Some(CENTOS_VERSION_PATTERN.to_string()),
            filters: vec![
                ApiFilter::new("architecture", ["x86_64"]),
                ApiFilter::new("state", ["available"]),
                ApiFilter::new("root-device-type", ["ebs"]),
                ApiFilter::new("is-public", ["true"]),
                ApiFilter::new("product-code", [CENTOS_PRODUCT_CODE]),
                ApiFilter::new("owner-id", [CENTOS_OWNER_ID]),
            ],
        };
        let rule = DistroRule {
            name: "centos".to_string(),
            filters: centos.filters,
            version_re: Regex::new(CENTOS_VERSION_PATTERN).ok(),
        };
        Self { rules: vec![rule] }
    }

    /// `options.distro_file` when set, the built-in table otherwise.
    pub fn from_options(options: &ProviderOptions) -> Result<Self> {
        match options.distro_file.as_deref() {
            Some(path) => Self::from_file(path),
            None => Ok(Self::builtin()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let to_err = |message: String| ProviderError::StaticConfig {
            path: path.display().to_string(),
            message,
        };
        let data = fs::read_to_string(path).map_err(|e| to_err(e.to_string()))?;
        let entries: BTreeMap<String, DistroEntry> =
            serde_yaml::from_str(&data).map_err(|e| to_err(e.to_string()))?;
        let table = Self::from_entries(entries)?;
        tracing::debug!(path = %path.display(), distros = ?table.names(), "Loaded distro table");
        Ok(table)
    }

    pub fn from_entries(entries: BTreeMap<String, DistroEntry>) -> Result<Self> {
        let rules = entries
            .into_iter()
            .map(|(name, entry)| DistroRule::new(&name, entry))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[DistroRule] {
        &self.rules
    }

    pub fn get(&self, distro: &str) -> Option<&DistroRule> {
        self.rules.iter().find(|r| r.name == distro)
    }

    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }

    /// Version of `image_name` under `distro`'s rule. Unknown distros and
    /// names that do not match yield `None`.
    pub fn extract_version(&self, distro: &str, image_name: Option<&str>) -> Option<String> {
        self.get(distro)?.extract_version(image_name)
    }
}

impl Default for DistroTable {
    fn default() -> Self {
        Self::builtin()
    }
}
