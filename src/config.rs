use std::env;
use std::path::{Path, PathBuf};

use crate::error::{ProviderError, Result};

// Environment variables backing the command-line flags
pub const ENV_REGION: &str = "AWS_DEFAULT_REGION";
pub const ENV_ACCESS_KEY: &str = "AWS_ACCESS_KEY_ID";
pub const ENV_SECRET_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const ENV_STATIC_FILE: &str = "CIP_STATIC_FILE";
pub const ENV_DISTROS_FILE: &str = "CIP_AWS_DISTROS_FILE";

pub const MISSING_REGION_MSG: &str = "You must provide a AWS Region";
pub const MISSING_CREDENTIALS_MSG: &str =
    "You must provide a tuple AWS access key / AWS secret key";

pub fn load_env_file(env_file: Option<&str>) {
    if let Some(path) = env_file {
        dotenvy::from_path(Path::new(path)).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

/// Options the provider is built from.
///
/// Usually filled from [`crate::plugin::AwsArgs`], but hosts may build it
/// directly.
#[derive(Debug, Clone, Default)]
pub struct ProviderOptions {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    /// YAML file with static image/template defaults
    pub static_file: Option<PathBuf>,
    /// YAML file replacing the built-in distro filter table
    pub distro_file: Option<PathBuf>,
}

/// Region and credentials after validation.
#[derive(Clone)]
pub struct AwsCredentials {
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
}

impl std::fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

impl ProviderOptions {
    /// Fill unset fields from the environment. Used after an `--env-file`
    /// has been loaded, since flag parsing already ran.
    pub fn fill_from_env(mut self) -> Self {
        let from_env = |name: &str| env::var(name).ok().filter(|v| !v.trim().is_empty());
        self.region = self.region.or_else(|| from_env(ENV_REGION));
        self.access_key = self.access_key.or_else(|| from_env(ENV_ACCESS_KEY));
        self.secret_key = self.secret_key.or_else(|| from_env(ENV_SECRET_KEY));
        self.static_file = self.static_file.or_else(|| from_env(ENV_STATIC_FILE).map(PathBuf::from));
        self.distro_file = self.distro_file.or_else(|| from_env(ENV_DISTROS_FILE).map(PathBuf::from));
        self
    }

    /// Check that the region and both halves of the key pair are present.
    pub fn validate(&self) -> Result<AwsCredentials> {
        let region = non_blank(self.region.as_deref())
            .ok_or_else(|| ProviderError::Config(MISSING_REGION_MSG.to_string()))?;

        let (access_key, secret_key) = match (
            non_blank(self.access_key.as_deref()),
            non_blank(self.secret_key.as_deref()),
        ) {
            (Some(access), Some(secret)) => (access, secret),
            _ => return Err(ProviderError::Config(MISSING_CREDENTIALS_MSG.to_string())),
        };

        Ok(AwsCredentials {
            region,
            access_key,
            secret_key,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
