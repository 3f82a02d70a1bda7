/// Error types for the AWS provider
use thiserror::Error;

/// Errors that can occur while building the provider or querying EC2
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Required region or credentials are missing
    #[error("{0}")]
    Config(String),

    /// An EC2 API call failed (auth, throttling, network, malformed response)
    #[error("EC2 {operation} failed: {message}")]
    Api {
        /// API operation name (e.g. "DescribeImages")
        operation: &'static str,
        message: String,
    },

    /// The configured region is not part of the DescribeRegions listing
    #[error("Region '{region}' not found in the EC2 region list")]
    RegionNotFound { region: String },

    /// Static defaults or distro table could not be read or parsed
    #[error("Cannot load {path}: {message}")]
    StaticConfig { path: String, message: String },

    /// A distro entry carries a version pattern that does not compile
    #[error("Invalid version pattern for distro '{distro}': {source}")]
    InvalidVersionPattern {
        distro: String,
        #[source]
        source: regex::Error,
    },
}

impl ProviderError {
    pub(crate) fn api(operation: &'static str, err: impl std::fmt::Display) -> Self {
        ProviderError::Api {
            operation,
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
