//! Amazon EC2 provider for the cloud info aggregator.
//!
//! Queries images, instance types and regions, and reshapes them into the
//! flat `image_*` / `template_*` attribute records the aggregator publishes.
//!
//! ```no_run
//! use cip_aws::config::ProviderOptions;
//! use cip_aws::provider::AwsProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = ProviderOptions {
//!     region: Some("eu-west-3".into()),
//!     access_key: Some("AKIA...".into()),
//!     secret_key: Some("...".into()),
//!     ..Default::default()
//! };
//! let provider = AwsProvider::new(&options).await?;
//! for (id, image) in provider.get_images().await? {
//!     println!("{id}: {:?}", image.get("image_os_version"));
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod distros;
pub mod error;
pub mod logging;
pub mod models;
pub mod plugin;
pub mod provider;
pub mod statics;
pub mod utils;

pub use error::{ProviderError, Result};
pub use plugin::{AwsArgs, CloudProvider, PROVIDER_NAME};
pub use provider::AwsProvider;
