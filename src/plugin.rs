//! Surface exposed to the info aggregator: the provider trait, the `aws`
//! slot it is registered under and the flags it contributes.

use std::path::PathBuf;

use async_trait::async_trait;
use clap::Args;

use crate::api::Ec2Api;
use crate::config::{self, ProviderOptions};
use crate::error::Result;
use crate::models::{Record, RecordSet};
use crate::provider::AwsProvider;

/// Name the AWS provider is registered under.
pub const PROVIDER_NAME: &str = "aws";

/// Query operations a host aggregator calls on a provider.
#[async_trait]
pub trait CloudProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn service_type(&self) -> &'static str {
        "compute"
    }

    fn goc_service_type(&self) -> Option<&'static str> {
        None
    }

    async fn get_images(&self) -> Result<RecordSet>;

    async fn get_templates(&self) -> Result<RecordSet>;

    async fn get_compute_endpoints(&self) -> Result<Record>;
}

#[async_trait]
impl<C: Ec2Api> CloudProvider for AwsProvider<C> {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn get_images(&self) -> Result<RecordSet> {
        AwsProvider::get_images(self).await
    }

    async fn get_templates(&self) -> Result<RecordSet> {
        AwsProvider::get_templates(self).await
    }

    async fn get_compute_endpoints(&self) -> Result<Record> {
        AwsProvider::get_compute_endpoints(self).await
    }
}

/// Build the provider registered under `name`, or `None` for unknown names.
pub async fn by_name(name: &str, options: &ProviderOptions) -> Option<Result<Box<dyn CloudProvider>>> {
    match name {
        PROVIDER_NAME => Some(
            AwsProvider::new(options)
                .await
                .map(|p| Box::new(p) as Box<dyn CloudProvider>),
        ),
        _ => None,
    }
}

/// Command-line flags contributed by the AWS provider.
#[derive(Args, Debug, Clone, Default)]
pub struct AwsArgs {
    /// Specify AWS Region Code (i. e, us-east-2, ap-south-1, eu-west-3...)
    #[arg(long = "aws-region", env = config::ENV_REGION)]
    pub aws_region_code: Option<String>,
    /// Specify AWS Access Key ID
    #[arg(long = "aws-access-key", env = config::ENV_ACCESS_KEY)]
    pub aws_access_key: Option<String>,
    /// Specify AWS Secret Access Key for the provided AWS Access Key ID
    #[arg(long = "aws-secret-key", env = config::ENV_SECRET_KEY, hide_env_values = true)]
    pub aws_secret_key: Option<String>,
    /// YAML file with static image/template defaults
    #[arg(long, env = config::ENV_STATIC_FILE)]
    pub static_file: Option<PathBuf>,
    /// YAML file replacing the built-in distro filter table
    #[arg(long, env = config::ENV_DISTROS_FILE)]
    pub distro_file: Option<PathBuf>,
}

impl AwsArgs {
    pub fn to_options(&self) -> ProviderOptions {
        ProviderOptions {
            region: self.aws_region_code.clone(),
            access_key: self.aws_access_key.clone(),
            secret_key: self.aws_secret_key.clone(),
            static_file: self.static_file.clone(),
            distro_file: self.distro_file.clone(),
        }
    }
}
