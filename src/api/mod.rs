// EC2 API modules
pub mod client;
pub mod images;
pub mod instance_types;
pub mod regions;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ApiFilter, InstanceTypeInfo, RawImage, RegionInfo};

pub use client::{set_silent, AwsEc2Client};

/// Read-only EC2 calls the provider depends on.
///
/// [`AwsEc2Client`] talks to AWS; tests and hosts can plug in their own.
#[async_trait]
pub trait Ec2Api: Send + Sync {
    /// `DescribeImages` with `ExecutableUsers` and `Filters`
    async fn describe_images(
        &self,
        executable_users: &[String],
        filters: &[ApiFilter],
    ) -> Result<Vec<RawImage>>;

    /// `DescribeInstanceTypes`, unfiltered
    async fn describe_instance_types(&self) -> Result<Vec<InstanceTypeInfo>>;

    /// `DescribeRegions`
    async fn describe_regions(&self) -> Result<Vec<RegionInfo>>;
}
