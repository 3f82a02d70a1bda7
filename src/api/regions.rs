use aws_sdk_ec2::error::DisplayErrorContext;

use super::client::{log_request, log_response, AwsEc2Client};
use crate::error::{ProviderError, Result};
use crate::models::RegionInfo;

/// Load all regions visible to the account.
/// Entries missing a name or an endpoint are dropped.
pub async fn describe_regions(ec2: &AwsEc2Client) -> Result<Vec<RegionInfo>> {
    log_request(ec2.region(), "describe-regions", &[]);

    let output = ec2
        .client
        .describe_regions()
        .send()
        .await
        .map_err(|e| ProviderError::api("DescribeRegions", DisplayErrorContext(&e)))?;

    let regions: Vec<RegionInfo> = output
        .regions()
        .iter()
        .filter_map(|r| {
            Some(RegionInfo {
                region_name: r.region_name()?.to_string(),
                endpoint: r.endpoint()?.to_string(),
            })
        })
        .collect();
    log_response("DescribeRegions", regions.len());
    Ok(regions)
}
