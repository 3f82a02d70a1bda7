use aws_sdk_ec2::error::DisplayErrorContext;

use super::client::{log_request, log_response, AwsEc2Client};
use crate::error::{ProviderError, Result};
use crate::models::InstanceTypeInfo;

/// List instance types with a single unfiltered `DescribeInstanceTypes` call.
pub async fn describe_instance_types(ec2: &AwsEc2Client) -> Result<Vec<InstanceTypeInfo>> {
    log_request(ec2.region(), "describe-instance-types", &[]);

    let output = ec2
        .client
        .describe_instance_types()
        .send()
        .await
        .map_err(|e| ProviderError::api("DescribeInstanceTypes", DisplayErrorContext(&e)))?;

    let types: Vec<InstanceTypeInfo> = output
        .instance_types()
        .iter()
        .filter_map(instance_type_from_sdk)
        .collect();
    log_response("DescribeInstanceTypes", types.len());
    Ok(types)
}

fn instance_type_from_sdk(info: &aws_sdk_ec2::types::InstanceTypeInfo) -> Option<InstanceTypeInfo> {
    // Without a type name there is nothing to key the flavor by
    let instance_type = info.instance_type()?.as_str().to_string();
    Some(InstanceTypeInfo {
        instance_type,
        default_vcpus: info.v_cpu_info().and_then(|v| v.default_v_cpus()),
        memory_mib: info.memory_info().and_then(|m| m.size_in_mib()),
        total_storage_gb: info.instance_storage_info().and_then(|s| s.total_size_in_gb()),
    })
}
