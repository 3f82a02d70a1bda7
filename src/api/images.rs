use aws_sdk_ec2::error::DisplayErrorContext;
use aws_sdk_ec2::types::{Filter, Image};

use super::client::{filters_to_args, log_request, log_response, AwsEc2Client};
use crate::error::{ProviderError, Result};
use crate::models::{ApiFilter, RawImage};

/// Call `DescribeImages` once (no pagination) with the given filters.
pub async fn describe_images(
    ec2: &AwsEc2Client,
    executable_users: &[String],
    filters: &[ApiFilter],
) -> Result<Vec<RawImage>> {
    let mut args: Vec<(String, String)> = executable_users
        .iter()
        .map(|u| ("--executable-users".to_string(), u.clone()))
        .collect();
    args.extend(filters_to_args(filters));
    log_request(ec2.region(), "describe-images", &args);

    let sdk_filters: Vec<Filter> = filters.iter().map(to_sdk_filter).collect();

    let output = ec2
        .client
        .describe_images()
        .set_executable_users(Some(executable_users.to_vec()))
        .set_filters(Some(sdk_filters))
        .send()
        .await
        .map_err(|e| ProviderError::api("DescribeImages", DisplayErrorContext(&e)))?;

    let images: Vec<RawImage> = output.images().iter().map(raw_image_from_sdk).collect();
    log_response("DescribeImages", images.len());
    Ok(images)
}

pub(crate) fn to_sdk_filter(filter: &ApiFilter) -> Filter {
    Filter::builder()
        .name(&filter.name)
        .set_values(Some(filter.values.clone()))
        .build()
}

fn raw_image_from_sdk(image: &Image) -> RawImage {
    RawImage {
        image_id: image.image_id().map(str::to_string),
        name: image.name().map(str::to_string),
        description: image.description().map(str::to_string),
        architecture: image.architecture().map(|a| a.as_str().to_string()),
        platform_details: image.platform_details().map(str::to_string),
        image_location: image.image_location().map(str::to_string),
        owner_id: image.owner_id().map(str::to_string),
        creation_date: image.creation_date().map(str::to_string),
        state: image.state().map(|s| s.as_str().to_string()),
        public: image.public(),
        root_device_type: image.root_device_type().map(|d| d.as_str().to_string()),
        virtualization_type: image.virtualization_type().map(|v| v.as_str().to_string()),
        hypervisor: image.hypervisor().map(|h| h.as_str().to_string()),
        product_codes: image
            .product_codes()
            .iter()
            .filter_map(|p| p.product_code_id().map(str::to_string))
            .collect(),
    }
}
