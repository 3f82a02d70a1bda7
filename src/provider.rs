//! EC2 provider: images, flavors (instance types) and the compute endpoint,
//! reshaped into flat `image_*` / `template_*` records.

use serde_json::Value;

use crate::api::{AwsEc2Client, Ec2Api};
use crate::config::{AwsCredentials, ProviderOptions};
use crate::distros::{DistroRule, DistroTable};
use crate::error::{ProviderError, Result};
use crate::models::{ApiFilter, InstanceTypeInfo, RawImage, Record, RecordSet};
use crate::statics::StaticDefaults;
use crate::utils::{blank_record, merge_into, merge_serialized, normalize_record, opt_str};

/// Keys every image record carries, `null` unless defaults or the API fill them.
pub const IMAGE_TEMPLATE_KEYS: &[&str] = &[
    "image_name",
    "image_id",
    "image_native_id",
    "image_description",
    "image_os_family",
    "image_os_name",
    "image_os_version",
    "image_os_type",
    "image_architecture",
    "image_marketplace_id",
    "image_platform",
    "image_minimal_cpu",
    "image_recommended_cpu",
    "image_minimal_ram",
    "image_recommended_ram",
    "image_minimal_accel",
    "image_recommended_accel",
    "image_accel_type",
    "image_traffic_in",
    "image_traffic_out",
    "image_software",
    "image_context_format",
];

/// Keys every template (flavor) record carries.
pub const TEMPLATE_KEYS: &[&str] = &[
    "template_id",
    "template_name",
    "template_flavor_id",
    "template_cpu",
    "template_memory",
    "template_disk",
    "template_platform",
    "template_network",
    "template_network_in",
    "template_network_out",
    "template_infiniband",
    "template_flavor_gpu_number",
    "template_flavor_gpu_vendor",
    "template_flavor_gpu_model",
];

/// Key of the single entry returned by `get_compute_endpoints`.
pub const COMPUTE_SERVICE_NAME: &str = "compute_service_name";

/// `DescribeImages` is restricted to images anyone may launch.
pub const EXECUTABLE_USERS: &[&str] = &["all"];

/// Filters describing the flavors worth publishing: virtualized,
/// EBS-optimizable, current generation.
///
/// `get_templates` builds and logs these but queries unfiltered; whether
/// they should be sent to `DescribeInstanceTypes` is still undecided.
pub fn instance_type_filters() -> Vec<ApiFilter> {
    vec![
        ApiFilter::new("bare-metal", ["false"]),
        ApiFilter::new("ebs-info.ebs-optimized-support", ["supported", "default"]),
        ApiFilter::new("current-generation", ["true"]),
    ]
}

pub struct AwsProvider<C: Ec2Api = AwsEc2Client> {
    client: C,
    credentials: AwsCredentials,
    statics: StaticDefaults,
    distros: DistroTable,
}

impl AwsProvider<AwsEc2Client> {
    /// Validate `options` and connect an SDK client bound to the region.
    pub async fn new(options: &ProviderOptions) -> Result<Self> {
        let credentials = options.validate()?;
        let client = AwsEc2Client::connect(&credentials).await;
        Self::assemble(client, credentials, options)
    }
}

impl<C: Ec2Api> AwsProvider<C> {
    /// Same validation as [`AwsProvider::new`], around a caller-supplied client.
    pub fn with_client(client: C, options: &ProviderOptions) -> Result<Self> {
        let credentials = options.validate()?;
        Self::assemble(client, credentials, options)
    }

    fn assemble(client: C, credentials: AwsCredentials, options: &ProviderOptions) -> Result<Self> {
        let statics = StaticDefaults::from_options(options)?;
        let distros = DistroTable::from_options(options)?;
        tracing::debug!(region = %credentials.region, distros = ?distros.names(), "AWS provider ready");
        Ok(Self {
            client,
            credentials,
            statics,
            distros,
        })
    }

    pub fn region(&self) -> &str {
        &self.credentials.region
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn distros(&self) -> &DistroTable {
        &self.distros
    }

    /// Public, available, EBS-backed images of every configured distro,
    /// keyed by image id.
    pub async fn get_images(&self) -> Result<RecordSet> {
        let defaults = self.statics.get_image_defaults(true);
        let executable_users: Vec<String> = EXECUTABLE_USERS.iter().map(|u| u.to_string()).collect();
        let mut images = RecordSet::new();

        for rule in self.distros.rules() {
            let raw_images = self
                .client
                .describe_images(&executable_users, &rule.filters)
                .await?;
            tracing::info!(distro = %rule.name, count = raw_images.len(), "Images described");

            for raw in raw_images {
                let Some(image_id) = raw.image_id.clone() else {
                    tracing::warn!(distro = %rule.name, name = ?raw.name, "Skipping image without id");
                    continue;
                };
                let record = build_image_record(&raw, rule, &defaults);
                images.insert(image_id, record);
            }
        }

        Ok(images)
    }

    /// Instance types exposing vCPU, memory and storage info, keyed by type.
    pub async fn get_templates(&self) -> Result<RecordSet> {
        let filters = instance_type_filters();
        tracing::debug!(?filters, "Instance type filters (not sent)");

        let defaults = self.statics.get_template_defaults(true);
        let mut templates = RecordSet::new();

        for info in self.client.describe_instance_types().await? {
            match build_template_record(&info, &defaults) {
                Some(record) => {
                    templates.insert(info.instance_type.clone(), record);
                }
                None => {
                    tracing::debug!(instance_type = %info.instance_type, "Skipping flavor without vCPU/memory/storage info");
                }
            }
        }

        tracing::info!(count = templates.len(), "Templates built");
        Ok(templates)
    }

    /// `{compute_service_name: <endpoint>}` for the configured region.
    pub async fn get_compute_endpoints(&self) -> Result<Record> {
        let regions = self.client.describe_regions().await?;
        let region = regions
            .into_iter()
            .find(|r| r.region_name == self.credentials.region)
            .ok_or_else(|| ProviderError::RegionNotFound {
                region: self.credentials.region.clone(),
            })?;

        let mut endpoints = Record::new();
        endpoints.insert(COMPUTE_SERVICE_NAME.to_string(), Value::String(region.endpoint));
        Ok(endpoints)
    }
}

/// Template → static defaults → raw API fields → explicit `image_*` fields,
/// then normalized.
pub fn build_image_record(raw: &RawImage, rule: &DistroRule, defaults: &Record) -> Record {
    let mut record = blank_record(IMAGE_TEMPLATE_KEYS);
    merge_into(&mut record, defaults);
    merge_serialized(&mut record, raw);

    let version = rule.extract_version(raw.name.as_deref());
    let overrides = [
        ("image_id", opt_str(raw.image_id.as_deref())),
        ("image_native_id", opt_str(raw.image_id.as_deref())),
        ("image_name", opt_str(raw.name.as_deref())),
        ("image_description", opt_str(raw.description.as_deref())),
        ("image_architecture", opt_str(raw.architecture.as_deref())),
        ("image_os_type", opt_str(raw.platform_details.as_deref())),
        ("image_os_name", Value::String(rule.name.clone())),
        ("image_os_version", opt_str(version.as_deref())),
        ("image_marketplace_id", opt_str(raw.image_location.as_deref())),
    ];
    for (key, value) in overrides {
        record.insert(key.to_string(), value);
    }

    normalize_record(record)
}

/// `None` when the instance type lacks vCPU, memory or storage info.
pub fn build_template_record(info: &InstanceTypeInfo, defaults: &Record) -> Option<Record> {
    let (Some(cpu), Some(memory), Some(disk)) =
        (info.default_vcpus, info.memory_mib, info.total_storage_gb)
    else {
        return None;
    };

    let mut record = blank_record(TEMPLATE_KEYS);
    merge_into(&mut record, defaults);

    let id = Value::String(info.instance_type.clone());
    record.insert("template_id".to_string(), id.clone());
    record.insert("template_name".to_string(), id.clone());
    record.insert("template_flavor_id".to_string(), id);
    record.insert("template_memory".to_string(), Value::from(memory));
    record.insert("template_disk".to_string(), Value::from(disk));
    record.insert("template_cpu".to_string(), Value::from(cpu));
    Some(record)
}
