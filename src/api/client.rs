use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_ec2::Client;
use yansi::Paint;

use crate::config::AwsCredentials;
use crate::error::Result;
use crate::models::{ApiFilter, InstanceTypeInfo, RawImage, RegionInfo};

use super::Ec2Api;

static SILENT: AtomicBool = AtomicBool::new(false);

pub fn set_silent(silent: bool) {
    SILENT.store(silent, Ordering::Relaxed);
}

fn log_output(msg: String) {
    if !SILENT.load(Ordering::Relaxed) {
        eprintln!("{}", msg);
    }
}

/// Echo an EC2 call as the equivalent `aws ec2 ...` command line.
pub(crate) fn log_request(region: &str, operation: &str, args: &[(String, String)]) {
    tracing::info!(region, operation, ?args, "EC2 request");

    let mut parts = Vec::new();
    parts.push(Paint::new("aws ec2").fg(yansi::Color::Green).bold().to_string());
    parts.push(Paint::new(operation).fg(yansi::Color::Yellow).bold().to_string());
    for (flag, value) in args {
        parts.push(format!(
            "{} {}",
            Paint::new(flag).fg(yansi::Color::Magenta),
            Paint::new(value).fg(yansi::Color::Cyan)
        ));
    }
    parts.push(format!(
        "{} {}",
        Paint::new("--region").fg(yansi::Color::Magenta),
        Paint::new(region).fg(yansi::Color::Cyan)
    ));
    log_output(format!("Request:\n{}", parts.join(" ")));
}

/// Log how many items a call returned.
pub(crate) fn log_response(operation: &str, count: usize) {
    tracing::debug!(operation, count, "EC2 response");
    let summary = format!("{} item(s) returned by {}", count, operation);
    log_output(format!("Response:\n{}", Paint::new(summary).rgb(100, 100, 100)));
}

/// Render filters the way the AWS CLI spells them (`Name=..,Values=..`).
pub(crate) fn filters_to_args(filters: &[ApiFilter]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|f| {
            (
                "--filters".to_string(),
                format!("Name={},Values={}", f.name, f.values.join(",")),
            )
        })
        .collect()
}

/// EC2 client bound to one region and a static key pair.
#[derive(Clone, Debug)]
pub struct AwsEc2Client {
    pub(crate) client: Client,
    pub(crate) region: String,
}

impl AwsEc2Client {
    /// Build the SDK client once; every later call reuses it.
    pub async fn connect(credentials: &AwsCredentials) -> Self {
        let static_credentials = Credentials::new(
            credentials.access_key.clone(),
            credentials.secret_key.clone(),
            None,
            None,
            "cip-aws",
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_sdk_ec2::config::Region::new(credentials.region.clone()))
            .credentials_provider(static_credentials)
            .load()
            .await;

        tracing::debug!(region = %credentials.region, "EC2 client configured");

        Self {
            client: Client::new(&sdk_config),
            region: credentials.region.clone(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

#[async_trait]
impl Ec2Api for AwsEc2Client {
    async fn describe_images(
        &self,
        executable_users: &[String],
        filters: &[ApiFilter],
    ) -> Result<Vec<RawImage>> {
        super::images::describe_images(self, executable_users, filters).await
    }

    async fn describe_instance_types(&self) -> Result<Vec<InstanceTypeInfo>> {
        super::instance_types::describe_instance_types(self).await
    }

    async fn describe_regions(&self) -> Result<Vec<RegionInfo>> {
        super::regions::describe_regions(self).await
    }
}
