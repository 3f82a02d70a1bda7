use async_trait::async_trait;
use serde_json::{json, Value};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use cip_aws::api::Ec2Api;
use cip_aws::config::ProviderOptions;
use cip_aws::distros::{CENTOS_OWNER_ID, CENTOS_PRODUCT_CODE};
use cip_aws::models::{ApiFilter, InstanceTypeInfo, RawImage, RegionInfo};
use cip_aws::provider::{AwsProvider, COMPUTE_SERVICE_NAME, IMAGE_TEMPLATE_KEYS};
use cip_aws::utils::normalize_record;
use cip_aws::{CloudProvider, ProviderError, Result};

/// In-memory EC2 returning canned payloads and recording image queries.
#[derive(Default)]
struct FakeEc2 {
    images: Vec<RawImage>,
    instance_types: Vec<InstanceTypeInfo>,
    regions: Vec<RegionInfo>,
    fail_with: Option<String>,
    image_calls: Mutex<Vec<(Vec<String>, Vec<ApiFilter>)>>,
}

#[async_trait]
impl Ec2Api for FakeEc2 {
    async fn describe_images(&self, executable_users: &[String], filters: &[ApiFilter]) -> Result<Vec<RawImage>> {
        self.image_calls
            .lock()
            .unwrap()
            .push((executable_users.to_vec(), filters.to_vec()));
        if let Some(msg) = &self.fail_with {
            return Err(ProviderError::Api {
                operation: "DescribeImages",
                message: msg.clone(),
            });
        }
        Ok(self.images.clone())
    }

    async fn describe_instance_types(&self) -> Result<Vec<InstanceTypeInfo>> {
        Ok(self.instance_types.clone())
    }

    async fn describe_regions(&self) -> Result<Vec<RegionInfo>> {
        Ok(self.regions.clone())
    }
}

fn options() -> ProviderOptions {
    ProviderOptions {
        region: Some("eu-west-3".to_string()),
        access_key: Some("AKIA".to_string()),
        secret_key: Some("secret".to_string()),
        ..Default::default()
    }
}

fn centos_image(id: &str, name: &str) -> RawImage {
    RawImage {
        image_id: Some(id.to_string()),
        name: Some(name.to_string()),
        architecture: Some("x86_64".to_string()),
        platform_details: Some("Linux/UNIX".to_string()),
        image_location: Some(format!("aws-marketplace/{name}")),
        state: Some("available".to_string()),
        public: Some(true),
        product_codes: vec![CENTOS_PRODUCT_CODE.to_string()],
        ..Default::default()
    }
}

fn instance_type(name: &str, vcpus: Option<i32>, memory: Option<i64>, disk: Option<i64>) -> InstanceTypeInfo {
    InstanceTypeInfo {
        instance_type: name.to_string(),
        default_vcpus: vcpus,
        memory_mib: memory,
        total_storage_gb: disk,
    }
}

fn region(name: &str) -> RegionInfo {
    RegionInfo {
        region_name: name.to_string(),
        endpoint: format!("ec2.{name}.amazonaws.com"),
    }
}

fn manifest_path(rel: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(rel)
}

#[test]
fn test_with_client_rejects_missing_region() {
    let mut opts = options();
    opts.region = None;
    let err = AwsProvider::with_client(FakeEc2::default(), &opts).err().unwrap();
    assert!(matches!(err, ProviderError::Config(_)));
}

#[test]
fn test_with_client_rejects_half_key_pair() {
    let mut opts = options();
    opts.secret_key = None;
    let err = AwsProvider::with_client(FakeEc2::default(), &opts).err().unwrap();
    assert!(matches!(err, ProviderError::Config(_)));
}

#[tokio::test]
async fn test_get_images_end_to_end() {
    let fake = FakeEc2 {
        images: vec![centos_image("ami-123", "CentOS Linux 8 (HVM)")],
        ..Default::default()
    };
    let provider = AwsProvider::with_client(fake, &options()).unwrap();

    let images = provider.get_images().await.unwrap();
    assert_eq!(images.len(), 1);
    let image = &images["ami-123"];
    assert_eq!(image["image_id"], json!("ami-123"));
    assert_eq!(image["image_native_id"], json!("ami-123"));
    assert_eq!(image["image_name"], json!("CentOS Linux 8 (HVM)"));
    assert_eq!(image["image_os_name"], json!("centos"));
    assert_eq!(image["image_os_version"], json!("8"));
    assert_eq!(image["image_os_type"], json!("linux"));
    assert_eq!(image["image_architecture"], json!("x86_64"));
    assert_eq!(image["image_marketplace_id"], json!("aws-marketplace/CentOS Linux 8 (HVM)"));
    // Raw API fields are kept, normalized like everything else
    assert_eq!(image["PlatformDetails"], json!("linux"));
    assert_eq!(image["ProductCodes"], json!([CENTOS_PRODUCT_CODE]));
}

#[tokio::test]
async fn test_get_images_queries_builtin_centos_filters() {
    let provider = AwsProvider::with_client(FakeEc2::default(), &options()).unwrap();
    provider.get_images().await.unwrap();

    let calls = provider.client().image_calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    let (users, filters) = &calls[0];
    assert_eq!(users, &vec!["all".to_string()]);
    assert!(filters.contains(&ApiFilter::new("is-public", ["true"])));
    assert!(filters.contains(&ApiFilter::new("root-device-type", ["ebs"])));
    assert!(filters.contains(&ApiFilter::new("owner-id", [CENTOS_OWNER_ID])));
}

#[tokio::test]
async fn test_every_image_record_has_full_template() {
    let sparse = RawImage {
        image_id: Some("ami-sparse".to_string()),
        ..Default::default()
    };
    let fake = FakeEc2 {
        images: vec![sparse, centos_image("ami-full", "CentOS Linux 7 x86_64 HVM EBS")],
        ..Default::default()
    };
    let provider = AwsProvider::with_client(fake, &options()).unwrap();

    let images = provider.get_images().await.unwrap();
    assert_eq!(images.len(), 2);
    for record in images.values() {
        for key in IMAGE_TEMPLATE_KEYS {
            assert!(record.contains_key(*key), "missing {key}");
        }
    }
    assert_eq!(images["ami-sparse"]["image_os_version"], Value::Null);
    assert_eq!(images["ami-full"]["image_os_version"], json!("7"));
}

#[tokio::test]
async fn test_images_without_id_are_skipped() {
    let mut anonymous = centos_image("ignored", "CentOS Linux 7 x86_64");
    anonymous.image_id = None;
    let fake = FakeEc2 {
        images: vec![anonymous],
        ..Default::default()
    };
    let provider = AwsProvider::with_client(fake, &options()).unwrap();
    assert!(provider.get_images().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_image_normalization_is_idempotent() {
    let mut windows = centos_image("ami-win", "Windows_Server-2019");
    windows.platform_details = Some("Windows".to_string());
    windows.architecture = Some("i386".to_string());
    let fake = FakeEc2 {
        images: vec![windows, centos_image("ami-lin", "CentOS Linux 7 x86_64")],
        ..Default::default()
    };
    let provider = AwsProvider::with_client(fake, &options()).unwrap();

    let images = provider.get_images().await.unwrap();
    assert_eq!(images["ami-win"]["image_os_type"], json!("windows"));
    assert_eq!(images["ami-win"]["image_architecture"], json!("i686"));
    for record in images.values() {
        assert_eq!(&normalize_record(record.clone()), record);
    }
}

#[tokio::test]
async fn test_api_errors_propagate() {
    let fake = FakeEc2 {
        fail_with: Some("AuthFailure".to_string()),
        ..Default::default()
    };
    let provider = AwsProvider::with_client(fake, &options()).unwrap();
    let err = provider.get_images().await.unwrap_err();
    assert!(matches!(err, ProviderError::Api { operation: "DescribeImages", .. }));
    assert!(err.to_string().contains("AuthFailure"));
}

#[tokio::test]
async fn test_static_defaults_fill_image_and_template_records() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "compute:\n  images:\n    defaults:\n      minimal_cpu: 2\n      architecture: aarch64\n  templates:\n    defaults:\n      infiniband: false\n      flavor_gpu_number: 0\n"
    )
    .unwrap();

    let mut opts = options();
    opts.static_file = Some(file.path().to_path_buf());
    let fake = FakeEc2 {
        images: vec![centos_image("ami-1", "CentOS Linux 7 x86_64")],
        instance_types: vec![instance_type("m5d.large", Some(2), Some(8192), Some(75))],
        ..Default::default()
    };
    let provider = AwsProvider::with_client(fake, &opts).unwrap();

    let images = provider.get_images().await.unwrap();
    assert_eq!(images["ami-1"]["image_minimal_cpu"], json!(2));
    // API value wins over the static default
    assert_eq!(images["ami-1"]["image_architecture"], json!("x86_64"));

    let templates = provider.get_templates().await.unwrap();
    assert_eq!(templates["m5d.large"]["template_infiniband"], json!(false));
    assert_eq!(templates["m5d.large"]["template_flavor_gpu_number"], json!(0));
}

#[test]
fn test_unreadable_static_file_fails_construction() {
    let mut opts = options();
    opts.static_file = Some(PathBuf::from("/nonexistent/static.yaml"));
    let err = AwsProvider::with_client(FakeEc2::default(), &opts).err().unwrap();
    assert!(matches!(err, ProviderError::StaticConfig { .. }));
}

#[tokio::test]
async fn test_sample_distro_file_adds_ubuntu() {
    let mut opts = options();
    opts.distro_file = Some(manifest_path("etc/distros.yaml"));
    let fake = FakeEc2 {
        images: vec![centos_image("ami-1", "CentOS Linux 7 x86_64")],
        ..Default::default()
    };
    let provider = AwsProvider::with_client(fake, &opts).unwrap();
    assert_eq!(provider.distros().names(), vec!["centos", "ubuntu"]);

    provider.get_images().await.unwrap();
    assert_eq!(provider.client().image_calls.lock().unwrap().len(), 2);
}

#[test]
fn test_sample_static_file_parses() {
    let mut opts = options();
    opts.static_file = Some(manifest_path("etc/static.yaml"));
    assert!(AwsProvider::with_client(FakeEc2::default(), &opts).is_ok());
}

#[tokio::test]
async fn test_get_templates_skips_incomplete_types() {
    let fake = FakeEc2 {
        instance_types: vec![
            instance_type("m5d.large", Some(2), Some(8192), Some(75)),
            instance_type("t3.micro", None, Some(1024), Some(8)),
        ],
        ..Default::default()
    };
    let provider = AwsProvider::with_client(fake, &options()).unwrap();

    let templates = provider.get_templates().await.unwrap();
    assert_eq!(templates.len(), 1);
    let flavor = &templates["m5d.large"];
    assert_eq!(flavor["template_id"], json!("m5d.large"));
    assert_eq!(flavor["template_name"], json!("m5d.large"));
    assert_eq!(flavor["template_cpu"], json!(2));
    assert_eq!(flavor["template_memory"], json!(8192));
    assert_eq!(flavor["template_disk"], json!(75));
}

#[tokio::test]
async fn test_get_templates_skips_types_without_memory_or_storage() {
    let fake = FakeEc2 {
        instance_types: vec![
            instance_type("c5.large", Some(2), None, Some(50)),
            instance_type("m5.large", Some(2), Some(8192), None),
        ],
        ..Default::default()
    };
    let provider = AwsProvider::with_client(fake, &options()).unwrap();
    assert!(provider.get_templates().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_compute_endpoints_selects_configured_region() {
    let fake = FakeEc2 {
        regions: vec![region("us-east-1"), region("eu-west-3"), region("eu-west-30")],
        ..Default::default()
    };
    let provider = AwsProvider::with_client(fake, &options()).unwrap();

    let endpoints = provider.get_compute_endpoints().await.unwrap();
    assert_eq!(endpoints.len(), 1);
    assert_eq!(endpoints[COMPUTE_SERVICE_NAME], json!("ec2.eu-west-3.amazonaws.com"));
}

#[tokio::test]
async fn test_get_compute_endpoints_region_not_found() {
    let fake = FakeEc2 {
        regions: vec![region("us-east-1")],
        ..Default::default()
    };
    let provider = AwsProvider::with_client(fake, &options()).unwrap();

    match provider.get_compute_endpoints().await {
        Err(ProviderError::RegionNotFound { region }) => assert_eq!(region, "eu-west-3"),
        other => panic!("expected RegionNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_provider_through_plugin_trait() {
    let fake = FakeEc2 {
        regions: vec![region("eu-west-3")],
        ..Default::default()
    };
    let provider: Box<dyn CloudProvider> = Box::new(AwsProvider::with_client(fake, &options()).unwrap());
    assert_eq!(provider.name(), "aws");
    assert_eq!(provider.service_type(), "compute");
    assert_eq!(provider.goc_service_type(), None);
    assert_eq!(provider.get_compute_endpoints().await.unwrap().len(), 1);
}
