use serde::{Deserialize, Serialize};

/// Instance type as reported by `DescribeInstanceTypes`, reduced to the
/// blocks flavors are built from. A `None` block means the API did not
/// report it.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct InstanceTypeInfo {
    pub instance_type: String,
    /// `VCpuInfo.DefaultVCpus`
    pub default_vcpus: Option<i32>,
    /// `MemoryInfo.SizeInMiB`
    pub memory_mib: Option<i64>,
    /// `InstanceStorageInfo.TotalSizeInGB`
    pub total_storage_gb: Option<i64>,
}

impl InstanceTypeInfo {
    /// A flavor can only be built when vCPU, memory and storage are known.
    pub fn is_complete(&self) -> bool {
        self.default_vcpus.is_some() && self.memory_mib.is_some() && self.total_storage_gb.is_some()
    }
}
