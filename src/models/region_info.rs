use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RegionInfo {
    pub region_name: String,
    pub endpoint: String,
}
