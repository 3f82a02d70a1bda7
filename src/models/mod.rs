mod api_filter;
mod instance_type_info;
mod raw_image;
mod record;
mod region_info;

pub use api_filter::ApiFilter;
pub use instance_type_info::InstanceTypeInfo;
pub use raw_image::RawImage;
pub use record::{Record, RecordSet};
pub use region_info::RegionInfo;
