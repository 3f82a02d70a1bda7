use std::collections::BTreeMap;

use serde_json::Value;

/// A flat attribute map (`image_*`, `template_*` or endpoint keys).
pub type Record = BTreeMap<String, Value>;

/// Records keyed by provider-assigned id.
pub type RecordSet = BTreeMap<String, Record>;
