// Record helpers
pub mod merge;
pub mod normalize;

// Output
pub mod display;

pub use display::cell_text;
pub use merge::{blank_record, merge_into, merge_serialized, opt_str};
pub use normalize::{normalize_record, normalize_value, NORMALIZED_VALUES};
