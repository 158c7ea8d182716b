use crate::types::MetadataDictionary;

use super::tags::{get_raw_value, PHILIPS_DIFFUSION_B_FACTOR};

/// Extracts the b-value from Philips' private (2001,1003)
///
/// The value is returned exactly as stored. Unlike the other vendors there
/// is no numeric or range validation here.
pub fn extract_b_value(tags: &MetadataDictionary) -> Option<String> {
    get_raw_value(tags, PHILIPS_DIFFUSION_B_FACTOR).map(str::to_string)
}
