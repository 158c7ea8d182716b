use crate::types::{MetadataDictionary, TagKey};

// Image identification
pub const MODALITY: TagKey = TagKey::new(0x0008, 0x0060);
pub const MANUFACTURER: TagKey = TagKey::new(0x0008, 0x0070);
pub const MANUFACTURER_MODEL_NAME: TagKey = TagKey::new(0x0008, 0x1090);

// Patient Tags
pub const PATIENT_NAME: TagKey = TagKey::new(0x0010, 0x0010);
pub const PATIENT_ID: TagKey = TagKey::new(0x0010, 0x0020);

// Acquisition Tags
pub const SEQUENCE_NAME: TagKey = TagKey::new(0x0018, 0x0024);
pub const DIFFUSION_B_VALUE: TagKey = TagKey::new(0x0018, 0x9087);

// Vendor private b-value tags
pub const SIEMENS_CSA_IMAGE_HEADER_INFO: TagKey = TagKey::new(0x0029, 0x1010);
pub const GE_SLOP_INT_6_9: TagKey = TagKey::new(0x0043, 0x1039);
pub const PHILIPS_DIFFUSION_B_FACTOR: TagKey = TagKey::new(0x2001, 0x1003);

// Pixel module
pub const SAMPLES_PER_PIXEL: TagKey = TagKey::new(0x0028, 0x0002);
pub const ROWS: TagKey = TagKey::new(0x0028, 0x0010);
pub const COLUMNS: TagKey = TagKey::new(0x0028, 0x0011);
pub const BITS_ALLOCATED: TagKey = TagKey::new(0x0028, 0x0100);
pub const PIXEL_REPRESENTATION: TagKey = TagKey::new(0x0028, 0x0103);
pub const FLOAT_PIXEL_DATA: TagKey = TagKey::new(0x7fe0, 0x0008);
pub const DOUBLE_FLOAT_PIXEL_DATA: TagKey = TagKey::new(0x7fe0, 0x0009);

/// Helper to get a trimmed string value from the dictionary
///
/// Returns `None` if the tag is not present
pub fn get_string_value(tags: &MetadataDictionary, key: TagKey) -> Option<String> {
    tags.get(key).map(|s| s.trim().to_string())
}

/// Helper to get a value exactly as stored, padding included
pub fn get_raw_value(tags: &MetadataDictionary, key: TagKey) -> Option<&str> {
    tags.get(key)
}

/// Case-insensitive substring test on a tag value
///
/// Absent tags never match.
pub fn value_contains(tags: &MetadataDictionary, key: TagKey, needle: &str) -> bool {
    tags.get(key)
        .map(|s| s.to_lowercase().contains(&needle.to_lowercase()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_values() {
        // Just ensure tags are correctly defined
        assert_eq!(MODALITY.to_string(), "0008|0060");
        assert_eq!(DIFFUSION_B_VALUE.to_string(), "0018|9087");
        assert_eq!(SIEMENS_CSA_IMAGE_HEADER_INFO.to_string(), "0029|1010");
        assert_eq!(GE_SLOP_INT_6_9.to_string(), "0043|1039");
        assert_eq!(PHILIPS_DIFFUSION_B_FACTOR.to_string(), "2001|1003");
    }

    #[test]
    fn test_get_string_value_trims() {
        let mut tags = MetadataDictionary::new();
        tags.insert(MODALITY, " MR ");
        assert_eq!(get_string_value(&tags, MODALITY).as_deref(), Some("MR"));
        assert_eq!(get_raw_value(&tags, MODALITY), Some(" MR "));
        assert_eq!(get_string_value(&tags, MANUFACTURER), None);
    }

    #[test]
    fn test_value_contains_is_case_insensitive() {
        let mut tags = MetadataDictionary::new();
        tags.insert(PATIENT_ID, "ProstateX-0001");
        assert!(value_contains(&tags, PATIENT_ID, "prostatex"));
        assert!(!value_contains(&tags, PATIENT_NAME, "prostatex"));
    }
}
