use crate::types::{MetadataDictionary, Vendor};
use log::{debug, error};

use super::tags::{
    get_raw_value, get_string_value, value_contains, DIFFUSION_B_VALUE, MANUFACTURER, PATIENT_ID,
    PATIENT_NAME,
};
use super::{ge, philips, prostatex, siemens};

const PROSTATEX_MARKER: &str = "prostatex";

/// Chooses the b-value convention for a data set
///
/// Implements the dispatch rules, in order:
///
/// 1. PatientName or PatientID containing "prostatex" → ProstateX,
///    whatever the manufacturer
/// 2. No Manufacturer → `None`
/// 3. Manufacturer substring match → Siemens, GE, Philips or Unknown
pub fn select_vendor(tags: &MetadataDictionary) -> Option<Vendor> {
    if value_contains(tags, PATIENT_NAME, PROSTATEX_MARKER)
        || value_contains(tags, PATIENT_ID, PROSTATEX_MARKER)
    {
        return Some(Vendor::ProstateX);
    }

    get_raw_value(tags, MANUFACTURER).map(Vendor::from_manufacturer)
}

/// Computes the diffusion b-value of a data set
///
/// An existing DiffusionBValue (0018,9087) is returned as is (trimmed);
/// otherwise the vendor convention picked by [`select_vendor`] decides.
/// Returns `None` when the b-value cannot be determined.
///
/// # Example
///
/// ```
/// use bvalue_core::extraction::compute_b_value;
/// use bvalue_core::{MetadataDictionary, TagKey};
///
/// let mut tags = MetadataDictionary::new();
/// tags.insert(TagKey::new(0x0008, 0x0070), "GE MEDICAL SYSTEMS");
/// tags.insert(TagKey::new(0x0043, 0x1039), "1000\\8\\0\\0");
///
/// assert_eq!(compute_b_value(&tags).as_deref(), Some("1000"));
/// ```
pub fn compute_b_value(tags: &MetadataDictionary) -> Option<String> {
    if let Some(b_value) = get_string_value(tags, DIFFUSION_B_VALUE) {
        return non_empty(b_value);
    }

    let Some(vendor) = select_vendor(tags) else {
        error!("Could not determine manufacturer");
        return None;
    };
    if vendor.is_unknown() {
        error!(
            "Unsupported manufacturer '{}'",
            get_raw_value(tags, MANUFACTURER).unwrap_or_default()
        );
        return None;
    }
    debug!("Using the {} b-value convention", vendor);

    let b_value = match vendor {
        Vendor::ProstateX => prostatex::extract_b_value(tags),
        Vendor::Siemens => siemens::extract_b_value(tags),
        Vendor::Ge => ge::extract_b_value(tags),
        Vendor::Philips => philips::extract_b_value(tags),
        Vendor::Unknown => None,
    };

    b_value.and_then(non_empty)
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}
