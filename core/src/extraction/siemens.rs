use crate::csa::CsaHeader;
use crate::types::MetadataDictionary;
use log::{debug, error};

use super::prostatex;
use super::tags::{value_contains, MANUFACTURER_MODEL_NAME};

/// Dictionary key of the CSA image header, (0029,1010)
pub const CSA_IMAGE_HEADER_KEY: &str = "0029|1010";

/// Name of the CSA element holding the b-value
pub const CSA_B_VALUE: &str = "B_value";

/// Scanner models whose ProstateX series carry the b-value in the sequence name
const SEQUENCE_NAME_MODELS: [&str; 2] = ["skyra", "verio"];

/// Extracts the b-value from a Siemens image
///
/// # Algorithm
///
/// 1. Skyra and Verio: try the sequence-name convention first
/// 2. Decode the CSA image header in (0029,1010)
/// 3. Return its `B_value` element as text
pub fn extract_b_value(tags: &MetadataDictionary) -> Option<String> {
    let sequence_name_model = SEQUENCE_NAME_MODELS
        .iter()
        .any(|model| value_contains(tags, MANUFACTURER_MODEL_NAME, model));

    if sequence_name_model {
        if let Some(b_value) = prostatex::extract_b_value(tags) {
            return Some(b_value);
        }
        debug!("No b-value in the sequence name, falling back to the CSA header");
    }

    let header = match CsaHeader::from_dictionary(tags, CSA_IMAGE_HEADER_KEY) {
        Ok(header) => header,
        Err(e) => {
            error!("Could not decode CSA header: {}", e);
            return None;
        }
    };

    let b_value = header.read_string(CSA_B_VALUE);
    if b_value.is_none() {
        error!(
            "CSA header in {} has no '{}' element",
            header.tag, CSA_B_VALUE
        );
    }
    b_value
}
