use crate::types::MetadataDictionary;
use log::{error, warn};

use super::tags::{get_string_value, SEQUENCE_NAME};

/// B-values at or above this are treated as misreads of the sequence name
pub const MAX_PROSTATEX_B_VALUE: u32 = 4000;

/// Extracts the b-value from the sequence name, ProstateX style
///
/// ProstateX sequence names embed the b-value as `b<digits>t`, for example
/// `*ep_b50t` or `ep_b1400t`. A digit run at the very end of the name also
/// counts.
///
/// # Algorithm
///
/// 1. Read and trim SequenceName (0018,0024)
/// 2. Find the next `b`; collect the digit run after it
/// 3. The run must end in `t` or the end of the name, otherwise stop scanning
/// 4. Accept the first run below 4000, returned as written
/// 5. Runs at or above 4000 are logged and skipped
pub fn extract_b_value(tags: &MetadataDictionary) -> Option<String> {
    let sequence_name = match get_string_value(tags, SEQUENCE_NAME) {
        Some(name) => name,
        None => {
            error!("Could not extract sequence name ({})", SEQUENCE_NAME);
            return None;
        }
    };

    if sequence_name.is_empty() {
        error!("Empty sequence name ({})", SEQUENCE_NAME);
        return None;
    }

    let b_value = scan_sequence_name(&sequence_name);
    if b_value.is_none() {
        error!("Could not parse sequence name '{}'", sequence_name);
    }
    b_value
}

/// Scans a trimmed sequence name for the first plausible `b<digits>t`
pub(crate) fn scan_sequence_name(sequence_name: &str) -> Option<String> {
    let bytes = sequence_name.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let start = match sequence_name[i..].find('b') {
            Some(offset) => i + offset + 1,
            None => break,
        };
        if start >= bytes.len() {
            break;
        }

        let end = bytes[start..]
            .iter()
            .position(|b| !b.is_ascii_digit())
            .map_or(bytes.len(), |offset| start + offset);

        if end < bytes.len() && bytes[end] != b't' {
            break;
        }

        if end > start {
            let candidate = &sequence_name[start..end];
            if let Ok(value) = candidate.parse::<u32>() {
                if value < MAX_PROSTATEX_B_VALUE {
                    return Some(candidate.to_string());
                }
                warn!(
                    "B-value of {} seems bogus. Continuing to parse '{}'",
                    value, sequence_name
                );
            }
        }

        i = end;
    }

    None
}
