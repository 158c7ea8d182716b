use crate::types::MetadataDictionary;
use log::{debug, error};
use regex::Regex;
use std::sync::OnceLock;

use super::tags::{get_raw_value, GE_SLOP_INT_6_9};

/// Largest b-value accepted from the GE private tag
pub const MAX_GE_B_VALUE: f64 = 3000.0;

/// Extracts the b-value from GE's private (0043,1039)
///
/// The tag is multi-valued ("1000\8\0\0"); the b-value is the first value.
/// Some GE software adds a spurious leading significant digit
/// ("1000001000"), so values above 3000 get their first significant digit
/// dropped and are re-checked.
///
/// The result is truncated to an integer.
pub fn extract_b_value(tags: &MetadataDictionary) -> Option<String> {
    let raw = get_raw_value(tags, GE_SLOP_INT_6_9)?;

    let Some((first, _)) = raw.split_once('\\') else {
        error!(
            "Expected a multi-valued {} but found '{}'",
            GE_SLOP_INT_6_9, raw
        );
        return None;
    };

    let mut value = match parse_leading_f64(first) {
        Some(v) if v >= 0.0 => v,
        _ => {
            error!("Bogus b-value '{}' in {}", first, GE_SLOP_INT_6_9);
            return None;
        }
    };

    if value > MAX_GE_B_VALUE {
        let corrected = strip_leading_digit(first);
        debug!(
            "B-value {} exceeds {}; retrying as '{}'",
            value, MAX_GE_B_VALUE, corrected
        );

        value = match parse_leading_f64(corrected) {
            Some(v) if (0.0..=MAX_GE_B_VALUE).contains(&v) => v,
            _ => {
                error!(
                    "B-value '{}' in {} is implausible even after correction",
                    first, GE_SLOP_INT_6_9
                );
                return None;
            }
        };
    }

    Some((value as i64).to_string())
}

/// Drops everything up to and including the first character that is not a
/// space, tab or zero
fn strip_leading_digit(s: &str) -> &str {
    match s.char_indices().find(|(_, c)| !matches!(c, ' ' | '\t' | '0')) {
        Some((idx, c)) => &s[idx + c.len_utf8()..],
        None => "",
    }
}

/// Parses the number at the start of `s`, ignoring leading whitespace and
/// anything after the number
fn parse_leading_f64(s: &str) -> Option<f64> {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let re = REGEX.get_or_init(|| {
        Regex::new(r"^\s*([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)")
            .expect("Failed to compile regex")
    });

    re.captures(s)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
