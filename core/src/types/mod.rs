//! Core type definitions for b-value standardization
//!
//! - [`TagKey`]: a (group, element) pair parsed from a "gggg|eeee" key
//! - [`MetadataDictionary`]: textual tag/value view of one DICOM file
//! - [`PixelInfo`] / [`PixelType`]: pixel layout of a slice
//! - [`Vendor`]: b-value encoding conventions the dispatcher chooses between

mod dictionary;
mod pixel;
mod tag_key;
mod vendor;

pub use dictionary::MetadataDictionary;
pub use pixel::{ComponentType, PixelInfo, PixelType};
pub use tag_key::{TagKey, TagKeyError};
pub use vendor::Vendor;
