//! DICOM file access behind the [`DicomImageIo`] seam
//!
//! [`FileDicomIo`] reads and writes files with dicom-rs. The rest of the
//! crate only sees [`MetadataDictionary`] views and [`Slice`]s.

use crate::error::{Result, StandardizeError};
use crate::extraction::tags::{
    BITS_ALLOCATED, COLUMNS, DIFFUSION_B_VALUE, DOUBLE_FLOAT_PIXEL_DATA, FLOAT_PIXEL_DATA,
    GE_SLOP_INT_6_9, PHILIPS_DIFFUSION_B_FACTOR, PIXEL_REPRESENTATION, ROWS, SAMPLES_PER_PIXEL,
    SIEMENS_CSA_IMAGE_HEADER_INFO,
};
use crate::types::{MetadataDictionary, PixelInfo, TagKey};
use base64::{engine::general_purpose, Engine as _};
use byteorder::{ByteOrder, LittleEndian};
use dicom_core::{DataElement, PrimitiveValue, VR};
use dicom_dictionary_std::tags;
use dicom_object::{open_file, DefaultDicomObject, InMemDicomObject, OpenFileOptions};
use std::path::Path;

/// Reads metadata and slices, writes slices back
pub trait DicomImageIo {
    /// Reads the metadata dictionary and pixel layout, without pixel data
    fn read_metadata(&self, path: &Path) -> Result<(MetadataDictionary, PixelInfo)>;

    /// Reads a complete slice
    fn read_slice(&self, path: &Path) -> Result<Slice>;

    /// Persists a slice, keeping its identifiers and private tags
    fn write_slice(&self, slice: &Slice, path: &Path) -> Result<()>;
}

/// One loaded DICOM slice and its dictionary view
#[derive(Debug)]
pub struct Slice {
    object: DefaultDicomObject,
    tags: MetadataDictionary,
}

impl Slice {
    pub fn new(object: DefaultDicomObject) -> Self {
        let tags = metadata_from_object(&object);
        Self { object, tags }
    }

    pub fn tags(&self) -> &MetadataDictionary {
        &self.tags
    }

    pub fn pixel_info(&self) -> PixelInfo {
        pixel_info_from_object(&self.object)
    }

    pub fn object(&self) -> &DefaultDicomObject {
        &self.object
    }

    /// Stores a b-value in DiffusionBValue (0018,9087)
    ///
    /// The attribute is FD, so the value must be numeric once trimmed.
    pub fn set_diffusion_b_value(&mut self, value: &str) -> Result<()> {
        let number: f64 = value
            .trim()
            .parse()
            .map_err(|_| StandardizeError::InvalidValue {
                tag: DIFFUSION_B_VALUE.to_string(),
                value: value.to_string(),
            })?;

        self.object.put(DataElement::new(
            DIFFUSION_B_VALUE.to_tag(),
            VR::FD,
            PrimitiveValue::from(number),
        ));
        self.tags.insert(DIFFUSION_B_VALUE, value);
        Ok(())
    }
}

/// [`DicomImageIo`] over DICOM files on disk
#[derive(Debug, Clone, Copy, Default)]
pub struct FileDicomIo;

impl DicomImageIo for FileDicomIo {
    fn read_metadata(&self, path: &Path) -> Result<(MetadataDictionary, PixelInfo)> {
        let obj = OpenFileOptions::new()
            .read_until(tags::PIXEL_DATA)
            .open_file(path)
            .map_err(|e| StandardizeError::read(path, e))?;

        Ok((metadata_from_object(&obj), pixel_info_from_object(&obj)))
    }

    fn read_slice(&self, path: &Path) -> Result<Slice> {
        let obj = open_file(path).map_err(|e| StandardizeError::read(path, e))?;
        Ok(Slice::new(obj))
    }

    fn write_slice(&self, slice: &Slice, path: &Path) -> Result<()> {
        slice
            .object
            .write_to_file(path)
            .map_err(|e| StandardizeError::write(path, e))
    }
}

/// Builds the textual dictionary view of a data set
///
/// Sequences and pixel data are left out. Binary attributes are base64
/// encoded, except UN values that are plain text.
pub fn metadata_from_object(obj: &InMemDicomObject) -> MetadataDictionary {
    obj.iter()
        .filter(|elem| !is_pixel_data(TagKey::from(elem.header().tag)))
        .filter_map(|elem| {
            let value = elem.value().primitive()?;
            let key = TagKey::from(elem.header().tag);
            Some((key, render_value(private_vr(key, elem.vr()), value)))
        })
        .collect()
}

fn is_pixel_data(key: TagKey) -> bool {
    key == FLOAT_PIXEL_DATA
        || key == DOUBLE_FLOAT_PIXEL_DATA
        || key == TagKey::from(tags::PIXEL_DATA)
}

/// VRs of the private attributes the vendor conventions read
///
/// Without a private dictionary, implicit VR files deliver these as UN.
const PRIVATE_VRS: [(TagKey, VR); 3] = [
    (SIEMENS_CSA_IMAGE_HEADER_INFO, VR::OB),
    (GE_SLOP_INT_6_9, VR::IS),
    (PHILIPS_DIFFUSION_B_FACTOR, VR::FL),
];

/// Resolves UN to the known VR of a private attribute
fn private_vr(key: TagKey, vr: VR) -> VR {
    if vr != VR::UN {
        return vr;
    }
    PRIVATE_VRS
        .iter()
        .find(|(k, _)| *k == key)
        .map_or(vr, |&(_, known)| known)
}

fn render_value(vr: VR, value: &PrimitiveValue) -> String {
    match vr {
        // Raw bytes only when the value was read as UN
        VR::FL if matches!(value, PrimitiveValue::U8(_)) => {
            let bytes = value.to_bytes();
            if bytes.is_empty() || bytes.len() % 4 != 0 {
                return general_purpose::STANDARD.encode(&bytes);
            }
            bytes
                .chunks_exact(4)
                .map(|chunk| LittleEndian::read_f32(chunk).to_string())
                .collect::<Vec<_>>()
                .join("\\")
        }
        VR::IS if matches!(value, PrimitiveValue::U8(_)) => {
            let bytes = value.to_bytes();
            let text = String::from_utf8_lossy(until_nul(&bytes));
            text.trim_end_matches(' ').to_string()
        }
        VR::OB | VR::OW | VR::OF | VR::OD | VR::OL | VR::UN => {
            let bytes = value.to_bytes();
            if vr == VR::UN && is_text(&bytes) {
                String::from_utf8_lossy(until_nul(&bytes)).into_owned()
            } else {
                general_purpose::STANDARD.encode(&bytes)
            }
        }
        _ => value.to_str().into_owned(),
    }
}

/// Printable ASCII, optionally NUL padded
fn is_text(bytes: &[u8]) -> bool {
    let text = until_nul(bytes);
    !bytes.is_empty()
        && bytes[text.len()..].iter().all(|&b| b == 0)
        && text.iter().all(|b| (0x20..0x7f).contains(b))
}

fn until_nul(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    &bytes[..end]
}

/// Helper to get u16 value from a DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to u16
fn get_u16_value(obj: &InMemDicomObject, key: TagKey) -> Option<u16> {
    obj.element(key.to_tag())
        .ok()
        .and_then(|elem| elem.to_int::<u16>().ok())
}

/// Reads the pixel module attributes of a data set
pub fn pixel_info_from_object(obj: &InMemDicomObject) -> PixelInfo {
    PixelInfo {
        rows: get_u16_value(obj, ROWS),
        columns: get_u16_value(obj, COLUMNS),
        samples_per_pixel: get_u16_value(obj, SAMPLES_PER_PIXEL),
        bits_allocated: get_u16_value(obj, BITS_ALLOCATED),
        pixel_representation: get_u16_value(obj, PIXEL_REPRESENTATION),
        float_pixel_data: obj.element(FLOAT_PIXEL_DATA.to_tag()).is_ok(),
        double_pixel_data: obj.element(DOUBLE_FLOAT_PIXEL_DATA.to_tag()).is_ok(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::extraction::tags::{
        GE_SLOP_INT_6_9, MANUFACTURER, MODALITY, SIEMENS_CSA_IMAGE_HEADER_INFO,
    };
    use dicom_core::Tag;
    use dicom_object::mem::InMemElement;
    use dicom_object::meta::FileMetaTableBuilder;
    use crate::api::{BValueStandardizer, Outcome};
    use tempfile::TempDir;

    pub(crate) const SOP_INSTANCE_UID: &str = "1.2.826.0.1.3680043.2.1125.1.42";
    const MR_IMAGE_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.4";
    const EXPLICIT_VR_LE: &str = "1.2.840.10008.1.2.1";
    const IMPLICIT_VR_LE: &str = "1.2.840.10008.1.2";

    /// A 2x2 16-bit MR slice with the given extra elements
    pub(crate) fn mr_slice(extra: Vec<InMemElement>) -> DefaultDicomObject {
        mr_slice_with_syntax(extra, EXPLICIT_VR_LE)
    }

    fn mr_slice_with_syntax(
        extra: Vec<InMemElement>,
        transfer_syntax: &str,
    ) -> DefaultDicomObject {
        let mut obj = InMemDicomObject::from_element_iter([
            DataElement::new(tags::SOP_CLASS_UID, VR::UI, PrimitiveValue::from(MR_IMAGE_STORAGE)),
            DataElement::new(
                tags::SOP_INSTANCE_UID,
                VR::UI,
                PrimitiveValue::from(SOP_INSTANCE_UID),
            ),
            DataElement::new(MODALITY.to_tag(), VR::CS, PrimitiveValue::from("MR")),
            DataElement::new(SAMPLES_PER_PIXEL.to_tag(), VR::US, PrimitiveValue::from(1_u16)),
            DataElement::new(ROWS.to_tag(), VR::US, PrimitiveValue::from(2_u16)),
            DataElement::new(COLUMNS.to_tag(), VR::US, PrimitiveValue::from(2_u16)),
            DataElement::new(BITS_ALLOCATED.to_tag(), VR::US, PrimitiveValue::from(16_u16)),
            DataElement::new(
                PIXEL_REPRESENTATION.to_tag(),
                VR::US,
                PrimitiveValue::from(0_u16),
            ),
            DataElement::new(
                tags::PIXEL_DATA,
                VR::OW,
                PrimitiveValue::from(vec![0_u8, 1, 2, 3, 4, 5, 6, 7]),
            ),
        ]);
        for elem in extra {
            obj.put(elem);
        }

        obj.with_meta(
            FileMetaTableBuilder::new()
                .transfer_syntax(transfer_syntax)
                .media_storage_sop_class_uid(MR_IMAGE_STORAGE)
                .media_storage_sop_instance_uid(SOP_INSTANCE_UID),
        )
        .unwrap()
    }

    #[test]
    fn test_metadata_from_object() {
        let obj = mr_slice(vec![
            DataElement::new(
                MANUFACTURER.to_tag(),
                VR::LO,
                PrimitiveValue::from("GE MEDICAL SYSTEMS"),
            ),
            DataElement::new(
                GE_SLOP_INT_6_9.to_tag(),
                VR::IS,
                PrimitiveValue::Strs(
                    ["1000", "8", "0", "0"].iter().map(|s| s.to_string()).collect(),
                ),
            ),
            DataElement::new(
                SIEMENS_CSA_IMAGE_HEADER_INFO.to_tag(),
                VR::OB,
                PrimitiveValue::from(b"SV10\x04\x03\x02\x01".to_vec()),
            ),
        ]);

        let dict = metadata_from_object(&obj);
        assert_eq!(dict.get(MODALITY), Some("MR"));
        assert_eq!(dict.get(GE_SLOP_INT_6_9), Some("1000\\8\\0\\0"));
        assert_eq!(dict.get(SIEMENS_CSA_IMAGE_HEADER_INFO), Some("U1YxMAQDAgE="));
        assert!(!dict.contains(TagKey::from(tags::PIXEL_DATA)));
    }

    #[test]
    fn test_render_unknown_vr() {
        let text = PrimitiveValue::from(b"1000\\8\\0\\0\0".to_vec());
        assert_eq!(render_value(VR::UN, &text), "1000\\8\\0\\0");

        let binary = PrimitiveValue::from(vec![0x53_u8, 0x00, 0x01, 0xff]);
        assert_eq!(render_value(VR::UN, &binary), "UwAB/w==");
    }

    #[test]
    fn test_private_vr_resolves_unknown() {
        assert_eq!(private_vr(PHILIPS_DIFFUSION_B_FACTOR, VR::UN), VR::FL);
        assert_eq!(private_vr(GE_SLOP_INT_6_9, VR::UN), VR::IS);
        assert_eq!(private_vr(SIEMENS_CSA_IMAGE_HEADER_INFO, VR::UN), VR::OB);
        assert_eq!(private_vr(PHILIPS_DIFFUSION_B_FACTOR, VR::DS), VR::DS);
        assert_eq!(private_vr(MANUFACTURER, VR::UN), VR::UN);
    }

    #[test]
    fn test_render_unknown_private_values() {
        let mut raw = 1000.0_f32.to_le_bytes().to_vec();
        let single = PrimitiveValue::from(raw.clone());
        assert_eq!(render_value(VR::FL, &single), "1000");

        raw.extend_from_slice(&0.5_f32.to_le_bytes());
        let pair = PrimitiveValue::from(raw);
        assert_eq!(render_value(VR::FL, &pair), "1000\\0.5");

        let odd = PrimitiveValue::from(vec![1_u8, 2, 3]);
        assert_eq!(render_value(VR::FL, &odd), "AQID");

        let text = PrimitiveValue::from(b"1000\\8\\0\\0 ".to_vec());
        assert_eq!(render_value(VR::IS, &text), "1000\\8\\0\\0");

        let decoded = PrimitiveValue::from(1000.0_f32);
        assert_eq!(render_value(VR::FL, &decoded), "1000");
    }

    #[test]
    fn test_implicit_vr_philips_is_standardized() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("philips.dcm");
        mr_slice_with_syntax(
            vec![
                DataElement::new(
                    MANUFACTURER.to_tag(),
                    VR::LO,
                    PrimitiveValue::from("Philips Medical Systems"),
                ),
                DataElement::new(
                    PHILIPS_DIFFUSION_B_FACTOR.to_tag(),
                    VR::FL,
                    PrimitiveValue::from(1000.0_f32),
                ),
            ],
            IMPLICIT_VR_LE,
        )
        .write_to_file(&path)
        .unwrap();

        let (dict, _) = FileDicomIo.read_metadata(&path).unwrap();
        assert_eq!(dict.get(PHILIPS_DIFFUSION_B_FACTOR), Some("1000"));

        let outcome = BValueStandardizer::new(FileDicomIo)
            .standardize_file(&path)
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::Standardized {
                b_value: "1000".to_string()
            }
        );

        let (dict, _) = FileDicomIo.read_metadata(&path).unwrap();
        assert_eq!(dict.get(DIFFUSION_B_VALUE), Some("1000"));
    }

    #[test]
    fn test_implicit_vr_ge_is_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ge.dcm");
        mr_slice_with_syntax(
            vec![DataElement::new(
                GE_SLOP_INT_6_9.to_tag(),
                VR::IS,
                PrimitiveValue::from("1000\\8\\0\\0"),
            )],
            IMPLICIT_VR_LE,
        )
        .write_to_file(&path)
        .unwrap();

        let (dict, _) = FileDicomIo.read_metadata(&path).unwrap();
        assert_eq!(dict.get(GE_SLOP_INT_6_9), Some("1000\\8\\0\\0"));
    }

    #[test]
    fn test_pixel_info_from_object() {
        let obj = mr_slice(vec![]);
        let info = pixel_info_from_object(&obj);
        assert_eq!(info.rows, Some(2));
        assert_eq!(info.bits_allocated, Some(16));
        assert!(!info.float_pixel_data);
        assert!(info.pixel_type().is_some());
        assert_eq!(Slice::new(obj).pixel_info(), info);
    }

    #[test]
    fn test_set_diffusion_b_value() {
        let mut slice = Slice::new(mr_slice(vec![]));
        slice.set_diffusion_b_value("1000").unwrap();

        assert_eq!(slice.tags().get(DIFFUSION_B_VALUE), Some("1000"));
        let elem = slice.object().element(Tag(0x0018, 0x9087)).unwrap();
        assert_eq!(elem.vr(), VR::FD);
        assert_eq!(elem.to_float64().unwrap(), 1000.0);

        assert!(matches!(
            slice.set_diffusion_b_value("1000\\0"),
            Err(StandardizeError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_file_round_trip_keeps_identity() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("slice.dcm");
        mr_slice(vec![DataElement::new(
            GE_SLOP_INT_6_9.to_tag(),
            VR::IS,
            PrimitiveValue::from("50\\100\\200"),
        )])
        .write_to_file(&path)
        .unwrap();

        let io = FileDicomIo;
        let (dict, pixels) = io.read_metadata(&path).unwrap();
        assert_eq!(dict.get(MODALITY), Some("MR"));
        assert_eq!(pixels.columns, Some(2));
        assert!(!dict.contains(DIFFUSION_B_VALUE));

        let mut slice = io.read_slice(&path).unwrap();
        slice.set_diffusion_b_value("50").unwrap();
        io.write_slice(&slice, &path).unwrap();

        let (dict, _) = io.read_metadata(&path).unwrap();
        assert_eq!(dict.get(DIFFUSION_B_VALUE), Some("50"));
        assert_eq!(
            dict.get(TagKey::from(tags::SOP_INSTANCE_UID)),
            Some(SOP_INSTANCE_UID)
        );
        assert!(dict.contains(GE_SLOP_INT_6_9));
    }

    #[test]
    fn test_read_missing_file() {
        let result = FileDicomIo.read_metadata(Path::new("/nonexistent/slice.dcm"));
        assert!(matches!(result, Err(StandardizeError::Dicom { .. })));
    }
}
