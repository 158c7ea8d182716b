//! Siemens CSA shadow header decoding
//!
//! Siemens scanners store acquisition parameters in a private binary
//! sub-dictionary (the "CSA header") inside tags such as (0029,1010). The
//! metadata dictionary carries it base64-encoded; [`CsaHeader`] decodes it
//! into named elements.
//!
//! Layout, all integers little endian:
//!
//! ```text
//! CSA2:  "SV10" [4 unused] u32 n_elements u32 unused  element*
//! CSA1:                    u32 n_elements u32 unused  element*
//!
//! element: name[64] i32 vm  vr[4] i32 syngodt  i32 n_items  i32 unused  item*
//! item:    i32 word[4]  data[len]  padding to a 4-byte boundary
//! ```
//!
//! The item length is `word[1]` in CSA2 and `word[0]` minus the item count
//! of the first element in CSA1.

use crate::types::{MetadataDictionary, TagKey, TagKeyError};
use base64::{engine::general_purpose, Engine as _};
use byteorder::{ByteOrder, LittleEndian};
use dicom_core::{DataElement, PrimitiveValue, VR};
use dicom_object::mem::InMemElement;
use thiserror::Error;

/// Upper bound on element and item counts
pub const MAX_CSA_ITEMS: usize = 1000;

const CSA2_MAGIC: &[u8; 4] = b"SV10";
const NAME_LEN: usize = 64;

/// CSA header decoding failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CsaError {
    #[error("tag {0} not found")]
    MissingTag(TagKey),

    #[error(transparent)]
    InvalidKey(#[from] TagKeyError),

    #[error("invalid base64 in {tag}: {message}")]
    Base64 { tag: TagKey, message: String },

    #[error("{0} decodes to an empty payload")]
    Empty(TagKey),

    #[error("{0} does not hold a binary value")]
    NotBinary(TagKey),

    #[error("truncated CSA header: {needed} bytes wanted at offset {offset}, {available} left")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("implausible CSA element count {0}")]
    ElementCount(u32),

    #[error("implausible item count {count} for CSA element '{name}'")]
    ItemCount { name: String, count: i32 },

    #[error("item of CSA element '{name}' claims {len} bytes at offset {offset}")]
    ItemLength { name: String, len: i64, offset: usize },
}

/// Header flavour, distinguished by the "SV10" magic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsaFormat {
    Csa1,
    Csa2,
}

/// One named element of a CSA header
#[derive(Debug, Clone, PartialEq)]
pub struct CsaElement {
    pub name: String,
    pub vm: i32,
    pub vr: String,
    pub syngodt: i32,
    /// Raw item payloads, padding excluded
    pub items: Vec<Vec<u8>>,
    value: Vec<u8>,
}

impl CsaElement {
    fn new(name: String, vm: i32, vr: String, syngodt: i32, items: Vec<Vec<u8>>) -> Self {
        // Non-empty items, each cut at its terminator, joined like a
        // multi-valued DICOM string.
        let value = items
            .iter()
            .map(|item| until_nul(item))
            .filter(|item| !item.is_empty())
            .collect::<Vec<_>>()
            .join(&b'\\');

        Self {
            name,
            vm,
            vr,
            syngodt,
            items,
            value,
        }
    }

    /// The element's value bytes
    pub fn value(&self) -> &[u8] {
        &self.value
    }
}

/// Fixed-width values that can be reinterpreted from a CSA item
pub trait CsaScalar: Sized {
    const SIZE: usize;

    fn from_le_slice(bytes: &[u8]) -> Self;
}

macro_rules! impl_csa_scalar {
    ($($t:ty => $read:ident),* $(,)?) => {
        $(
            impl CsaScalar for $t {
                const SIZE: usize = std::mem::size_of::<$t>();

                fn from_le_slice(bytes: &[u8]) -> Self {
                    LittleEndian::$read(bytes)
                }
            }
        )*
    };
}

impl_csa_scalar!(
    i16 => read_i16,
    u16 => read_u16,
    i32 => read_i32,
    u32 => read_u32,
    i64 => read_i64,
    u64 => read_u64,
    f32 => read_f32,
    f64 => read_f64,
);

/// A decoded CSA header
#[derive(Debug, Clone, PartialEq)]
pub struct CsaHeader {
    /// Tag of the data element the header was decoded from
    pub tag: TagKey,
    pub format: CsaFormat,
    pub elements: Vec<CsaElement>,
}

impl CsaHeader {
    /// Decodes the base64 CSA blob stored under `key` in the dictionary
    ///
    /// The key is parsed into a binary tag first; the decoded bytes are
    /// wrapped in a data element carrying that tag before parsing.
    pub fn from_dictionary(tags: &MetadataDictionary, key: &str) -> Result<Self, CsaError> {
        let tag = TagKey::parse(key)?;
        let encoded = tags.get(tag).ok_or(CsaError::MissingTag(tag))?;

        let decoded = general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| CsaError::Base64 {
                tag,
                message: e.to_string(),
            })?;
        if decoded.is_empty() {
            return Err(CsaError::Empty(tag));
        }

        let element: InMemElement =
            DataElement::new(tag.to_tag(), VR::OB, PrimitiveValue::from(decoded));
        Self::from_element(&element)
    }

    /// Parses the header carried by a binary data element
    pub fn from_element(element: &InMemElement) -> Result<Self, CsaError> {
        let tag = TagKey::from(element.header().tag);
        let bytes = element
            .value()
            .primitive()
            .map(|v| v.to_bytes())
            .ok_or(CsaError::NotBinary(tag))?;
        Self::parse(tag, &bytes)
    }

    /// Parses a raw CSA header
    pub fn parse(tag: TagKey, bytes: &[u8]) -> Result<Self, CsaError> {
        let mut reader = Reader::new(bytes);

        let format = if bytes.starts_with(CSA2_MAGIC) {
            reader.take(8)?;
            CsaFormat::Csa2
        } else {
            CsaFormat::Csa1
        };

        let n_elements = reader.read_u32()?;
        if n_elements as usize > MAX_CSA_ITEMS {
            return Err(CsaError::ElementCount(n_elements));
        }
        let _unused = reader.read_u32()?;

        let mut elements = Vec::with_capacity(n_elements as usize);
        let mut first_item_count = 0i64;

        for index in 0..n_elements {
            let name = reader.read_cstr(NAME_LEN)?;
            let vm = reader.read_i32()?;
            let vr = reader.read_cstr(4)?;
            let syngodt = reader.read_i32()?;
            let n_items = reader.read_i32()?;
            let _unused = reader.read_i32()?;

            if n_items < 0 || n_items as usize > MAX_CSA_ITEMS {
                return Err(CsaError::ItemCount {
                    name,
                    count: n_items,
                });
            }
            if index == 0 {
                first_item_count = i64::from(n_items);
            }

            let mut items = Vec::with_capacity(n_items as usize);
            for _ in 0..n_items {
                let words = [
                    reader.read_i32()?,
                    reader.read_i32()?,
                    reader.read_i32()?,
                    reader.read_i32()?,
                ];
                let len = match format {
                    CsaFormat::Csa2 => i64::from(words[1]),
                    CsaFormat::Csa1 => i64::from(words[0]) - first_item_count,
                };

                let fits = len >= 0 && (len as usize) <= reader.remaining();
                if !fits {
                    if format == CsaFormat::Csa1 {
                        // CSA1 lengths are unreliable past the declared values
                        break;
                    }
                    return Err(CsaError::ItemLength {
                        name,
                        len,
                        offset: reader.pos,
                    });
                }

                let len = len as usize;
                items.push(reader.take(len)?.to_vec());
                reader.skip((4 - len % 4) % 4);
            }

            elements.push(CsaElement::new(name, vm, vr, syngodt, items));
        }

        Ok(Self {
            tag,
            format,
            elements,
        })
    }

    pub fn find_element(&self, name: &str) -> bool {
        self.element(name).is_some()
    }

    pub fn element(&self, name: &str) -> Option<&CsaElement> {
        self.elements.iter().find(|e| e.name == name)
    }

    pub fn element_bytes(&self, name: &str) -> Option<&[u8]> {
        self.element(name).map(CsaElement::value)
    }

    /// Reads an element's value as text, bytes taken as-is
    pub fn read_string(&self, name: &str) -> Option<String> {
        self.element_bytes(name)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Reinterprets an element's first item as a little-endian scalar
    ///
    /// The item must be exactly `T::SIZE` bytes long.
    pub fn read_value<T: CsaScalar>(&self, name: &str) -> Option<T> {
        let item = self.element(name)?.items.first()?;
        (item.len() == T::SIZE).then(|| T::from_le_slice(item))
    }
}

fn until_nul(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    &bytes[..end]
}

/// Bounds-checked little-endian cursor
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CsaError> {
        if n > self.remaining() {
            return Err(CsaError::Truncated {
                offset: self.pos,
                needed: n,
                available: self.remaining(),
            });
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Skips up to `n` bytes; trailing padding may be cut off at the end
    fn skip(&mut self, n: usize) {
        self.pos += n.min(self.remaining());
    }

    fn read_i32(&mut self) -> Result<i32, CsaError> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    fn read_u32(&mut self) -> Result<u32, CsaError> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    fn read_cstr(&mut self, len: usize) -> Result<String, CsaError> {
        let bytes = until_nul(self.take(len)?);
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}
