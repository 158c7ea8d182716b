use dicom_core::Tag;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Reasons a textual tag key is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagKeyError {
    #[error("empty tag key")]
    Empty,

    #[error("tag key '{0}' does not start with a hex digit")]
    NotHex(String),

    #[error("tag key '{0}' has no '|' after the group")]
    MissingSeparator(String),

    #[error("tag key '{0}' has no element after '|'")]
    MissingElement(String),

    #[error("tag key '{0}' has trailing characters")]
    TrailingCharacters(String),

    #[error("tag key '{0}' does not fit in 16 bits")]
    OutOfRange(String),
}

/// A DICOM tag addressed the way the metadata dictionary keys it: "gggg|eeee"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagKey {
    pub group: u16,
    pub element: u16,
}

impl TagKey {
    pub const fn new(group: u16, element: u16) -> Self {
        Self { group, element }
    }

    /// Parses a dictionary key of the form `<hex>|<hex>`
    ///
    /// Both components must be non-empty hex runs that fit in 16 bits, and
    /// nothing may precede the group or follow the element.
    ///
    /// ```
    /// use bvalue_core::TagKey;
    ///
    /// assert_eq!(TagKey::parse("0018|9087"), Ok(TagKey::new(0x0018, 0x9087)));
    /// assert_eq!(TagKey::parse("18|9087"), Ok(TagKey::new(0x18, 0x9087)));
    /// assert!(TagKey::parse("0018-9087").is_err());
    /// ```
    pub fn parse(key: &str) -> Result<Self, TagKeyError> {
        let first = key.chars().next().ok_or(TagKeyError::Empty)?;
        if !first.is_ascii_hexdigit() {
            return Err(TagKeyError::NotHex(key.to_string()));
        }

        let (group, rest) = split_hex(key);
        let rest = rest
            .strip_prefix('|')
            .ok_or_else(|| TagKeyError::MissingSeparator(key.to_string()))?;
        if rest.is_empty() {
            return Err(TagKeyError::MissingElement(key.to_string()));
        }

        let (element, rest) = split_hex(rest);
        if element.is_empty() {
            return Err(TagKeyError::MissingElement(key.to_string()));
        }
        if !rest.is_empty() {
            return Err(TagKeyError::TrailingCharacters(key.to_string()));
        }

        let parse = |s: &str| {
            u16::from_str_radix(s, 16).map_err(|_| TagKeyError::OutOfRange(key.to_string()))
        };

        Ok(Self {
            group: parse(group)?,
            element: parse(element)?,
        })
    }

    pub fn to_tag(self) -> Tag {
        Tag(self.group, self.element)
    }
}

/// Splits off the leading run of hex digits
fn split_hex(s: &str) -> (&str, &str) {
    let end = s
        .find(|c: char| !c.is_ascii_hexdigit())
        .unwrap_or(s.len());
    s.split_at(end)
}

impl FromStr for TagKey {
    type Err = TagKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Tag> for TagKey {
    fn from(tag: Tag) -> Self {
        Self::new(tag.group(), tag.element())
    }
}

impl From<TagKey> for Tag {
    fn from(key: TagKey) -> Self {
        key.to_tag()
    }
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}|{:04x}", self.group, self.element)
    }
}

/// Serialized as its "gggg|eeee" text
#[cfg(feature = "json")]
impl serde::Serialize for TagKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
