use super::TagKey;
use std::collections::BTreeMap;

/// Textual view of a DICOM data set, keyed by tag
///
/// Values are kept exactly as decoded: multi-valued attributes are joined
/// with `\` and nothing is trimmed. Binary attributes hold base64 text.
/// Iteration is in ascending tag order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct MetadataDictionary {
    entries: BTreeMap<TagKey, String>,
}

impl MetadataDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the value stored under `key`
    pub fn insert(&mut self, key: TagKey, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key, value.into())
    }

    pub fn get(&self, key: TagKey) -> Option<&str> {
        self.entries.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: TagKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TagKey, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl<S: Into<String>> FromIterator<(TagKey, S)> for MetadataDictionary {
    fn from_iter<T: IntoIterator<Item = (TagKey, S)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k, v.into())).collect(),
        }
    }
}

impl<S: Into<String>> Extend<(TagKey, S)> for MetadataDictionary {
    fn extend<T: IntoIterator<Item = (TagKey, S)>>(&mut self, iter: T) {
        self.entries
            .extend(iter.into_iter().map(|(k, v)| (k, v.into())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_are_not_trimmed() {
        let mut tags = MetadataDictionary::new();
        tags.insert(TagKey::new(0x0008, 0x0060), "MR ");
        assert_eq!(tags.get(TagKey::new(0x0008, 0x0060)), Some("MR "));
        assert!(tags.get(TagKey::new(0x0008, 0x0070)).is_none());
    }

    #[test]
    fn test_keys_are_unique_and_ordered() {
        let mut tags: MetadataDictionary = [
            (TagKey::new(0x0018, 0x9087), "1000"),
            (TagKey::new(0x0008, 0x0060), "MR"),
        ]
        .into_iter()
        .collect();

        let previous = tags.insert(TagKey::new(0x0018, 0x9087), "50");
        assert_eq!(previous.as_deref(), Some("1000"));
        assert_eq!(tags.len(), 2);

        let keys: Vec<String> = tags.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["0008|0060", "0018|9087"]);
    }
}
