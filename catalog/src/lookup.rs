use std::collections::BTreeMap;

use crate::records::Typed;

/// Records of one collection keyed by their `type`.
///
/// Built once per fetched collection and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTable<T> {
    entries: BTreeMap<String, T>,
}

impl<T> Default for LookupTable<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T> LookupTable<T> {
    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<T: Typed> FromIterator<T> for LookupTable<T> {
    /// A repeated `type` replaces the earlier record.
    fn from_iter<I: IntoIterator<Item = T>>(records: I) -> Self {
        let mut entries = BTreeMap::new();
        for record in records {
            let key = record.type_key().to_string();
            if entries.insert(key.clone(), record).is_some() {
                debug!("duplicate type `{key}` in lookup source, keeping the later record");
            }
        }
        Self { entries }
    }
}

/// Index `records` by `type`; the last record wins on duplicates.
pub fn build_lookup<T: Typed + Clone>(records: &[T]) -> LookupTable<T> {
    records.iter().cloned().collect()
}
