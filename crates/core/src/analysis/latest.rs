use std::collections::btree_map::{self, BTreeMap};

use crate::model::Record;

/// Deduplicated working set: exactly one record per canonical id.
///
/// Ordered by id so every downstream pass is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    records: BTreeMap<String, Record>,
}

impl RecordSet {
    /// Keep the most recent record per id; see [`select_latest`].
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        Self { records: select_latest(records) }
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = (&'a String, &'a Record);
    type IntoIter = btree_map::Iter<'a, String, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Select one record per canonical id from records in input order.
///
/// A later record replaces the kept one when its timestamp is
/// lexicographically greater, when it has a timestamp and the kept one does
/// not, or when both timestamps are equal (including both empty). Input
/// order is therefore the final tie-break.
pub fn select_latest<I>(records: I) -> BTreeMap<String, Record>
where
    I: IntoIterator<Item = Record>,
{
    let mut latest: BTreeMap<String, Record> = BTreeMap::new();
    for record in records {
        match latest.entry(record.id.clone()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(record);
            }
            btree_map::Entry::Occupied(mut slot) => {
                if supersedes(&record.timestamp, &slot.get().timestamp) {
                    slot.insert(record);
                }
            }
        }
    }
    latest
}

/// Whether a later-seen timestamp replaces the kept one.
fn supersedes(candidate: &str, kept: &str) -> bool {
    match (candidate.is_empty(), kept.is_empty()) {
        (false, false) => candidate >= kept,
        (false, true) => true,
        (true, false) => false,
        (true, true) => true,
    }
}
