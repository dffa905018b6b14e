use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::vo::{ContentHash, FileName, StoredFile};

/// Mapping from content hash to the names carrying that content.
///
/// The first name of a list is the canonical one, the name of the artifact on disk.
/// A list is never empty, dropping its last name drops the hash.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileIndex {
    entries: BTreeMap<ContentHash, Vec<FileName>>,
}

impl FileIndex {
    pub fn lookup(&self, hash: &ContentHash) -> Option<&[FileName]> {
        self.entries.get(hash).map(Vec::as_slice)
    }

    pub fn canonical(&self, hash: &ContentHash) -> Option<&FileName> {
        self.entries.get(hash).and_then(|names| names.first())
    }

    /// Append `file_name` to the aliases of `hash`, returns whether anything changed.
    pub fn put_alias(&mut self, hash: &ContentHash, file_name: &FileName) -> bool {
        let names = self.entries.entry(hash.to_owned()).or_default();
        if names.contains(file_name) {
            return false;
        }
        names.push(file_name.to_owned());
        true
    }

    /// Remove `file_name` from the aliases of `hash`.
    ///
    /// Returns `None` if the name wasn't an alias, else the remaining aliases,
    /// empty when the hash itself was dropped.
    pub fn drop_alias(&mut self, hash: &ContentHash, file_name: &FileName) -> Option<Vec<FileName>> {
        let names = self.entries.get_mut(hash)?;
        let position = names.iter().position(|n| n == file_name)?;
        names.remove(position);
        if names.is_empty() {
            self.entries.remove(hash);
            return Some(vec![]);
        }
        Some(names.to_owned())
    }

    /// Every alias, hashes in order and names in list order.
    pub fn stored_files(&self) -> Vec<StoredFile> {
        self.entries
            .iter()
            .flat_map(|(hash, names)| {
                names.iter().map(move |file_name| StoredFile {
                    hash: hash.to_owned(),
                    file_name: file_name.to_owned(),
                })
            })
            .collect()
    }

    pub fn hashes(&self) -> impl Iterator<Item = &ContentHash> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
