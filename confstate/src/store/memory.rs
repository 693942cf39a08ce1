use super::{Entry, EntryKind, Store, DEFAULT_MAX_KEY_LEN};
use crate::error::StoreError;
use std::collections::BTreeMap;

/// In-memory store. Writes are immediately visible and `commit` only counts.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, Entry>,
    max_key_len: usize,
    read_only: bool,
    commits: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            entries: BTreeMap::new(),
            max_key_len: DEFAULT_MAX_KEY_LEN,
            read_only: false,
            commits: 0,
        }
    }

    pub fn with_max_key_len(mut self, max_key_len: usize) -> Self {
        self.max_key_len = max_key_len;
        self
    }

    /// Reject every subsequent write with [`StoreError::ReadOnly`].
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn commits(&self) -> usize {
        self.commits
    }

    fn lookup(&self, key: &str) -> Result<&Entry, StoreError> {
        self.check_key(key)?;
        self.entries.get(key).ok_or_else(|| StoreError::NotFound {
            key: key.to_string(),
        })
    }

    fn writable(&self) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        Ok(())
    }
}

impl Store for MemoryStore {
    fn max_key_len(&self) -> usize {
        self.max_key_len
    }

    fn get_entry(&self, key: &str, kind: EntryKind) -> Result<Entry, StoreError> {
        let entry = self.lookup(key)?;
        if entry.kind() != kind {
            return Err(StoreError::TypeMismatch {
                key: key.to_string(),
                expected: kind.name(),
                found: entry.kind().name(),
            });
        }
        Ok(entry.clone())
    }

    fn set_entry(&mut self, key: &str, entry: Entry) -> Result<(), StoreError> {
        self.check_key(key)?;
        self.writable()?;
        self.entries.insert(key.to_string(), entry);
        Ok(())
    }

    fn string_len(&self, key: &str) -> Result<usize, StoreError> {
        match self.lookup(key)? {
            Entry::Str(s) => Ok(s.len()),
            other => Err(StoreError::TypeMismatch {
                key: key.to_string(),
                expected: EntryKind::Str.name(),
                found: other.kind().name(),
            }),
        }
    }

    fn get_string(&self, key: &str, len: usize) -> Result<String, StoreError> {
        if len == 0 {
            return Err(StoreError::Backend(format!(
                "zero-length string read for {key}"
            )));
        }
        match self.lookup(key)? {
            Entry::Str(s) if s.len() == len => Ok(s.clone()),
            Entry::Str(s) => Err(StoreError::Backend(format!(
                "length mismatch for {key}: requested {len}, stored {}",
                s.len()
            ))),
            other => Err(StoreError::TypeMismatch {
                key: key.to_string(),
                expected: EntryKind::Str.name(),
                found: other.kind().name(),
            }),
        }
    }

    fn erase_all(&mut self) -> Result<(), StoreError> {
        self.writable()?;
        self.entries.clear();
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.commits += 1;
        Ok(())
    }
}
