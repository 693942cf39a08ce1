use super::Codec;
use crate::error::StoreError;
use crate::store::{Store, StoreExt};
use serde_json::Value;

impl Codec for String {
    fn from_document(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }

    fn to_document(&self) -> Value {
        Value::String(self.clone())
    }

    fn load(store: &dyn Store, key: &str) -> Result<Option<Self>, StoreError> {
        store.get_str(key).map(Some)
    }

    fn store(&self, store: &mut dyn Store, key: &str) -> Result<(), StoreError> {
        store.set_str(key, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{EntryKind, MemoryStore};
    use serde_json::json;
    use std::cell::Cell;

    /// Delegates to a MemoryStore and counts calls to `get_string`.
    struct CountingStore {
        inner: MemoryStore,
        reads: Cell<usize>,
    }

    impl Store for CountingStore {
        fn max_key_len(&self) -> usize {
            self.inner.max_key_len()
        }

        fn get_entry(&self, key: &str, kind: EntryKind) -> Result<crate::store::Entry, StoreError> {
            self.inner.get_entry(key, kind)
        }

        fn set_entry(&mut self, key: &str, entry: crate::store::Entry) -> Result<(), StoreError> {
            self.inner.set_entry(key, entry)
        }

        fn string_len(&self, key: &str) -> Result<usize, StoreError> {
            self.inner.string_len(key)
        }

        fn get_string(&self, key: &str, len: usize) -> Result<String, StoreError> {
            self.reads.set(self.reads.get() + 1);
            self.inner.get_string(key, len)
        }

        fn erase_all(&mut self) -> Result<(), StoreError> {
            self.inner.erase_all()
        }

        fn commit(&mut self) -> Result<(), StoreError> {
            self.inner.commit()
        }
    }

    #[test]
    fn document_strings_only() {
        assert_eq!(String::from_document(&json!("foobar")), Some("foobar".to_string()));
        assert_eq!(String::from_document(&json!(1)), None);
        assert_eq!("x".to_string().to_document(), json!("x"));
    }

    #[test]
    fn empty_string_load_skips_the_read() {
        let mut store = CountingStore {
            inner: MemoryStore::new(),
            reads: Cell::new(0),
        };
        String::new().store(&mut store, "e").unwrap();
        "abc".to_string().store(&mut store, "s").unwrap();

        assert_eq!(String::load(&store, "e").unwrap(), Some(String::new()));
        assert_eq!(store.reads.get(), 0);

        assert_eq!(String::load(&store, "s").unwrap(), Some("abc".to_string()));
        assert_eq!(store.reads.get(), 1);
    }

    #[test]
    fn missing_string_is_not_found() {
        let store = MemoryStore::new();
        assert!(String::load(&store, "s").unwrap_err().is_not_found());
    }
}
