// Flat key-value store side of a schema: backend trait plus typed access helpers

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::StoreError;
use serde::Serialize;
use std::fmt;

/// Longest key accepted by default, matching the 16-byte (NUL included)
/// key field of embedded NVS partitions.
pub const DEFAULT_MAX_KEY_LEN: usize = 15;

/// Primitive type tag of a stored entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    Bool,
    Str,
}

impl EntryKind {
    pub const ALL: [EntryKind; 10] = [
        EntryKind::U8,
        EntryKind::I8,
        EntryKind::U16,
        EntryKind::I16,
        EntryKind::U32,
        EntryKind::I32,
        EntryKind::U64,
        EntryKind::I64,
        EntryKind::Bool,
        EntryKind::Str,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EntryKind::U8 => "u8",
            EntryKind::I8 => "i8",
            EntryKind::U16 => "u16",
            EntryKind::I16 => "i16",
            EntryKind::U32 => "u32",
            EntryKind::I32 => "i32",
            EntryKind::U64 => "u64",
            EntryKind::I64 => "i64",
            EntryKind::Bool => "bool",
            EntryKind::Str => "str",
        }
    }

    pub fn from_name(name: &str) -> Option<EntryKind> {
        EntryKind::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed value as held by a store backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Entry {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    Bool(bool),
    Str(String),
}

impl Entry {
    pub fn kind(&self) -> EntryKind {
        match self {
            Entry::U8(_) => EntryKind::U8,
            Entry::I8(_) => EntryKind::I8,
            Entry::U16(_) => EntryKind::U16,
            Entry::I16(_) => EntryKind::I16,
            Entry::U32(_) => EntryKind::U32,
            Entry::I32(_) => EntryKind::I32,
            Entry::U64(_) => EntryKind::U64,
            Entry::I64(_) => EntryKind::I64,
            Entry::Bool(_) => EntryKind::Bool,
            Entry::Str(_) => EntryKind::Str,
        }
    }
}

/// A flat namespace of typed entries addressed by string key.
///
/// Implementations must report a never-written key as
/// [`StoreError::NotFound`] and a key longer than [`Store::max_key_len`] as
/// [`StoreError::KeyTooLong`], never truncating it.
pub trait Store {
    fn max_key_len(&self) -> usize;

    /// Fetch the entry under `key`, which must hold a value of `kind`.
    fn get_entry(&self, key: &str, kind: EntryKind) -> Result<Entry, StoreError>;

    fn set_entry(&mut self, key: &str, entry: Entry) -> Result<(), StoreError>;

    /// Byte length of the string stored under `key`.
    fn string_len(&self, key: &str) -> Result<usize, StoreError>;

    /// Read the string under `key`; `len` is the length reported by
    /// [`Store::string_len`] and is never zero.
    fn get_string(&self, key: &str, len: usize) -> Result<String, StoreError>;

    /// Remove every entry in the namespace.
    fn erase_all(&mut self) -> Result<(), StoreError>;

    /// Make all previous writes durable.
    fn commit(&mut self) -> Result<(), StoreError>;

    fn check_key(&self, key: &str) -> Result<(), StoreError> {
        let max = self.max_key_len();
        if key.len() > max {
            return Err(StoreError::KeyTooLong {
                key: key.to_string(),
                max,
            });
        }
        Ok(())
    }
}

/// Fixed-width primitives a store holds natively.
pub trait StorePrimitive: Sized + Copy {
    const KIND: EntryKind;

    fn into_entry(self) -> Entry;

    fn from_entry(entry: Entry) -> Option<Self>;
}

macro_rules! impl_store_primitive {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl StorePrimitive for $ty {
                const KIND: EntryKind = EntryKind::$variant;

                fn into_entry(self) -> Entry {
                    Entry::$variant(self)
                }

                fn from_entry(entry: Entry) -> Option<Self> {
                    match entry {
                        Entry::$variant(value) => Some(value),
                        _ => None,
                    }
                }
            }
        )+
    };
}

impl_store_primitive! {
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    u64 => U64,
    i64 => I64,
    bool => Bool,
}

/// Typed access on top of any [`Store`]. Failures are logged with their key.
pub trait StoreExt: Store {
    fn get_item<T: StorePrimitive>(&self, key: &str) -> Result<T, StoreError> {
        let result = self.get_entry(key, T::KIND).and_then(|entry| {
            let found = entry.kind();
            T::from_entry(entry).ok_or_else(|| StoreError::TypeMismatch {
                key: key.to_string(),
                expected: T::KIND.name(),
                found: found.name(),
            })
        });
        log_failure("get_item", key, result)
    }

    fn set_item<T: StorePrimitive>(&mut self, key: &str, value: T) -> Result<(), StoreError> {
        let result = self.set_entry(key, value.into_entry());
        log_failure("set_item", key, result)
    }

    /// Read a string, asking for its length first. An empty stored string
    /// short-circuits without a read.
    fn get_str(&self, key: &str) -> Result<String, StoreError> {
        let result = self.string_len(key).and_then(|len| {
            if len == 0 {
                Ok(String::new())
            } else {
                self.get_string(key, len)
            }
        });
        log_failure("get_string", key, result)
    }

    fn set_str(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let result = self.set_entry(key, Entry::Str(value.to_string()));
        log_failure("set_string", key, result)
    }
}

impl<S: Store + ?Sized> StoreExt for S {}

fn log_failure<T>(op: &str, key: &str, result: Result<T, StoreError>) -> Result<T, StoreError> {
    match &result {
        Err(e) if e.is_not_found() => log::debug!("{op} {key}: {e}"),
        Err(e) => log::warn!("failed to {op} {key}: {e}"),
        Ok(_) => {}
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_kind_names_round_trip() {
        for kind in EntryKind::ALL {
            assert_eq!(EntryKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(EntryKind::from_name("f32"), None);
    }

    #[test]
    fn primitives_map_to_their_own_kind() {
        assert_eq!(7u8.into_entry(), Entry::U8(7));
        assert_eq!((-7i16).into_entry().kind(), EntryKind::I16);
        assert_eq!(u64::from_entry(Entry::U64(9)), Some(9));
        assert_eq!(u32::from_entry(Entry::U64(9)), None);
        assert_eq!(bool::from_entry(Entry::Bool(true)), Some(true));
    }

    #[test]
    fn typed_helpers_over_dyn_store() {
        let mut store = MemoryStore::new();
        {
            let dyn_store: &mut dyn Store = &mut store;
            dyn_store.set_item("count", 42u32).unwrap();
            dyn_store.set_str("name", "abc").unwrap();
        }
        let dyn_store: &dyn Store = &store;
        assert_eq!(dyn_store.get_item::<u32>("count").unwrap(), 42);
        assert_eq!(dyn_store.get_str("name").unwrap(), "abc");
    }

    #[test]
    fn get_item_with_wrong_kind_is_type_mismatch() {
        let mut store = MemoryStore::new();
        store.set_item("count", 42u32).unwrap();
        let err = store.get_item::<i8>("count").unwrap_err();
        assert!(matches!(
            err,
            StoreError::TypeMismatch { expected: "i8", found: "u32", .. }
        ));
    }

    #[test]
    fn serialized_entry_is_tagged() {
        let json = serde_json::to_value(Entry::I16(-3)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "i16", "value": -3}));
    }
}
