use super::Codec;
use crate::error::StoreError;
use crate::store::{Store, StoreExt};
use serde_json::Value;

// Stores have no floating-point entries, so floats are persisted as their raw
// bit pattern in an unsigned integer of the same width.

impl Codec for f32 {
    fn from_document(value: &Value) -> Option<Self> {
        // JSON numbers are always finite; reject those beyond f32's range
        value
            .as_f64()
            .filter(|v| v.abs() <= f64::from(f32::MAX))
            .map(|v| v as f32)
    }

    fn to_document(&self) -> Value {
        Value::from(f64::from(*self))
    }

    fn load(store: &dyn Store, key: &str) -> Result<Option<Self>, StoreError> {
        store.get_item::<u32>(key).map(|bits| Some(f32::from_bits(bits)))
    }

    fn store(&self, store: &mut dyn Store, key: &str) -> Result<(), StoreError> {
        store.set_item(key, self.to_bits())
    }
}

impl Codec for f64 {
    fn from_document(value: &Value) -> Option<Self> {
        value.as_f64()
    }

    fn to_document(&self) -> Value {
        Value::from(*self)
    }

    fn load(store: &dyn Store, key: &str) -> Result<Option<Self>, StoreError> {
        store.get_item::<u64>(key).map(|bits| Some(f64::from_bits(bits)))
    }

    fn store(&self, store: &mut dyn Store, key: &str) -> Result<(), StoreError> {
        store.set_item(key, self.to_bits())
    }
}
