// Per-type encode/decode rules between document values, store entries and field types

mod float;
mod pin;
mod string;

pub use pin::{Esp32Pins, Pin, PinDomain};

use crate::error::StoreError;
use crate::store::{Store, StoreExt};
use serde_json::Value;

/// Conversion of one scalar type to and from both backends.
///
/// Document decoding is lenient: a value of incompatible type or out of
/// range yields `None` ("no data"), never an error. Store decoding surfaces
/// backend errors verbatim; `Ok(None)` means a value was read but rejected
/// by the type's domain check, so the field keeps its current value.
pub trait Codec: Sized + PartialEq {
    fn from_document(value: &Value) -> Option<Self>;

    fn to_document(&self) -> Value;

    fn load(store: &dyn Store, key: &str) -> Result<Option<Self>, StoreError>;

    fn store(&self, store: &mut dyn Store, key: &str) -> Result<(), StoreError>;
}

impl Codec for bool {
    fn from_document(value: &Value) -> Option<Self> {
        value.as_bool()
    }

    fn to_document(&self) -> Value {
        Value::Bool(*self)
    }

    fn load(store: &dyn Store, key: &str) -> Result<Option<Self>, StoreError> {
        store.get_item(key).map(Some)
    }

    fn store(&self, store: &mut dyn Store, key: &str) -> Result<(), StoreError> {
        store.set_item(key, *self)
    }
}

// Integers decode from the document through the widest integer of the same
// signedness and are accepted only if they fit; the store holds them natively.
macro_rules! impl_integer_codec {
    ($widen:ident => $($ty:ty),+) => {
        $(
            impl Codec for $ty {
                fn from_document(value: &Value) -> Option<Self> {
                    value.$widen().and_then(|wide| <$ty>::try_from(wide).ok())
                }

                fn to_document(&self) -> Value {
                    Value::from(*self)
                }

                fn load(store: &dyn Store, key: &str) -> Result<Option<Self>, StoreError> {
                    store.get_item::<$ty>(key).map(Some)
                }

                fn store(&self, store: &mut dyn Store, key: &str) -> Result<(), StoreError> {
                    store.set_item(key, *self)
                }
            }
        )+
    };
}

impl_integer_codec!(as_i64 => i8, i16, i32, i64);
impl_integer_codec!(as_u64 => u8, u16, u32, u64);
