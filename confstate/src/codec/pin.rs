use super::Codec;
use crate::error::StoreError;
use crate::store::Store;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// The set of hardware pin numbers a target accepts.
pub trait PinDomain {
    /// Whether `num` (never negative) names a usable pin.
    fn is_valid(num: i32) -> bool;
}

/// ESP32 GPIO matrix: pins 0..=39 except 20, 24 and 28..=31.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Esp32Pins;

impl PinDomain for Esp32Pins {
    fn is_valid(num: i32) -> bool {
        (0..40).contains(&num) && !matches!(num, 20 | 24 | 28..=31)
    }
}

/// A hardware pin identifier, validated against a [`PinDomain`].
///
/// [`Pin::UNSET`] is always valid. Decoding an invalid number from either
/// backend is treated as "no data" and leaves the field unchanged.
pub struct Pin<D = Esp32Pins> {
    num: i32,
    _domain: PhantomData<fn() -> D>,
}

impl<D: PinDomain> Pin<D> {
    pub const UNSET: Pin<D> = Pin::from_raw(-1);

    const fn from_raw(num: i32) -> Self {
        Pin {
            num,
            _domain: PhantomData,
        }
    }

    pub fn new(num: i32) -> Option<Self> {
        Self::is_valid(num).then(|| Pin::from_raw(num))
    }

    pub fn is_valid(num: i32) -> bool {
        num == Self::UNSET.num || (num >= 0 && D::is_valid(num))
    }

    pub fn num(&self) -> i32 {
        self.num
    }

    pub fn is_unset(&self) -> bool {
        self.num == Self::UNSET.num
    }
}

impl<D: PinDomain> Default for Pin<D> {
    fn default() -> Self {
        Self::UNSET
    }
}

impl<D> Clone for Pin<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for Pin<D> {}

impl<D> PartialEq for Pin<D> {
    fn eq(&self, other: &Self) -> bool {
        self.num == other.num
    }
}

impl<D> Eq for Pin<D> {}

impl<D> fmt::Debug for Pin<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pin({})", self.num)
    }
}

impl<D> fmt::Display for Pin<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.num < 0 {
            f.write_str("unset")
        } else {
            write!(f, "GPIO{}", self.num)
        }
    }
}

impl<D: PinDomain> Codec for Pin<D> {
    fn from_document(value: &Value) -> Option<Self> {
        i32::from_document(value).and_then(Pin::new)
    }

    fn to_document(&self) -> Value {
        self.num.to_document()
    }

    fn load(store: &dyn Store, key: &str) -> Result<Option<Self>, StoreError> {
        let Some(num) = i32::load(store, key)? else {
            return Ok(None);
        };
        let pin = Pin::new(num);
        if pin.is_none() {
            log::warn!("ignoring invalid pin {num} stored under {key}");
        }
        Ok(pin)
    }

    fn store(&self, store: &mut dyn Store, key: &str) -> Result<(), StoreError> {
        self.num.store(store, key)
    }
}
