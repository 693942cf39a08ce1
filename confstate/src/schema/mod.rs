// Schema node hierarchy: one declarative description drives all four operations

mod composite;
pub mod key;
mod list;
mod scalar;

pub use composite::{Composite, CompositeBuilder};
pub use list::List;
pub use scalar::{Field, Leaf};

use crate::error::StoreError;
use crate::flags::Flags;
use crate::store::Store;
use serde_json::Value;

/// A schema node over host type `S`.
///
/// Implementors provide the `do_*` operations; callers use the provided
/// `read`/`write`/`load`/`store` wrappers, which skip operations disabled by
/// the node's [`Flags`]. A disabled `read` reports no change and a disabled
/// `load`/`store` reports success.
///
/// Nodes are immutable once built and can be shared across threads; the host
/// values and stores they operate on cannot.
pub trait Node<S>: Send + Sync {
    fn flags(&self) -> Flags;

    /// Update `inst` from the document. Returns true if any bound value changed.
    fn do_read(&self, inst: &mut S, root: &Value) -> bool;

    fn do_write(&self, inst: &S, root: &mut Value);

    fn do_load(&self, inst: &mut S, store: &dyn Store, prefix: &str) -> Result<(), StoreError>;

    fn do_store(&self, inst: &S, store: &mut dyn Store, prefix: &str) -> Result<(), StoreError>;

    fn read(&self, inst: &mut S, root: &Value) -> bool {
        if self.flags().can_read() {
            self.do_read(inst, root)
        } else {
            false
        }
    }

    fn write(&self, inst: &S, root: &mut Value) {
        if self.flags().can_write() {
            self.do_write(inst, root);
        }
    }

    fn load(&self, inst: &mut S, store: &dyn Store) -> Result<(), StoreError> {
        self.load_at(inst, store, "")
    }

    fn load_at(&self, inst: &mut S, store: &dyn Store, prefix: &str) -> Result<(), StoreError> {
        if self.flags().can_load() {
            self.do_load(inst, store, prefix)
        } else {
            Ok(())
        }
    }

    fn store(&self, inst: &S, store: &mut dyn Store) -> Result<(), StoreError> {
        self.store_at(inst, store, "")
    }

    fn store_at(&self, inst: &S, store: &mut dyn Store, prefix: &str) -> Result<(), StoreError> {
        if self.flags().can_store() {
            self.do_store(inst, store, prefix)
        } else {
            Ok(())
        }
    }
}

/// Aggregate of several `load` results.
///
/// Not-found is expected for values never persisted, so it never replaces a
/// real error, while a real error always replaces not-found.
#[derive(Debug, Default)]
pub struct LoadErrors(Option<StoreError>);

impl LoadErrors {
    pub fn record(&mut self, result: Result<(), StoreError>) {
        if let Err(err) = result {
            if !err.is_not_found() || self.0.is_none() {
                self.0 = Some(err);
            }
        }
    }

    pub fn finish(self) -> Result<(), StoreError> {
        self.0.map_or(Ok(()), Err)
    }
}

/// Aggregate of several `store` results: the last error seen wins.
#[derive(Debug, Default)]
pub struct StoreErrors(Option<StoreError>);

impl StoreErrors {
    pub fn record(&mut self, result: Result<(), StoreError>) {
        if let Err(err) = result {
            self.0 = Some(err);
        }
    }

    pub fn finish(self) -> Result<(), StoreError> {
        self.0.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found(key: &str) -> Result<(), StoreError> {
        Err(StoreError::NotFound { key: key.into() })
    }

    fn backend(msg: &str) -> Result<(), StoreError> {
        Err(StoreError::Backend(msg.into()))
    }

    #[test]
    fn load_errors_keep_real_error_over_not_found() {
        let mut errors = LoadErrors::default();
        errors.record(backend("io"));
        errors.record(not_found("a"));
        errors.record(Ok(()));
        assert!(matches!(errors.finish(), Err(StoreError::Backend(m)) if m == "io"));
    }

    #[test]
    fn load_errors_replace_not_found_with_real_error() {
        let mut errors = LoadErrors::default();
        errors.record(not_found("a"));
        errors.record(backend("io"));
        assert!(matches!(errors.finish(), Err(StoreError::Backend(_))));
    }

    #[test]
    fn load_errors_report_not_found_alone() {
        let mut errors = LoadErrors::default();
        errors.record(Ok(()));
        errors.record(not_found("a"));
        assert!(errors.finish().unwrap_err().is_not_found());
        assert!(LoadErrors::default().finish().is_ok());
    }

    #[test]
    fn store_errors_last_wins() {
        let mut errors = StoreErrors::default();
        errors.record(backend("first"));
        errors.record(Ok(()));
        errors.record(not_found("second"));
        errors.record(Ok(()));
        assert!(errors.finish().unwrap_err().is_not_found());
    }
}
