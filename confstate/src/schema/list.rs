use super::key::{element_key, join_key, length_key, node_key};
use super::{LoadErrors, Node, StoreErrors};
use crate::document::JsonPointer;
use crate::error::{SchemaError, StoreError};
use crate::flags::Flags;
use crate::lens::Lens;
use crate::store::{Store, StoreExt};
use serde_json::Value;
use std::fmt;

/// Binds a `Vec<T>` field, delegating each element to an owned element schema.
///
/// In the document the list is an array at the node's path. In the store the
/// length is kept as a `u16` under `<key>/len` and element `i` under the
/// prefix `<key>/<i>`.
pub struct List<S, T> {
    lens: Lens<S, Vec<T>>,
    pointer: JsonPointer,
    key: String,
    element: Box<dyn Node<T>>,
    flags: Flags,
}

impl<S, T: Default> List<S, T> {
    pub fn new(
        lens: Lens<S, Vec<T>>,
        path: &str,
        element: impl Node<T> + 'static,
    ) -> Result<Self, SchemaError> {
        List::with_options(lens, path, None, element, Flags::NONE)
    }

    pub fn with_options(
        lens: Lens<S, Vec<T>>,
        path: &str,
        key: Option<&str>,
        element: impl Node<T> + 'static,
        flags: Flags,
    ) -> Result<Self, SchemaError> {
        Ok(List {
            lens,
            pointer: JsonPointer::parse(path)?,
            key: node_key(path, key),
            element: Box::new(element),
            flags,
        })
    }

    pub fn pointer(&self) -> &JsonPointer {
        &self.pointer
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn element(&self) -> &dyn Node<T> {
        self.element.as_ref()
    }
}

impl<S, T> fmt::Debug for List<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("pointer", &self.pointer)
            .field("key", &self.key)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

impl<S, T: Default> Node<S> for List<S, T> {
    fn flags(&self) -> Flags {
        self.flags
    }

    fn do_read(&self, inst: &mut S, root: &Value) -> bool {
        let Some(array) = self.pointer.get(root).and_then(Value::as_array) else {
            return false;
        };

        let items = self.lens.get_mut(inst);
        if items.len() != array.len() {
            log::trace!("resizing {} from {} to {}", self.pointer, items.len(), array.len());
            items.resize_with(array.len(), T::default);
        }

        let mut changed = false;
        for (item, value) in items.iter_mut().zip(array) {
            changed |= self.element.read(item, value);
        }
        changed
    }

    fn do_write(&self, inst: &S, root: &mut Value) {
        let items = self.lens.get(inst);

        let slot = self.pointer.create(root);
        if !slot.is_array() {
            *slot = Value::Array(Vec::with_capacity(items.len()));
        }
        if let Value::Array(array) = slot {
            array.resize(items.len(), Value::Null);
            for (item, value) in items.iter().zip(array.iter_mut()) {
                self.element.write(item, value);
            }
        }
    }

    fn do_load(&self, inst: &mut S, store: &dyn Store, prefix: &str) -> Result<(), StoreError> {
        let key = join_key(prefix, &self.key);
        let mut errors = LoadErrors::default();

        // A list that was never stored has no length entry; that is not an error.
        let len = match store.get_item::<u16>(&length_key(&key)) {
            Ok(len) => usize::from(len),
            Err(e) if e.is_not_found() => 0,
            Err(e) => return Err(e),
        };

        let items = self.lens.get_mut(inst);
        if items.len() != len {
            log::trace!("resizing {key} from {} to {len}", items.len());
            items.resize_with(len, T::default);
        }

        for (index, item) in items.iter_mut().enumerate() {
            errors.record(self.element.load_at(item, store, &element_key(&key, index)));
        }
        errors.finish()
    }

    fn do_store(&self, inst: &S, store: &mut dyn Store, prefix: &str) -> Result<(), StoreError> {
        let key = join_key(prefix, &self.key);
        let items = self.lens.get(inst);

        let len = u16::try_from(items.len()).map_err(|_| StoreError::ListTooLong {
            key: key.clone(),
            len: items.len(),
        })?;

        let mut errors = StoreErrors::default();
        errors.record(store.set_item(&length_key(&key), len));
        for (index, item) in items.iter().enumerate() {
            errors.record(self.element.store_at(item, store, &element_key(&key, index)));
        }
        errors.finish()
    }
}
