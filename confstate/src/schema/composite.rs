use super::{Field, Leaf, List, LoadErrors, Node, StoreErrors};
use crate::codec::Codec;
use crate::error::{SchemaError, StoreError};
use crate::flags::Flags;
use crate::lens::Lens;
use crate::store::Store;
use serde_json::Value;
use std::fmt;

/// An ordered set of child nodes over the same host type.
///
/// Children run in declaration order. `read` reports a change if any child
/// changed; `load`/`store` try every child and aggregate errors (see
/// [`LoadErrors`] and [`StoreErrors`]). A configuration's root schema is a
/// `Composite`.
pub struct Composite<S> {
    children: Vec<Box<dyn Node<S>>>,
    flags: Flags,
}

impl<S: 'static> Composite<S> {
    pub fn builder() -> CompositeBuilder<S> {
        CompositeBuilder {
            children: Vec::new(),
            flags: Flags::NONE,
            error: None,
        }
    }
}

impl<S> Composite<S> {
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl<S> fmt::Debug for Composite<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composite")
            .field("children", &self.children.len())
            .field("flags", &self.flags)
            .finish()
    }
}

impl<S> Node<S> for Composite<S> {
    fn flags(&self) -> Flags {
        self.flags
    }

    fn do_read(&self, inst: &mut S, root: &Value) -> bool {
        let mut changed = false;
        for child in &self.children {
            changed |= child.read(inst, root);
        }
        changed
    }

    fn do_write(&self, inst: &S, root: &mut Value) {
        for child in &self.children {
            child.write(inst, root);
        }
    }

    fn do_load(&self, inst: &mut S, store: &dyn Store, prefix: &str) -> Result<(), StoreError> {
        let mut errors = LoadErrors::default();
        for child in &self.children {
            errors.record(child.load_at(inst, store, prefix));
        }
        errors.finish()
    }

    fn do_store(&self, inst: &S, store: &mut dyn Store, prefix: &str) -> Result<(), StoreError> {
        let mut errors = StoreErrors::default();
        for child in &self.children {
            errors.record(child.store_at(inst, store, prefix));
        }
        errors.finish()
    }
}

/// Builds a [`Composite`] child by child.
///
/// Invalid document paths do not fail the chain; the first such error is
/// returned from [`CompositeBuilder::build`].
pub struct CompositeBuilder<S> {
    children: Vec<Box<dyn Node<S>>>,
    flags: Flags,
    error: Option<SchemaError>,
}

impl<S: 'static> CompositeBuilder<S> {
    /// Flags of the composite itself, applied before any child's own flags.
    pub fn flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    /// Add an already-built node.
    pub fn node(mut self, node: impl Node<S> + 'static) -> Self {
        self.children.push(Box::new(node));
        self
    }

    pub fn field<T: Codec + 'static>(self, lens: Lens<S, T>, path: &str) -> Self {
        self.field_as(lens, path, None, Flags::NONE)
    }

    pub fn field_as<T: Codec + 'static>(
        self,
        lens: Lens<S, T>,
        path: &str,
        key: Option<&str>,
        flags: Flags,
    ) -> Self {
        self.push(Field::with_options(lens, path, key, flags))
    }

    /// A list whose elements are described by `element`.
    pub fn list<T: Default + 'static>(
        self,
        lens: Lens<S, Vec<T>>,
        path: &str,
        element: impl Node<T> + 'static,
    ) -> Self {
        self.list_as(lens, path, None, element, Flags::NONE)
    }

    pub fn list_as<T: Default + 'static>(
        self,
        lens: Lens<S, Vec<T>>,
        path: &str,
        key: Option<&str>,
        element: impl Node<T> + 'static,
        flags: Flags,
    ) -> Self {
        self.push(List::with_options(lens, path, key, element, flags))
    }

    /// A list of plain scalars.
    pub fn value_list<T: Codec + Default + 'static>(self, lens: Lens<S, Vec<T>>, path: &str) -> Self {
        self.value_list_as(lens, path, None, Flags::NONE)
    }

    /// A list of plain scalars; `flags` apply to the list and to each element.
    pub fn value_list_as<T: Codec + Default + 'static>(
        self,
        lens: Lens<S, Vec<T>>,
        path: &str,
        key: Option<&str>,
        flags: Flags,
    ) -> Self {
        self.list_as(lens, path, key, Leaf::with_flags(flags), flags)
    }

    pub fn build(self) -> Result<Composite<S>, SchemaError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(Composite {
            children: self.children,
            flags: self.flags,
        })
    }

    fn push(mut self, node: Result<impl Node<S> + 'static, SchemaError>) -> Self {
        match node {
            Ok(node) => self.children.push(Box::new(node)),
            Err(err) => {
                self.error.get_or_insert(err);
            }
        }
        self
    }
}
