use super::key::{join_key, node_key};
use super::Node;
use crate::codec::Codec;
use crate::document::JsonPointer;
use crate::error::{SchemaError, StoreError};
use crate::flags::Flags;
use crate::lens::Lens;
use crate::store::Store;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// Binds one struct field to a document path and a store key.
pub struct Field<S, T> {
    lens: Lens<S, T>,
    pointer: JsonPointer,
    key: String,
    flags: Flags,
}

impl<S, T: Codec> Field<S, T> {
    pub fn new(lens: Lens<S, T>, path: &str) -> Result<Self, SchemaError> {
        Field::with_options(lens, path, None, Flags::NONE)
    }

    /// `key` overrides the store key, which otherwise derives from `path`.
    pub fn with_options(
        lens: Lens<S, T>,
        path: &str,
        key: Option<&str>,
        flags: Flags,
    ) -> Result<Self, SchemaError> {
        Ok(Field {
            lens,
            pointer: JsonPointer::parse(path)?,
            key: node_key(path, key),
            flags,
        })
    }

    pub fn pointer(&self) -> &JsonPointer {
        &self.pointer
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<S, T> fmt::Debug for Field<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("pointer", &self.pointer)
            .field("key", &self.key)
            .field("flags", &self.flags)
            .finish()
    }
}

impl<S, T: Codec> Node<S> for Field<S, T> {
    fn flags(&self) -> Flags {
        self.flags
    }

    fn do_read(&self, inst: &mut S, root: &Value) -> bool {
        read_value(&self.pointer, root, self.lens.get_mut(inst))
    }

    fn do_write(&self, inst: &S, root: &mut Value) {
        write_value(&self.pointer, root, self.lens.get(inst));
    }

    fn do_load(&self, inst: &mut S, store: &dyn Store, prefix: &str) -> Result<(), StoreError> {
        load_value(store, &join_key(prefix, &self.key), self.lens.get_mut(inst))
    }

    fn do_store(&self, inst: &S, store: &mut dyn Store, prefix: &str) -> Result<(), StoreError> {
        self.lens.get(inst).store(store, &join_key(prefix, &self.key))
    }
}

/// Identity node: the host value is itself the scalar.
///
/// Used as the element schema of lists of plain values. By default it
/// addresses the element directly (root pointer, empty key), so an element
/// lands exactly at the list slot and element key.
pub struct Leaf<T> {
    pointer: JsonPointer,
    key: String,
    flags: Flags,
    _value: PhantomData<fn() -> T>,
}

impl<T: Codec> Leaf<T> {
    pub fn new() -> Self {
        Leaf::with_flags(Flags::NONE)
    }

    pub fn with_flags(flags: Flags) -> Self {
        Leaf {
            pointer: JsonPointer::root(),
            key: String::new(),
            flags,
            _value: PhantomData,
        }
    }

    /// A leaf addressing a sub-path of the element.
    pub fn with_options(path: &str, key: Option<&str>, flags: Flags) -> Result<Self, SchemaError> {
        Ok(Leaf {
            pointer: JsonPointer::parse(path)?,
            key: node_key(path, key),
            flags,
            _value: PhantomData,
        })
    }
}

impl<T: Codec> Default for Leaf<T> {
    fn default() -> Self {
        Leaf::new()
    }
}

impl<T> fmt::Debug for Leaf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Leaf")
            .field("pointer", &self.pointer)
            .field("key", &self.key)
            .field("flags", &self.flags)
            .finish()
    }
}

impl<T: Codec> Node<T> for Leaf<T> {
    fn flags(&self) -> Flags {
        self.flags
    }

    fn do_read(&self, inst: &mut T, root: &Value) -> bool {
        read_value(&self.pointer, root, inst)
    }

    fn do_write(&self, inst: &T, root: &mut Value) {
        write_value(&self.pointer, root, inst);
    }

    fn do_load(&self, inst: &mut T, store: &dyn Store, prefix: &str) -> Result<(), StoreError> {
        load_value(store, &join_key(prefix, &self.key), inst)
    }

    fn do_store(&self, inst: &T, store: &mut dyn Store, prefix: &str) -> Result<(), StoreError> {
        inst.store(store, &join_key(prefix, &self.key))
    }
}

fn read_value<T: Codec>(pointer: &JsonPointer, root: &Value, target: &mut T) -> bool {
    match pointer.get(root).and_then(T::from_document) {
        Some(value) if value != *target => {
            *target = value;
            true
        }
        _ => false,
    }
}

fn write_value<T: Codec>(pointer: &JsonPointer, root: &mut Value, value: &T) {
    *pointer.create(root) = value.to_document();
}

fn load_value<T: Codec>(store: &dyn Store, key: &str, target: &mut T) -> Result<(), StoreError> {
    if let Some(value) = T::load(store, key)? {
        *target = value;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Pin;
    use crate::lens;
    use crate::store::{Entry, MemoryStore};
    use serde_json::json;

    #[derive(Debug, Default, PartialEq)]
    struct Settings {
        level: i8,
        name: String,
        pin: Pin,
        ratio: f32,
    }

    #[test]
    fn read_reports_change_once() {
        let field = Field::new(lens!(Settings, name), "/name").unwrap();
        let doc = json!({"name": "foobar"});
        let mut settings = Settings::default();

        assert!(field.read(&mut settings, &doc));
        assert_eq!(settings.name, "foobar");
        assert!(!field.read(&mut settings, &doc));
    }

    #[test]
    fn read_ignores_absent_and_mismatched_values() {
        let field = Field::new(lens!(Settings, level), "/level").unwrap();
        let mut settings = Settings { level: 5, ..Default::default() };

        assert!(!field.read(&mut settings, &json!({})));
        assert!(!field.read(&mut settings, &json!({"level": "high"})));
        assert!(!field.read(&mut settings, &json!({"level": 128})));
        assert_eq!(settings.level, 5);

        assert!(field.read(&mut settings, &json!({"level": -128})));
        assert_eq!(settings.level, -128);
    }

    #[test]
    fn read_ignores_float_out_of_range() {
        let field = Field::new(lens!(Settings, ratio), "/ratio").unwrap();
        let mut settings = Settings { ratio: 0.25, ..Default::default() };

        assert!(!field.read(&mut settings, &json!({"ratio": 1e300})));
        assert_eq!(settings.ratio, 0.25);

        let mut doc = json!({});
        field.write(&settings, &mut doc);
        assert_eq!(doc, json!({"ratio": 0.25}));
    }

    #[test]
    fn read_ignores_invalid_pin() {
        let field = Field::new(lens!(Settings, pin), "/pin").unwrap();
        let mut settings = Settings::default();

        assert!(!field.read(&mut settings, &json!({"pin": 24})));
        assert!(settings.pin.is_unset());
        assert!(field.read(&mut settings, &json!({"pin": 22})));
        assert_eq!(settings.pin.num(), 22);
    }

    #[test]
    fn write_overwrites_existing_value() {
        let field = Field::new(lens!(Settings, ratio), "/tuning/ratio").unwrap();
        let settings = Settings { ratio: 0.5, ..Default::default() };
        let mut doc = json!({"tuning": {"ratio": "old", "other": 1}});

        field.write(&settings, &mut doc);
        assert_eq!(doc, json!({"tuning": {"ratio": 0.5, "other": 1}}));
    }

    #[test]
    fn load_and_store_use_derived_key() {
        let field = Field::new(lens!(Settings, level), "/level").unwrap();
        assert_eq!(field.key(), "level");

        let mut store = MemoryStore::new();
        field
            .store(&Settings { level: -7, ..Default::default() }, &mut store)
            .unwrap();
        assert_eq!(store.get("level"), Some(&Entry::I8(-7)));

        let mut settings = Settings::default();
        field.load(&mut settings, &store).unwrap();
        assert_eq!(settings.level, -7);
    }

    #[test]
    fn load_surfaces_store_error_and_keeps_value() {
        let field = Field::new(lens!(Settings, name), "/name").unwrap();
        let store = MemoryStore::new();
        let mut settings = Settings { name: "keep".into(), ..Default::default() };

        assert!(field.load(&mut settings, &store).unwrap_err().is_not_found());
        assert_eq!(settings.name, "keep");
    }

    #[test]
    fn override_key_and_prefix() {
        let field =
            Field::with_options(lens!(Settings, name), "/name", Some("/n"), Flags::NONE).unwrap();
        let mut store = MemoryStore::new();
        let settings = Settings { name: "x".into(), ..Default::default() };

        field.store_at(&settings, &mut store, "grp").unwrap();
        assert_eq!(store.get("grp/n"), Some(&Entry::Str("x".into())));
    }

    #[test]
    fn disabled_operations_are_no_ops() {
        let field = Field::with_options(
            lens!(Settings, level),
            "/level",
            None,
            Flags::DISABLE_SYNC | Flags::DISABLE_PERSISTENCE,
        )
        .unwrap();
        let mut settings = Settings { level: 3, ..Default::default() };
        let mut doc = json!({"level": 9});
        let mut store = MemoryStore::new();
        store.set_read_only(true);

        assert!(!field.read(&mut settings, &doc));
        field.write(&settings, &mut doc);
        assert_eq!(doc, json!({"level": 9}));
        assert!(field.store(&settings, &mut store).is_ok());
        assert!(field.load(&mut settings, &store).is_ok());
        assert_eq!(settings.level, 3);
    }

    #[test]
    fn leaf_addresses_the_value_itself() {
        let leaf = Leaf::<u32>::new();
        let mut value = 0u32;
        assert!(leaf.read(&mut value, &json!(55)));
        assert_eq!(value, 55);

        let mut slot = serde_json::Value::Null;
        leaf.write(&88, &mut slot);
        assert_eq!(slot, json!(88));

        let mut store = MemoryStore::new();
        leaf.store_at(&value, &mut store, "ids/0").unwrap();
        assert_eq!(store.get("ids/0"), Some(&Entry::U32(55)));
    }

    #[test]
    fn bad_pointer_is_a_schema_error() {
        let err = Field::new(lens!(Settings, name), "name").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidPointer { .. }));
    }
}
