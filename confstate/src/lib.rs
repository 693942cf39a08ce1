//! Schema-driven synchronization of configuration structs with a JSON
//! document tree and a flat, persistent key-value store.
//!
//! A [`Composite`] schema is built once per configuration type and drives
//! four operations on any instance of it:
//!
//! - [`Node::read`] hydrates from a document and reports whether anything changed
//! - [`Node::write`] serializes into a document
//! - [`Node::load`] hydrates from a [`Store`]
//! - [`Node::store`] persists into a [`Store`]
//!
//! ```
//! use confstate::{lens, Composite, MemoryStore, Node};
//! use serde_json::json;
//!
//! #[derive(Default)]
//! struct Config {
//!     port: u16,
//!     hosts: Vec<String>,
//! }
//!
//! let schema = Composite::builder()
//!     .field(lens!(Config, port), "/port")
//!     .value_list(lens!(Config, hosts), "/hosts")
//!     .build()
//!     .unwrap();
//!
//! let mut config = Config::default();
//! assert!(schema.read(&mut config, &json!({"port": 8080, "hosts": ["a"]})));
//!
//! let mut store = MemoryStore::new();
//! schema.store(&config, &mut store).unwrap();
//! assert!(store.contains_key("hosts/len"));
//! ```

pub mod codec;
pub mod document;
pub mod error;
pub mod flags;
pub mod lens;
pub mod schema;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use codec::{Codec, Esp32Pins, Pin, PinDomain};
pub use document::{Document, JsonPointer};
pub use error::{ConfStateError, Result, SchemaError, StoreError};
pub use flags::Flags;
pub use lens::Lens;
pub use schema::{Composite, CompositeBuilder, Field, Leaf, List, LoadErrors, Node, StoreErrors};
pub use store::{Entry, EntryKind, MemoryStore, SqliteStore, Store, StoreExt};
