use crate::app_config::AppConfig;
use confstate::{document, Composite, Document, Node, SqliteStore, Store, StoreError};
use std::path::Path;

/// Hydrate a config from the store, falling back to defaults for missing keys.
pub fn load_config(
    schema: &Composite<AppConfig>,
    store: &dyn Store,
) -> Result<AppConfig, StoreError> {
    let mut config = AppConfig::default();
    match schema.load(&mut config, store) {
        Ok(()) => {}
        Err(e) if e.is_not_found() => {
            log::info!("Store is incomplete ({e}), using defaults for missing values");
        }
        Err(e) => return Err(e),
    }
    Ok(config)
}

/// Apply a document file to the persisted config.
///
/// Returns whether anything changed. The store is only written and committed
/// on change.
pub fn import(
    schema: &Composite<AppConfig>,
    store: &mut SqliteStore,
    path: &Path,
) -> confstate::Result<bool> {
    let doc = document::read_document(path)?;
    let mut config = load_config(schema, &*store)?;
    let before = config.clone();

    // read() does not report list resizes, only element value changes
    let changed = schema.read(&mut config, &doc) | (config != before);
    if !changed {
        log::debug!("{} matches the stored config", path.display());
        return Ok(false);
    }

    schema.store(&config, store)?;
    store.commit()?;
    log::info!("Imported {} into namespace '{}'", path.display(), store.namespace());
    Ok(true)
}

/// Render the persisted config as a document.
pub fn export(schema: &Composite<AppConfig>, store: &dyn Store) -> Result<Document, StoreError> {
    let config = load_config(schema, store)?;
    let mut doc = document::empty();
    schema.write(&config, &mut doc);
    Ok(doc)
}

/// Erase every persisted value.
pub fn reset(store: &mut SqliteStore) -> Result<(), StoreError> {
    store.erase_all()?;
    store.commit()?;
    log::info!("Erased namespace '{}'", store.namespace());
    Ok(())
}

/// The raw key-value contents of the store, keyed by store key.
pub fn dump(store: &SqliteStore) -> confstate::Result<serde_json::Value> {
    let mut map = serde_json::Map::new();
    for (key, entry) in store.entries()? {
        map.insert(key, serde_json::to_value(&entry)?);
    }
    Ok(serde_json::Value::Object(map))
}
