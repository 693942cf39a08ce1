use super::{Entry, EntryKind, Store, DEFAULT_MAX_KEY_LEN};
use crate::error::StoreError;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::path::Path;

/// A persistent store backed by a SQLite database file.
///
/// One database can hold several namespaces; a store handle is bound to one.
/// Writes are staged in memory and only reach the database on
/// [`Store::commit`], inside a single transaction.
pub struct SqliteStore {
    conn: Connection,
    namespace: String,
    max_key_len: usize,
    pending: BTreeMap<String, Entry>,
    erase_pending: bool,
}

impl SqliteStore {
    /// Open or create the store database at the given path.
    pub fn open(path: &Path, namespace: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        SqliteStore::with_connection(conn, namespace)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory(namespace: &str) -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        SqliteStore::with_connection(conn, namespace)
    }

    fn with_connection(conn: Connection, namespace: &str) -> Result<Self, StoreError> {
        let store = SqliteStore {
            conn,
            namespace: namespace.to_string(),
            max_key_len: DEFAULT_MAX_KEY_LEN,
            pending: BTreeMap::new(),
            erase_pending: false,
        };
        store.initialize_tables()?;
        Ok(store)
    }

    fn initialize_tables(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS entries (
                namespace TEXT NOT NULL,
                key TEXT NOT NULL,
                kind TEXT NOT NULL,
                int_value INTEGER,
                text_value TEXT,
                updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (namespace, key)
            );
            ",
        )?;
        Ok(())
    }

    pub fn with_max_key_len(mut self, max_key_len: usize) -> Self {
        self.max_key_len = max_key_len;
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// True if there are staged writes not yet committed.
    pub fn has_pending(&self) -> bool {
        self.erase_pending || !self.pending.is_empty()
    }

    /// All entries visible through this handle, staged writes included.
    pub fn entries(&self) -> Result<Vec<(String, Entry)>, StoreError> {
        let mut merged = BTreeMap::new();
        if !self.erase_pending {
            let mut stmt = self.conn.prepare(
                "SELECT key, kind, int_value, text_value FROM entries WHERE namespace = ?1 ORDER BY key",
            )?;
            let rows = stmt.query_map(params![self.namespace], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<i64>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })?;
            for row in rows {
                let (key, kind, int_value, text_value) = row?;
                let entry = decode_row(&key, &kind, int_value, text_value)?;
                merged.insert(key, entry);
            }
        }
        for (key, entry) in &self.pending {
            merged.insert(key.clone(), entry.clone());
        }
        Ok(merged.into_iter().collect())
    }

    fn lookup(&self, key: &str) -> Result<Entry, StoreError> {
        self.check_key(key)?;

        if let Some(entry) = self.pending.get(key) {
            return Ok(entry.clone());
        }
        if self.erase_pending {
            return Err(not_found(key));
        }

        let row = self
            .conn
            .query_row(
                "SELECT kind, int_value, text_value FROM entries WHERE namespace = ?1 AND key = ?2",
                params![self.namespace, key],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<i64>>(1)?,
                        row.get::<_, Option<String>>(2)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((kind, int_value, text_value)) => decode_row(key, &kind, int_value, text_value),
            None => Err(not_found(key)),
        }
    }
}

impl Store for SqliteStore {
    fn max_key_len(&self) -> usize {
        self.max_key_len
    }

    fn get_entry(&self, key: &str, kind: EntryKind) -> Result<Entry, StoreError> {
        let entry = self.lookup(key)?;
        if entry.kind() != kind {
            return Err(StoreError::TypeMismatch {
                key: key.to_string(),
                expected: kind.name(),
                found: entry.kind().name(),
            });
        }
        Ok(entry)
    }

    fn set_entry(&mut self, key: &str, entry: Entry) -> Result<(), StoreError> {
        self.check_key(key)?;
        self.pending.insert(key.to_string(), entry);
        Ok(())
    }

    fn string_len(&self, key: &str) -> Result<usize, StoreError> {
        match self.lookup(key)? {
            Entry::Str(s) => Ok(s.len()),
            other => Err(StoreError::TypeMismatch {
                key: key.to_string(),
                expected: EntryKind::Str.name(),
                found: other.kind().name(),
            }),
        }
    }

    fn get_string(&self, key: &str, len: usize) -> Result<String, StoreError> {
        match self.lookup(key)? {
            Entry::Str(s) if len > 0 && s.len() == len => Ok(s),
            Entry::Str(s) => Err(StoreError::Backend(format!(
                "length mismatch for {key}: requested {len}, stored {}",
                s.len()
            ))),
            other => Err(StoreError::TypeMismatch {
                key: key.to_string(),
                expected: EntryKind::Str.name(),
                found: other.kind().name(),
            }),
        }
    }

    fn erase_all(&mut self) -> Result<(), StoreError> {
        self.pending.clear();
        self.erase_pending = true;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        if !self.has_pending() {
            return Ok(());
        }

        let tx = self.conn.transaction()?;
        if self.erase_pending {
            tx.execute(
                "DELETE FROM entries WHERE namespace = ?1",
                params![self.namespace],
            )?;
        }
        for (key, entry) in &self.pending {
            let (int_value, text_value) = encode_entry(entry);
            tx.execute(
                "INSERT OR REPLACE INTO entries (namespace, key, kind, int_value, text_value, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, datetime('now'))",
                params![self.namespace, key, entry.kind().name(), int_value, text_value],
            )?;
        }
        tx.commit()?;

        log::debug!(
            "committed {} entries to namespace {}",
            self.pending.len(),
            self.namespace
        );
        self.pending.clear();
        self.erase_pending = false;
        Ok(())
    }
}

fn not_found(key: &str) -> StoreError {
    StoreError::NotFound {
        key: key.to_string(),
    }
}

// u64 is kept in SQLite's signed INTEGER column as its two's-complement bits.
fn encode_entry(entry: &Entry) -> (Option<i64>, Option<&str>) {
    match entry {
        Entry::U8(v) => (Some(i64::from(*v)), None),
        Entry::I8(v) => (Some(i64::from(*v)), None),
        Entry::U16(v) => (Some(i64::from(*v)), None),
        Entry::I16(v) => (Some(i64::from(*v)), None),
        Entry::U32(v) => (Some(i64::from(*v)), None),
        Entry::I32(v) => (Some(i64::from(*v)), None),
        Entry::U64(v) => (Some(*v as i64), None),
        Entry::I64(v) => (Some(*v), None),
        Entry::Bool(v) => (Some(i64::from(*v)), None),
        Entry::Str(s) => (None, Some(s.as_str())),
    }
}

fn decode_row(
    key: &str,
    kind: &str,
    int_value: Option<i64>,
    text_value: Option<String>,
) -> Result<Entry, StoreError> {
    let corrupt = || StoreError::Backend(format!("corrupt entry {key} ({kind})"));
    let kind = EntryKind::from_name(kind).ok_or_else(corrupt)?;

    if kind == EntryKind::Str {
        return text_value.map(Entry::Str).ok_or_else(corrupt);
    }

    let v = int_value.ok_or_else(corrupt)?;
    let entry = match kind {
        EntryKind::U8 => Entry::U8(u8::try_from(v).map_err(|_| corrupt())?),
        EntryKind::I8 => Entry::I8(i8::try_from(v).map_err(|_| corrupt())?),
        EntryKind::U16 => Entry::U16(u16::try_from(v).map_err(|_| corrupt())?),
        EntryKind::I16 => Entry::I16(i16::try_from(v).map_err(|_| corrupt())?),
        EntryKind::U32 => Entry::U32(u32::try_from(v).map_err(|_| corrupt())?),
        EntryKind::I32 => Entry::I32(i32::try_from(v).map_err(|_| corrupt())?),
        EntryKind::U64 => Entry::U64(v as u64),
        EntryKind::I64 => Entry::I64(v),
        EntryKind::Bool => match v {
            0 => Entry::Bool(false),
            1 => Entry::Bool(true),
            _ => return Err(corrupt()),
        },
        EntryKind::Str => return Err(corrupt()),
    };
    Ok(entry)
}
