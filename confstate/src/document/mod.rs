// Document I/O - the JSON tree side of a schema

mod pointer;

pub use pointer::{JsonPointer, MAX_INDEX};

use crate::error::Result;
use serde_json::Value;
use std::path::Path;

/// The hierarchical document a schema reads from and writes into.
pub type Document = Value;

/// An empty object document, the usual starting point for `write`.
pub fn empty() -> Document {
    Value::Object(serde_json::Map::new())
}

/// Read a JSON document from a file.
pub fn read_document(path: &Path) -> Result<Document> {
    let content = std::fs::read_to_string(path)?;
    parse_document(&content)
}

/// Parse a JSON document from a string.
pub fn parse_document(content: &str) -> Result<Document> {
    let doc: Document = serde_json::from_str(content)?;
    Ok(doc)
}

/// Write a document to a file as pretty-printed JSON.
pub fn write_document(path: &Path, doc: &Document) -> Result<()> {
    let mut content = serde_json::to_string_pretty(doc)?;
    content.push('\n');
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn document_file_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        let doc = json!({"num": 1, "list": ["a", "b"]});

        write_document(&path, &doc).unwrap();
        assert_eq!(read_document(&path).unwrap(), doc);
    }

    #[test]
    fn malformed_document_is_a_json_error() {
        let err = parse_document("{ not json").unwrap_err();
        assert!(matches!(err, crate::ConfStateError::Json(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = read_document(&tmp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, crate::ConfStateError::Io(_)));
    }
}
