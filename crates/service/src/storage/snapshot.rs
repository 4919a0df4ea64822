//! On-disk document format.
//!
//! ```json
//! { "books": [[id, book], ...], "authors": [[id, author], ...] }
//! ```
//!
//! Each map is written as an array of `[id, record]` pairs in insertion order.

use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::errors::ServiceError;
use crate::model::{Author, Book, Entity};

/// Insertion-ordered `id -> record` map.
pub type Table<E> = IndexMap<String, E>;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    books: Vec<(&'a str, &'a Book)>,
    authors: Vec<(&'a str, &'a Author)>,
}

pub fn encode(books: &Table<Book>, authors: &Table<Author>) -> Result<Vec<u8>, ServiceError> {
    let doc = SnapshotRef {
        books: books.iter().map(|(k, v)| (k.as_str(), v)).collect(),
        authors: authors.iter().map(|(k, v)| (k.as_str(), v)).collect(),
    };
    Ok(serde_json::to_vec(&doc)?)
}

/// Parse a document. A `books` or `authors` value that is not an array
/// decodes to an empty table; anything unparseable inside an array is corrupt.
pub fn decode(bytes: &[u8], path: &Path) -> Result<(Table<Book>, Table<Author>), ServiceError> {
    let doc: Value = serde_json::from_slice(bytes).map_err(|e| ServiceError::corrupt(path, e))?;
    let books = decode_table::<Book>(doc.get("books"), path)?;
    let authors = decode_table::<Author>(doc.get("authors"), path)?;
    Ok((books, authors))
}

fn decode_table<E: Entity>(value: Option<&Value>, path: &Path) -> Result<Table<E>, ServiceError> {
    let Some(Value::Array(items)) = value else {
        return Ok(Table::new());
    };
    let mut table = Table::with_capacity(items.len());
    for item in items {
        let (id, record): (String, E) = serde_json::from_value(item.clone())
            .map_err(|e| ServiceError::corrupt(path, format!("bad {} entry: {e}", E::KIND)))?;
        table.insert(id, record);
    }
    Ok(table)
}
