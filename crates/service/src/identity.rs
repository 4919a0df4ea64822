//! Content-addressed identifiers.
//!
//! An entity's id is the lowercase hex SHA-256 of its identifying fields,
//! concatenated in a fixed order with no separator.

use sha2::{Digest, Sha256};

/// Hash the concatenation of `parts`.
pub fn content_id(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}

pub fn author_id(name: &str) -> String {
    content_id(&[name])
}

/// `author` is the raw author id, not the author's name.
pub fn book_id(title: &str, author: &str) -> String {
    content_id(&[title, author])
}
