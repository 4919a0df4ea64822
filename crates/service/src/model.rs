//! Book and author records.
//!
//! Records carry a handful of typed identifying fields plus any number of
//! opaque extra fields, which are stored and returned untouched.

use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ServiceError;

/// Opaque JSON fields, kept in insertion order.
pub type Fields = Map<String, Value>;

const ID_FIELD: &str = "id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Book,
    Author,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Book => "Book",
            EntityKind::Author => "Author",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored record addressed by a content-derived id.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Fields,
}

impl Entity for Author {
    const KIND: EntityKind = EntityKind::Author;

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    /// Id of the author this book was created against.
    pub author: String,
    #[serde(flatten)]
    pub extra: Fields,
}

impl Entity for Book {
    const KIND: EntityKind = EntityKind::Book;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Create payload for an author. A client-supplied `id` is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAuthor {
    pub name: String,
    #[serde(flatten)]
    pub extra: Fields,
}

impl NewAuthor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), extra: Fields::new() }
    }

    pub(crate) fn into_author(mut self, id: String) -> Author {
        self.extra.remove(ID_FIELD);
        Author { id, name: self.name, extra: self.extra }
    }
}

/// Create payload for a book. A client-supplied `id` is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    #[serde(flatten)]
    pub extra: Fields,
}

impl NewBook {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self { title: title.into(), author: author.into(), extra: Fields::new() }
    }

    pub(crate) fn into_book(mut self, id: String) -> Book {
        self.extra.remove(ID_FIELD);
        Book { id, title: self.title, author: self.author, extra: self.extra }
    }
}

/// Partial update: fields present here replace the stored ones, one level deep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Patch(pub Fields);

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Shallow-merge this patch over `current`. The `id` field never changes.
    pub fn apply<E: Entity>(self, current: &E) -> Result<E, ServiceError> {
        let Value::Object(mut fields) = serde_json::to_value(current)? else {
            return Err(ServiceError::Validation(format!("{} is not an object", E::KIND)));
        };
        for (key, value) in self.0 {
            if key == ID_FIELD {
                continue;
            }
            fields.insert(key, value);
        }
        serde_json::from_value(Value::Object(fields)).map_err(|e| {
            ServiceError::Validation(format!("invalid {} update: {e}", E::KIND))
        })
    }
}
