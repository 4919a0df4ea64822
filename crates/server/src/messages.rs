//! Request and reply messages for the `Bookstore` and `Authors` services.
//!
//! Field names follow the protobuf JSON mapping (camelCase). Replies wrap
//! their payload in a `books` or `authors` field, for single records and
//! lists alike.

use serde::{Deserialize, Serialize};
use service::{NewAuthor, NewBook, Patch};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookIdRequest {
    pub book_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    pub book: NewBook,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookRequest {
    pub book_id: String,
    #[serde(default)]
    pub data: Patch,
}

#[derive(Debug, Serialize)]
pub struct BooksReply<T> {
    pub books: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorIdRequest {
    pub author_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateAuthorRequest {
    pub author: NewAuthor,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAuthorRequest {
    pub author_id: String,
    #[serde(default)]
    pub data: Patch,
}

#[derive(Debug, Serialize)]
pub struct AuthorsReply<T> {
    pub authors: T,
}

/// Acknowledgement for deletes.
#[derive(Debug, Serialize, Default)]
pub struct Empty {}
