use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::model::{Author, Book, NewAuthor, NewBook, Patch};

/// Operations the RPC layer needs from the catalog.
///
/// `get_*`, `update_*` and `delete_*` report `NotFound` for an unknown id.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn get_book(&self, id: &str) -> Result<Book, ServiceError>;
    async fn list_books(&self) -> Vec<Book>;
    async fn create_book(&self, book: NewBook) -> Result<Book, ServiceError>;
    async fn update_book(&self, id: &str, patch: Patch) -> Result<Book, ServiceError>;
    async fn delete_book(&self, id: &str) -> Result<(), ServiceError>;

    async fn get_author(&self, id: &str) -> Result<Author, ServiceError>;
    async fn list_authors(&self) -> Vec<Author>;
    async fn create_author(&self, author: NewAuthor) -> Result<Author, ServiceError>;
    async fn update_author(&self, id: &str, patch: Patch) -> Result<Author, ServiceError>;
    async fn delete_author(&self, id: &str) -> Result<(), ServiceError>;
}
