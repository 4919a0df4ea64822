//! Catalog domain: book and author records, content-addressed identity,
//! and the JSON file store that holds them.
//!
//! - `storage::EntityStore` owns the tables and their on-disk document.
//! - `catalog::Catalog` is the locked, process-wide handle used by handlers.

pub mod catalog;
pub mod errors;
pub mod identity;
pub mod model;
pub mod storage;

pub use catalog::{Catalog, CatalogService};
pub use errors::ServiceError;
pub use model::{Author, Book, EntityKind, NewAuthor, NewBook, Patch};
