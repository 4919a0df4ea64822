//! File-backed storage for the catalog.
//!
//! `EntityStore` owns both tables in memory and persists them as one JSON
//! document; `snapshot` defines that document's shape.

pub mod entity_store;
pub mod snapshot;

pub use entity_store::EntityStore;
