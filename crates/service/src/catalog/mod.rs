//! Process-wide catalog handle shared by request handlers.

pub mod api;
pub mod shared;

pub use api::CatalogService;
pub use shared::Catalog;
