use std::sync::Arc;

use service::CatalogService;

/// Shared by every handler; the catalog is constructed once at startup.
#[derive(Clone)]
pub struct ServerState {
    pub catalog: Arc<dyn CatalogService>,
}

impl ServerState {
    pub fn new(catalog: Arc<dyn CatalogService>) -> Self {
        Self { catalog }
    }
}
