use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info};

use crate::catalog::api::CatalogService;
use crate::errors::ServiceError;
use crate::model::{Author, Book, EntityKind, NewAuthor, NewBook, Patch};
use crate::storage::EntityStore;

/// Shared handle over one [`EntityStore`].
///
/// Every write holds the lock across the in-memory change and the following
/// save, so concurrent requests cannot interleave their read-modify-write
/// cycles. A failed save rolls the in-memory change back.
#[derive(Clone)]
pub struct Catalog {
    inner: Arc<Mutex<EntityStore>>,
}

impl Catalog {
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = EntityStore::open(path).await?;
        Ok(Arc::new(Self::from_store(store)))
    }

    pub fn from_store(store: EntityStore) -> Self {
        Self { inner: Arc::new(Mutex::new(store)) }
    }

    /// Apply `f` and persist. Nothing is saved when `f` fails.
    ///
    /// The critical section runs on its own task and always finishes, even
    /// when the caller's future is dropped, so memory and file stay in step.
    async fn write<T, F>(&self, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut EntityStore) -> Result<T, ServiceError> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let mut store = inner.lock_owned().await;
            store.begin();
            let out = match f(&mut *store) {
                Ok(out) => out,
                Err(e) => {
                    store.rollback();
                    return Err(e);
                }
            };
            if let Err(e) = store.save().await {
                error!(error = %e, "save failed; rolling back in-memory change");
                store.rollback();
                return Err(e);
            }
            store.commit();
            Ok(out)
        });
        task.await.map_err(|e| ServiceError::Task(e.to_string()))?
    }
}

#[async_trait::async_trait]
impl CatalogService for Catalog {
    async fn get_book(&self, id: &str) -> Result<Book, ServiceError> {
        let store = self.inner.lock().await;
        store
            .get_book(id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found(EntityKind::Book, id))
    }

    async fn list_books(&self) -> Vec<Book> {
        self.inner.lock().await.list_books().cloned().collect()
    }

    async fn create_book(&self, book: NewBook) -> Result<Book, ServiceError> {
        let created = self.write(move |s| s.add_book(book)).await?;
        info!(entity = "book", id = %created.id, "created");
        Ok(created)
    }

    async fn update_book(&self, id: &str, patch: Patch) -> Result<Book, ServiceError> {
        let key = id.to_string();
        let updated = self.write(move |s| s.update_book(&key, patch)).await?;
        info!(entity = "book", %id, "updated");
        Ok(updated)
    }

    async fn delete_book(&self, id: &str) -> Result<(), ServiceError> {
        let key = id.to_string();
        self.write(move |s| {
            if s.delete_book(&key) {
                Ok(())
            } else {
                Err(ServiceError::not_found(EntityKind::Book, key))
            }
        })
        .await?;
        info!(entity = "book", %id, "deleted");
        Ok(())
    }

    async fn get_author(&self, id: &str) -> Result<Author, ServiceError> {
        let store = self.inner.lock().await;
        store
            .get_author(id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found(EntityKind::Author, id))
    }

    async fn list_authors(&self) -> Vec<Author> {
        self.inner.lock().await.list_authors().cloned().collect()
    }

    async fn create_author(&self, author: NewAuthor) -> Result<Author, ServiceError> {
        let created = self.write(move |s| s.add_author(author)).await?;
        info!(entity = "author", id = %created.id, "created");
        Ok(created)
    }

    async fn update_author(&self, id: &str, patch: Patch) -> Result<Author, ServiceError> {
        let key = id.to_string();
        let updated = self.write(move |s| s.update_author(&key, patch)).await?;
        info!(entity = "author", %id, "updated");
        Ok(updated)
    }

    async fn delete_author(&self, id: &str) -> Result<(), ServiceError> {
        let key = id.to_string();
        self.write(move |s| {
            if s.delete_author(&key) {
                Ok(())
            } else {
                Err(ServiceError::not_found(EntityKind::Author, key))
            }
        })
        .await?;
        info!(entity = "author", %id, "deleted");
        Ok(())
    }
}
