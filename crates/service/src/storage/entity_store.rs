use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use crate::errors::ServiceError;
use crate::identity;
use crate::model::{Author, Book, Entity, EntityKind, NewAuthor, NewBook, Patch};
use crate::storage::snapshot::{self, Table};

/// Prior state of one entry: where it sat and what it held, or `None` if the
/// key was absent.
#[derive(Debug)]
struct Revert<E> {
    id: String,
    previous: Option<(usize, E)>,
}

impl<E> Revert<E> {
    fn apply(self, table: &mut Table<E>) {
        match self.previous {
            None => {
                table.shift_remove(&self.id);
            }
            Some((_, entry)) if table.contains_key(&self.id) => {
                table.insert(self.id, entry);
            }
            Some((index, entry)) => {
                table.shift_insert(index, self.id, entry);
            }
        }
    }
}

#[derive(Debug)]
enum Undo {
    Book(Revert<Book>),
    Author(Revert<Author>),
}

/// Book and author tables mirrored to a single JSON document.
///
/// Mutations only touch memory; callers persist with [`EntityStore::save`].
/// A book's author reference is checked once, on insert. Later author
/// updates or deletes never cascade to books.
#[derive(Debug)]
pub struct EntityStore {
    books: Table<Book>,
    authors: Table<Author>,
    file_path: PathBuf,
    journal: Option<Vec<Undo>>,
}

impl EntityStore {
    /// Open the store at `path`.
    ///
    /// A missing file bootstraps an empty store and writes it out. A file that
    /// exists but cannot be read or parsed is an error; it is never replaced.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        let mut store = Self {
            books: Table::new(),
            authors: Table::new(),
            file_path: path.into(),
            journal: None,
        };
        match fs::metadata(&store.file_path).await {
            Ok(_) => {
                store.load().await?;
                info!(
                    path = %store.file_path.display(),
                    books = store.books.len(),
                    authors = store.authors.len(),
                    "store loaded"
                );
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if let Some(parent) = store.file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)
                        .await
                        .map_err(|e| ServiceError::io(parent, e))?;
                }
                store.save().await?;
                info!(path = %store.file_path.display(), "store file missing; created empty store");
            }
            Err(e) => return Err(ServiceError::io(&store.file_path, e)),
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Replace in-memory state with the contents of the store file.
    pub async fn load(&mut self) -> Result<(), ServiceError> {
        let bytes = fs::read(&self.file_path)
            .await
            .map_err(|e| ServiceError::io(&self.file_path, e))?;
        let (books, authors) = snapshot::decode(&bytes, &self.file_path)?;
        self.books = books;
        self.authors = authors;
        Ok(())
    }

    /// Rewrite the whole store file. Writes a sibling temp file first and
    /// renames it into place so readers never see a partial document.
    pub async fn save(&self) -> Result<(), ServiceError> {
        let data = snapshot::encode(&self.books, &self.authors)?;
        let tmp = temp_path(&self.file_path);
        fs::write(&tmp, data).await.map_err(|e| ServiceError::io(&tmp, e))?;
        fs::rename(&tmp, &self.file_path)
            .await
            .map_err(|e| ServiceError::io(&self.file_path, e))?;
        debug!(path = %self.file_path.display(), "store saved");
        Ok(())
    }

    /// Start recording the prior state of every entry touched from here on.
    /// Only the touched entries are kept, so a write costs the size of the
    /// records it changes rather than the size of the store.
    pub fn begin(&mut self) {
        self.journal = Some(Vec::new());
    }

    /// Keep everything changed since [`EntityStore::begin`].
    pub fn commit(&mut self) {
        self.journal = None;
    }

    /// Undo everything changed since [`EntityStore::begin`], newest first,
    /// restoring each entry to its old position.
    pub fn rollback(&mut self) {
        let Some(journal) = self.journal.take() else {
            return;
        };
        for undo in journal.into_iter().rev() {
            match undo {
                Undo::Book(revert) => revert.apply(&mut self.books),
                Undo::Author(revert) => revert.apply(&mut self.authors),
            }
        }
    }

    fn record(&mut self, undo: Undo) {
        if let Some(journal) = self.journal.as_mut() {
            journal.push(undo);
        }
    }

    pub fn add_book(&mut self, book: NewBook) -> Result<Book, ServiceError> {
        let id = identity::book_id(&book.title, &book.author);
        if self.books.contains_key(&id) {
            let by = self
                .authors
                .get(&book.author)
                .map_or(book.author.as_str(), |a| a.name.as_str());
            return Err(ServiceError::AlreadyExists {
                entity: EntityKind::Book,
                key: format!("\"{}\" by \"{}\"", book.title, by),
            });
        }
        if !self.authors.contains_key(&book.author) {
            return Err(ServiceError::not_found(EntityKind::Author, book.author));
        }
        let book = book.into_book(id.clone());
        self.books.insert(id.clone(), book.clone());
        self.record(Undo::Book(Revert { id, previous: None }));
        Ok(book)
    }

    /// Merge `patch` over the stored book. The author reference is not
    /// re-validated.
    pub fn update_book(&mut self, id: &str, patch: Patch) -> Result<Book, ServiceError> {
        let (merged, revert) = update_in(&mut self.books, id, patch)?;
        self.record(Undo::Book(revert));
        Ok(merged)
    }

    /// Returns whether an entry was removed; a missing id is not an error.
    pub fn delete_book(&mut self, id: &str) -> bool {
        match delete_in(&mut self.books, id) {
            Some(revert) => {
                self.record(Undo::Book(revert));
                true
            }
            None => false,
        }
    }

    pub fn get_book(&self, id: &str) -> Option<&Book> {
        self.books.get(id)
    }

    pub fn list_books(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    pub fn add_author(&mut self, author: NewAuthor) -> Result<Author, ServiceError> {
        let id = identity::author_id(&author.name);
        if self.authors.contains_key(&id) {
            return Err(ServiceError::AlreadyExists {
                entity: EntityKind::Author,
                key: format!("\"{}\"", author.name),
            });
        }
        let author = author.into_author(id.clone());
        self.authors.insert(id.clone(), author.clone());
        self.record(Undo::Author(Revert { id, previous: None }));
        Ok(author)
    }

    pub fn update_author(&mut self, id: &str, patch: Patch) -> Result<Author, ServiceError> {
        let (merged, revert) = update_in(&mut self.authors, id, patch)?;
        self.record(Undo::Author(revert));
        Ok(merged)
    }

    /// Books that reference this author are left as they are.
    pub fn delete_author(&mut self, id: &str) -> bool {
        match delete_in(&mut self.authors, id) {
            Some(revert) => {
                self.record(Undo::Author(revert));
                true
            }
            None => false,
        }
    }

    pub fn get_author(&self, id: &str) -> Option<&Author> {
        self.authors.get(id)
    }

    pub fn list_authors(&self) -> impl Iterator<Item = &Author> {
        self.authors.values()
    }
}

fn update_in<E: Entity>(
    table: &mut Table<E>,
    id: &str,
    patch: Patch,
) -> Result<(E, Revert<E>), ServiceError> {
    let (index, _, current) = table.get_full(id).ok_or_else(|| ServiceError::not_found(E::KIND, id))?;
    let merged = patch.apply(current)?;
    debug_assert_eq!(merged.id(), id);
    let previous = table.insert(id.to_string(), merged.clone()).map(|old| (index, old));
    Ok((merged, Revert { id: id.to_string(), previous }))
}

fn delete_in<E>(table: &mut Table<E>, id: &str) -> Option<Revert<E>> {
    let (index, key, old) = table.shift_remove_full(id)?;
    Some(Revert { id: key, previous: Some((index, old)) })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
