use std::sync::{Arc, RwLock};

use anyhow::anyhow;
use async_trait::async_trait;
use uuid::Uuid;

use super::{BookFilter, BookStore, StoreError, StoreResult};
use crate::modules::books::models::{Book, BookPatch, NewBook};

/// Process-local book store, kept in insertion order.
///
/// Ids are UUIDv7 strings. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryBookStore {
    books: Arc<RwLock<Vec<Book>>>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, Vec<Book>>> {
        self.books
            .read()
            .map_err(|_| StoreError::Backend(anyhow!("book store lock poisoned")))
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, Vec<Book>>> {
        self.books
            .write()
            .map_err(|_| StoreError::Backend(anyhow!("book store lock poisoned")))
    }

    fn patch_where(
        &self,
        predicate: impl Fn(&Book) -> bool,
        patch: BookPatch,
    ) -> StoreResult<Book> {
        let mut books = self.write()?;
        let book = books
            .iter_mut()
            .find(|book| predicate(book))
            .ok_or(StoreError::NotFound)?;
        book.apply(patch);
        Ok(book.clone())
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn insert(&self, book: NewBook) -> StoreResult<Book> {
        let book = Book::from_new(Uuid::now_v7().to_string(), book);
        self.write()?.push(book.clone());
        Ok(book)
    }

    async fn find_all(&self) -> StoreResult<Vec<Book>> {
        Ok(self.read()?.clone())
    }

    async fn find_many(&self, filter: BookFilter) -> StoreResult<Vec<Book>> {
        Ok(self
            .read()?
            .iter()
            .filter(|book| filter.matches(book))
            .cloned()
            .collect())
    }

    async fn find_one(&self, filter: BookFilter) -> StoreResult<Book> {
        self.read()?
            .iter()
            .find(|book| filter.matches(book))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update_by_id(&self, id: &str, patch: BookPatch) -> StoreResult<Book> {
        self.patch_where(|book| book.id == id, patch)
    }

    async fn update_one(&self, filter: BookFilter, patch: BookPatch) -> StoreResult<Book> {
        self.patch_where(|book| filter.matches(book), patch)
    }

    async fn delete_by_id(&self, id: &str) -> StoreResult<Book> {
        let mut books = self.write()?;
        let position = books
            .iter()
            .position(|book| book.id == id)
            .ok_or(StoreError::NotFound)?;
        Ok(books.remove(position))
    }
}
