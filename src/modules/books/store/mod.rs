//! Record store adapter for books.
//!
//! [`BookStore`] is the seam between the HTTP handlers and the document
//! store. Each operation maps onto exactly one store primitive; lookups are
//! exact equality on a single field with no paging or ordering guarantee
//! beyond the store's natural iteration order.

mod memory;
mod surreal;

use async_trait::async_trait;
use thiserror::Error;

use super::models::{Book, BookPatch, NewBook};

pub use memory::InMemoryBookStore;
pub use surreal::SurrealBookStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The filter or id matched no record.
    #[error("no matching book")]
    NotFound,

    /// The store was unreachable or rejected the operation.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Equality predicate over one book field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookFilter {
    Title(String),
    Author(String),
    Genre(String),
    PublishedYear(i64),
}

impl BookFilter {
    /// Stored field name the filter applies to
    pub fn field(&self) -> &'static str {
        match self {
            BookFilter::Title(_) => "title",
            BookFilter::Author(_) => "author",
            BookFilter::Genre(_) => "genre",
            BookFilter::PublishedYear(_) => "publishedYear",
        }
    }

    pub fn matches(&self, book: &Book) -> bool {
        match self {
            BookFilter::Title(title) => book.title == *title,
            BookFilter::Author(author) => book.author == *author,
            BookFilter::Genre(genre) => book.genre.as_deref() == Some(genre.as_str()),
            BookFilter::PublishedYear(year) => book.published_year == Some(*year),
        }
    }
}

#[async_trait]
pub trait BookStore: Send + Sync {
    /// Persist a new book; the store assigns its id.
    async fn insert(&self, book: NewBook) -> StoreResult<Book>;

    /// Every stored book, possibly none.
    async fn find_all(&self) -> StoreResult<Vec<Book>>;

    /// Every book matching `filter`, possibly none.
    async fn find_many(&self, filter: BookFilter) -> StoreResult<Vec<Book>>;

    /// First book matching `filter`.
    async fn find_one(&self, filter: BookFilter) -> StoreResult<Book>;

    /// Merge `patch` into the book with `id` and return the result.
    async fn update_by_id(&self, id: &str, patch: BookPatch) -> StoreResult<Book>;

    /// Merge `patch` into the first book matching `filter`.
    async fn update_one(&self, filter: BookFilter, patch: BookPatch) -> StoreResult<Book>;

    /// Remove the book with `id` permanently, returning what was removed.
    async fn delete_by_id(&self, id: &str) -> StoreResult<Book>;

    async fn find_one_by_title(&self, title: &str) -> StoreResult<Book> {
        self.find_one(BookFilter::Title(title.to_owned())).await
    }

    async fn find_many_by_author(&self, author: &str) -> StoreResult<Vec<Book>> {
        self.find_many(BookFilter::Author(author.to_owned())).await
    }

    async fn find_many_by_genre(&self, genre: &str) -> StoreResult<Vec<Book>> {
        self.find_many(BookFilter::Genre(genre.to_owned())).await
    }

    async fn find_many_by_year(&self, year: i64) -> StoreResult<Vec<Book>> {
        self.find_many(BookFilter::PublishedYear(year)).await
    }

    async fn update_by_title(&self, title: &str, patch: BookPatch) -> StoreResult<Book> {
        self.update_one(BookFilter::Title(title.to_owned()), patch)
            .await
    }
}
