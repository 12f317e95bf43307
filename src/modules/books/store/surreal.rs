use anyhow::anyhow;
use async_trait::async_trait;
use folio_kernel::DbClient;
use serde::Deserialize;
use surrealdb::sql::Thing;

use super::{BookFilter, BookStore, StoreError, StoreResult};
use crate::modules::books::models::{Book, BookPatch, NewBook};

const TABLE: &str = "book";

/// Row shape as the store returns it: the id is a full record id.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookRecord {
    id: Thing,
    title: String,
    author: String,
    #[serde(default)]
    genre: Option<String>,
    #[serde(default)]
    published_year: Option<i64>,
}

impl From<BookRecord> for Book {
    fn from(record: BookRecord) -> Self {
        Self {
            id: record.id.id.to_raw(),
            title: record.title,
            author: record.author,
            genre: record.genre,
            published_year: record.published_year,
        }
    }
}

impl From<surrealdb::Error> for StoreError {
    fn from(err: surrealdb::Error) -> Self {
        StoreError::Backend(err.into())
    }
}

/// [`BookStore`] over the `book` table of a SurrealDB database.
#[derive(Clone)]
pub struct SurrealBookStore {
    db: DbClient,
}

impl SurrealBookStore {
    pub fn new(db: DbClient) -> Self {
        Self { db }
    }

    async fn select_where(&self, filter: BookFilter, limit: Option<usize>) -> StoreResult<Vec<Book>> {
        // `field()` is a fixed identifier, only the value is bound.
        let mut sql = format!("SELECT * FROM {} WHERE {} = $value", TABLE, filter.field());
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let mut response = self.db.query(sql).bind(("value", filter_value(filter))).await?;
        let records: Vec<BookRecord> = response.take(0)?;
        Ok(records.into_iter().map(Book::from).collect())
    }
}

fn filter_value(filter: BookFilter) -> serde_json::Value {
    match filter {
        BookFilter::Title(value) | BookFilter::Author(value) | BookFilter::Genre(value) => {
            serde_json::Value::String(value)
        }
        BookFilter::PublishedYear(year) => serde_json::Value::from(year),
    }
}

#[async_trait]
impl BookStore for SurrealBookStore {
    async fn insert(&self, book: NewBook) -> StoreResult<Book> {
        let created: Option<BookRecord> = self.db.create(TABLE).content(book).await?;
        let created = created.ok_or_else(|| anyhow!("store returned no record for create"))?;

        tracing::debug!(book_id = %created.id, "book record created");
        Ok(created.into())
    }

    async fn find_all(&self) -> StoreResult<Vec<Book>> {
        let records: Vec<BookRecord> = self.db.select(TABLE).await?;
        Ok(records.into_iter().map(Book::from).collect())
    }

    async fn find_many(&self, filter: BookFilter) -> StoreResult<Vec<Book>> {
        self.select_where(filter, None).await
    }

    async fn find_one(&self, filter: BookFilter) -> StoreResult<Book> {
        self.select_where(filter, Some(1))
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound)
    }

    async fn update_by_id(&self, id: &str, patch: BookPatch) -> StoreResult<Book> {
        // UPDATE leaves missing records alone and returns nothing for them.
        let updated: Option<BookRecord> = self
            .db
            .update((TABLE, id.to_owned()))
            .merge(patch)
            .await?;
        updated.map(Book::from).ok_or(StoreError::NotFound)
    }

    async fn update_one(&self, filter: BookFilter, patch: BookPatch) -> StoreResult<Book> {
        let sql = format!(
            "UPDATE (SELECT VALUE id FROM {} WHERE {} = $value LIMIT 1) MERGE $patch RETURN AFTER",
            TABLE,
            filter.field()
        );

        let mut response = self
            .db
            .query(sql)
            .bind(("value", filter_value(filter)))
            .bind(("patch", patch))
            .await?;
        let records: Vec<BookRecord> = response.take(0)?;
        records
            .into_iter()
            .next()
            .map(Book::from)
            .ok_or(StoreError::NotFound)
    }

    async fn delete_by_id(&self, id: &str) -> StoreResult<Book> {
        let deleted: Option<BookRecord> = self.db.delete((TABLE, id.to_owned())).await?;
        deleted.map(Book::from).ok_or(StoreError::NotFound)
    }
}
