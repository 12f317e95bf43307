//! HTTP handlers for the books module.
//!
//! Every handler performs exactly one [`BookStore`] call and maps the
//! outcome: records → 200 (201 on create), nothing matched → 404,
//! store failure → 500 with a fixed message.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use folio_http::error::AppError;

use super::models::{Book, BookPatch, DeleteResponse, NewBook};
use super::store::{BookStore, StoreError};

pub type SharedStore = Arc<dyn BookStore>;

const NO_BOOKS: &str = "No books found.";
const BOOK_NOT_FOUND: &str = "Book not found.";
const BOOK_MISSING: &str = "Book does not exist.";
const ADD_FAILED: &str = "Failed to add book.";
const UPDATE_FAILED: &str = "Failed to update book.";

/// Literal segment that shadows `/{book_id}`.
const HEALTH_SEGMENT: &str = "health";

/// Routes relative to the module mount point (`/books`).
pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/health",
            get(health_check)
                .post(update_health_segment)
                .delete(delete_health_segment),
        )
        .route(
            "/title/{title}",
            get(get_book_by_title).post(update_book_by_title),
        )
        .route("/author/{author}", get(list_books_by_author))
        .route("/genre/{genre_name}", get(list_books_by_genre))
        .route("/year/{year}", get(list_books_by_year))
        .route("/{book_id}", post(update_book).delete(delete_book))
        .with_state(store)
}

fn map_store_error(err: StoreError, not_found: &'static str, failure: &'static str) -> AppError {
    match err {
        StoreError::NotFound => AppError::not_found(not_found),
        StoreError::Backend(source) => AppError::internal(failure, source),
    }
}

/// Empty result sets are reported as 404.
fn non_empty(books: Vec<Book>) -> Result<Json<Vec<Book>>, AppError> {
    if books.is_empty() {
        Err(AppError::not_found(NO_BOOKS))
    } else {
        Ok(Json(books))
    }
}

fn fetch_failed(err: StoreError) -> AppError {
    map_store_error(err, NO_BOOKS, "Failed to fetch books.")
}

/// A body that does not decode is a failed write, reported like any other
/// store rejection of the payload.
fn decode_body<T>(body: Result<Json<T>, JsonRejection>, failure: &'static str) -> Result<T, AppError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::internal(failure, rejection))
}

/// Integer prefix of a path segment: optional sign, then decimal digits, or
/// hex digits after `0x`. Trailing text is ignored, so `1965abc` reads as
/// 1965. `None` when no digits lead the segment.
fn leading_integer(segment: &str) -> Option<i64> {
    let trimmed = segment.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (radix, digits) = match unsigned.get(..2) {
        Some("0x") | Some("0X") => (16, &unsigned[2..]),
        _ => (10, unsigned),
    };
    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value = i64::from_str_radix(&digits[..end], radix).ok()?;
    Some(if negative { -value } else { value })
}

async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn create_book(
    State(store): State<SharedStore>,
    payload: Result<Json<NewBook>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let payload = decode_body(payload, ADD_FAILED)?;
    let book = store
        .insert(payload)
        .await
        .map_err(|err| map_store_error(err, BOOK_NOT_FOUND, ADD_FAILED))?;

    tracing::info!(book_id = %book.id, title = %book.title, "book created");
    Ok((StatusCode::CREATED, Json(book)))
}

async fn list_books(State(store): State<SharedStore>) -> Result<Json<Vec<Book>>, AppError> {
    non_empty(store.find_all().await.map_err(fetch_failed)?)
}

async fn get_book_by_title(
    State(store): State<SharedStore>,
    Path(title): Path<String>,
) -> Result<Json<Book>, AppError> {
    store
        .find_one_by_title(&title)
        .await
        .map(Json)
        .map_err(|err| map_store_error(err, BOOK_NOT_FOUND, "Failed to fetch book."))
}

async fn list_books_by_author(
    State(store): State<SharedStore>,
    Path(author): Path<String>,
) -> Result<Json<Vec<Book>>, AppError> {
    non_empty(
        store
            .find_many_by_author(&author)
            .await
            .map_err(fetch_failed)?,
    )
}

async fn list_books_by_genre(
    State(store): State<SharedStore>,
    Path(genre_name): Path<String>,
) -> Result<Json<Vec<Book>>, AppError> {
    non_empty(
        store
            .find_many_by_genre(&genre_name)
            .await
            .map_err(fetch_failed)?,
    )
}

/// The year is the segment's integer prefix. A segment without one matches
/// nothing, so it is a 404 like any other empty lookup.
async fn list_books_by_year(
    State(store): State<SharedStore>,
    Path(year): Path<String>,
) -> Result<Json<Vec<Book>>, AppError> {
    let Some(year) = leading_integer(&year) else {
        tracing::debug!(segment = %year, "non-numeric year segment");
        return Err(AppError::not_found(NO_BOOKS));
    };

    non_empty(store.find_many_by_year(year).await.map_err(fetch_failed)?)
}

async fn update_book(
    State(store): State<SharedStore>,
    Path(book_id): Path<String>,
    patch: Result<Json<BookPatch>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let patch = decode_body(patch, UPDATE_FAILED)?;
    let book = store
        .update_by_id(&book_id, patch)
        .await
        .map_err(|err| map_store_error(err, BOOK_MISSING, UPDATE_FAILED))?;

    tracing::info!(book_id = %book.id, "book updated");
    Ok(Json(book))
}

async fn update_book_by_title(
    State(store): State<SharedStore>,
    Path(title): Path<String>,
    patch: Result<Json<BookPatch>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let patch = decode_body(patch, UPDATE_FAILED)?;
    let book = store
        .update_by_title(&title, patch)
        .await
        .map_err(|err| map_store_error(err, BOOK_MISSING, UPDATE_FAILED))?;

    tracing::info!(book_id = %book.id, "book updated by title");
    Ok(Json(book))
}

async fn delete_book(
    State(store): State<SharedStore>,
    Path(book_id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let book = store
        .delete_by_id(&book_id)
        .await
        .map_err(|err| map_store_error(err, BOOK_NOT_FOUND, "Failed to delete book."))?;

    tracing::info!(book_id = %book.id, "book deleted");
    Ok(Json(DeleteResponse {
        message: "Book deleted successfully.".to_string(),
    }))
}

async fn update_health_segment(
    state: State<SharedStore>,
    patch: Result<Json<BookPatch>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    update_book(state, Path(HEALTH_SEGMENT.to_string()), patch).await
}

async fn delete_health_segment(state: State<SharedStore>) -> Result<Json<DeleteResponse>, AppError> {
    delete_book(state, Path(HEALTH_SEGMENT.to_string())).await
}
