pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use axum::Router;
use folio_kernel::{InitCtx, Migration, Module};

use routes::SharedStore;

/// Book catalogue: CRUD over the `book` table, mounted at `/books`.
pub struct BooksModule {
    store: SharedStore,
}

impl BooksModule {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Schema for the `book` table.
    pub fn schema_migrations() -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                DEFINE TABLE IF NOT EXISTS book SCHEMAFULL;
                DEFINE FIELD IF NOT EXISTS title         ON book TYPE string ASSERT $value != "";
                DEFINE FIELD IF NOT EXISTS author        ON book TYPE string ASSERT $value != "";
                DEFINE FIELD IF NOT EXISTS genre         ON book TYPE option<string>;
                DEFINE FIELD IF NOT EXISTS publishedYear ON book TYPE option<int>;
                DEFINE INDEX IF NOT EXISTS book_title          ON book FIELDS title;
                DEFINE INDEX IF NOT EXISTS book_author         ON book FIELDS author;
                DEFINE INDEX IF NOT EXISTS book_genre          ON book FIELDS genre;
                DEFINE INDEX IF NOT EXISTS book_published_year ON book FIELDS publishedYear;
                "#,
        }]
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        ctx.db
            .health()
            .await
            .context("book store is not reachable")?;

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    fn migrations(&self) -> Vec<Migration> {
        Self::schema_migrations()
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

fn json_response(description: &str, schema: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "description": description,
        "content": { "application/json": { "schema": schema } }
    })
}

fn error_response(description: &str) -> serde_json::Value {
    json_response(
        description,
        serde_json::json!({ "$ref": "#/components/schemas/ErrorResponse" }),
    )
}

fn path_param(name: &str, schema_type: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "in": "path",
        "required": true,
        "schema": { "type": schema_type }
    })
}

fn book_list_operation(summary: &str, param: Option<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({
        "get": {
            "summary": summary,
            "tags": ["Books"],
            "parameters": param.into_iter().collect::<Vec<_>>(),
            "responses": {
                "200": json_response("Matching books", serde_json::json!({
                    "type": "array",
                    "items": { "$ref": "#/components/schemas/Book" }
                })),
                "404": error_response("No books found"),
                "500": error_response("Store failure")
            }
        }
    })
}

fn openapi_fragment() -> serde_json::Value {
    let book_ref = serde_json::json!({ "$ref": "#/components/schemas/Book" });
    let patch_body = serde_json::json!({
        "required": true,
        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/BookPatch" } } }
    });
    let updated = serde_json::json!({
        "200": json_response("Updated book", book_ref.clone()),
        "404": error_response("Book does not exist"),
        "500": error_response("Store failure")
    });

    let mut root = book_list_operation("List books", None);
    root["post"] = serde_json::json!({
        "summary": "Create a book",
        "tags": ["Books"],
        "requestBody": {
            "required": true,
            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/NewBook" } } }
        },
        "responses": {
            "201": json_response("Created book", book_ref.clone()),
            "500": error_response("Store failure")
        }
    });

    let mut by_title = serde_json::json!({
        "get": {
            "summary": "Get a book by exact title",
            "tags": ["Books"],
            "parameters": [path_param("title", "string")],
            "responses": {
                "200": json_response("Book", book_ref.clone()),
                "404": error_response("Book not found"),
                "500": error_response("Store failure")
            }
        }
    });
    by_title["post"] = serde_json::json!({
        "summary": "Update the first book with this title",
        "tags": ["Books"],
        "parameters": [path_param("title", "string")],
        "requestBody": patch_body.clone(),
        "responses": updated.clone()
    });

    let by_id = serde_json::json!({
        "post": {
            "summary": "Update a book by id",
            "tags": ["Books"],
            "parameters": [path_param("book_id", "string")],
            "requestBody": patch_body,
            "responses": updated
        },
        "delete": {
            "summary": "Delete a book by id",
            "tags": ["Books"],
            "parameters": [path_param("book_id", "string")],
            "responses": {
                "200": json_response("Deletion message", serde_json::json!({
                    "type": "object",
                    "properties": { "message": { "type": "string" } }
                })),
                "404": error_response("Book not found"),
                "500": error_response("Store failure")
            }
        }
    });

    let book_fields = serde_json::json!({
        "title": { "type": "string" },
        "author": { "type": "string" },
        "genre": { "type": "string" },
        "publishedYear": { "type": "integer", "format": "int64" }
    });
    let mut book_properties = book_fields.clone();
    book_properties["id"] = serde_json::json!({
        "type": "string",
        "description": "Store-assigned identifier"
    });

    serde_json::json!({
        "paths": {
            "/": root,
            "/health": {
                "get": {
                    "summary": "Books health check",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": { "text/plain": { "schema": { "type": "string" } } }
                        }
                    }
                }
            },
            "/title/{title}": by_title,
            "/author/{author}": book_list_operation("List books by author", Some(path_param("author", "string"))),
            "/genre/{genre_name}": book_list_operation("List books by genre", Some(path_param("genre_name", "string"))),
            "/year/{year}": book_list_operation("List books by publication year", Some(path_param("year", "string"))),
            "/{book_id}": by_id
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": book_properties,
                    "required": ["id", "title", "author"]
                },
                "NewBook": {
                    "type": "object",
                    "properties": book_fields.clone(),
                    "required": ["title", "author"]
                },
                "BookPatch": {
                    "type": "object",
                    "properties": book_fields
                }
            }
        }
    })
}

/// Create the books module over the given store
pub fn create_module(store: SharedStore) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}
