use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use folio_app::books::{self, store::InMemoryBookStore, store::SurrealBookStore};
use folio_kernel::settings::DatabaseSettings;
use folio_kernel::ModuleRegistry;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app(store: books::routes::SharedStore) -> Router {
    let mut registry = ModuleRegistry::new();
    registry.register(books::create_module(store));
    folio_http::build_router(&registry)
}

async fn surreal_store() -> books::routes::SharedStore {
    let db = folio_db::connect(&DatabaseSettings {
        endpoint: "mem://".to_string(),
        ..DatabaseSettings::default()
    })
    .await
    .unwrap();

    let registry = folio_app::bootstrap::build_registry(&db);
    folio_db::apply_migrations(&db, &registry.collect_migrations())
        .await
        .unwrap();

    Arc::new(SurrealBookStore::new(db))
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

/// Create, look up, delete, and confirm the record is gone.
async fn dune_lifecycle(app: Router) {
    let (status, created) = call(
        &app,
        "POST",
        "/books",
        Some(json!({
            "title": "Dune",
            "author": "Herbert",
            "genre": "SciFi",
            "publishedYear": 1965
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "Dune");
    let id = created["id"].as_str().expect("generated id").to_string();

    let (status, all) = call(&app, "GET", "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(all.as_array().unwrap().iter().any(|book| book["id"] == id));

    let (status, by_author) = call(&app, "GET", "/books/author/Herbert", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_author[0]["id"], id);

    let (status, _) = call(&app, "GET", "/books/author/Unknown", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, "GET", "/books/year/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, by_year) = call(&app, "GET", "/books/year/1965", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_year[0]["genre"], "SciFi");

    let (status, by_year) = call(&app, "GET", "/books/year/1965abc", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_year[0]["id"], id);

    let (status, rejected) = call(&app, "POST", "/books", Some(json!({ "author": "X" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(rejected["error"]["message"], "Failed to add book.");

    let (status, updated) = call(
        &app,
        "POST",
        &format!("/books/{id}"),
        Some(json!({ "genre": "Science Fiction" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["genre"], "Science Fiction");
    assert_eq!(updated["author"], "Herbert");

    let (status, deleted) = call(&app, "DELETE", &format!("/books/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["message"], "Book deleted successfully.");

    let (status, _) = call(&app, "GET", "/books/title/Dune", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, "DELETE", &format!("/books/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, "GET", "/books", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dune_lifecycle_in_memory() {
    dune_lifecycle(app(Arc::new(InMemoryBookStore::new()))).await;
}

#[tokio::test]
async fn dune_lifecycle_on_embedded_surrealdb() {
    dune_lifecycle(app(surreal_store().await)).await;
}

#[tokio::test]
async fn ambient_endpoints_are_served() {
    let app = app(Arc::new(InMemoryBookStore::new()));

    let (status, _) = call(&app, "GET", "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, spec) = call(&app, "GET", "/docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(spec["paths"]["/books"]["post"].is_object());
    assert!(spec["paths"]["/books/year/{year}"]["get"].is_object());
}
