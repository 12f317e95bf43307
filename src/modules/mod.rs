pub mod books;

use std::sync::Arc;

use folio_kernel::{DbClient, ModuleRegistry};

use books::store::SurrealBookStore;

/// Register all project modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, db: &DbClient) {
    registry.register(books::create_module(Arc::new(SurrealBookStore::new(
        db.clone(),
    ))));
}
