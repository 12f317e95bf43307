//! Process lifecycle: open the store, drive modules, serve, tear down.

use anyhow::Context;
use folio_kernel::settings::Settings;
use folio_kernel::{DbClient, InitCtx, ModuleRegistry};

use crate::modules;

/// Registry with every project module wired to `db`
pub fn build_registry(db: &DbClient) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, db);
    registry
}

/// Run the service until a shutdown signal, then stop modules and close the store.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let db = folio_db::connect(&settings.database)
        .await
        .context("failed to open the document store")?;

    let result = run(&settings, &db).await;
    folio_db::disconnect(db);

    result
}

async fn run(settings: &Settings, db: &DbClient) -> anyhow::Result<()> {
    let registry = build_registry(db);
    let ctx = InitCtx { settings, db };

    registry.init_all(&ctx).await?;
    folio_db::apply_migrations(db, &registry.collect_migrations()).await?;
    registry.start_all(&ctx).await?;

    tracing::info!(modules = registry.len(), "folio-app bootstrap complete");

    let served = folio_http::start_server(&registry, settings).await;
    let stopped = registry.stop_all().await;

    served.and(stopped)
}

/// Apply every module migration and exit. Returns the number applied.
pub async fn migrate(settings: &Settings) -> anyhow::Result<usize> {
    let db = folio_db::connect(&settings.database)
        .await
        .context("failed to open the document store")?;

    let registry = build_registry(&db);
    let applied = folio_db::apply_migrations(&db, &registry.collect_migrations()).await;
    folio_db::disconnect(db);

    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_kernel::settings::DatabaseSettings;

    fn memory_settings() -> Settings {
        Settings {
            database: DatabaseSettings {
                endpoint: "mem://".to_string(),
                ..DatabaseSettings::default()
            },
            ..Settings::default()
        }
    }

    #[test]
    fn registry_contains_books_module() {
        let db = DbClient::init();
        let registry = build_registry(&db);

        assert!(registry.get_module("books").is_some());
        assert_eq!(registry.collect_migrations().len(), 1);
    }

    #[tokio::test]
    async fn migrate_against_embedded_store() {
        assert_eq!(migrate(&memory_settings()).await.unwrap(), 1);
    }
}
