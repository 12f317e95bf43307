//! Document store bootstrap: connection factory, migration runner, teardown.

use anyhow::Context;
use folio_kernel::settings::DatabaseSettings;
use folio_kernel::{DbClient, Migration};
use surrealdb::engine::any;
use surrealdb::opt::auth::Root;

/// Open a connection to the configured store and select namespace/database.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<DbClient> {
    tracing::info!(
        target: "folio-db",
        endpoint = %settings.endpoint,
        namespace = %settings.namespace,
        database = %settings.database,
        "connecting to document store"
    );

    let db = any::connect(settings.endpoint.as_str())
        .await
        .with_context(|| format!("failed to connect to '{}'", settings.endpoint))?;

    if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
        db.signin(Root {
            username: username.as_str(),
            password: password.as_str(),
        })
        .await
        .context("failed to sign in to document store")?;
    }

    db.use_ns(settings.namespace.as_str())
        .use_db(settings.database.as_str())
        .await
        .with_context(|| {
            format!(
                "failed to select namespace '{}' / database '{}'",
                settings.namespace, settings.database
            )
        })?;

    tracing::info!(target: "folio-db", "document store connected");
    Ok(db)
}

/// Run module migrations in the given order.
///
/// Migration scripts are idempotent, so every run replays all of them.
/// Returns the number of migrations executed.
pub async fn apply_migrations(
    db: &DbClient,
    migrations: &[(String, Migration)],
) -> anyhow::Result<usize> {
    for (module, migration) in migrations {
        tracing::info!(
            target: "folio-db",
            module = %module,
            migration = migration.id,
            "applying migration"
        );

        db.query(migration.up)
            .await
            .and_then(|response| response.check())
            .with_context(|| {
                format!("migration '{}' of module '{}' failed", migration.id, module)
            })?;
    }

    tracing::info!(target: "folio-db", count = migrations.len(), "migrations applied");
    Ok(migrations.len())
}

/// Close the store connection.
pub fn disconnect(db: DbClient) {
    drop(db);
    tracing::info!(target: "folio-db", "document store connection closed");
}
