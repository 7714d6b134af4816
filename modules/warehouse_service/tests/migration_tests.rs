//! Integration tests for schema migrations

use sea_orm::{ConnectionTrait, Statement};
use warehouse_service::infra::storage::migrations::MIGRATION_NAMES;
use warehouse_service::WarehouseServiceModule;

mod common;
use common::print_test_header;

async fn recorded_versions(db: &sea_orm::DatabaseConnection) -> Vec<String> {
    let rows = db
        .query_all(Statement::from_string(
            db.get_database_backend(),
            "SELECT version FROM seaql_migrations ORDER BY version",
        ))
        .await
        .unwrap();
    rows.iter()
        .map(|row| row.try_get::<String>("", "version").unwrap())
        .collect()
}

#[tokio::test]
async fn test_migrate_records_every_version_and_is_idempotent() {
    print_test_header(
        "test_migrate_records_every_version_and_is_idempotent",
        &[
            "Each migration is recorded under its own name",
            "A second migrate on the same store is a no-op",
        ],
    );
    let db = common::setup_db().await;
    assert_eq!(recorded_versions(&db).await, MIGRATION_NAMES);

    WarehouseServiceModule::default()
        .migrate(&db)
        .await
        .unwrap();
    assert_eq!(recorded_versions(&db).await, MIGRATION_NAMES);
}

#[tokio::test]
async fn test_branches_table_name() {
    let db = common::setup_db().await;
    let rows = db
        .query_all(Statement::from_string(
            db.get_database_backend(),
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'branches'",
        ))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}
