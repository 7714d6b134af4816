//! Common test utilities: in-memory store and a small warehouse fixture

#![allow(dead_code)]

use chrono::Utc;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;
use warehouse_service::config::Config;
use warehouse_service::contract::*;
use warehouse_service::domain::Service;
use warehouse_service::WarehouseServiceModule;

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}

/// In-memory SQLite with migrations applied.
///
/// A single pooled connection keeps the memory database alive and shared.
pub async fn setup_db() -> Arc<DatabaseConnection> {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(opts).await.unwrap();
    WarehouseServiceModule::default()
        .migrate(&db)
        .await
        .unwrap();
    Arc::new(db)
}

/// File-backed SQLite under `dir` with a pool of several connections.
///
/// Unlike [`setup_db`], concurrent callers here really use separate
/// connections and contend for SQLite's writer lock.
pub async fn setup_file_db(dir: &Path) -> Arc<DatabaseConnection> {
    let url = format!("sqlite://{}?mode=rwc", dir.join("warehouse.db").display());
    let mut opts = ConnectOptions::new(url);
    opts.max_connections(4).sqlx_logging(false);

    let db = Database::connect(opts).await.unwrap();
    WarehouseServiceModule::default()
        .migrate(&db)
        .await
        .unwrap();
    Arc::new(db)
}

/// Fully wired module over a fresh store
pub async fn create_test_module() -> (WarehouseServiceModule, Arc<DatabaseConnection>) {
    let db = setup_db().await;
    let module = WarehouseServiceModule::default();
    module.init(Config::default(), db.clone()).unwrap();
    (module, db)
}

/// Domain service over a fresh store
pub async fn create_test_service() -> Arc<Service> {
    let db = setup_db().await;
    create_test_service_on(&db)
}

/// Domain service sharing an existing store
pub fn create_test_service_on(db: &Arc<DatabaseConnection>) -> Arc<Service> {
    Arc::new(Service::new(repositories(db.clone()), Config::default()))
}

/// SeaORM-backed repositories over `db`
pub fn repositories(db: Arc<DatabaseConnection>) -> warehouse_service::domain::Repositories {
    use warehouse_service::infra::storage::{ledger::SeaOrmStockLedger, repositories::*};

    warehouse_service::domain::Repositories {
        branches: Arc::new(SeaOrmBranchRepository::new(db.clone())),
        categories: Arc::new(SeaOrmCategoryRepository::new(db.clone())),
        products: Arc::new(SeaOrmProductRepository::new(db.clone())),
        coming_tables: Arc::new(SeaOrmComingTableRepository::new(db.clone())),
        lines: Arc::new(SeaOrmComingTableProductRepository::new(db.clone())),
        remains: Arc::new(SeaOrmRemainRepository::new(db.clone())),
        ledger: Arc::new(SeaOrmStockLedger::new(db)),
    }
}

/// One branch, one category, one product ("123" at 9.0) and an open shipment
#[derive(Debug, Clone)]
pub struct Warehouse {
    pub branch: Uuid,
    pub category: Uuid,
    pub product: Uuid,
    pub shipment: Uuid,
}

pub const MILK_BARCODE: &str = "123";
pub const MILK_PRICE: f64 = 9.0;

impl Warehouse {
    pub async fn seed(service: &Service) -> Self {
        let branch = service
            .create_branch(BranchInput {
                name: "B1".into(),
                address: "1 Dock Street".into(),
                phone: "+100000000".into(),
            })
            .await
            .unwrap();
        let category = service
            .create_category(CategoryInput {
                name: "Dairy".into(),
                parent_id: None,
            })
            .await
            .unwrap();
        let product = service
            .create_product(ProductInput {
                name: "Milk".into(),
                price: MILK_PRICE,
                barcode: MILK_BARCODE.into(),
                category_id: category,
            })
            .await
            .unwrap();
        let shipment = open_shipment(service, branch, "T1").await;

        Self {
            branch,
            category,
            product,
            shipment,
        }
    }

    /// Register another product in the fixture's category
    pub async fn add_product(&self, service: &Service, name: &str, barcode: &str, price: f64) -> Uuid {
        service
            .create_product(ProductInput {
                name: name.into(),
                price,
                barcode: barcode.into(),
                category_id: self.category,
            })
            .await
            .unwrap()
    }
}

pub async fn open_shipment(service: &Service, branch: Uuid, coming_id: &str) -> Uuid {
    service
        .create_coming_table(ComingTableInput {
            coming_id: coming_id.into(),
            branch_id: branch,
            date_time: Utc::now(),
        })
        .await
        .unwrap()
}

pub async fn scan(
    service: &Service,
    shipment: Uuid,
    barcode: &str,
    count: f64,
) -> Result<Merged<ComingTableProduct>, WarehouseError> {
    service
        .ingest_line(IngestLine {
            coming_table_id: shipment,
            barcode: barcode.into(),
            count,
        })
        .await
}
