//! Module declaration and lifecycle implementation

use crate::config::Config;
use crate::contract::WarehouseApi;
use crate::domain::{Repositories, Service};
use crate::infra::storage::{
    ledger::SeaOrmStockLedger,
    migrations::Migrator,
    repositories::{
        SeaOrmBranchRepository, SeaOrmCategoryRepository, SeaOrmComingTableProductRepository,
        SeaOrmComingTableRepository, SeaOrmProductRepository, SeaOrmRemainRepository,
    },
};
use anyhow::Result;
use parking_lot::RwLock;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;

/// Warehouse service module
///
/// Lifecycle: [`migrate`](Self::migrate), then [`init`](Self::init), then
/// [`register_rest`](Self::register_rest) / [`client`](Self::client).
pub struct WarehouseServiceModule {
    config: RwLock<Config>,
    service: RwLock<Option<Arc<Service>>>,
}

impl Default for WarehouseServiceModule {
    fn default() -> Self {
        Self {
            config: RwLock::new(Config::default()),
            service: RwLock::new(None),
        }
    }
}

impl WarehouseServiceModule {
    /// Build repositories and the domain service over `db`
    pub fn init(&self, config: Config, db: Arc<DatabaseConnection>) -> Result<()> {
        if config.default_page_size == 0 || config.default_page_size > config.max_page_size {
            anyhow::bail!(
                "invalid warehouse config: default_page_size {} must be within 1..={}",
                config.default_page_size,
                config.max_page_size
            );
        }
        *self.config.write() = config.clone();

        let repos = Repositories {
            branches: Arc::new(SeaOrmBranchRepository::new(db.clone())),
            categories: Arc::new(SeaOrmCategoryRepository::new(db.clone())),
            products: Arc::new(SeaOrmProductRepository::new(db.clone())),
            coming_tables: Arc::new(SeaOrmComingTableRepository::new(db.clone())),
            lines: Arc::new(SeaOrmComingTableProductRepository::new(db.clone())),
            remains: Arc::new(SeaOrmRemainRepository::new(db.clone())),
            ledger: Arc::new(SeaOrmStockLedger::new(db)),
        };

        let service = Arc::new(Service::new(repos, config));
        *self.service.write() = Some(service);

        tracing::info!("Warehouse service initialized");
        Ok(())
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self, db: &DatabaseConnection) -> Result<()> {
        Migrator::up(db, None).await?;
        tracing::info!("Warehouse service migrations completed");
        Ok(())
    }

    /// Mount the REST routes on `router`
    pub fn register_rest(&self, router: axum::Router) -> Result<axum::Router> {
        let service = self.service()?;
        tracing::info!("Registering warehouse service REST routes");
        crate::api::rest::routes::register_routes(router, service)
    }

    /// In-process client for other modules
    pub fn client(&self) -> Result<Arc<dyn WarehouseApi>> {
        let service = self.service()?;
        Ok(Arc::new(crate::api::native::NativeClient::new(service)))
    }

    /// Effective module configuration
    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    fn service(&self) -> Result<Arc<Service>> {
        self.service
            .read()
            .as_ref()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }
}
