//! Native client trait for inter-module communication
//!
//! This trait defines the API that other modules use to drive stock intake.
//! NO HTTP - direct function calls for performance.

use super::{
    error::WarehouseError,
    model::{
        Branch, ComingTable, ComingTableInput, ComingTableProduct, FinalizeReport, IngestLine,
        Merged, Page, PageRequest, Product, Remain, RemainFilter,
    },
};
use async_trait::async_trait;
use uuid::Uuid;

/// Warehouse service API for inter-module communication
#[async_trait]
pub trait WarehouseApi: Send + Sync {
    // ===== Catalog =====

    /// Get a branch by id
    async fn get_branch(&self, id: Uuid) -> Result<Branch, WarehouseError>;

    /// Get a product by id
    async fn get_product(&self, id: Uuid) -> Result<Product, WarehouseError>;

    // ===== Shipments =====

    /// Open a new shipment in `in_process` state
    async fn open_shipment(&self, input: ComingTableInput) -> Result<Uuid, WarehouseError>;

    /// Get a shipment header
    async fn get_shipment(&self, id: Uuid) -> Result<ComingTable, WarehouseError>;

    /// Record a barcode scan against an open shipment
    async fn ingest_line(
        &self,
        line: IngestLine,
    ) -> Result<Merged<ComingTableProduct>, WarehouseError>;

    /// Fold a shipment into branch stock and close it
    async fn finalize_shipment(&self, id: Uuid) -> Result<FinalizeReport, WarehouseError>;

    // ===== Stock =====

    /// Current balance of one barcode at one branch
    async fn check_remain(&self, branch_id: Uuid, barcode: &str)
        -> Result<Remain, WarehouseError>;

    /// List balances
    async fn list_remains(
        &self,
        page: Option<PageRequest>,
        filter: RemainFilter,
    ) -> Result<Page<Remain>, WarehouseError>;
}
