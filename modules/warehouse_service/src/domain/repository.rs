//! Repository traits for data access
//!
//! These traits define the interface for data access operations.
//! Implementations are in infra/storage/repositories.rs

use crate::contract::{
    Branch, BranchFilter, BranchInput, Category, CategoryFilter, CategoryInput, ComingTable,
    ComingTableFilter, ComingTableInput, ComingTableProduct, ComingTableProductFilter,
    ComingTableProductInput, FinalizeReport, Merged, Page, PageRequest, Product, ProductFilter,
    ProductInput, ProductSnapshot, Remain, RemainFilter, RemainInput, ShipmentStatus,
};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository for branches
#[async_trait]
pub trait BranchRepository: Send + Sync {
    async fn create(&self, input: &BranchInput) -> Result<Branch>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Branch>>;
    async fn list(&self, page: PageRequest, filter: &BranchFilter) -> Result<Page<Branch>>;
    /// Returns `false` when no row matched
    async fn update(&self, id: Uuid, input: &BranchInput) -> Result<bool>;
    /// Returns `false` when no row matched
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// Repository for product categories
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, input: &CategoryInput) -> Result<Category>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>>;
    async fn list(&self, page: PageRequest, filter: &CategoryFilter) -> Result<Page<Category>>;
    async fn update(&self, id: Uuid, input: &CategoryInput) -> Result<bool>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// Repository for the product catalog
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, input: &ProductInput) -> Result<Product>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>>;
    async fn list(&self, page: PageRequest, filter: &ProductFilter) -> Result<Page<Product>>;
    async fn update(&self, id: Uuid, input: &ProductInput) -> Result<bool>;
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Resolve a scanned barcode in the context of a shipment.
    ///
    /// `None` when the shipment does not exist or no product carries the
    /// barcode. With duplicate barcodes the newest product wins.
    async fn find_by_barcode_within_shipment(
        &self,
        barcode: &str,
        coming_table_id: Uuid,
    ) -> Result<Option<ProductSnapshot>>;
}

/// Repository for shipment headers
#[async_trait]
pub trait ComingTableRepository: Send + Sync {
    /// Insert a new header in `in_process` state
    async fn create(&self, input: &ComingTableInput) -> Result<ComingTable>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ComingTable>>;
    async fn list(&self, page: PageRequest, filter: &ComingTableFilter)
        -> Result<Page<ComingTable>>;
    /// Rewrites header fields; status is left untouched
    async fn update(&self, id: Uuid, input: &ComingTableInput) -> Result<bool>;
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Current status and owning branch
    async fn get_status(&self, id: Uuid) -> Result<Option<(ShipmentStatus, Uuid)>>;

    /// Unconditionally set status to finished. Returns `false` when no row matched.
    async fn mark_finished(&self, id: Uuid) -> Result<bool>;
}

/// Repository for shipment line items
#[async_trait]
pub trait ComingTableProductRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ComingTableProduct>>;
    async fn list(
        &self,
        page: PageRequest,
        filter: &ComingTableProductFilter,
    ) -> Result<Page<ComingTableProduct>>;
    async fn update(&self, id: Uuid, input: &ComingTableProductInput) -> Result<bool>;
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Existing line for (shipment, barcode), if any
    async fn find_line(
        &self,
        coming_table_id: Uuid,
        barcode: &str,
    ) -> Result<Option<ComingTableProduct>>;

    /// All lines of a shipment, oldest first
    async fn list_by_shipment(&self, coming_table_id: Uuid) -> Result<Vec<ComingTableProduct>>;
}

/// Repository for stock balances
#[async_trait]
pub trait RemainRepository: Send + Sync {
    async fn create(&self, input: &RemainInput) -> Result<Remain>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Remain>>;
    async fn list(&self, page: PageRequest, filter: &RemainFilter) -> Result<Page<Remain>>;
    async fn update(&self, id: Uuid, input: &RemainInput) -> Result<bool>;
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Existing balance for (branch, barcode), if any
    async fn check_remain(&self, branch_id: Uuid, barcode: &str) -> Result<Option<Remain>>;
}

/// A write collided with a natural-key unique index
#[derive(Debug, thiserror::Error)]
#[error("{0} already exists")]
pub struct DuplicateKey(pub &'static str);

/// Outcome of a ledger operation that re-checks the shipment inside its transaction
#[derive(Debug, Clone, PartialEq)]
pub enum Guarded<T> {
    /// Shipment row does not exist
    ShipmentMissing,
    /// Shipment is already finished; nothing was written
    ShipmentFinished,
    /// Shipment has no lines to apply; nothing was written
    ShipmentEmpty,
    /// Work committed
    Applied(T),
}

/// Line item drafted from a barcode scan
#[derive(Debug, Clone, PartialEq)]
pub struct LineDraft {
    pub coming_table_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub price: f64,
    pub barcode: String,
    pub count: f64,
    pub total_price: f64,
}

/// Remain increment drafted from a shipment's lines
#[derive(Debug, Clone, PartialEq)]
pub struct RemainDraft {
    pub branch_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub price: f64,
    pub barcode: String,
    pub count: f64,
    pub total_price: f64,
}

/// Transactional merge-or-insert operations of the reconciliation workflow
#[async_trait]
pub trait StockLedger: Send + Sync {
    /// Accumulate a line into its (shipment, barcode) row, creating it if absent
    async fn merge_line(&self, draft: &LineDraft) -> Result<Guarded<Merged<ComingTableProduct>>>;

    /// Mark the shipment finished and fold every line into the branch remains,
    /// all in one transaction
    async fn finalize(&self, coming_table_id: Uuid) -> Result<Guarded<FinalizeReport>>;
}
