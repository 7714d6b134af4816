//! Domain service - business logic orchestration

use super::repository::{
    BranchRepository, CategoryRepository, ComingTableProductRepository, ComingTableRepository,
    DuplicateKey, Guarded, ProductRepository, RemainRepository, StockLedger,
};
use super::shipment::{draft_line, ShipmentEvent};
use super::validation::{self, normalize_search, resolve_page};
use crate::config::Config;
use crate::contract::{
    Branch, BranchFilter, BranchInput, Category, CategoryFilter, CategoryInput, ComingTable,
    ComingTableFilter, ComingTableInput, ComingTableProduct, ComingTableProductFilter,
    ComingTableProductInput, FinalizeReport, IngestLine, MergeOutcome, Merged, Page, PageRequest,
    Product, ProductFilter, ProductInput, Remain, RemainFilter, RemainInput, WarehouseError,
};
use std::sync::Arc;
use uuid::Uuid;

/// Storage handles the service is built from
#[derive(Clone)]
pub struct Repositories {
    pub branches: Arc<dyn BranchRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub coming_tables: Arc<dyn ComingTableRepository>,
    pub lines: Arc<dyn ComingTableProductRepository>,
    pub remains: Arc<dyn RemainRepository>,
    pub ledger: Arc<dyn StockLedger>,
}

/// Wrap a repository failure into a stable, cause-free error and log the cause.
/// A natural-key collision surfaces as `Validation` instead.
fn store_error(operation: &'static str) -> impl FnOnce(anyhow::Error) -> WarehouseError {
    move |error| {
        if let Some(duplicate) = error.downcast_ref::<DuplicateKey>() {
            tracing::debug!(operation, %duplicate, "unique key rejected write");
            return WarehouseError::validation(duplicate.to_string());
        }
        tracing::error!(operation, error = ?error, "warehouse store operation failed");
        WarehouseError::Store {
            operation: operation.to_string(),
        }
    }
}

/// Domain service for warehouse management
pub struct Service {
    repos: Repositories,
    config: Config,
}

impl Service {
    /// Create a new service instance
    pub fn new(repos: Repositories, config: Config) -> Self {
        Self { repos, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ===== Branches =====

    pub async fn create_branch(&self, input: BranchInput) -> Result<Uuid, WarehouseError> {
        validation::validate_branch(&input)?;
        let branch = self
            .repos
            .branches
            .create(&input)
            .await
            .map_err(store_error("create branch"))?;
        tracing::debug!(branch_id = %branch.id, "branch created");
        Ok(branch.id)
    }

    pub async fn get_branch(&self, id: Uuid) -> Result<Branch, WarehouseError> {
        self.repos
            .branches
            .find_by_id(id)
            .await
            .map_err(store_error("get branch"))?
            .ok_or_else(|| WarehouseError::not_found("branch", id))
    }

    pub async fn list_branches(
        &self,
        page: Option<PageRequest>,
        filter: BranchFilter,
    ) -> Result<Page<Branch>, WarehouseError> {
        let page = resolve_page(page, &self.config)?;
        let filter = BranchFilter {
            search: normalize_search(filter.search),
        };
        self.repos
            .branches
            .list(page, &filter)
            .await
            .map_err(store_error("list branches"))
    }

    pub async fn update_branch(&self, id: Uuid, input: BranchInput) -> Result<Uuid, WarehouseError> {
        validation::validate_branch(&input)?;
        let updated = self
            .repos
            .branches
            .update(id, &input)
            .await
            .map_err(store_error("update branch"))?;
        found(updated, "branch", id)
    }

    pub async fn delete_branch(&self, id: Uuid) -> Result<Uuid, WarehouseError> {
        let deleted = self
            .repos
            .branches
            .delete(id)
            .await
            .map_err(store_error("delete branch"))?;
        found(deleted, "branch", id)
    }

    // ===== Categories =====

    pub async fn create_category(&self, input: CategoryInput) -> Result<Uuid, WarehouseError> {
        validation::validate_category(&input)?;
        let category = self
            .repos
            .categories
            .create(&input)
            .await
            .map_err(store_error("create category"))?;
        tracing::debug!(category_id = %category.id, "category created");
        Ok(category.id)
    }

    pub async fn get_category(&self, id: Uuid) -> Result<Category, WarehouseError> {
        self.repos
            .categories
            .find_by_id(id)
            .await
            .map_err(store_error("get category"))?
            .ok_or_else(|| WarehouseError::not_found("category", id))
    }

    pub async fn list_categories(
        &self,
        page: Option<PageRequest>,
        filter: CategoryFilter,
    ) -> Result<Page<Category>, WarehouseError> {
        let page = resolve_page(page, &self.config)?;
        let filter = CategoryFilter {
            search: normalize_search(filter.search),
            ..filter
        };
        self.repos
            .categories
            .list(page, &filter)
            .await
            .map_err(store_error("list categories"))
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        input: CategoryInput,
    ) -> Result<Uuid, WarehouseError> {
        validation::validate_category(&input)?;
        if input.parent_id == Some(id) {
            return Err(WarehouseError::validation(
                "category cannot be its own parent",
            ));
        }
        let updated = self
            .repos
            .categories
            .update(id, &input)
            .await
            .map_err(store_error("update category"))?;
        found(updated, "category", id)
    }

    pub async fn delete_category(&self, id: Uuid) -> Result<Uuid, WarehouseError> {
        let deleted = self
            .repos
            .categories
            .delete(id)
            .await
            .map_err(store_error("delete category"))?;
        found(deleted, "category", id)
    }

    // ===== Products =====

    pub async fn create_product(&self, input: ProductInput) -> Result<Uuid, WarehouseError> {
        validation::validate_product(&input)?;
        let product = self
            .repos
            .products
            .create(&input)
            .await
            .map_err(store_error("create product"))?;
        tracing::debug!(product_id = %product.id, barcode = %product.barcode, "product created");
        Ok(product.id)
    }

    pub async fn get_product(&self, id: Uuid) -> Result<Product, WarehouseError> {
        self.repos
            .products
            .find_by_id(id)
            .await
            .map_err(store_error("get product"))?
            .ok_or_else(|| WarehouseError::not_found("product", id))
    }

    pub async fn list_products(
        &self,
        page: Option<PageRequest>,
        filter: ProductFilter,
    ) -> Result<Page<Product>, WarehouseError> {
        let page = resolve_page(page, &self.config)?;
        let filter = ProductFilter {
            search: normalize_search(filter.search),
        };
        self.repos
            .products
            .list(page, &filter)
            .await
            .map_err(store_error("list products"))
    }

    pub async fn update_product(
        &self,
        id: Uuid,
        input: ProductInput,
    ) -> Result<Uuid, WarehouseError> {
        validation::validate_product(&input)?;
        let updated = self
            .repos
            .products
            .update(id, &input)
            .await
            .map_err(store_error("update product"))?;
        found(updated, "product", id)
    }

    pub async fn delete_product(&self, id: Uuid) -> Result<Uuid, WarehouseError> {
        let deleted = self
            .repos
            .products
            .delete(id)
            .await
            .map_err(store_error("delete product"))?;
        found(deleted, "product", id)
    }

    // ===== Shipment headers =====

    pub async fn create_coming_table(
        &self,
        input: ComingTableInput,
    ) -> Result<Uuid, WarehouseError> {
        validation::validate_coming_table(&input)?;
        let table = self
            .repos
            .coming_tables
            .create(&input)
            .await
            .map_err(store_error("create coming table"))?;
        tracing::info!(
            coming_table_id = %table.id,
            branch_id = %table.branch_id,
            coming_id = %table.coming_id,
            "shipment opened"
        );
        Ok(table.id)
    }

    pub async fn get_coming_table(&self, id: Uuid) -> Result<ComingTable, WarehouseError> {
        self.repos
            .coming_tables
            .find_by_id(id)
            .await
            .map_err(store_error("get coming table"))?
            .ok_or_else(|| WarehouseError::not_found("coming_table", id))
    }

    pub async fn list_coming_tables(
        &self,
        page: Option<PageRequest>,
        filter: ComingTableFilter,
    ) -> Result<Page<ComingTable>, WarehouseError> {
        let page = resolve_page(page, &self.config)?;
        let filter = ComingTableFilter {
            search: normalize_search(filter.search),
            ..filter
        };
        self.repos
            .coming_tables
            .list(page, &filter)
            .await
            .map_err(store_error("list coming tables"))
    }

    pub async fn update_coming_table(
        &self,
        id: Uuid,
        input: ComingTableInput,
    ) -> Result<Uuid, WarehouseError> {
        validation::validate_coming_table(&input)?;
        let updated = self
            .repos
            .coming_tables
            .update(id, &input)
            .await
            .map_err(store_error("update coming table"))?;
        found(updated, "coming_table", id)
    }

    pub async fn delete_coming_table(&self, id: Uuid) -> Result<Uuid, WarehouseError> {
        let deleted = self
            .repos
            .coming_tables
            .delete(id)
            .await
            .map_err(store_error("delete coming table"))?;
        found(deleted, "coming_table", id)
    }

    /// Owning branch of a shipment that still accepts mutations.
    ///
    /// Fails with `AlreadyFinalized` once the shipment is finished.
    pub async fn get_status(&self, id: Uuid) -> Result<Uuid, WarehouseError> {
        self.guard_shipment(id, ShipmentEvent::IngestLine).await
    }

    /// Unconditionally close a shipment without touching stock.
    pub async fn mark_finished(&self, id: Uuid) -> Result<Uuid, WarehouseError> {
        let updated = self
            .repos
            .coming_tables
            .mark_finished(id)
            .await
            .map_err(store_error("mark coming table finished"))?;
        tracing::debug!(coming_table_id = %id, updated, "mark finished");
        found(updated, "coming_table", id)
    }

    // ===== Reconciliation =====

    /// Record a barcode scan against an open shipment.
    ///
    /// Repeated scans of the same barcode accumulate into one line.
    pub async fn ingest_line(
        &self,
        line: IngestLine,
    ) -> Result<Merged<ComingTableProduct>, WarehouseError> {
        validation::validate_ingest(&line)?;
        let barcode = line.barcode.trim();

        self.guard_shipment(line.coming_table_id, ShipmentEvent::IngestLine)
            .await?;

        let snapshot = self
            .repos
            .products
            .find_by_barcode_within_shipment(barcode, line.coming_table_id)
            .await
            .map_err(store_error("resolve product by barcode"))?
            .ok_or_else(|| WarehouseError::UnknownBarcode {
                barcode: barcode.to_string(),
            })?;

        let draft = draft_line(line.coming_table_id, barcode, line.count, snapshot);

        let merged = self
            .repos
            .ledger
            .merge_line(&draft)
            .await
            .map_err(store_error("merge coming table product"))?;
        let merged = applied(merged, line.coming_table_id)?;

        tracing::info!(
            coming_table_id = %line.coming_table_id,
            line_id = %merged.record.id,
            barcode = %merged.record.barcode,
            count = merged.record.count,
            merged = merged.outcome == MergeOutcome::Merged,
            "shipment line ingested"
        );
        Ok(merged)
    }

    /// Fold every line of a shipment into its branch's remains and close it.
    ///
    /// The remain merge and the status change commit together; on failure the
    /// shipment stays `in_process` and may be retried.
    pub async fn finalize_shipment(&self, id: Uuid) -> Result<FinalizeReport, WarehouseError> {
        self.guard_shipment(id, ShipmentEvent::Finalize).await?;

        let report = self
            .repos
            .ledger
            .finalize(id)
            .await
            .map_err(store_error("finalize coming table"))?;
        let report = applied(report, id)?;

        tracing::info!(
            coming_table_id = %id,
            branch_id = %report.branch_id,
            remains = report.remains.len(),
            "shipment finalized"
        );
        Ok(report)
    }

    // ===== Shipment lines =====

    pub async fn get_line(&self, id: Uuid) -> Result<ComingTableProduct, WarehouseError> {
        self.repos
            .lines
            .find_by_id(id)
            .await
            .map_err(store_error("get coming table product"))?
            .ok_or_else(|| WarehouseError::not_found("coming_table_product", id))
    }

    pub async fn list_lines(
        &self,
        page: Option<PageRequest>,
        filter: ComingTableProductFilter,
    ) -> Result<Page<ComingTableProduct>, WarehouseError> {
        let page = resolve_page(page, &self.config)?;
        let filter = ComingTableProductFilter {
            search: normalize_search(filter.search),
            ..filter
        };
        self.repos
            .lines
            .list(page, &filter)
            .await
            .map_err(store_error("list coming table products"))
    }

    /// Existing line for (shipment, barcode)
    pub async fn check_existing_line(
        &self,
        coming_table_id: Uuid,
        barcode: &str,
    ) -> Result<ComingTableProduct, WarehouseError> {
        self.repos
            .lines
            .find_line(coming_table_id, barcode.trim())
            .await
            .map_err(store_error("check coming table product"))?
            .ok_or_else(|| {
                WarehouseError::not_found(
                    "coming_table_product",
                    format!("{coming_table_id}/{}", barcode.trim()),
                )
            })
    }

    /// Rewrite a line of an open shipment; total is recomputed.
    pub async fn update_line(
        &self,
        id: Uuid,
        input: ComingTableProductInput,
    ) -> Result<Uuid, WarehouseError> {
        validation::validate_line(&input)?;
        let current = self.get_line(id).await?;
        self.guard_shipment(current.coming_table_id, ShipmentEvent::IngestLine)
            .await?;
        if input.coming_table_id != current.coming_table_id {
            self.guard_shipment(input.coming_table_id, ShipmentEvent::IngestLine)
                .await?;
        }

        let updated = self
            .repos
            .lines
            .update(id, &input)
            .await
            .map_err(store_error("update coming table product"))?;
        found(updated, "coming_table_product", id)
    }

    /// Remove a line from an open shipment
    pub async fn delete_line(&self, id: Uuid) -> Result<Uuid, WarehouseError> {
        let current = self.get_line(id).await?;
        self.guard_shipment(current.coming_table_id, ShipmentEvent::IngestLine)
            .await?;

        let deleted = self
            .repos
            .lines
            .delete(id)
            .await
            .map_err(store_error("delete coming table product"))?;
        found(deleted, "coming_table_product", id)
    }

    // ===== Remains =====

    pub async fn create_remain(&self, input: RemainInput) -> Result<Uuid, WarehouseError> {
        validation::validate_remain(&input)?;
        let remain = self
            .repos
            .remains
            .create(&input)
            .await
            .map_err(store_error("create remain"))?;
        tracing::debug!(remain_id = %remain.id, branch_id = %remain.branch_id, "remain created");
        Ok(remain.id)
    }

    pub async fn get_remain(&self, id: Uuid) -> Result<Remain, WarehouseError> {
        self.repos
            .remains
            .find_by_id(id)
            .await
            .map_err(store_error("get remain"))?
            .ok_or_else(|| WarehouseError::not_found("remain", id))
    }

    pub async fn list_remains(
        &self,
        page: Option<PageRequest>,
        filter: RemainFilter,
    ) -> Result<Page<Remain>, WarehouseError> {
        let page = resolve_page(page, &self.config)?;
        let filter = RemainFilter {
            search: normalize_search(filter.search),
            ..filter
        };
        self.repos
            .remains
            .list(page, &filter)
            .await
            .map_err(store_error("list remains"))
    }

    pub async fn update_remain(&self, id: Uuid, input: RemainInput) -> Result<Uuid, WarehouseError> {
        validation::validate_remain(&input)?;
        let updated = self
            .repos
            .remains
            .update(id, &input)
            .await
            .map_err(store_error("update remain"))?;
        found(updated, "remain", id)
    }

    pub async fn delete_remain(&self, id: Uuid) -> Result<Uuid, WarehouseError> {
        let deleted = self
            .repos
            .remains
            .delete(id)
            .await
            .map_err(store_error("delete remain"))?;
        found(deleted, "remain", id)
    }

    /// Current balance for (branch, barcode)
    pub async fn check_remain(
        &self,
        branch_id: Uuid,
        barcode: &str,
    ) -> Result<Remain, WarehouseError> {
        self.repos
            .remains
            .check_remain(branch_id, barcode.trim())
            .await
            .map_err(store_error("check remain"))?
            .ok_or_else(|| {
                WarehouseError::not_found("remain", format!("{branch_id}/{}", barcode.trim()))
            })
    }

    // ===== Helper Methods =====

    /// Load the shipment status and validate `event` against it.
    ///
    /// Returns the owning branch id.
    async fn guard_shipment(&self, id: Uuid, event: ShipmentEvent) -> Result<Uuid, WarehouseError> {
        let (status, branch_id) = self
            .repos
            .coming_tables
            .get_status(id)
            .await
            .map_err(store_error("get coming table status"))?
            .ok_or_else(|| WarehouseError::not_found("coming_table", id))?;

        status.transition(id, event)?;
        Ok(branch_id)
    }
}

/// Map a "rows affected" flag to the id or `NotFound`
fn found(affected: bool, resource: &str, id: Uuid) -> Result<Uuid, WarehouseError> {
    if affected {
        Ok(id)
    } else {
        Err(WarehouseError::not_found(resource, id))
    }
}

/// Unwrap a ledger result, turning in-transaction guard failures into errors
fn applied<T>(outcome: Guarded<T>, coming_table_id: Uuid) -> Result<T, WarehouseError> {
    match outcome {
        Guarded::Applied(value) => Ok(value),
        Guarded::ShipmentFinished => Err(WarehouseError::AlreadyFinalized { coming_table_id }),
        Guarded::ShipmentMissing => Err(WarehouseError::not_found("coming_table", coming_table_id)),
        Guarded::ShipmentEmpty => Err(WarehouseError::validation(format!(
            "coming table {coming_table_id} has no products to receive"
        ))),
    }
}
