//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{
    Branch, ComingTable, ComingTableInput, ComingTableProduct, FinalizeReport, IngestLine, Merged,
    Page, PageRequest, Product, Remain, RemainFilter, WarehouseApi, WarehouseError,
};
use crate::domain::Service;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Native client implementation that directly calls the domain service
///
/// Used for in-process communication without HTTP overhead.
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    /// Create a new native client
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl WarehouseApi for NativeClient {
    async fn get_branch(&self, id: Uuid) -> Result<Branch, WarehouseError> {
        self.service.get_branch(id).await
    }

    async fn get_product(&self, id: Uuid) -> Result<Product, WarehouseError> {
        self.service.get_product(id).await
    }

    async fn open_shipment(&self, input: ComingTableInput) -> Result<Uuid, WarehouseError> {
        self.service.create_coming_table(input).await
    }

    async fn get_shipment(&self, id: Uuid) -> Result<ComingTable, WarehouseError> {
        self.service.get_coming_table(id).await
    }

    async fn ingest_line(
        &self,
        line: IngestLine,
    ) -> Result<Merged<ComingTableProduct>, WarehouseError> {
        self.service.ingest_line(line).await
    }

    async fn finalize_shipment(&self, id: Uuid) -> Result<FinalizeReport, WarehouseError> {
        self.service.finalize_shipment(id).await
    }

    async fn check_remain(
        &self,
        branch_id: Uuid,
        barcode: &str,
    ) -> Result<Remain, WarehouseError> {
        self.service.check_remain(branch_id, barcode).await
    }

    async fn list_remains(
        &self,
        page: Option<PageRequest>,
        filter: RemainFilter,
    ) -> Result<Page<Remain>, WarehouseError> {
        self.service.list_remains(page, filter).await
    }
}
