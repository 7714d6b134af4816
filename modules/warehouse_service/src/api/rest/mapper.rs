//! Mapper implementations for converting between DTOs and contract models
//!
//! This module contains all From/Into implementations for bidirectional
//! conversion between REST DTOs and transport-agnostic contract models.

use super::dto::*;
use crate::contract;

// ===== Catalog conversions =====

impl From<contract::Branch> for BranchDto {
    fn from(branch: contract::Branch) -> Self {
        Self {
            id: branch.id,
            name: branch.name,
            address: branch.address,
            phone: branch.phone,
            created_at: branch.created_at,
            updated_at: branch.updated_at,
        }
    }
}

impl From<BranchRequest> for contract::BranchInput {
    fn from(req: BranchRequest) -> Self {
        Self {
            name: req.name,
            address: req.address,
            phone: req.phone,
        }
    }
}

impl From<contract::Category> for CategoryDto {
    fn from(category: contract::Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            parent_id: category.parent_id,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

impl From<CategoryRequest> for contract::CategoryInput {
    fn from(req: CategoryRequest) -> Self {
        Self {
            name: req.name,
            parent_id: req.parent_id,
        }
    }
}

impl From<contract::Product> for ProductDto {
    fn from(product: contract::Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            barcode: product.barcode,
            category_id: product.category_id,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

impl From<ProductRequest> for contract::ProductInput {
    fn from(req: ProductRequest) -> Self {
        Self {
            name: req.name,
            price: req.price,
            barcode: req.barcode,
            category_id: req.category_id,
        }
    }
}

// ===== Shipment conversions =====

impl From<contract::ShipmentStatus> for ShipmentStatusDto {
    fn from(status: contract::ShipmentStatus) -> Self {
        match status {
            contract::ShipmentStatus::InProcess => Self::InProcess,
            contract::ShipmentStatus::Finished => Self::Finished,
        }
    }
}

impl From<contract::ComingTable> for ComingTableDto {
    fn from(table: contract::ComingTable) -> Self {
        Self {
            id: table.id,
            coming_id: table.coming_id,
            branch_id: table.branch_id,
            date_time: table.date_time,
            status: table.status.into(),
            created_at: table.created_at,
            updated_at: table.updated_at,
        }
    }
}

impl From<ComingTableRequest> for contract::ComingTableInput {
    fn from(req: ComingTableRequest) -> Self {
        Self {
            coming_id: req.coming_id,
            branch_id: req.branch_id,
            date_time: req.date_time.unwrap_or_else(chrono::Utc::now),
        }
    }
}

impl From<contract::ComingTableProduct> for LineDto {
    fn from(line: contract::ComingTableProduct) -> Self {
        Self {
            id: line.id,
            category_id: line.category_id,
            name: line.name,
            price: line.price,
            barcode: line.barcode,
            count: line.count,
            total_price: line.total_price,
            coming_table_id: line.coming_table_id,
            created_at: line.created_at,
            updated_at: line.updated_at,
        }
    }
}

impl From<LineRequest> for contract::ComingTableProductInput {
    fn from(req: LineRequest) -> Self {
        Self {
            category_id: req.category_id,
            name: req.name,
            price: req.price,
            barcode: req.barcode,
            count: req.count,
            coming_table_id: req.coming_table_id,
        }
    }
}

impl From<IngestRequest> for contract::IngestLine {
    fn from(req: IngestRequest) -> Self {
        Self {
            coming_table_id: req.coming_table_id,
            barcode: req.barcode,
            count: req.count,
        }
    }
}

impl From<contract::MergeOutcome> for MergeOutcomeDto {
    fn from(outcome: contract::MergeOutcome) -> Self {
        match outcome {
            contract::MergeOutcome::Created => Self::Created,
            contract::MergeOutcome::Merged => Self::Merged,
        }
    }
}

impl From<contract::Merged<contract::ComingTableProduct>> for IngestResponse {
    fn from(merged: contract::Merged<contract::ComingTableProduct>) -> Self {
        Self {
            line: merged.record.into(),
            outcome: merged.outcome.into(),
        }
    }
}

// ===== Stock conversions =====

impl From<contract::Remain> for RemainDto {
    fn from(remain: contract::Remain) -> Self {
        Self {
            id: remain.id,
            branch_id: remain.branch_id,
            category_id: remain.category_id,
            name: remain.name,
            price: remain.price,
            barcode: remain.barcode,
            count: remain.count,
            total_price: remain.total_price,
            created_at: remain.created_at,
            updated_at: remain.updated_at,
        }
    }
}

impl From<RemainRequest> for contract::RemainInput {
    fn from(req: RemainRequest) -> Self {
        Self {
            branch_id: req.branch_id,
            category_id: req.category_id,
            name: req.name,
            price: req.price,
            barcode: req.barcode,
            count: req.count,
        }
    }
}

impl From<contract::FinalizeReport> for FinalizeResponse {
    fn from(report: contract::FinalizeReport) -> Self {
        Self {
            coming_table_id: report.coming_table_id,
            branch_id: report.branch_id,
            status: ShipmentStatusDto::Finished,
            remains: report
                .remains
                .into_iter()
                .map(|merged| RemainMergeDto {
                    remain: merged.record.into(),
                    outcome: merged.outcome.into(),
                })
                .collect(),
        }
    }
}

// ===== Query conversions =====

impl From<ListQuery> for contract::BranchFilter {
    fn from(query: ListQuery) -> Self {
        Self {
            search: query.search,
        }
    }
}

impl From<ListQuery> for contract::ProductFilter {
    fn from(query: ListQuery) -> Self {
        Self {
            search: query.search,
        }
    }
}

impl From<CategoryListQuery> for contract::CategoryFilter {
    fn from(query: CategoryListQuery) -> Self {
        Self {
            search: query.search,
            parent_id: query.parent_id,
        }
    }
}

impl From<ComingTableListQuery> for contract::ComingTableFilter {
    fn from(query: ComingTableListQuery) -> Self {
        Self {
            search: query.search,
            branch_id: query.branch_id,
        }
    }
}

impl From<LineListQuery> for contract::ComingTableProductFilter {
    fn from(query: LineListQuery) -> Self {
        Self {
            search: query.search,
            coming_table_id: query.coming_table_id,
        }
    }
}

impl From<RemainListQuery> for contract::RemainFilter {
    fn from(query: RemainListQuery) -> Self {
        Self {
            search: query.search,
            branch_id: query.branch_id,
            category_id: query.category_id,
        }
    }
}

/// Build a page request from optional `page`/`limit` query values.
///
/// `None` when both are absent so the service applies its defaults.
pub fn page_request(
    page: Option<u64>,
    limit: Option<u64>,
    default_page_size: u64,
) -> Option<contract::PageRequest> {
    if page.is_none() && limit.is_none() {
        return None;
    }
    Some(contract::PageRequest {
        page: page.unwrap_or(1),
        page_size: limit.unwrap_or(default_page_size),
    })
}
