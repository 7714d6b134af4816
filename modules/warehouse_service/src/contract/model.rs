//! Contract models for warehouse service
//!
//! These models are transport-agnostic and used for inter-module communication.
//! NO serde derives - these are pure domain models.

use chrono::{DateTime, Utc};
use uuid::Uuid;

// ===== Catalog =====

/// Warehouse branch
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Branch fields supplied on create and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchInput {
    pub name: String,
    pub address: String,
    pub phone: String,
}

/// Product category, optionally nested under a parent
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInput {
    pub name: String,
    pub parent_id: Option<Uuid>,
}

/// Catalog product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub barcode: String,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductInput {
    pub name: String,
    pub price: f64,
    pub barcode: String,
    pub category_id: Uuid,
}

/// Name/price/category copied from the catalog when a barcode is scanned.
///
/// Line items and remains keep this copy; later catalog edits never
/// rewrite it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSnapshot {
    pub name: String,
    pub price: f64,
    pub category_id: Uuid,
}

// ===== Shipments =====

/// Shipment status. Only `InProcess -> Finished` is legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShipmentStatus {
    InProcess,
    Finished,
}

impl ShipmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProcess => "in_process",
            Self::Finished => "finished",
        }
    }
}

/// Incoming shipment header ("coming table")
#[derive(Debug, Clone, PartialEq)]
pub struct ComingTable {
    pub id: Uuid,
    /// External shipment reference
    pub coming_id: String,
    pub branch_id: Uuid,
    pub date_time: DateTime<Utc>,
    pub status: ShipmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Header fields supplied on create and update. Status is never part of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComingTableInput {
    pub coming_id: String,
    pub branch_id: Uuid,
    pub date_time: DateTime<Utc>,
}

/// Shipment line item
#[derive(Debug, Clone, PartialEq)]
pub struct ComingTableProduct {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub price: f64,
    pub barcode: String,
    pub count: f64,
    pub total_price: f64,
    pub coming_table_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Direct line item update; `total_price` is recomputed from price and count.
#[derive(Debug, Clone, PartialEq)]
pub struct ComingTableProductInput {
    pub category_id: Uuid,
    pub name: String,
    pub price: f64,
    pub barcode: String,
    pub count: f64,
    pub coming_table_id: Uuid,
}

/// Barcode scan against a shipment
#[derive(Debug, Clone, PartialEq)]
pub struct IngestLine {
    pub coming_table_id: Uuid,
    pub barcode: String,
    pub count: f64,
}

// ===== Stock =====

/// Stock balance of one barcode at one branch
#[derive(Debug, Clone, PartialEq)]
pub struct Remain {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub price: f64,
    pub barcode: String,
    pub count: f64,
    pub total_price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Direct remain create/update; `total_price` is recomputed from price and count.
#[derive(Debug, Clone, PartialEq)]
pub struct RemainInput {
    pub branch_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub price: f64,
    pub barcode: String,
    pub count: f64,
}

// ===== Reconciliation results =====

/// Whether a merge-or-insert created a new row or accumulated into one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Created,
    Merged,
}

/// A row produced by merge-or-insert together with how it got there
#[derive(Debug, Clone, PartialEq)]
pub struct Merged<T> {
    pub record: T,
    pub outcome: MergeOutcome,
}

/// Result of finalizing a shipment
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizeReport {
    pub coming_table_id: Uuid,
    pub branch_id: Uuid,
    pub remains: Vec<Merged<Remain>>,
}

// ===== Listing =====

/// 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    pub fn offset(&self) -> u64 {
        (self.page.saturating_sub(1)).saturating_mul(self.page_size)
    }
}

/// One page of results plus the total number of matching rows
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchFilter {
    /// Case-insensitive substring of the name
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    pub search: Option<String>,
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Matches name or barcode
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComingTableFilter {
    /// Matches coming_id
    pub search: Option<String>,
    pub branch_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComingTableProductFilter {
    /// Matches barcode
    pub search: Option<String>,
    pub coming_table_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemainFilter {
    /// Matches barcode
    pub search: Option<String>,
    pub branch_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
}
