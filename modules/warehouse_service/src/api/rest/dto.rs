//! REST DTOs with serde derives for HTTP API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// ===== Common DTOs =====

/// Identifier of the affected row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IdResponse {
    pub id: Uuid,
}

// ===== Branch DTOs =====

/// Branch response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BranchDto {
    pub id: Uuid,
    #[schema(example = "Central warehouse")]
    pub name: String,
    pub address: String,
    #[schema(example = "+998901234567")]
    pub phone: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Branch create/update request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BranchRequest {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BranchListResponse {
    pub items: Vec<BranchDto>,
    pub total: u64,
}

// ===== Category DTOs =====

/// Category response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryDto {
    pub id: Uuid,
    pub name: String,
    /// Parent category; absent for a root category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CategoryRequest {
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryListResponse {
    pub items: Vec<CategoryDto>,
    pub total: u64,
}

// ===== Product DTOs =====

/// Catalog product response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductDto {
    pub id: Uuid,
    pub name: String,
    #[schema(example = 9.0)]
    pub price: f64,
    #[schema(example = "4780000000123")]
    pub barcode: String,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProductRequest {
    pub name: String,
    pub price: f64,
    pub barcode: String,
    pub category_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductListResponse {
    pub items: Vec<ProductDto>,
    pub total: u64,
}

// ===== Coming Table DTOs =====

/// Shipment status on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatusDto {
    InProcess,
    Finished,
}

/// Shipment header response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComingTableDto {
    pub id: Uuid,
    /// External shipment reference
    #[schema(example = "INV-2024-0042")]
    pub coming_id: String,
    pub branch_id: Uuid,
    pub date_time: DateTime<Utc>,
    pub status: ShipmentStatusDto,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Shipment header create/update request. Status cannot be set here.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ComingTableRequest {
    pub coming_id: String,
    pub branch_id: Uuid,
    /// Defaults to the time the request is handled
    #[serde(default)]
    pub date_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComingTableListResponse {
    pub items: Vec<ComingTableDto>,
    pub total: u64,
}

// ===== Coming Table Product DTOs =====

/// Shipment line response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LineDto {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub price: f64,
    pub barcode: String,
    pub count: f64,
    pub total_price: f64,
    pub coming_table_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Barcode scan request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct IngestRequest {
    pub coming_table_id: Uuid,
    #[schema(example = "4780000000123")]
    pub barcode: String,
    #[schema(example = 3.0)]
    pub count: f64,
}

/// Direct line update request; total_price is recomputed
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LineRequest {
    pub category_id: Uuid,
    pub name: String,
    pub price: f64,
    pub barcode: String,
    pub count: f64,
    pub coming_table_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MergeOutcomeDto {
    Created,
    Merged,
}

/// Result of a barcode scan
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IngestResponse {
    pub line: LineDto,
    pub outcome: MergeOutcomeDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LineListResponse {
    pub items: Vec<LineDto>,
    pub total: u64,
}

// ===== Remain DTOs =====

/// Stock balance response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RemainDto {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub price: f64,
    pub barcode: String,
    pub count: f64,
    pub total_price: f64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RemainRequest {
    pub branch_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub price: f64,
    pub barcode: String,
    pub count: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RemainListResponse {
    pub items: Vec<RemainDto>,
    pub total: u64,
}

/// One remain touched by a finalize
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RemainMergeDto {
    pub remain: RemainDto,
    pub outcome: MergeOutcomeDto,
}

/// Result of finalizing a shipment
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FinalizeResponse {
    pub coming_table_id: Uuid,
    pub branch_id: Uuid,
    pub status: ShipmentStatusDto,
    pub remains: Vec<RemainMergeDto>,
}

// ===== Query parameters =====

/// Paging and search shared by every list endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComingTableListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub branch_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LineListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub coming_table_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemainListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub branch_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineCheckQuery {
    pub coming_table_id: Uuid,
    pub barcode: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemainCheckQuery {
    pub branch_id: Uuid,
    pub barcode: String,
}
