//! HTTP request handlers - thin layer that delegates to domain service

use super::{
    dto::*,
    error::{map_rejection, Problem},
    mapper::page_request,
};
use crate::domain::Service;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query,
    },
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

type ApiResult<T> = Result<T, Problem>;

fn id_of(path: Result<Path<Uuid>, PathRejection>) -> ApiResult<Uuid> {
    path.map(|Path(id)| id).map_err(map_rejection)
}

fn body_of<T>(json: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    json.map(|Json(body)| body).map_err(map_rejection)
}

fn query_of<T>(query: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    query.map(|Query(q)| q).map_err(map_rejection)
}

fn created(id: Uuid) -> (StatusCode, Json<IdResponse>) {
    (StatusCode::CREATED, Json(IdResponse { id }))
}

// ===== Branch Handlers =====

pub async fn create_branch(
    Extension(service): Extension<Arc<Service>>,
    json: Result<Json<BranchRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<IdResponse>)> {
    let id = service.create_branch(body_of(json)?.into()).await?;
    Ok(created(id))
}

pub async fn get_branch(
    Extension(service): Extension<Arc<Service>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<BranchDto>> {
    let branch = service.get_branch(id_of(path)?).await?;
    Ok(Json(branch.into()))
}

pub async fn list_branches(
    Extension(service): Extension<Arc<Service>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<BranchListResponse>> {
    let query = query_of(query)?;
    let page = page_request(query.page, query.limit, service.config().default_page_size);
    let result = service.list_branches(page, query.into()).await?;

    Ok(Json(BranchListResponse {
        items: result.items.into_iter().map(Into::into).collect(),
        total: result.total,
    }))
}

pub async fn update_branch(
    Extension(service): Extension<Arc<Service>>,
    path: Result<Path<Uuid>, PathRejection>,
    json: Result<Json<BranchRequest>, JsonRejection>,
) -> ApiResult<Json<IdResponse>> {
    let id = service
        .update_branch(id_of(path)?, body_of(json)?.into())
        .await?;
    Ok(Json(IdResponse { id }))
}

pub async fn delete_branch(
    Extension(service): Extension<Arc<Service>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<IdResponse>> {
    let id = service.delete_branch(id_of(path)?).await?;
    Ok(Json(IdResponse { id }))
}

// ===== Category Handlers =====

pub async fn create_category(
    Extension(service): Extension<Arc<Service>>,
    json: Result<Json<CategoryRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<IdResponse>)> {
    let id = service.create_category(body_of(json)?.into()).await?;
    Ok(created(id))
}

pub async fn get_category(
    Extension(service): Extension<Arc<Service>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<CategoryDto>> {
    let category = service.get_category(id_of(path)?).await?;
    Ok(Json(category.into()))
}

pub async fn list_categories(
    Extension(service): Extension<Arc<Service>>,
    query: Result<Query<CategoryListQuery>, QueryRejection>,
) -> ApiResult<Json<CategoryListResponse>> {
    let query = query_of(query)?;
    let page = page_request(query.page, query.limit, service.config().default_page_size);
    let result = service.list_categories(page, query.into()).await?;

    Ok(Json(CategoryListResponse {
        items: result.items.into_iter().map(Into::into).collect(),
        total: result.total,
    }))
}

pub async fn update_category(
    Extension(service): Extension<Arc<Service>>,
    path: Result<Path<Uuid>, PathRejection>,
    json: Result<Json<CategoryRequest>, JsonRejection>,
) -> ApiResult<Json<IdResponse>> {
    let id = service
        .update_category(id_of(path)?, body_of(json)?.into())
        .await?;
    Ok(Json(IdResponse { id }))
}

pub async fn delete_category(
    Extension(service): Extension<Arc<Service>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<IdResponse>> {
    let id = service.delete_category(id_of(path)?).await?;
    Ok(Json(IdResponse { id }))
}

// ===== Product Handlers =====

pub async fn create_product(
    Extension(service): Extension<Arc<Service>>,
    json: Result<Json<ProductRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<IdResponse>)> {
    let id = service.create_product(body_of(json)?.into()).await?;
    Ok(created(id))
}

pub async fn get_product(
    Extension(service): Extension<Arc<Service>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<ProductDto>> {
    let product = service.get_product(id_of(path)?).await?;
    Ok(Json(product.into()))
}

pub async fn list_products(
    Extension(service): Extension<Arc<Service>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<ProductListResponse>> {
    let query = query_of(query)?;
    let page = page_request(query.page, query.limit, service.config().default_page_size);
    let result = service.list_products(page, query.into()).await?;

    Ok(Json(ProductListResponse {
        items: result.items.into_iter().map(Into::into).collect(),
        total: result.total,
    }))
}

pub async fn update_product(
    Extension(service): Extension<Arc<Service>>,
    path: Result<Path<Uuid>, PathRejection>,
    json: Result<Json<ProductRequest>, JsonRejection>,
) -> ApiResult<Json<IdResponse>> {
    let id = service
        .update_product(id_of(path)?, body_of(json)?.into())
        .await?;
    Ok(Json(IdResponse { id }))
}

pub async fn delete_product(
    Extension(service): Extension<Arc<Service>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<IdResponse>> {
    let id = service.delete_product(id_of(path)?).await?;
    Ok(Json(IdResponse { id }))
}

// ===== Coming Table Handlers =====

pub async fn create_coming_table(
    Extension(service): Extension<Arc<Service>>,
    json: Result<Json<ComingTableRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<IdResponse>)> {
    let id = service.create_coming_table(body_of(json)?.into()).await?;
    Ok(created(id))
}

pub async fn get_coming_table(
    Extension(service): Extension<Arc<Service>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<ComingTableDto>> {
    let table = service.get_coming_table(id_of(path)?).await?;
    Ok(Json(table.into()))
}

pub async fn list_coming_tables(
    Extension(service): Extension<Arc<Service>>,
    query: Result<Query<ComingTableListQuery>, QueryRejection>,
) -> ApiResult<Json<ComingTableListResponse>> {
    let query = query_of(query)?;
    let page = page_request(query.page, query.limit, service.config().default_page_size);
    let result = service.list_coming_tables(page, query.into()).await?;

    Ok(Json(ComingTableListResponse {
        items: result.items.into_iter().map(Into::into).collect(),
        total: result.total,
    }))
}

pub async fn update_coming_table(
    Extension(service): Extension<Arc<Service>>,
    path: Result<Path<Uuid>, PathRejection>,
    json: Result<Json<ComingTableRequest>, JsonRejection>,
) -> ApiResult<Json<IdResponse>> {
    let id = service
        .update_coming_table(id_of(path)?, body_of(json)?.into())
        .await?;
    Ok(Json(IdResponse { id }))
}

pub async fn delete_coming_table(
    Extension(service): Extension<Arc<Service>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<IdResponse>> {
    let id = service.delete_coming_table(id_of(path)?).await?;
    Ok(Json(IdResponse { id }))
}

/// Finalize a shipment into branch stock
pub async fn do_income(
    Extension(service): Extension<Arc<Service>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<FinalizeResponse>> {
    let report = service.finalize_shipment(id_of(path)?).await?;
    Ok(Json(report.into()))
}

// ===== Coming Table Product Handlers =====

/// Record a barcode scan; 201 for a new line, 200 when merged into an existing one
pub async fn ingest_line(
    Extension(service): Extension<Arc<Service>>,
    json: Result<Json<IngestRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<IngestResponse>)> {
    let merged = service.ingest_line(body_of(json)?.into()).await?;
    let status = match merged.outcome {
        crate::contract::MergeOutcome::Created => StatusCode::CREATED,
        crate::contract::MergeOutcome::Merged => StatusCode::OK,
    };
    Ok((status, Json(merged.into())))
}

pub async fn get_line(
    Extension(service): Extension<Arc<Service>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<LineDto>> {
    let line = service.get_line(id_of(path)?).await?;
    Ok(Json(line.into()))
}

pub async fn list_lines(
    Extension(service): Extension<Arc<Service>>,
    query: Result<Query<LineListQuery>, QueryRejection>,
) -> ApiResult<Json<LineListResponse>> {
    let query = query_of(query)?;
    let page = page_request(query.page, query.limit, service.config().default_page_size);
    let result = service.list_lines(page, query.into()).await?;

    Ok(Json(LineListResponse {
        items: result.items.into_iter().map(Into::into).collect(),
        total: result.total,
    }))
}

pub async fn check_line(
    Extension(service): Extension<Arc<Service>>,
    query: Result<Query<LineCheckQuery>, QueryRejection>,
) -> ApiResult<Json<LineDto>> {
    let query = query_of(query)?;
    let line = service
        .check_existing_line(query.coming_table_id, &query.barcode)
        .await?;
    Ok(Json(line.into()))
}

pub async fn update_line(
    Extension(service): Extension<Arc<Service>>,
    path: Result<Path<Uuid>, PathRejection>,
    json: Result<Json<LineRequest>, JsonRejection>,
) -> ApiResult<Json<IdResponse>> {
    let id = service
        .update_line(id_of(path)?, body_of(json)?.into())
        .await?;
    Ok(Json(IdResponse { id }))
}

pub async fn delete_line(
    Extension(service): Extension<Arc<Service>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<IdResponse>> {
    let id = service.delete_line(id_of(path)?).await?;
    Ok(Json(IdResponse { id }))
}

// ===== Remain Handlers =====

pub async fn create_remain(
    Extension(service): Extension<Arc<Service>>,
    json: Result<Json<RemainRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<IdResponse>)> {
    let id = service.create_remain(body_of(json)?.into()).await?;
    Ok(created(id))
}

pub async fn get_remain(
    Extension(service): Extension<Arc<Service>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<RemainDto>> {
    let remain = service.get_remain(id_of(path)?).await?;
    Ok(Json(remain.into()))
}

pub async fn list_remains(
    Extension(service): Extension<Arc<Service>>,
    query: Result<Query<RemainListQuery>, QueryRejection>,
) -> ApiResult<Json<RemainListResponse>> {
    let query = query_of(query)?;
    let page = page_request(query.page, query.limit, service.config().default_page_size);
    let result = service.list_remains(page, query.into()).await?;

    Ok(Json(RemainListResponse {
        items: result.items.into_iter().map(Into::into).collect(),
        total: result.total,
    }))
}

pub async fn check_remain(
    Extension(service): Extension<Arc<Service>>,
    query: Result<Query<RemainCheckQuery>, QueryRejection>,
) -> ApiResult<Json<RemainDto>> {
    let query = query_of(query)?;
    let remain = service.check_remain(query.branch_id, &query.barcode).await?;
    Ok(Json(remain.into()))
}

pub async fn update_remain(
    Extension(service): Extension<Arc<Service>>,
    path: Result<Path<Uuid>, PathRejection>,
    json: Result<Json<RemainRequest>, JsonRejection>,
) -> ApiResult<Json<IdResponse>> {
    let id = service
        .update_remain(id_of(path)?, body_of(json)?.into())
        .await?;
    Ok(Json(IdResponse { id }))
}

pub async fn delete_remain(
    Extension(service): Extension<Arc<Service>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<IdResponse>> {
    let id = service.delete_remain(id_of(path)?).await?;
    Ok(Json(IdResponse { id }))
}
