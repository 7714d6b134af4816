//! Route registration and OpenAPI document

use super::{dto::*, handlers};
use crate::domain::Service;
use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;
use utoipa::OpenApi;

/// OpenAPI components for the warehouse REST surface
#[derive(OpenApi)]
#[openapi(
    info(title = "Warehouse Service", description = "Branches, catalog, shipments and stock"),
    components(schemas(
        IdResponse,
        BranchDto,
        BranchRequest,
        BranchListResponse,
        CategoryDto,
        CategoryRequest,
        CategoryListResponse,
        ProductDto,
        ProductRequest,
        ProductListResponse,
        ShipmentStatusDto,
        ComingTableDto,
        ComingTableRequest,
        ComingTableListResponse,
        LineDto,
        LineRequest,
        LineListResponse,
        IngestRequest,
        IngestResponse,
        MergeOutcomeDto,
        RemainDto,
        RemainRequest,
        RemainListResponse,
        RemainMergeDto,
        FinalizeResponse,
    ))
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Register all REST routes
pub fn register_routes(router: Router, service: Arc<Service>) -> anyhow::Result<Router> {
    let router = router
        // Branch endpoints
        .route(
            "/branch",
            post(handlers::create_branch).get(handlers::list_branches),
        )
        .route(
            "/branch/{id}",
            get(handlers::get_branch)
                .put(handlers::update_branch)
                .delete(handlers::delete_branch),
        )
        // Category endpoints
        .route(
            "/category",
            post(handlers::create_category).get(handlers::list_categories),
        )
        .route(
            "/category/{id}",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        // Product endpoints
        .route(
            "/product",
            post(handlers::create_product).get(handlers::list_products),
        )
        .route(
            "/product/{id}",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        // Shipment header endpoints
        .route(
            "/coming_table",
            post(handlers::create_coming_table).get(handlers::list_coming_tables),
        )
        .route(
            "/coming_table/{id}",
            get(handlers::get_coming_table)
                .put(handlers::update_coming_table)
                .delete(handlers::delete_coming_table),
        )
        // Shipment line endpoints
        .route(
            "/coming_table_product",
            post(handlers::ingest_line).get(handlers::list_lines),
        )
        .route("/coming_table_product/check", get(handlers::check_line))
        .route(
            "/coming_table_product/{id}",
            get(handlers::get_line)
                .put(handlers::update_line)
                .delete(handlers::delete_line),
        )
        // Reconciliation
        .route("/do_income/{coming_table_id}", post(handlers::do_income))
        // Remain endpoints
        .route(
            "/remain",
            post(handlers::create_remain).get(handlers::list_remains),
        )
        .route("/remain/check", get(handlers::check_remain))
        .route(
            "/remain/{id}",
            get(handlers::get_remain)
                .put(handlers::update_remain)
                .delete(handlers::delete_remain),
        )
        .route("/openapi.json", get(openapi_json))
        // Add service as extension for handlers
        .layer(Extension(service));

    Ok(router)
}
