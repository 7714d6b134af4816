//! Input validation for warehouse entities

use crate::config::Config;
use crate::contract::{
    BranchInput, CategoryInput, ComingTableInput, ComingTableProductInput, IngestLine,
    PageRequest, ProductInput, RemainInput, WarehouseError,
};

/// Resolve optional page parameters against the configured defaults.
///
/// Both values must be positive, `page_size` may not exceed `max_page_size`
/// and the resulting row offset must be representable.
pub fn resolve_page(
    page: Option<PageRequest>,
    config: &Config,
) -> Result<PageRequest, WarehouseError> {
    let page = page.unwrap_or(PageRequest {
        page: 1,
        page_size: config.default_page_size,
    });

    if page.page == 0 {
        return Err(WarehouseError::validation("page must be a positive integer"));
    }
    if page.page_size == 0 {
        return Err(WarehouseError::validation("limit must be a positive integer"));
    }
    if page.page_size > config.max_page_size {
        return Err(WarehouseError::validation(format!(
            "limit must not exceed {}",
            config.max_page_size
        )));
    }
    // row offset must fit the store's signed 64-bit OFFSET
    let offset = (page.page - 1).checked_mul(page.page_size);
    if !offset.is_some_and(|offset| i64::try_from(offset).is_ok()) {
        return Err(WarehouseError::validation(format!(
            "page {} is out of range",
            page.page
        )));
    }

    Ok(page)
}

/// Normalize an optional search term; blank terms mean "no filter"
pub fn normalize_search(search: Option<String>) -> Option<String> {
    search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn require_text(field: &str, value: &str) -> Result<(), WarehouseError> {
    if value.trim().is_empty() {
        return Err(WarehouseError::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_price(value: f64) -> Result<(), WarehouseError> {
    if !value.is_finite() || value < 0.0 {
        return Err(WarehouseError::validation(format!(
            "price must be a non-negative number, got {value}"
        )));
    }
    Ok(())
}

fn require_count(value: f64) -> Result<(), WarehouseError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(WarehouseError::validation(format!(
            "count must be a positive number, got {value}"
        )));
    }
    Ok(())
}

pub fn validate_branch(input: &BranchInput) -> Result<(), WarehouseError> {
    require_text("name", &input.name)
}

pub fn validate_category(input: &CategoryInput) -> Result<(), WarehouseError> {
    require_text("name", &input.name)
}

pub fn validate_product(input: &ProductInput) -> Result<(), WarehouseError> {
    require_text("name", &input.name)?;
    require_text("barcode", &input.barcode)?;
    require_price(input.price)
}

pub fn validate_coming_table(input: &ComingTableInput) -> Result<(), WarehouseError> {
    require_text("coming_id", &input.coming_id)
}

pub fn validate_ingest(line: &IngestLine) -> Result<(), WarehouseError> {
    require_text("barcode", &line.barcode)?;
    require_count(line.count)
}

pub fn validate_line(input: &ComingTableProductInput) -> Result<(), WarehouseError> {
    require_text("name", &input.name)?;
    require_text("barcode", &input.barcode)?;
    require_price(input.price)?;
    require_count(input.count)
}

pub fn validate_remain(input: &RemainInput) -> Result<(), WarehouseError> {
    require_text("name", &input.name)?;
    require_text("barcode", &input.barcode)?;
    require_price(input.price)?;
    // a balance may legitimately drop to zero
    if !input.count.is_finite() || input.count < 0.0 {
        return Err(WarehouseError::validation(format!(
            "count must be a non-negative number, got {}",
            input.count
        )));
    }
    Ok(())
}
