//! SeaORM repository implementations

use crate::contract::{
    Branch, BranchFilter, BranchInput, Category, CategoryFilter, CategoryInput, ComingTable,
    ComingTableFilter, ComingTableInput, ComingTableProduct, ComingTableProductFilter,
    ComingTableProductInput, Page, PageRequest, Product, ProductFilter, ProductInput,
    ProductSnapshot, Remain, RemainFilter, RemainInput, ShipmentStatus,
};
use crate::domain::repository::{
    BranchRepository, CategoryRepository, ComingTableProductRepository, ComingTableRepository,
    DuplicateKey, ProductRepository, RemainRepository,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    prelude::Expr,
    sea_query::{BinOper, Func, LikeExpr, SimpleExpr},
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbBackend, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, SqlErr,
};
use std::sync::Arc;
use uuid::Uuid;

use super::entity::{branch, category, coming_table, coming_table_product, product, remain};

/// Case-insensitive, literal substring match on a column.
///
/// SQLite's `LOWER` folds ASCII only, so there the term is expanded into a
/// case-class `GLOB` pattern instead. Elsewhere `LOWER(col) LIKE` with the
/// wildcards in the term escaped.
pub(crate) fn contains_ci<C: ColumnTrait>(
    backend: DbBackend,
    column: C,
    term: &str,
) -> SimpleExpr {
    match backend {
        DbBackend::Sqlite => {
            Expr::col(column).binary(BinOper::Custom("GLOB"), Expr::val(glob_contains(term)))
        }
        _ => Expr::expr(Func::lower(Expr::col(column)))
            .like(LikeExpr::new(like_contains(&term.to_lowercase())).escape('\\')),
    }
}

/// `%term%` with `\`, `%` and `_` escaped
fn like_contains(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// `*term*` where every cased letter becomes a `[xX]` class and glob
/// metacharacters are bracketed
fn glob_contains(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() * 4 + 2);
    pattern.push('*');
    for ch in term.chars() {
        match ch {
            '*' | '?' | '[' => {
                pattern.push('[');
                pattern.push(ch);
                pattern.push(']');
            }
            _ => {
                let mut variants = vec![ch];
                for folded in [single_char(ch.to_lowercase()), single_char(ch.to_uppercase())]
                    .into_iter()
                    .flatten()
                {
                    if !variants.contains(&folded) {
                        variants.push(folded);
                    }
                }
                if variants.len() == 1 {
                    pattern.push(ch);
                } else {
                    pattern.push('[');
                    pattern.extend(variants);
                    pattern.push(']');
                }
            }
        }
    }
    pattern.push('*');
    pattern
}

/// The mapped char when a case mapping yields exactly one
fn single_char(mut mapped: impl Iterator<Item = char>) -> Option<char> {
    let first = mapped.next()?;
    mapped.next().is_none().then_some(first)
}

/// Report a unique-index violation as [`DuplicateKey`] naming `what`
fn unique_violation(what: &'static str) -> impl FnOnce(DbErr) -> anyhow::Error {
    move |err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => DuplicateKey(what).into(),
        _ => err.into(),
    }
}

/// Run `query` as one page and count every matching row
async fn fetch_page<E, T>(
    db: &DatabaseConnection,
    query: Select<E>,
    page: PageRequest,
) -> Result<Page<T>>
where
    E: EntityTrait,
    E::Model: Into<T> + Send + Sync + 'static,
    T: Send,
{
    let total = query.clone().count(db).await?;
    let items = query
        .offset(page.offset())
        .limit(page.page_size)
        .all(db)
        .await?;

    Ok(Page {
        items: items.into_iter().map(Into::into).collect(),
        total,
    })
}

// ===== Branch Repository =====

pub struct SeaOrmBranchRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmBranchRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BranchRepository for SeaOrmBranchRepository {
    async fn create(&self, input: &BranchInput) -> Result<Branch> {
        let mut active: branch::ActiveModel = input.into();
        active.id = Set(Uuid::new_v4());
        active.created_at = Set(Utc::now());
        active.updated_at = Set(None);

        Ok(active.insert(&*self.db).await?.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Branch>> {
        let result = branch::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(Into::into))
    }

    async fn list(&self, page: PageRequest, filter: &BranchFilter) -> Result<Page<Branch>> {
        let mut query = branch::Entity::find();
        let backend = self.db.get_database_backend();
        if let Some(term) = &filter.search {
            query = query.filter(contains_ci(backend, branch::Column::Name, term));
        }

        let query = query
            .order_by_desc(branch::Column::CreatedAt)
            .order_by_desc(branch::Column::Id);
        fetch_page(&self.db, query, page).await
    }

    async fn update(&self, id: Uuid, input: &BranchInput) -> Result<bool> {
        let mut active: branch::ActiveModel = input.into();
        active.updated_at = Set(Some(Utc::now()));

        let result = branch::Entity::update_many()
            .set(active)
            .filter(branch::Column::Id.eq(id))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = branch::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

// ===== Category Repository =====

pub struct SeaOrmCategoryRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmCategoryRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for SeaOrmCategoryRepository {
    async fn create(&self, input: &CategoryInput) -> Result<Category> {
        let mut active: category::ActiveModel = input.into();
        active.id = Set(Uuid::new_v4());
        active.created_at = Set(Utc::now());
        active.updated_at = Set(None);

        Ok(active.insert(&*self.db).await?.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>> {
        let result = category::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(Into::into))
    }

    async fn list(&self, page: PageRequest, filter: &CategoryFilter) -> Result<Page<Category>> {
        let mut query = category::Entity::find();
        let backend = self.db.get_database_backend();
        if let Some(term) = &filter.search {
            query = query.filter(contains_ci(backend, category::Column::Name, term));
        }
        if let Some(parent_id) = filter.parent_id {
            query = query.filter(category::Column::ParentId.eq(parent_id));
        }

        let query = query
            .order_by_desc(category::Column::CreatedAt)
            .order_by_desc(category::Column::Id);
        fetch_page(&self.db, query, page).await
    }

    async fn update(&self, id: Uuid, input: &CategoryInput) -> Result<bool> {
        let mut active: category::ActiveModel = input.into();
        active.updated_at = Set(Some(Utc::now()));

        let result = category::Entity::update_many()
            .set(active)
            .filter(category::Column::Id.eq(id))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = category::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

// ===== Product Repository =====

pub struct SeaOrmProductRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmProductRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn create(&self, input: &ProductInput) -> Result<Product> {
        let mut active: product::ActiveModel = input.into();
        active.id = Set(Uuid::new_v4());
        active.created_at = Set(Utc::now());
        active.updated_at = Set(None);

        Ok(active.insert(&*self.db).await?.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>> {
        let result = product::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(Into::into))
    }

    async fn list(&self, page: PageRequest, filter: &ProductFilter) -> Result<Page<Product>> {
        let mut query = product::Entity::find();
        let backend = self.db.get_database_backend();
        if let Some(term) = &filter.search {
            query = query.filter(
                Condition::any()
                    .add(contains_ci(backend, product::Column::Name, term))
                    .add(contains_ci(backend, product::Column::Barcode, term)),
            );
        }

        let query = query
            .order_by_desc(product::Column::CreatedAt)
            .order_by_desc(product::Column::Id);
        fetch_page(&self.db, query, page).await
    }

    async fn update(&self, id: Uuid, input: &ProductInput) -> Result<bool> {
        let mut active: product::ActiveModel = input.into();
        active.updated_at = Set(Some(Utc::now()));

        let result = product::Entity::update_many()
            .set(active)
            .filter(product::Column::Id.eq(id))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = product::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn find_by_barcode_within_shipment(
        &self,
        barcode: &str,
        coming_table_id: Uuid,
    ) -> Result<Option<ProductSnapshot>> {
        let shipment = coming_table::Entity::find_by_id(coming_table_id)
            .one(&*self.db)
            .await?;
        if shipment.is_none() {
            return Ok(None);
        }

        let result = product::Entity::find()
            .filter(product::Column::Barcode.eq(barcode))
            .order_by_desc(product::Column::CreatedAt)
            .order_by_desc(product::Column::Id)
            .one(&*self.db)
            .await?;

        Ok(result.map(Into::into))
    }
}

// ===== Coming Table Repository =====

pub struct SeaOrmComingTableRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmComingTableRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ComingTableRepository for SeaOrmComingTableRepository {
    async fn create(&self, input: &ComingTableInput) -> Result<ComingTable> {
        let mut active: coming_table::ActiveModel = input.into();
        active.id = Set(Uuid::new_v4());
        active.status = Set(coming_table::Status::InProcess);
        active.created_at = Set(Utc::now());
        active.updated_at = Set(None);

        Ok(active.insert(&*self.db).await?.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ComingTable>> {
        let result = coming_table::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(Into::into))
    }

    async fn list(
        &self,
        page: PageRequest,
        filter: &ComingTableFilter,
    ) -> Result<Page<ComingTable>> {
        let mut query = coming_table::Entity::find();
        let backend = self.db.get_database_backend();
        if let Some(term) = &filter.search {
            query = query.filter(contains_ci(backend, coming_table::Column::ComingId, term));
        }
        if let Some(branch_id) = filter.branch_id {
            query = query.filter(coming_table::Column::BranchId.eq(branch_id));
        }

        let query = query
            .order_by_desc(coming_table::Column::CreatedAt)
            .order_by_desc(coming_table::Column::Id);
        fetch_page(&self.db, query, page).await
    }

    async fn update(&self, id: Uuid, input: &ComingTableInput) -> Result<bool> {
        let mut active: coming_table::ActiveModel = input.into();
        active.updated_at = Set(Some(Utc::now()));

        let result = coming_table::Entity::update_many()
            .set(active)
            .filter(coming_table::Column::Id.eq(id))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = coming_table::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn get_status(&self, id: Uuid) -> Result<Option<(ShipmentStatus, Uuid)>> {
        let result = coming_table::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(|row| (row.status.into(), row.branch_id)))
    }

    async fn mark_finished(&self, id: Uuid) -> Result<bool> {
        let result = coming_table::Entity::update_many()
            .col_expr(
                coming_table::Column::Status,
                Expr::value(coming_table::Status::Finished),
            )
            .col_expr(coming_table::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(coming_table::Column::Id.eq(id))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}

// ===== Coming Table Product Repository =====

pub struct SeaOrmComingTableProductRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmComingTableProductRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ComingTableProductRepository for SeaOrmComingTableProductRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ComingTableProduct>> {
        let result = coming_table_product::Entity::find_by_id(id)
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn list(
        &self,
        page: PageRequest,
        filter: &ComingTableProductFilter,
    ) -> Result<Page<ComingTableProduct>> {
        let mut query = coming_table_product::Entity::find();
        let backend = self.db.get_database_backend();
        if let Some(term) = &filter.search {
            query = query.filter(contains_ci(
                backend,
                coming_table_product::Column::Barcode,
                term,
            ));
        }
        if let Some(coming_table_id) = filter.coming_table_id {
            query = query.filter(coming_table_product::Column::ComingTableId.eq(coming_table_id));
        }

        let query = query
            .order_by_desc(coming_table_product::Column::CreatedAt)
            .order_by_desc(coming_table_product::Column::Id);
        fetch_page(&self.db, query, page).await
    }

    async fn update(&self, id: Uuid, input: &ComingTableProductInput) -> Result<bool> {
        let mut active: coming_table_product::ActiveModel = input.into();
        active.updated_at = Set(Some(Utc::now()));

        let result = coming_table_product::Entity::update_many()
            .set(active)
            .filter(coming_table_product::Column::Id.eq(id))
            .exec(&*self.db)
            .await
            .map_err(unique_violation("a line for this shipment and barcode"))?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = coming_table_product::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn find_line(
        &self,
        coming_table_id: Uuid,
        barcode: &str,
    ) -> Result<Option<ComingTableProduct>> {
        let result = coming_table_product::Entity::find()
            .filter(coming_table_product::Column::ComingTableId.eq(coming_table_id))
            .filter(coming_table_product::Column::Barcode.eq(barcode))
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn list_by_shipment(&self, coming_table_id: Uuid) -> Result<Vec<ComingTableProduct>> {
        let results = coming_table_product::Entity::find()
            .filter(coming_table_product::Column::ComingTableId.eq(coming_table_id))
            .order_by_asc(coming_table_product::Column::CreatedAt)
            .order_by_asc(coming_table_product::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(results.into_iter().map(Into::into).collect())
    }
}

// ===== Remain Repository =====

pub struct SeaOrmRemainRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmRemainRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RemainRepository for SeaOrmRemainRepository {
    async fn create(&self, input: &RemainInput) -> Result<Remain> {
        let mut active: remain::ActiveModel = input.into();
        active.id = Set(Uuid::new_v4());
        active.created_at = Set(Utc::now());
        active.updated_at = Set(None);

        let row = active
            .insert(&*self.db)
            .await
            .map_err(unique_violation("a remain for this branch and barcode"))?;
        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Remain>> {
        let result = remain::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(Into::into))
    }

    async fn list(&self, page: PageRequest, filter: &RemainFilter) -> Result<Page<Remain>> {
        let mut query = remain::Entity::find();
        let backend = self.db.get_database_backend();
        if let Some(term) = &filter.search {
            query = query.filter(contains_ci(backend, remain::Column::Barcode, term));
        }
        if let Some(branch_id) = filter.branch_id {
            query = query.filter(remain::Column::BranchId.eq(branch_id));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(remain::Column::CategoryId.eq(category_id));
        }

        let query = query
            .order_by_desc(remain::Column::CreatedAt)
            .order_by_desc(remain::Column::Id);
        fetch_page(&self.db, query, page).await
    }

    async fn update(&self, id: Uuid, input: &RemainInput) -> Result<bool> {
        let mut active: remain::ActiveModel = input.into();
        active.updated_at = Set(Some(Utc::now()));

        let result = remain::Entity::update_many()
            .set(active)
            .filter(remain::Column::Id.eq(id))
            .exec(&*self.db)
            .await
            .map_err(unique_violation("a remain for this branch and barcode"))?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = remain::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn check_remain(&self, branch_id: Uuid, barcode: &str) -> Result<Option<Remain>> {
        let result = remain::Entity::find()
            .filter(remain::Column::BranchId.eq(branch_id))
            .filter(remain::Column::Barcode.eq(barcode))
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_contains("milk"), "%milk%");
        assert_eq!(like_contains("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn glob_pattern_folds_case_and_brackets_metachars() {
        assert_eq!(glob_contains("a1"), "*[aA]1*");
        assert_eq!(glob_contains("Äp"), "*[Ää][pP]*");
        assert_eq!(glob_contains("*?["), "*[*][?][[]*");
        assert_eq!(glob_contains("%_"), "*%_*");
    }
}
