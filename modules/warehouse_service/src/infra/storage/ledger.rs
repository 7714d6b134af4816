//! Transactional merge-or-insert for shipment lines and branch remains

use crate::contract::{ComingTableProduct, FinalizeReport, MergeOutcome, Merged, Remain};
use crate::domain::repository::{Guarded, LineDraft, StockLedger};
use crate::domain::shipment::aggregate_lines;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    prelude::Expr,
    sea_query::{Alias, OnConflict},
    ActiveValue::Set,
    ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::entity::{coming_table, coming_table_product, remain};

/// `SET col = <table>.col + excluded.col` for an upsert
fn accumulate<E, C>(entity: E, column: C) -> sea_orm::sea_query::SimpleExpr
where
    E: sea_orm::sea_query::IntoIden + 'static,
    C: ColumnTrait,
{
    Expr::col((entity, column)).add(Expr::col((Alias::new("excluded"), column)))
}

/// Outcome of an upsert, read back from the `updated_at` it leaves behind
fn outcome_of(updated_at: Option<chrono::DateTime<Utc>>) -> MergeOutcome {
    if updated_at.is_some() {
        MergeOutcome::Merged
    } else {
        MergeOutcome::Created
    }
}

pub struct SeaOrmStockLedger {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmStockLedger {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Take the header's write lock inside `txn` by touching an open shipment.
    ///
    /// This is the first statement of the transaction, so SQLite acquires its
    /// writer lock (waiting out its busy timeout) before anything is read and
    /// Postgres holds the row lock until commit. Concurrent ingests and a
    /// finalize on the same shipment therefore serialise.
    async fn claim_open(txn: &DatabaseTransaction, coming_table_id: Uuid) -> Result<Guarded<()>> {
        let touched = coming_table::Entity::update_many()
            .col_expr(
                coming_table::Column::Status,
                Expr::col(coming_table::Column::Status).into(),
            )
            .filter(coming_table::Column::Id.eq(coming_table_id))
            .filter(coming_table::Column::Status.eq(coming_table::Status::InProcess))
            .exec(txn)
            .await?;
        if touched.rows_affected > 0 {
            return Ok(Guarded::Applied(()));
        }

        let exists = coming_table::Entity::find_by_id(coming_table_id)
            .one(txn)
            .await?
            .is_some();
        Ok(if exists {
            Guarded::ShipmentFinished
        } else {
            Guarded::ShipmentMissing
        })
    }
}

#[async_trait]
impl StockLedger for SeaOrmStockLedger {
    async fn merge_line(&self, draft: &LineDraft) -> Result<Guarded<Merged<ComingTableProduct>>> {
        let txn = self.db.begin().await?;

        match Self::claim_open(&txn, draft.coming_table_id).await? {
            Guarded::Applied(()) => {}
            Guarded::ShipmentMissing => {
                txn.rollback().await?;
                return Ok(Guarded::ShipmentMissing);
            }
            _ => {
                txn.rollback().await?;
                return Ok(Guarded::ShipmentFinished);
            }
        }

        let now = Utc::now();
        let mut active: coming_table_product::ActiveModel = draft.into();
        active.id = Set(Uuid::new_v4());
        active.created_at = Set(now);
        active.updated_at = Set(None);

        use coming_table_product::Column;
        let on_conflict = OnConflict::columns([Column::ComingTableId, Column::Barcode])
            .update_columns([Column::CategoryId, Column::Name, Column::Price])
            .value(Column::Count, accumulate(coming_table_product::Entity, Column::Count))
            .value(
                Column::TotalPrice,
                accumulate(coming_table_product::Entity, Column::TotalPrice),
            )
            .value(Column::UpdatedAt, Expr::value(now))
            .to_owned();

        coming_table_product::Entity::insert(active)
            .on_conflict(on_conflict)
            .exec_without_returning(&txn)
            .await?;

        let row = coming_table_product::Entity::find()
            .filter(Column::ComingTableId.eq(draft.coming_table_id))
            .filter(Column::Barcode.eq(draft.barcode.as_str()))
            .one(&txn)
            .await?
            .ok_or_else(|| anyhow!("line vanished after upsert"))?;

        txn.commit().await?;

        let outcome = outcome_of(row.updated_at);
        Ok(Guarded::Applied(Merged {
            record: row.into(),
            outcome,
        }))
    }

    async fn finalize(&self, coming_table_id: Uuid) -> Result<Guarded<FinalizeReport>> {
        let txn = self.db.begin().await?;
        let now = Utc::now();

        // Conditional flip; zero rows means missing or already finished
        let flipped = coming_table::Entity::update_many()
            .col_expr(
                coming_table::Column::Status,
                Expr::value(coming_table::Status::Finished),
            )
            .col_expr(coming_table::Column::UpdatedAt, Expr::value(now))
            .filter(coming_table::Column::Id.eq(coming_table_id))
            .filter(coming_table::Column::Status.eq(coming_table::Status::InProcess))
            .exec(&txn)
            .await?;

        let header = coming_table::Entity::find_by_id(coming_table_id)
            .one(&txn)
            .await?;
        let header = match (flipped.rows_affected, header) {
            (_, None) => {
                txn.rollback().await?;
                return Ok(Guarded::ShipmentMissing);
            }
            (0, Some(_)) => {
                txn.rollback().await?;
                return Ok(Guarded::ShipmentFinished);
            }
            (_, Some(header)) => header,
        };

        let lines: Vec<ComingTableProduct> = coming_table_product::Entity::find()
            .filter(coming_table_product::Column::ComingTableId.eq(coming_table_id))
            .order_by_asc(coming_table_product::Column::CreatedAt)
            .order_by_asc(coming_table_product::Column::Id)
            .all(&txn)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        if lines.is_empty() {
            txn.rollback().await?;
            return Ok(Guarded::ShipmentEmpty);
        }

        use remain::Column;
        let mut remains = Vec::new();
        for draft in aggregate_lines(header.branch_id, &lines) {
            let mut active: remain::ActiveModel = (&draft).into();
            active.id = Set(Uuid::new_v4());
            active.created_at = Set(now);
            active.updated_at = Set(None);

            let on_conflict = OnConflict::columns([Column::BranchId, Column::Barcode])
                .update_columns([Column::CategoryId, Column::Name, Column::Price])
                .value(Column::Count, accumulate(remain::Entity, Column::Count))
                .value(
                    Column::TotalPrice,
                    accumulate(remain::Entity, Column::TotalPrice),
                )
                .value(Column::UpdatedAt, Expr::value(now))
                .to_owned();

            remain::Entity::insert(active)
                .on_conflict(on_conflict)
                .exec_without_returning(&txn)
                .await?;

            let row = remain::Entity::find()
                .filter(Column::BranchId.eq(draft.branch_id))
                .filter(Column::Barcode.eq(draft.barcode.as_str()))
                .one(&txn)
                .await?
                .ok_or_else(|| anyhow!("remain vanished after upsert"))?;

            let outcome = outcome_of(row.updated_at);
            remains.push(Merged::<Remain> {
                record: row.into(),
                outcome,
            });
        }

        txn.commit().await?;

        Ok(Guarded::Applied(FinalizeReport {
            coming_table_id,
            branch_id: header.branch_id,
            remains,
        }))
    }
}
