//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models. Input
//! conversions fill only the data columns; repositories set ids and
//! timestamps.

use super::entity::{branch, category, coming_table, coming_table_product, product, remain};
use crate::contract::{
    Branch, BranchInput, Category, CategoryInput, ComingTable, ComingTableInput,
    ComingTableProduct, ComingTableProductInput, Product, ProductInput, ProductSnapshot, Remain,
    RemainInput, ShipmentStatus,
};
use crate::domain::{LineDraft, RemainDraft};
use sea_orm::ActiveValue::Set;

// ===== Status Conversions =====

impl From<coming_table::Status> for ShipmentStatus {
    fn from(status: coming_table::Status) -> Self {
        match status {
            coming_table::Status::InProcess => Self::InProcess,
            coming_table::Status::Finished => Self::Finished,
        }
    }
}

impl From<ShipmentStatus> for coming_table::Status {
    fn from(status: ShipmentStatus) -> Self {
        match status {
            ShipmentStatus::InProcess => Self::InProcess,
            ShipmentStatus::Finished => Self::Finished,
        }
    }
}

// ===== Catalog Conversions =====

impl From<branch::Model> for Branch {
    fn from(entity: branch::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            address: entity.address,
            phone: entity.phone,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl From<&BranchInput> for branch::ActiveModel {
    fn from(input: &BranchInput) -> Self {
        Self {
            name: Set(input.name.clone()),
            address: Set(input.address.clone()),
            phone: Set(input.phone.clone()),
            ..Default::default()
        }
    }
}

impl From<category::Model> for Category {
    fn from(entity: category::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            parent_id: entity.parent_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl From<&CategoryInput> for category::ActiveModel {
    fn from(input: &CategoryInput) -> Self {
        Self {
            name: Set(input.name.clone()),
            parent_id: Set(input.parent_id),
            ..Default::default()
        }
    }
}

impl From<product::Model> for Product {
    fn from(entity: product::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            price: entity.price,
            barcode: entity.barcode,
            category_id: entity.category_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl From<product::Model> for ProductSnapshot {
    fn from(entity: product::Model) -> Self {
        Self {
            name: entity.name,
            price: entity.price,
            category_id: entity.category_id,
        }
    }
}

impl From<&ProductInput> for product::ActiveModel {
    fn from(input: &ProductInput) -> Self {
        Self {
            name: Set(input.name.clone()),
            price: Set(input.price),
            barcode: Set(input.barcode.trim().to_string()),
            category_id: Set(input.category_id),
            ..Default::default()
        }
    }
}

// ===== Shipment Conversions =====

impl From<coming_table::Model> for ComingTable {
    fn from(entity: coming_table::Model) -> Self {
        Self {
            id: entity.id,
            coming_id: entity.coming_id,
            branch_id: entity.branch_id,
            date_time: entity.date_time,
            status: entity.status.into(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl From<&ComingTableInput> for coming_table::ActiveModel {
    fn from(input: &ComingTableInput) -> Self {
        Self {
            coming_id: Set(input.coming_id.clone()),
            branch_id: Set(input.branch_id),
            date_time: Set(input.date_time),
            ..Default::default()
        }
    }
}

impl From<coming_table_product::Model> for ComingTableProduct {
    fn from(entity: coming_table_product::Model) -> Self {
        Self {
            id: entity.id,
            category_id: entity.category_id,
            name: entity.name,
            price: entity.price,
            barcode: entity.barcode,
            count: entity.count,
            total_price: entity.total_price,
            coming_table_id: entity.coming_table_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl From<&ComingTableProductInput> for coming_table_product::ActiveModel {
    fn from(input: &ComingTableProductInput) -> Self {
        Self {
            category_id: Set(input.category_id),
            name: Set(input.name.clone()),
            price: Set(input.price),
            barcode: Set(input.barcode.trim().to_string()),
            count: Set(input.count),
            total_price: Set(input.price * input.count),
            coming_table_id: Set(input.coming_table_id),
            ..Default::default()
        }
    }
}

impl From<&LineDraft> for coming_table_product::ActiveModel {
    fn from(draft: &LineDraft) -> Self {
        Self {
            category_id: Set(draft.category_id),
            name: Set(draft.name.clone()),
            price: Set(draft.price),
            barcode: Set(draft.barcode.clone()),
            count: Set(draft.count),
            total_price: Set(draft.total_price),
            coming_table_id: Set(draft.coming_table_id),
            ..Default::default()
        }
    }
}

// ===== Stock Conversions =====

impl From<remain::Model> for Remain {
    fn from(entity: remain::Model) -> Self {
        Self {
            id: entity.id,
            branch_id: entity.branch_id,
            category_id: entity.category_id,
            name: entity.name,
            price: entity.price,
            barcode: entity.barcode,
            count: entity.count,
            total_price: entity.total_price,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl From<&RemainInput> for remain::ActiveModel {
    fn from(input: &RemainInput) -> Self {
        Self {
            branch_id: Set(input.branch_id),
            category_id: Set(input.category_id),
            name: Set(input.name.clone()),
            price: Set(input.price),
            barcode: Set(input.barcode.trim().to_string()),
            count: Set(input.count),
            total_price: Set(input.price * input.count),
            ..Default::default()
        }
    }
}

impl From<&RemainDraft> for remain::ActiveModel {
    fn from(draft: &RemainDraft) -> Self {
        Self {
            branch_id: Set(draft.branch_id),
            category_id: Set(draft.category_id),
            name: Set(draft.name.clone()),
            price: Set(draft.price),
            barcode: Set(draft.barcode.clone()),
            count: Set(draft.count),
            total_price: Set(draft.total_price),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue::NotSet;
    use uuid::Uuid;

    #[test]
    fn line_input_recomputes_total() {
        let input = ComingTableProductInput {
            category_id: Uuid::new_v4(),
            name: "Milk".into(),
            price: 9.0,
            barcode: " 123 ".into(),
            count: 4.0,
            coming_table_id: Uuid::new_v4(),
        };
        let am: coming_table_product::ActiveModel = (&input).into();
        assert_eq!(am.total_price, Set(36.0));
        assert_eq!(am.barcode, Set("123".to_string()));
        assert_eq!(am.id, NotSet);
    }

    #[test]
    fn status_maps_both_ways() {
        for status in [ShipmentStatus::InProcess, ShipmentStatus::Finished] {
            let stored: coming_table::Status = status.into();
            assert_eq!(ShipmentStatus::from(stored), status);
        }
    }
}
