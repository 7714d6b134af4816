//! Database migrations for warehouse service

use sea_orm_migration::prelude::*;

pub struct Migrator;

/// Recorded version of every migration, in apply order
pub const MIGRATION_NAMES: &[&str] = &[
    "m20250301_000001_create_catalog",
    "m20250301_000002_create_coming_tables",
    "m20250301_000003_create_remain",
    "m20250301_000004_create_lookup_indexes",
];

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_catalog::Migration),
            Box::new(m20250301_000002_create_coming_tables::Migration),
            Box::new(m20250301_000003_create_remain::Migration),
            Box::new(m20250301_000004_create_lookup_indexes::Migration),
        ]
    }
}

mod m20250301_000001_create_catalog {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_catalog"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Branch::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Branch::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Branch::Name).string().not_null())
                        .col(ColumnDef::new(Branch::Address).string().not_null())
                        .col(ColumnDef::new(Branch::Phone).string().not_null())
                        .col(
                            ColumnDef::new(Branch::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Branch::UpdatedAt).timestamp_with_time_zone())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Category::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Category::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Category::Name).string().not_null())
                        .col(ColumnDef::new(Category::ParentId).uuid())
                        .col(
                            ColumnDef::new(Category::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Category::UpdatedAt).timestamp_with_time_zone())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Product::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Product::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Product::Name).string().not_null())
                        .col(ColumnDef::new(Product::Price).double().not_null())
                        .col(ColumnDef::new(Product::Barcode).string().not_null())
                        .col(ColumnDef::new(Product::CategoryId).uuid().not_null())
                        .col(
                            ColumnDef::new(Product::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Product::UpdatedAt).timestamp_with_time_zone())
                        .to_owned(),
                )
                .await?;

            // Barcode scans resolve products by barcode
            manager
                .create_index(
                    Index::create()
                        .name("idx_product_barcode")
                        .table(Product::Table)
                        .col(Product::Barcode)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Product::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Category::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Branch::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Branch {
        #[sea_orm(iden = "branches")]
        Table,
        Id,
        Name,
        Address,
        Phone,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Category {
        Table,
        Id,
        Name,
        ParentId,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Product {
        Table,
        Id,
        Name,
        Price,
        Barcode,
        CategoryId,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250301_000002_create_coming_tables {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_coming_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ComingTable::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ComingTable::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(ComingTable::ComingId).string().not_null())
                        .col(ColumnDef::new(ComingTable::BranchId).uuid().not_null())
                        .col(
                            ColumnDef::new(ComingTable::DateTime)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ComingTable::Status)
                                .string_len(16)
                                .not_null()
                                .default("in_process"),
                        )
                        .col(
                            ColumnDef::new(ComingTable::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ComingTable::UpdatedAt).timestamp_with_time_zone())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_coming_table_branch_id")
                        .table(ComingTable::Table)
                        .col(ComingTable::BranchId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ComingTableProduct::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ComingTableProduct::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ComingTableProduct::CategoryId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ComingTableProduct::Name).string().not_null())
                        .col(ColumnDef::new(ComingTableProduct::Price).double().not_null())
                        .col(
                            ColumnDef::new(ComingTableProduct::Barcode)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ComingTableProduct::Count).double().not_null())
                        .col(
                            ColumnDef::new(ComingTableProduct::TotalPrice)
                                .double()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ComingTableProduct::ComingTableId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ComingTableProduct::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ComingTableProduct::UpdatedAt)
                                .timestamp_with_time_zone(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_coming_table_product_coming_table")
                                .from(ComingTableProduct::Table, ComingTableProduct::ComingTableId)
                                .to(ComingTable::Table, ComingTable::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // One line per (shipment, barcode); repeated scans accumulate into it
            manager
                .create_index(
                    Index::create()
                        .name("uq_coming_table_product_line")
                        .table(ComingTableProduct::Table)
                        .col(ComingTableProduct::ComingTableId)
                        .col(ComingTableProduct::Barcode)
                        .unique()
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ComingTableProduct::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ComingTable::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ComingTable {
        Table,
        Id,
        ComingId,
        BranchId,
        DateTime,
        Status,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum ComingTableProduct {
        Table,
        Id,
        CategoryId,
        Name,
        Price,
        Barcode,
        Count,
        TotalPrice,
        ComingTableId,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250301_000003_create_remain {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000003_create_remain"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Remain::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Remain::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Remain::BranchId).uuid().not_null())
                        .col(ColumnDef::new(Remain::CategoryId).uuid().not_null())
                        .col(ColumnDef::new(Remain::Name).string().not_null())
                        .col(ColumnDef::new(Remain::Price).double().not_null())
                        .col(ColumnDef::new(Remain::Barcode).string().not_null())
                        .col(ColumnDef::new(Remain::Count).double().not_null())
                        .col(ColumnDef::new(Remain::TotalPrice).double().not_null())
                        .col(
                            ColumnDef::new(Remain::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Remain::UpdatedAt).timestamp_with_time_zone())
                        .to_owned(),
                )
                .await?;

            // One balance per (branch, barcode)
            manager
                .create_index(
                    Index::create()
                        .name("uq_remain_branch_barcode")
                        .table(Remain::Table)
                        .col(Remain::BranchId)
                        .col(Remain::Barcode)
                        .unique()
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Remain::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Remain {
        Table,
        Id,
        BranchId,
        CategoryId,
        Name,
        Price,
        Barcode,
        Count,
        TotalPrice,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250301_000004_create_lookup_indexes {
    use super::*;

    /// (index name, table, column) for every list ordering and foreign id lookup
    const INDEXES: &[(&str, &str, &str)] = &[
        ("idx_branches_created_at", "branches", "created_at"),
        ("idx_category_created_at", "category", "created_at"),
        ("idx_category_parent_id", "category", "parent_id"),
        ("idx_product_created_at", "product", "created_at"),
        ("idx_product_category_id", "product", "category_id"),
        ("idx_coming_table_created_at", "coming_table", "created_at"),
        ("idx_coming_table_product_created_at", "coming_table_product", "created_at"),
        ("idx_remain_created_at", "remain", "created_at"),
        ("idx_remain_category_id", "remain", "category_id"),
    ];

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000004_create_lookup_indexes"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            for (name, table, column) in INDEXES {
                manager
                    .create_index(
                        Index::create()
                            .name(*name)
                            .table(Alias::new(*table))
                            .col(Alias::new(*column))
                            .if_not_exists()
                            .to_owned(),
                    )
                    .await?;
            }
            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            for (name, table, _) in INDEXES {
                manager
                    .drop_index(
                        Index::drop()
                            .name(*name)
                            .table(Alias::new(*table))
                            .to_owned(),
                    )
                    .await?;
            }
            Ok(())
        }
    }
}
