//! Integration tests for catalog, shipment header and remain CRUD

use std::sync::Arc;
use warehouse_service::config::Config;
use warehouse_service::contract::*;
use warehouse_service::domain::Service;

mod common;
use common::{print_test_header, Warehouse};

// Repository doubles for failure paths
pub mod mocks {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::RwLock;
    use uuid::Uuid;
    use warehouse_service::domain::repository::BranchRepository;

    /// Delegates to a real repository until switched to failing mode
    pub struct FlakyBranchRepo {
        inner: Arc<dyn BranchRepository>,
        failing: RwLock<bool>,
    }

    impl FlakyBranchRepo {
        pub fn new(inner: Arc<dyn BranchRepository>) -> Self {
            Self {
                inner,
                failing: RwLock::new(false),
            }
        }

        pub fn fail(&self) {
            *self.failing.write() = true;
        }

        fn check(&self) -> anyhow::Result<()> {
            if *self.failing.read() {
                anyhow::bail!("connection reset by peer");
            }
            Ok(())
        }
    }

    #[async_trait]
    impl BranchRepository for FlakyBranchRepo {
        async fn create(&self, input: &BranchInput) -> anyhow::Result<Branch> {
            self.check()?;
            self.inner.create(input).await
        }

        async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Branch>> {
            self.check()?;
            self.inner.find_by_id(id).await
        }

        async fn list(
            &self,
            page: PageRequest,
            filter: &BranchFilter,
        ) -> anyhow::Result<Page<Branch>> {
            self.check()?;
            self.inner.list(page, filter).await
        }

        async fn update(&self, id: Uuid, input: &BranchInput) -> anyhow::Result<bool> {
            self.check()?;
            self.inner.update(id, input).await
        }

        async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
            self.check()?;
            self.inner.delete(id).await
        }
    }
}

fn branch(name: &str) -> BranchInput {
    BranchInput {
        name: name.into(),
        address: format!("{name} street"),
        phone: "+100".into(),
    }
}

#[tokio::test]
async fn test_branch_crud() {
    print_test_header(
        "test_branch_crud",
        &["Create, read, update and delete a branch"],
    );
    let service = common::create_test_service().await;

    let id = service.create_branch(branch("North")).await.unwrap();
    let created = service.get_branch(id).await.unwrap();
    assert_eq!(created.name, "North");
    assert!(created.updated_at.is_none());

    assert_eq!(service.update_branch(id, branch("South")).await.unwrap(), id);
    let updated = service.get_branch(id).await.unwrap();
    assert_eq!(updated.name, "South");
    assert_eq!(updated.address, "South street");
    assert!(updated.updated_at.is_some());
    assert_eq!(updated.created_at, created.created_at);

    assert_eq!(service.delete_branch(id).await.unwrap(), id);
    assert!(matches!(
        service.get_branch(id).await.unwrap_err(),
        WarehouseError::NotFound { .. }
    ));
}

#[tokio::test]
async fn test_update_and_delete_of_missing_rows_are_not_found() {
    let service = common::create_test_service().await;
    let missing = uuid::Uuid::new_v4();

    let err = service.update_branch(missing, branch("X")).await.unwrap_err();
    assert_eq!(err, WarehouseError::not_found("branch", missing));
    assert!(matches!(
        service.delete_branch(missing).await.unwrap_err(),
        WarehouseError::NotFound { .. }
    ));
    assert!(matches!(
        service.delete_product(missing).await.unwrap_err(),
        WarehouseError::NotFound { .. }
    ));
    assert!(matches!(
        service.delete_remain(missing).await.unwrap_err(),
        WarehouseError::NotFound { .. }
    ));
    assert!(matches!(
        service.delete_category(missing).await.unwrap_err(),
        WarehouseError::NotFound { .. }
    ));
}

#[tokio::test]
async fn test_pagination_second_page_of_25() {
    print_test_header(
        "test_pagination_second_page_of_25",
        &[
            "page=2, limit=10 over 25 branches",
            "Expect rows 11-20 of the newest-first ordering and total=25",
        ],
    );
    let service = common::create_test_service().await;
    for i in 0..25 {
        service.create_branch(branch(&format!("branch-{i:02}"))).await.unwrap();
    }

    let all = service
        .list_branches(
            Some(PageRequest {
                page: 1,
                page_size: 25,
            }),
            BranchFilter::default(),
        )
        .await
        .unwrap();
    assert_eq!(all.total, 25);
    assert!(all
        .items
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));

    let page = service
        .list_branches(
            Some(PageRequest {
                page: 2,
                page_size: 10,
            }),
            BranchFilter::default(),
        )
        .await
        .unwrap();
    assert_eq!(page.total, 25);
    assert_eq!(page.items, all.items[10..20].to_vec());

    let last = service
        .list_branches(
            Some(PageRequest {
                page: 3,
                page_size: 10,
            }),
            BranchFilter::default(),
        )
        .await
        .unwrap();
    assert_eq!(last.items.len(), 5);
}

#[tokio::test]
async fn test_default_page_size_applies() {
    let service = common::create_test_service().await;
    for i in 0..12 {
        service.create_branch(branch(&format!("b{i}"))).await.unwrap();
    }

    let page = service
        .list_branches(None, BranchFilter::default())
        .await
        .unwrap();
    assert_eq!(page.items.len(), Config::default().default_page_size as usize);
    assert_eq!(page.total, 12);
}

#[tokio::test]
async fn test_invalid_paging_is_rejected() {
    let service = common::create_test_service().await;
    for (page, page_size) in [(0, 10), (1, 0), (1, 1000)] {
        let err = service
            .list_branches(Some(PageRequest { page, page_size }), BranchFilter::default())
            .await
            .unwrap_err();
        assert!(matches!(err, WarehouseError::Validation { .. }));
    }
}

#[tokio::test]
async fn test_out_of_range_page_is_rejected() {
    print_test_header(
        "test_out_of_range_page_is_rejected",
        &["A page whose row offset does not fit the store is a client error, not a panic"],
    );
    let service = common::create_test_service().await;
    service.create_branch(branch("Alpha")).await.unwrap();

    for page in [u64::MAX / 2, i64::MAX as u64, u64::MAX] {
        let err = service
            .list_branches(
                Some(PageRequest {
                    page,
                    page_size: 10,
                }),
                BranchFilter::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WarehouseError::Validation { .. }), "page {page}: {err:?}");
    }

    // far past the end but addressable: an empty page
    let empty = service
        .list_branches(
            Some(PageRequest {
                page: 1_000_000,
                page_size: 10,
            }),
            BranchFilter::default(),
        )
        .await
        .unwrap();
    assert!(empty.items.is_empty());
    assert_eq!(empty.total, 1);
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    print_test_header(
        "test_search_is_case_insensitive",
        &["Branch name search and product name/barcode search"],
    );
    let service = common::create_test_service().await;
    service.create_branch(branch("Tashkent Central")).await.unwrap();
    service.create_branch(branch("Samarkand")).await.unwrap();

    let found = service
        .list_branches(
            None,
            BranchFilter {
                search: Some("CENTRAL".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(found.total, 1);
    assert_eq!(found.items[0].name, "Tashkent Central");

    let wh = Warehouse::seed(&service).await;
    wh.add_product(&service, "Bread", "4780001", 2.0).await;

    let by_name = service
        .list_products(
            None,
            ProductFilter {
                search: Some("bREAD".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(by_name.total, 1);

    let by_barcode = service
        .list_products(
            None,
            ProductFilter {
                search: Some("478".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(by_barcode.total, 1);
    assert_eq!(by_barcode.items[0].name, "Bread");

    // blank search means no filter
    let all = service
        .list_products(
            None,
            ProductFilter {
                search: Some("  ".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(all.total, 2);
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    print_test_header(
        "test_search_treats_wildcards_literally",
        &["'%' and '_' in a search term match themselves, not any text"],
    );
    let service = common::create_test_service().await;
    service.create_branch(branch("Alpha")).await.unwrap();
    service.create_branch(branch("Beta")).await.unwrap();
    service.create_branch(branch("Dock 100% A_1")).await.unwrap();

    let total = |term: &'static str| {
        let service = service.clone();
        async move {
            service
                .list_branches(
                    None,
                    BranchFilter {
                        search: Some(term.into()),
                    },
                )
                .await
                .unwrap()
                .total
        }
    };

    assert_eq!(total("B_ta").await, 0);
    assert_eq!(total("lpha").await, 1);
    assert_eq!(total("%").await, 1);
    assert_eq!(total("a_1").await, 1);
    assert_eq!(total("*").await, 0);
}

#[tokio::test]
async fn test_search_folds_non_ascii_case() {
    print_test_header(
        "test_search_folds_non_ascii_case",
        &["Case-insensitive search also folds letters outside ASCII"],
    );
    let service = common::create_test_service().await;
    service.create_branch(branch("ÄPFEL Markt")).await.unwrap();
    service.create_branch(branch("Birnen")).await.unwrap();

    for term in ["äpfel", "ÄPFEL", "äPfEl markt"] {
        let found = service
            .list_branches(
                None,
                BranchFilter {
                    search: Some(term.into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(found.total, 1, "term {term}");
        assert_eq!(found.items[0].name, "ÄPFEL Markt");
    }
}

#[tokio::test]
async fn test_category_filters_and_self_parent() {
    let service = common::create_test_service().await;
    let root = service
        .create_category(CategoryInput {
            name: "Food".into(),
            parent_id: None,
        })
        .await
        .unwrap();
    let child = service
        .create_category(CategoryInput {
            name: "Dairy".into(),
            parent_id: Some(root),
        })
        .await
        .unwrap();

    let children = service
        .list_categories(
            None,
            CategoryFilter {
                parent_id: Some(root),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(children.total, 1);
    assert_eq!(children.items[0].id, child);

    let err = service
        .update_category(
            child,
            CategoryInput {
                name: "Dairy".into(),
                parent_id: Some(child),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, WarehouseError::Validation { .. }));
}

#[tokio::test]
async fn test_blank_names_are_rejected() {
    let service = common::create_test_service().await;
    let err = service.create_branch(branch("   ")).await.unwrap_err();
    assert!(matches!(err, WarehouseError::Validation { .. }));

    let err = service
        .create_product(ProductInput {
            name: "Milk".into(),
            price: -1.0,
            barcode: "1".into(),
            category_id: uuid::Uuid::new_v4(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, WarehouseError::Validation { .. }));
}

#[tokio::test]
async fn test_coming_table_filters() {
    let service = common::create_test_service().await;
    let wh = Warehouse::seed(&service).await;
    let other = service.create_branch(branch("Other")).await.unwrap();
    common::open_shipment(&service, other, "INV-777").await;

    let for_branch = service
        .list_coming_tables(
            None,
            ComingTableFilter {
                branch_id: Some(wh.branch),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(for_branch.total, 1);
    assert_eq!(for_branch.items[0].id, wh.shipment);
    assert_eq!(for_branch.items[0].status, ShipmentStatus::InProcess);

    let by_ref = service
        .list_coming_tables(
            None,
            ComingTableFilter {
                search: Some("inv-7".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_ref.total, 1);
    assert_eq!(by_ref.items[0].branch_id, other);
}

#[tokio::test]
async fn test_remain_crud_computes_total() {
    print_test_header(
        "test_remain_crud_computes_total",
        &["Direct remain writes recompute total_price = price * count"],
    );
    let service = common::create_test_service().await;
    let wh = Warehouse::seed(&service).await;

    let id = service
        .create_remain(RemainInput {
            branch_id: wh.branch,
            category_id: wh.category,
            name: "Milk".into(),
            price: 9.0,
            barcode: "123".into(),
            count: 4.0,
        })
        .await
        .unwrap();
    assert_eq!(service.get_remain(id).await.unwrap().total_price, 36.0);

    service
        .update_remain(
            id,
            RemainInput {
                branch_id: wh.branch,
                category_id: wh.category,
                name: "Milk".into(),
                price: 9.0,
                barcode: "123".into(),
                count: 0.0,
            },
        )
        .await
        .unwrap();
    let remain = service.check_remain(wh.branch, "123").await.unwrap();
    assert_eq!(remain.id, id);
    assert_eq!(remain.total_price, 0.0);

    let by_category = service
        .list_remains(
            None,
            RemainFilter {
                category_id: Some(wh.category),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_category.total, 1);

    assert!(matches!(
        service.check_remain(wh.branch, "nope").await.unwrap_err(),
        WarehouseError::NotFound { .. }
    ));
}

#[tokio::test]
async fn test_remain_key_collisions_are_validation() {
    print_test_header(
        "test_remain_key_collisions_are_validation",
        &[
            "A second remain for the same branch and barcode is a client error",
            "So is re-barcoding a remain onto another one's barcode",
        ],
    );
    let service = common::create_test_service().await;
    let wh = Warehouse::seed(&service).await;
    let remain = |barcode: &str| RemainInput {
        branch_id: wh.branch,
        category_id: wh.category,
        name: "Milk".into(),
        price: 9.0,
        barcode: barcode.into(),
        count: 1.0,
    };

    service.create_remain(remain("123")).await.unwrap();
    let err = service.create_remain(remain("123")).await.unwrap_err();
    println!("   error: {}", err);
    assert!(matches!(err, WarehouseError::Validation { .. }));

    let other = service.create_remain(remain("456")).await.unwrap();
    let err = service.update_remain(other, remain("123")).await.unwrap_err();
    assert!(matches!(err, WarehouseError::Validation { .. }));
    assert_eq!(service.get_remain(other).await.unwrap().barcode, "456");

    let page = service
        .list_remains(None, RemainFilter::default())
        .await
        .unwrap();
    assert_eq!(page.total, 2);
}

#[tokio::test]
async fn test_store_failures_are_labelled() {
    print_test_header(
        "test_store_failures_are_labelled",
        &["Repository failures surface as Store errors naming the operation"],
    );
    let db = common::setup_db().await;
    let mut repos = common::repositories(db.clone());
    let flaky = Arc::new(mocks::FlakyBranchRepo::new(repos.branches.clone()));
    repos.branches = flaky.clone();
    let service = Service::new(repos, Config::default());

    let id = service.create_branch(branch("Ok")).await.unwrap();
    flaky.fail();

    assert_eq!(
        service
            .list_branches(None, BranchFilter::default())
            .await
            .unwrap_err(),
        WarehouseError::Store {
            operation: "list branches".into()
        }
    );
    assert_eq!(
        service.get_branch(id).await.unwrap_err(),
        WarehouseError::Store {
            operation: "get branch".into()
        }
    );
}
