//! Domain layer - business logic and services

pub mod repository;
pub mod service;
pub mod shipment;
pub mod validation;

pub use repository::{
    BranchRepository, CategoryRepository, ComingTableProductRepository, ComingTableRepository,
    Guarded, LineDraft, ProductRepository, RemainDraft, RemainRepository, StockLedger,
};
pub use service::{Repositories, Service};
pub use shipment::{aggregate_lines, draft_line, ShipmentEvent};
