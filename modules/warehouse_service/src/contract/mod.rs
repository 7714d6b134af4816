//! Contract layer - public API for inter-module communication
//!
//! This layer contains transport-agnostic models and the native client trait.
//! NO serde derives on models - these are pure domain types.

pub mod client;
pub mod error;
pub mod model;

pub use client::WarehouseApi;
pub use error::WarehouseError;
pub use model::{
    Branch, BranchFilter, BranchInput, Category, CategoryFilter, CategoryInput, ComingTable,
    ComingTableFilter, ComingTableInput, ComingTableProduct, ComingTableProductFilter,
    ComingTableProductInput, FinalizeReport, IngestLine, MergeOutcome, Merged, Page, PageRequest,
    Product, ProductFilter, ProductInput, ProductSnapshot, Remain, RemainFilter, RemainInput,
    ShipmentStatus,
};
