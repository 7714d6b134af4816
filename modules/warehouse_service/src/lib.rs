//! Warehouse Service Module
//!
//! Inventory backend for a multi-branch warehouse: branches, a product
//! catalog, incoming shipments ("coming tables") and per-branch stock
//! balances ("remains"). Scanning a barcode into an open shipment merges
//! into one line per barcode; finalizing the shipment folds its lines into
//! the branch's remains and closes it.

// Public exports
pub mod contract;
pub use contract::{
    client::WarehouseApi, error::WarehouseError, Branch, Category, ComingTable,
    ComingTableProduct, FinalizeReport, IngestLine, MergeOutcome, Merged, Product, Remain,
    ShipmentStatus,
};

pub mod config;
pub use config::Config;

pub mod module;
pub use module::WarehouseServiceModule;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
