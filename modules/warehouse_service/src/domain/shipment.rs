//! Shipment state machine and reconciliation arithmetic
//!
//! A shipment moves `in_process --[ingest]*--> in_process --[finalize]--> finished`.
//! Every mutation asks [`ShipmentStatus::transition`] first; `finished` is terminal.

use super::repository::{LineDraft, RemainDraft};
use crate::contract::{ComingTableProduct, ProductSnapshot, ShipmentStatus, WarehouseError};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Things that can happen to a shipment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipmentEvent {
    /// A barcode is scanned, or a line is edited or removed
    IngestLine,
    /// Lines are folded into branch stock
    Finalize,
}

impl ShipmentStatus {
    /// Validate `event` against the current status and return the next status.
    pub fn transition(
        self,
        coming_table_id: Uuid,
        event: ShipmentEvent,
    ) -> Result<ShipmentStatus, WarehouseError> {
        match (self, event) {
            (Self::InProcess, ShipmentEvent::IngestLine) => Ok(Self::InProcess),
            (Self::InProcess, ShipmentEvent::Finalize) => Ok(Self::Finished),
            (Self::Finished, _) => Err(WarehouseError::AlreadyFinalized { coming_table_id }),
        }
    }
}

/// Build the line for a scan: the catalog snapshot plus `total = price * count`.
pub fn draft_line(
    coming_table_id: Uuid,
    barcode: &str,
    count: f64,
    snapshot: ProductSnapshot,
) -> LineDraft {
    LineDraft {
        coming_table_id,
        category_id: snapshot.category_id,
        total_price: snapshot.price * count,
        name: snapshot.name,
        price: snapshot.price,
        barcode: barcode.to_string(),
        count,
    }
}

/// Collapse a shipment's lines into one remain increment per barcode.
///
/// Counts and totals are summed; name/price/category come from the most
/// recently touched line. Output is sorted by barcode.
pub fn aggregate_lines(branch_id: Uuid, lines: &[ComingTableProduct]) -> Vec<RemainDraft> {
    let mut by_barcode: BTreeMap<&str, (RemainDraft, _)> = BTreeMap::new();

    for line in lines {
        let touched = line.updated_at.unwrap_or(line.created_at);
        match by_barcode.get_mut(line.barcode.as_str()) {
            Some((draft, last_touched)) => {
                draft.count += line.count;
                draft.total_price += line.total_price;
                if touched >= *last_touched {
                    draft.category_id = line.category_id;
                    draft.name = line.name.clone();
                    draft.price = line.price;
                    *last_touched = touched;
                }
            }
            None => {
                let draft = RemainDraft {
                    branch_id,
                    category_id: line.category_id,
                    name: line.name.clone(),
                    price: line.price,
                    barcode: line.barcode.clone(),
                    count: line.count,
                    total_price: line.total_price,
                };
                by_barcode.insert(line.barcode.as_str(), (draft, touched));
            }
        }
    }

    by_barcode.into_values().map(|(draft, _)| draft).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn line(barcode: &str, name: &str, price: f64, count: f64) -> ComingTableProduct {
        ComingTableProduct {
            id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            name: name.to_string(),
            price,
            barcode: barcode.to_string(),
            count,
            total_price: price * count,
            coming_table_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn in_process_accepts_ingest_and_finalize() {
        let id = Uuid::new_v4();
        assert_eq!(
            ShipmentStatus::InProcess.transition(id, ShipmentEvent::IngestLine),
            Ok(ShipmentStatus::InProcess)
        );
        assert_eq!(
            ShipmentStatus::InProcess.transition(id, ShipmentEvent::Finalize),
            Ok(ShipmentStatus::Finished)
        );
    }

    #[test]
    fn finished_is_terminal() {
        let id = Uuid::new_v4();
        for event in [ShipmentEvent::IngestLine, ShipmentEvent::Finalize] {
            assert_eq!(
                ShipmentStatus::Finished.transition(id, event),
                Err(WarehouseError::AlreadyFinalized { coming_table_id: id })
            );
        }
    }

    #[test]
    fn draft_line_copies_snapshot_and_computes_total() {
        let category_id = Uuid::new_v4();
        let shipment = Uuid::new_v4();
        let draft = draft_line(
            shipment,
            "123",
            3.0,
            ProductSnapshot {
                name: "Milk".into(),
                price: 9.0,
                category_id,
            },
        );
        assert_eq!(draft.coming_table_id, shipment);
        assert_eq!(draft.category_id, category_id);
        assert_eq!(draft.name, "Milk");
        assert_eq!(draft.count, 3.0);
        assert_eq!(draft.total_price, 27.0);
    }

    #[test]
    fn aggregate_keeps_every_barcode() {
        let branch = Uuid::new_v4();
        let lines = vec![line("b", "Bread", 2.0, 4.0), line("a", "Apple", 1.5, 2.0)];

        let drafts = aggregate_lines(branch, &lines);

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].barcode, "a");
        assert_eq!(drafts[0].total_price, 3.0);
        assert_eq!(drafts[1].barcode, "b");
        assert_eq!(drafts[1].count, 4.0);
        assert!(drafts.iter().all(|d| d.branch_id == branch));
    }

    #[test]
    fn aggregate_sums_duplicate_barcodes_with_latest_snapshot() {
        let mut old = line("123", "Old name", 8.0, 1.0);
        old.created_at = Utc::now() - Duration::minutes(5);
        let newer = line("123", "New name", 9.0, 2.0);

        let drafts = aggregate_lines(Uuid::new_v4(), &[newer.clone(), old]);

        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].count, 3.0);
        assert_eq!(drafts[0].total_price, 26.0);
        assert_eq!(drafts[0].name, "New name");
        assert_eq!(drafts[0].price, 9.0);
        assert_eq!(drafts[0].category_id, newer.category_id);
    }

    #[test]
    fn aggregate_of_nothing_is_empty() {
        assert!(aggregate_lines(Uuid::new_v4(), &[]).is_empty());
    }
}
