//! Merge a candidate slot grid with reservation records into per-requester
//! slot views.
//!
//! Matching is exact-instant on the slot's UTC start. The caller's own
//! reservation is shown with its true status; any other requester's
//! reservation renders as an opaque `Booked` slot — a third party's pending
//! or rejected state is never revealed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::grid::GridSlot;
use crate::reservation::{Reservation, ReservationStatus};

/// Status of a slot as seen by one specific requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Pending,
    Booked,
    Rejected,
}

/// Ephemeral, computed view of one slot. Recomputed on every read, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotView {
    /// Zone-local wall-clock start, "HH:MM".
    pub start_local: String,
    /// Zone-local wall-clock end, "HH:MM".
    pub end_local: String,
    /// Display label, "HH:MM - HH:MM".
    pub slot_label: String,
    pub status: SlotStatus,
    /// Set only when the slot is held by the viewing requester.
    pub owner_id: Option<String>,
    pub start_utc: DateTime<Utc>,
    pub duration_minutes: u32,
}

/// Annotate `grid` with the true reservation state for `requester_id`.
///
/// Grid ordering is preserved; the reservation store is not touched.
pub fn overlay(
    grid: &[GridSlot],
    reservations: &[Reservation],
    requester_id: &str,
    duration_minutes: u32,
) -> Vec<SlotView> {
    grid.iter()
        .map(|slot| {
            let matches: Vec<&Reservation> = reservations
                .iter()
                .filter(|r| r.slot_start == slot.start_utc)
                .collect();

            let own = matches.iter().find(|r| r.requester_id == requester_id);
            let (status, owner_id) = match own {
                Some(r) => {
                    let status = match r.status {
                        ReservationStatus::Pending => SlotStatus::Pending,
                        ReservationStatus::Booked => SlotStatus::Booked,
                        // Shown so the requester can retry the slot.
                        ReservationStatus::Rejected => SlotStatus::Rejected,
                    };
                    (status, Some(r.requester_id.clone()))
                }
                None if !matches.is_empty() => (SlotStatus::Booked, None),
                None => (SlotStatus::Available, None),
            };

            SlotView {
                start_local: slot.start_local.clone(),
                end_local: slot.end_local.clone(),
                slot_label: format!("{} - {}", slot.start_local, slot.end_local),
                status,
                owner_id,
                start_utc: slot.start_utc,
                duration_minutes,
            }
        })
        .collect()
}
