//! The booking state machine and the engine's operation surface.
//!
//! [`Scheduler`] threads the active [`EventWindow`] through the pure read
//! path (normalize → grid → overlay) and drives reservation transitions
//! through the store's atomic conditional write. It holds no state of its
//! own and is safe to share across threads.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::error::{EngineError, Result};
use crate::grid::{self, GridSlot};
use crate::notify::NotificationDispatcher;
use crate::overlay::{self, SlotView};
use crate::reservation::{Decision, Party, Reservation, ReservationStatus};
use crate::store::{ActiveKey, EventWindowStore, RequestWrite, ReservationStore};
use crate::window::{parse_zone, EventWindow};

/// Stateless coordinator over the reservation store, the event window
/// directory and the notification dispatcher.
pub struct Scheduler {
    reservations: Arc<dyn ReservationStore>,
    windows: Arc<dyn EventWindowStore>,
    notifier: Arc<dyn NotificationDispatcher>,
}

impl Scheduler {
    pub fn new(
        reservations: Arc<dyn ReservationStore>,
        windows: Arc<dyn EventWindowStore>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Scheduler {
            reservations,
            windows,
            notifier,
        }
    }

    /// The active event configuration, or `NotFound` when none is set.
    pub fn active_window(&self) -> Result<EventWindow> {
        self.windows
            .active_window()?
            .ok_or_else(|| EngineError::NotFound("no active event window".to_string()))
    }

    /// Validate and install a new event configuration. Grids are derived on
    /// read, so there is no persisted state to reconcile.
    pub fn replace_window(&self, window: EventWindow) -> Result<()> {
        window.validate()?;
        self.windows.replace_window(window)
    }

    /// Full read path: candidate grid for `date` as seen in `zone`, annotated
    /// with the true reservation state for `requester_id`.
    ///
    /// Slot instants are anchored at the event's UTC times-of-day, so they
    /// are identical for every viewer zone; `zone` selects which instants
    /// fall on the requested local calendar day and how they display. Slots
    /// outside `[window.start, window.end)` are never listed. A day with no
    /// event slots yields an empty list.
    pub fn list_slots(
        &self,
        provider_id: &str,
        date: NaiveDate,
        zone: &str,
        requester_id: &str,
    ) -> Result<Vec<SlotView>> {
        let window = self.active_window()?;
        let tz = parse_zone(zone)?;
        let (open_utc, close_utc) = window.daily_hours_utc();
        let step = Duration::minutes(i64::from(window.slot_duration_minutes));

        // The caller's local day can draw slots from up to three UTC-anchored
        // event days on either side of the date line.
        let mut grid: Vec<GridSlot> = Vec::new();
        for day in [date.pred_opt(), Some(date), date.succ_opt()]
            .into_iter()
            .flatten()
        {
            for slot in grid::slot_grid(
                day,
                open_utc,
                close_utc,
                window.slot_duration_minutes,
                "UTC",
            )? {
                let local = slot.start_utc.with_timezone(&tz);
                if local.date_naive() != date {
                    continue;
                }
                // Clamp: the slot must lie fully inside the event window.
                if !window.contains(slot.start_utc) || slot.start_utc + step > window.end {
                    continue;
                }
                grid.push(GridSlot {
                    start_local: local.format("%H:%M").to_string(),
                    end_local: (slot.start_utc + step)
                        .with_timezone(&tz)
                        .format("%H:%M")
                        .to_string(),
                    start_utc: slot.start_utc,
                });
            }
        }
        grid.sort_by_key(|s| s.start_utc);

        let Some(first) = grid.first() else {
            tracing::debug!(%date, zone, "no event slots fall on the requested day");
            return Ok(Vec::new());
        };
        let from = first.start_utc;
        let to = grid[grid.len() - 1].start_utc + step;
        let reservations = self
            .reservations
            .for_provider_between(provider_id, from, to)?;
        Ok(overlay::overlay(
            &grid,
            &reservations,
            requester_id,
            window.slot_duration_minutes,
        ))
    }

    /// Request a slot, transitioning reservation records under the conflict
    /// rules:
    ///
    /// 1. a Booked reservation for the same (requester, provider, local day)
    ///    fails with `AlreadyBooked`;
    /// 2. a sole Pending one is moved to the new instant in place;
    /// 3. otherwise a fresh Pending reservation is created (Rejected history
    ///    stays untouched).
    ///
    /// The read and the write are atomic per key through
    /// [`ReservationStore::commit_request`]; losing the race surfaces as
    /// `ConcurrentConflict` and the caller retries the whole call once.
    pub fn request_slot(
        &self,
        requester_id: &str,
        requester_name: Option<&str>,
        provider_id: &str,
        slot_start: DateTime<Utc>,
        duration_minutes: u32,
        zone: &str,
    ) -> Result<Reservation> {
        let tz = parse_zone(zone)?;
        let day = slot_start.with_timezone(&tz).date_naive();

        let existing = self
            .reservations
            .for_pair_on_day(requester_id, provider_id, day, tz)?;
        if existing
            .iter()
            .any(|r| r.status == ReservationStatus::Booked)
        {
            return Err(EngineError::AlreadyBooked);
        }

        let pending: Vec<&Reservation> = existing
            .iter()
            .filter(|r| r.status == ReservationStatus::Pending)
            .collect();
        let write = match pending.as_slice() {
            [current] => RequestWrite::Move {
                id: current.id.clone(),
                slot_start,
            },
            _ => RequestWrite::Create(Reservation::new(
                requester_id,
                requester_name,
                provider_id,
                slot_start,
                duration_minutes,
                zone,
            )),
        };

        let key = ActiveKey {
            requester_id: requester_id.to_string(),
            provider_id: provider_id.to_string(),
            day,
            zone: tz,
        };
        let reservation = self.reservations.commit_request(&key, write)?;

        if let Err(err) = self.notifier.reservation_requested(&reservation) {
            tracing::warn!(error = %err, reservation = %reservation.id, "request notification failed");
        }
        Ok(reservation)
    }

    /// Provider verdict on a reservation: unconditional overwrite to Booked
    /// or Rejected. `NotFound` when the id is unknown or owned by another
    /// provider.
    pub fn decide(
        &self,
        provider_id: &str,
        reservation_id: &str,
        decision: Decision,
    ) -> Result<Reservation> {
        let mut reservation = self.owned_reservation(provider_id, reservation_id)?;
        reservation.status = decision.into();
        let reservation = self.reservations.update(reservation)?;

        if let Err(err) = self.notifier.reservation_decided(&reservation) {
            tracing::warn!(error = %err, reservation = %reservation.id, "decision notification failed");
        }
        Ok(reservation)
    }

    /// Attach or replace the meeting link. Pure attribute mutation,
    /// idempotent, no lifecycle effect.
    pub fn set_meeting_link(
        &self,
        provider_id: &str,
        reservation_id: &str,
        link: &str,
    ) -> Result<Reservation> {
        let mut reservation = self.owned_reservation(provider_id, reservation_id)?;
        reservation.meeting_link = Some(link.to_string());
        self.reservations.update(reservation)
    }

    /// Reservation history for one party, optionally narrowed to a local
    /// calendar day.
    pub fn list_reservations(
        &self,
        party: &Party,
        day: Option<(NaiveDate, &str)>,
    ) -> Result<Vec<Reservation>> {
        let mut rows = match party {
            Party::Requester(id) => self.reservations.for_requester(id)?,
            Party::Provider(id) => self.reservations.for_provider(id)?,
        };
        if let Some((date, zone)) = day {
            let tz = parse_zone(zone)?;
            rows.retain(|r| r.local_day(tz) == date);
        }
        Ok(rows)
    }

    fn owned_reservation(&self, provider_id: &str, reservation_id: &str) -> Result<Reservation> {
        let reservation = self
            .reservations
            .get(reservation_id)?
            .ok_or_else(|| EngineError::NotFound(format!("reservation {reservation_id}")))?;
        if reservation.provider_id != provider_id {
            return Err(EngineError::NotFound(format!(
                "reservation {reservation_id} for provider {provider_id}"
            )));
        }
        Ok(reservation)
    }
}
