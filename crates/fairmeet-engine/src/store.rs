//! Store abstractions and the in-memory reference implementation.
//!
//! The reservation store is the only shared mutable resource in the engine.
//! The single-active-reservation invariant is enforced here, at the store
//! layer, through [`ReservationStore::commit_request`]: a conditional write
//! that re-validates the (requester, provider, day) key under the store's own
//! atomicity before committing anything.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, RwLock};

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::{EngineError, Result};
use crate::reservation::{Reservation, ReservationStatus};
use crate::window::EventWindow;

/// The key the single-active-reservation invariant ranges over: at most one
/// Pending-or-Booked reservation may hold it at any time.
#[derive(Debug, Clone)]
pub struct ActiveKey {
    pub requester_id: String,
    pub provider_id: String,
    /// Calendar day of the target slot, in `zone`.
    pub day: NaiveDate,
    /// Zone the day was computed in; stored rows are compared in this zone.
    pub zone: Tz,
}

impl ActiveKey {
    fn covers(&self, r: &Reservation) -> bool {
        r.requester_id == self.requester_id
            && r.provider_id == self.provider_id
            && r.local_day(self.zone) == self.day
    }
}

/// The write half of a booking request, applied atomically against the key.
#[derive(Debug, Clone)]
pub enum RequestWrite {
    /// Insert a fresh pending reservation. Admitted only while no
    /// Pending/Booked row holds the key.
    Create(Reservation),
    /// Re-point an existing pending reservation at a new slot instant.
    /// Admitted only while that row is still the sole active holder.
    Move { id: String, slot_start: DateTime<Utc> },
}

/// Point lookups and the atomic conditional write over reservation records.
pub trait ReservationStore: Send + Sync {
    fn get(&self, id: &str) -> Result<Option<Reservation>>;

    /// Unconditional put, for administrative imports and seeding. The booking
    /// path never uses this; it goes through [`Self::commit_request`].
    fn insert(&self, reservation: Reservation) -> Result<Reservation>;

    /// Overwrite an existing record. `NotFound` if the id is unknown.
    fn update(&self, reservation: Reservation) -> Result<Reservation>;

    /// Reservations of one provider with `slot_start` in `[from, to)`,
    /// ordered by slot start. Feeds the overlay read path.
    fn for_provider_between(
        &self,
        provider_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Reservation>>;

    /// All reservations made by one requester, ordered by slot start.
    fn for_requester(&self, requester_id: &str) -> Result<Vec<Reservation>>;

    /// All reservations held against one provider, ordered by slot start.
    fn for_provider(&self, provider_id: &str) -> Result<Vec<Reservation>>;

    /// Reservations for a (requester, provider) pair whose local calendar day
    /// in `zone` is `day`. The state machine's read step.
    fn for_pair_on_day(
        &self,
        requester_id: &str,
        provider_id: &str,
        day: NaiveDate,
        zone: Tz,
    ) -> Result<Vec<Reservation>>;

    /// Atomically re-validate `key` and apply `write`, all-or-nothing.
    ///
    /// Fails with `AlreadyBooked` when a Booked row holds the key, and with
    /// `ConcurrentConflict` when the state observed at commit time no longer
    /// admits the write (another Pending appeared, or the row to move is no
    /// longer the sole pending holder).
    fn commit_request(&self, key: &ActiveKey, write: RequestWrite) -> Result<Reservation>;
}

/// Get/replace of the singleton event configuration.
pub trait EventWindowStore: Send + Sync {
    fn active_window(&self) -> Result<Option<EventWindow>>;
    fn replace_window(&self, window: EventWindow) -> Result<()>;
}

/// Mutex-guarded map; the single lock makes every trait method, including the
/// conditional write, trivially atomic.
#[derive(Debug, Default)]
pub struct InMemoryReservationStore {
    inner: Mutex<HashMap<String, Reservation>>,
}

impl InMemoryReservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Reservation>>> {
        self.inner
            .lock()
            .map_err(|_| EngineError::StoreUnavailable("reservation store lock poisoned".to_string()))
    }

    fn sorted(mut rows: Vec<Reservation>) -> Vec<Reservation> {
        rows.sort_by(|a, b| {
            a.slot_start
                .cmp(&b.slot_start)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        rows
    }
}

impl ReservationStore for InMemoryReservationStore {
    fn get(&self, id: &str) -> Result<Option<Reservation>> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn insert(&self, reservation: Reservation) -> Result<Reservation> {
        self.lock()?
            .insert(reservation.id.clone(), reservation.clone());
        Ok(reservation)
    }

    fn update(&self, reservation: Reservation) -> Result<Reservation> {
        let mut map = self.lock()?;
        match map.get_mut(&reservation.id) {
            Some(row) => {
                *row = reservation.clone();
                Ok(reservation)
            }
            None => Err(EngineError::NotFound(format!(
                "reservation {}",
                reservation.id
            ))),
        }
    }

    fn for_provider_between(
        &self,
        provider_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Reservation>> {
        let rows = self
            .lock()?
            .values()
            .filter(|r| r.provider_id == provider_id && r.slot_start >= from && r.slot_start < to)
            .cloned()
            .collect();
        Ok(Self::sorted(rows))
    }

    fn for_requester(&self, requester_id: &str) -> Result<Vec<Reservation>> {
        let rows = self
            .lock()?
            .values()
            .filter(|r| r.requester_id == requester_id)
            .cloned()
            .collect();
        Ok(Self::sorted(rows))
    }

    fn for_provider(&self, provider_id: &str) -> Result<Vec<Reservation>> {
        let rows = self
            .lock()?
            .values()
            .filter(|r| r.provider_id == provider_id)
            .cloned()
            .collect();
        Ok(Self::sorted(rows))
    }

    fn for_pair_on_day(
        &self,
        requester_id: &str,
        provider_id: &str,
        day: NaiveDate,
        zone: Tz,
    ) -> Result<Vec<Reservation>> {
        let rows = self
            .lock()?
            .values()
            .filter(|r| {
                r.requester_id == requester_id
                    && r.provider_id == provider_id
                    && r.local_day(zone) == day
            })
            .cloned()
            .collect();
        Ok(Self::sorted(rows))
    }

    fn commit_request(&self, key: &ActiveKey, write: RequestWrite) -> Result<Reservation> {
        let mut map = self.lock()?;

        let mut has_booked = false;
        let mut active_pending: Vec<String> = Vec::new();
        for r in map.values() {
            if key.covers(r) {
                match r.status {
                    ReservationStatus::Booked => has_booked = true,
                    ReservationStatus::Pending => active_pending.push(r.id.clone()),
                    ReservationStatus::Rejected => {}
                }
            }
        }
        if has_booked {
            return Err(EngineError::AlreadyBooked);
        }

        match write {
            RequestWrite::Create(reservation) => {
                if !active_pending.is_empty() {
                    return Err(EngineError::ConcurrentConflict);
                }
                map.insert(reservation.id.clone(), reservation.clone());
                Ok(reservation)
            }
            RequestWrite::Move { id, slot_start } => {
                if active_pending.len() != 1 || active_pending[0] != id {
                    return Err(EngineError::ConcurrentConflict);
                }
                // Sole pending holder confirmed under the lock.
                let row = map
                    .get_mut(&id)
                    .ok_or(EngineError::ConcurrentConflict)?;
                row.slot_start = slot_start;
                Ok(row.clone())
            }
        }
    }
}

/// RwLock-guarded singleton configuration.
#[derive(Debug, Default)]
pub struct InMemoryWindowStore {
    inner: RwLock<Option<EventWindow>>,
}

impl InMemoryWindowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with an already-validated window.
    pub fn with_window(window: EventWindow) -> Self {
        Self {
            inner: RwLock::new(Some(window)),
        }
    }
}

impl EventWindowStore for InMemoryWindowStore {
    fn active_window(&self) -> Result<Option<EventWindow>> {
        let guard = self
            .inner
            .read()
            .map_err(|_| EngineError::StoreUnavailable("window store lock poisoned".to_string()))?;
        Ok(guard.clone().filter(|w| w.active))
    }

    fn replace_window(&self, window: EventWindow) -> Result<()> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| EngineError::StoreUnavailable("window store lock poisoned".to_string()))?;
        *guard = Some(window);
        Ok(())
    }
}
