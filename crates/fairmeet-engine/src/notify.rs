//! Best-effort notification dispatch after booking transitions.
//!
//! Dispatch failures are logged and swallowed by the caller; they never roll
//! back a state transition.

use crate::error::Result;
use crate::reservation::Reservation;

/// Fire-and-forget hooks invoked after a successful `request_slot` and after
/// a `decide` transition.
pub trait NotificationDispatcher: Send + Sync {
    fn reservation_requested(&self, reservation: &Reservation) -> Result<()>;
    fn reservation_decided(&self, reservation: &Reservation) -> Result<()>;
}

/// Default dispatcher: structured log lines, nothing else.
#[derive(Debug, Default)]
pub struct LogDispatcher;

impl NotificationDispatcher for LogDispatcher {
    fn reservation_requested(&self, reservation: &Reservation) -> Result<()> {
        tracing::info!(
            reservation = %reservation.id,
            requester = %reservation.requester_id,
            provider = %reservation.provider_id,
            slot = %reservation.slot_start,
            "reservation requested"
        );
        Ok(())
    }

    fn reservation_decided(&self, reservation: &Reservation) -> Result<()> {
        tracing::info!(
            reservation = %reservation.id,
            provider = %reservation.provider_id,
            status = ?reservation.status,
            "reservation decided"
        );
        Ok(())
    }
}

/// Silent dispatcher for tests and embedding contexts with their own hooks.
#[derive(Debug, Default)]
pub struct NullDispatcher;

impl NotificationDispatcher for NullDispatcher {
    fn reservation_requested(&self, _reservation: &Reservation) -> Result<()> {
        Ok(())
    }

    fn reservation_decided(&self, _reservation: &Reservation) -> Result<()> {
        Ok(())
    }
}
