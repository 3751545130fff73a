//! # fairmeet-engine
//!
//! Slot-generation and booking-reconciliation engine for time-boxed meetings
//! between requesters (visitors) and providers (exhibitors) inside a
//! multi-day, multi-timezone event window.
//!
//! The engine derives the candidate slot grid for any calendar day in any
//! IANA zone as a pure function of the event configuration, overlays it with
//! the persisted reservation log, and applies booking transitions under a
//! store-enforced single-active-reservation invariant: at most one pending or
//! booked reservation per (requester, provider, local day) at any time.
//!
//! ## Modules
//!
//! - [`window`] — event configuration + local-to-UTC window normalization
//! - [`grid`] — candidate slot grid for one local calendar day
//! - [`overlay`] — grid × reservation log → per-requester slot views
//! - [`booking`] — the [`Scheduler`] operation surface and state machine
//! - [`reservation`] — persisted reservation records and statuses
//! - [`store`] — store traits + in-memory reference implementation
//! - [`notify`] — best-effort notification dispatch hooks
//! - [`error`] — error types

pub mod booking;
pub mod error;
pub mod grid;
pub mod notify;
pub mod overlay;
pub mod reservation;
pub mod store;
pub mod window;

pub use booking::Scheduler;
pub use error::{EngineError, Result};
pub use grid::{generate, slot_grid, GridSlot, SlotGrid};
pub use notify::{LogDispatcher, NotificationDispatcher, NullDispatcher};
pub use overlay::{overlay, SlotStatus, SlotView};
pub use reservation::{Decision, Party, Reservation, ReservationStatus};
pub use store::{
    ActiveKey, EventWindowStore, InMemoryReservationStore, InMemoryWindowStore, RequestWrite,
    ReservationStore,
};
pub use window::{normalize_window, EventWindow};
