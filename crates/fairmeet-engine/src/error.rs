//! Error types for fairmeet-engine operations.

use thiserror::Error;

/// Errors surfaced by the scheduling engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The supplied IANA time zone name is not in the zone database.
    #[error("Invalid time zone: {0}")]
    InvalidZone(String),

    /// Malformed or contradictory time inputs (zero duration, start == end, ...).
    #[error("Invalid time window: {0}")]
    InvalidWindow(String),

    /// The requester already holds a booked slot with this provider on that day.
    #[error("A booked reservation already exists for this requester, provider and day")]
    AlreadyBooked,

    /// Unknown reservation, provider or event window.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Lost a conditional-write race; the caller should retry the whole
    /// request once.
    #[error("Concurrent booking conflict, retry the request")]
    ConcurrentConflict,

    /// The backing store failed at the transport/persistence level.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Convenience alias used throughout fairmeet-engine.
pub type Result<T> = std::result::Result<T, EngineError>;
