//! Candidate slot grid generation for a single local calendar day.
//!
//! Steps through the normalized UTC window in fixed increments of real
//! elapsed minutes, so a day containing a DST transition yields
//! `elapsed_minutes / duration` slots rather than a naive 24h count.
//! Trailing remainders shorter than the slot duration are dropped, never
//! padded.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::window::{normalize_window, parse_zone};

/// One candidate slot: local wall-clock strings for display, the UTC instant
/// for matching against stored reservations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSlot {
    /// Zone-local wall-clock start, "HH:MM".
    pub start_local: String,
    /// Zone-local wall-clock end, "HH:MM".
    pub end_local: String,
    /// Absolute start instant.
    pub start_utc: DateTime<Utc>,
}

/// Lazy, finite, restartable slot sequence. `Clone` restarts it from the
/// beginning; identical inputs always yield an identical ordered sequence.
#[derive(Debug, Clone)]
pub struct SlotGrid {
    tz: Tz,
    cursor: DateTime<Utc>,
    end: DateTime<Utc>,
    step: Duration,
}

impl Iterator for SlotGrid {
    type Item = GridSlot;

    fn next(&mut self) -> Option<GridSlot> {
        let slot_end = self.cursor + self.step;
        if slot_end > self.end {
            return None;
        }
        let slot = GridSlot {
            start_local: self.cursor.with_timezone(&self.tz).format("%H:%M").to_string(),
            end_local: slot_end.with_timezone(&self.tz).format("%H:%M").to_string(),
            start_utc: self.cursor,
        };
        self.cursor = slot_end;
        Some(slot)
    }
}

/// Build the slot sequence for one local calendar day in `zone`.
///
/// The day window follows [`normalize_window`] semantics: an end time not
/// after the start time pins the end to the next calendar day.
///
/// # Errors
/// [`EngineError::InvalidWindow`] for a zero duration or a degenerate window,
/// [`EngineError::InvalidZone`] for an unknown zone name.
pub fn slot_grid(
    day: NaiveDate,
    local_start: NaiveTime,
    local_end: NaiveTime,
    duration_minutes: u32,
    zone: &str,
) -> Result<SlotGrid> {
    if duration_minutes == 0 {
        return Err(EngineError::InvalidWindow(
            "slot duration must be positive".to_string(),
        ));
    }
    let tz = parse_zone(zone)?;
    let (start_utc, end_utc) = normalize_window(day, local_start, local_end, zone)?;
    Ok(SlotGrid {
        tz,
        cursor: start_utc,
        end: end_utc,
        step: Duration::minutes(i64::from(duration_minutes)),
    })
}

/// Eager convenience wrapper over [`slot_grid`].
pub fn generate(
    day: NaiveDate,
    local_start: NaiveTime,
    local_end: NaiveTime,
    duration_minutes: u32,
    zone: &str,
) -> Result<Vec<GridSlot>> {
    Ok(slot_grid(day, local_start, local_end, duration_minutes, zone)?.collect())
}
