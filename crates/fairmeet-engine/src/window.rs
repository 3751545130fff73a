//! Event window configuration and local-to-UTC window normalization.
//!
//! All conversions go through the IANA zone database (`chrono-tz`), never
//! fixed offsets, so results are correct across DST transitions. Local times
//! that fall inside a spring-forward gap shift to the earliest valid instant
//! after the gap; ambiguous fall-back times take the earlier offset.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// The singleton configuration bounding all valid slot instants.
///
/// Created/replaced by an administrative action. Replacing it carries no
/// reconciliation cost: slot grids are always derived on read, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventWindow {
    /// First valid instant of the event.
    pub start: DateTime<Utc>,
    /// First instant past the event.
    pub end: DateTime<Utc>,
    /// IANA zone the event was configured in.
    pub time_zone: String,
    /// Uniform slot length for the whole event.
    pub slot_duration_minutes: u32,
    /// Display name of the fair/event.
    pub fair_name: String,
    /// Venue description.
    pub location: String,
    /// Only the active window parameterizes slot generation.
    pub active: bool,
}

impl EventWindow {
    /// Check the structural invariants: a known zone, `start < end`, and a
    /// positive slot duration.
    pub fn validate(&self) -> Result<()> {
        parse_zone(&self.time_zone)?;
        if self.start >= self.end {
            return Err(EngineError::InvalidWindow(format!(
                "event start {} is not before end {}",
                self.start, self.end
            )));
        }
        if self.slot_duration_minutes == 0 {
            return Err(EngineError::InvalidWindow(
                "slot duration must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// The event's daily opening and closing times of day, read off in UTC.
    ///
    /// Every event day reuses these, so a day's slot instants are identical
    /// for every viewer zone; only their display localization differs.
    pub fn daily_hours_utc(&self) -> (NaiveTime, NaiveTime) {
        (self.start.time(), self.end.time())
    }

    /// Whether `instant` falls inside `[start, end)`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Parse an IANA zone name, mapping failure to [`EngineError::InvalidZone`].
pub fn parse_zone(zone: &str) -> Result<Tz> {
    zone.parse::<Tz>()
        .map_err(|_| EngineError::InvalidZone(zone.to_string()))
}

/// Resolve a local wall-clock datetime to an absolute instant in `tz`.
///
/// Spring-forward gaps shift forward in 15-minute steps until the wall clock
/// is valid again; fall-back ambiguity resolves to the earlier offset. Both
/// choices are deterministic.
fn resolve_local(tz: Tz, local: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earlier, _) => earlier,
        LocalResult::None => {
            // Real-world gaps are at most a few hours; probe forward until the
            // wall clock exists again.
            let mut probe = local;
            for _ in 0..32 {
                probe += Duration::minutes(15);
                if let Some(dt) = tz.from_local_datetime(&probe).earliest() {
                    return dt;
                }
            }
            // Unreachable with a sane zone database.
            tz.from_utc_datetime(&local)
        }
    }
}

/// Convert a caller-supplied local window into absolute UTC instants.
///
/// `local_date` + `local_start` in `zone` gives the window start. If
/// `local_end` is not after `local_start` on the wall clock, the end is pinned
/// to the next calendar day in that zone (overnight windows).
///
/// # Errors
/// [`EngineError::InvalidZone`] for an unknown zone name,
/// [`EngineError::InvalidWindow`] if start and end resolve to the same instant.
pub fn normalize_window(
    local_date: NaiveDate,
    local_start: NaiveTime,
    local_end: NaiveTime,
    zone: &str,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let tz = parse_zone(zone)?;

    let start = resolve_local(tz, local_date.and_time(local_start));

    let end_date = if local_end > local_start {
        local_date
    } else {
        local_date.succ_opt().ok_or_else(|| {
            EngineError::InvalidWindow(format!("no calendar day after {local_date}"))
        })?
    };
    let end = resolve_local(tz, end_date.and_time(local_end));

    let start_utc = start.with_timezone(&Utc);
    let end_utc = end.with_timezone(&Utc);
    if end_utc <= start_utc {
        return Err(EngineError::InvalidWindow(format!(
            "window start {start_utc} and end {end_utc} do not span a positive interval"
        )));
    }
    Ok((start_utc, end_utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_time_shifts_forward() {
        // 2026-03-08 02:30 does not exist in America/New_York (spring forward).
        let tz: Tz = "America/New_York".parse().unwrap();
        let local = NaiveDate::from_ymd_opt(2026, 3, 8)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        let resolved = resolve_local(tz, local);
        assert_eq!(resolved.time(), NaiveTime::from_hms_opt(3, 0, 0).unwrap());
    }

    #[test]
    fn ambiguous_time_takes_earlier_offset() {
        // 2026-11-01 01:30 occurs twice in America/New_York (fall back).
        let tz: Tz = "America/New_York".parse().unwrap();
        let local = NaiveDate::from_ymd_opt(2026, 11, 1)
            .unwrap()
            .and_hms_opt(1, 30, 0)
            .unwrap();
        let resolved = resolve_local(tz, local);
        // Earlier occurrence is still EDT (UTC-4): 05:30 UTC.
        assert_eq!(
            resolved.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2026, 11, 1, 5, 30, 0).unwrap()
        );
    }
}
