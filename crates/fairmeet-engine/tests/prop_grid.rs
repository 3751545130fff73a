//! Property-based tests for slot grid generation using proptest.
//!
//! These verify invariants that should hold for *any* valid (day, window,
//! duration, zone) input, not just the examples in `grid_tests.rs`.

use chrono::{Duration, NaiveDate, NaiveTime};
use fairmeet_engine::{generate, normalize_window};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_zone() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("UTC".to_string()),
        Just("America/New_York".to_string()),
        Just("America/Los_Angeles".to_string()),
        Just("Europe/Berlin".to_string()),
        Just("Europe/London".to_string()),
        Just("Asia/Tokyo".to_string()),
        Just("Asia/Kolkata".to_string()),
        Just("Australia/Sydney".to_string()),
    ]
}

/// Day in the 2025-2027 range; day-of-month capped at 28.
fn arb_day() -> impl Strategy<Value = NaiveDate> {
    (2025i32..=2027, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn arb_time() -> impl Strategy<Value = NaiveTime> {
    (0u32..=23, 0u32..=59).prop_map(|(h, m)| NaiveTime::from_hms_opt(h, m, 0).unwrap())
}

fn arb_duration() -> impl Strategy<Value = u32> {
    prop_oneof![
        Just(10u32),
        Just(15),
        Just(20),
        Just(30),
        Just(45),
        Just(60),
        Just(90),
        Just(120),
    ]
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    /// Slots tile [start_of_day, end_of_day) from the left with no gaps and
    /// no overlaps, and the trailing remainder is shorter than one duration.
    #[test]
    fn slots_tile_the_window(
        day in arb_day(),
        start in arb_time(),
        end in arb_time(),
        duration in arb_duration(),
        zone in arb_zone(),
    ) {
        // A window whose endpoints collapse onto the same instant inside a
        // DST gap is rejected upstream; nothing to tile then.
        let norm = normalize_window(day, start, end, &zone);
        prop_assume!(norm.is_ok());
        let (start_of_day, end_of_day) = norm.unwrap();

        let slots = generate(day, start, end, duration, &zone).unwrap();
        let step = Duration::minutes(i64::from(duration));

        // Count equals elapsed real minutes divided by duration, never a
        // naive wall-clock assumption.
        let elapsed = (end_of_day - start_of_day).num_minutes();
        prop_assert_eq!(slots.len() as i64, elapsed / i64::from(duration));

        if let Some(first) = slots.first() {
            prop_assert_eq!(first.start_utc, start_of_day);
        }
        for pair in slots.windows(2) {
            prop_assert_eq!(pair[1].start_utc - pair[0].start_utc, step);
        }
        if let Some(last) = slots.last() {
            let last_end = last.start_utc + step;
            prop_assert!(last_end <= end_of_day);
            prop_assert!(end_of_day - last_end < step);
        }
    }

    /// Identical inputs yield identical output.
    #[test]
    fn generation_is_deterministic(
        day in arb_day(),
        start in arb_time(),
        end in arb_time(),
        duration in arb_duration(),
        zone in arb_zone(),
    ) {
        prop_assume!(normalize_window(day, start, end, &zone).is_ok());
        let a = generate(day, start, end, duration, &zone).unwrap();
        let b = generate(day, start, end, duration, &zone).unwrap();
        prop_assert_eq!(a, b);
    }

    /// An end time equal to the start time spans exactly one calendar day,
    /// which is 23-25 real hours depending on DST.
    #[test]
    fn overnight_end_lands_on_the_next_day(
        day in arb_day(),
        start in arb_time(),
        zone in arb_zone(),
    ) {
        let norm = normalize_window(day, start, start, &zone);
        prop_assume!(norm.is_ok());
        let (start_of_day, end_of_day) = norm.unwrap();

        let elapsed = (end_of_day - start_of_day).num_minutes();
        prop_assert!((23 * 60..=25 * 60).contains(&elapsed));
    }

    /// Local display labels always agree with the slot's UTC instant.
    #[test]
    fn local_labels_match_the_instant(
        day in arb_day(),
        start in arb_time(),
        end in arb_time(),
        duration in arb_duration(),
        zone in arb_zone(),
    ) {
        prop_assume!(normalize_window(day, start, end, &zone).is_ok());
        let tz: chrono_tz::Tz = zone.parse().unwrap();
        let slots = generate(day, start, end, duration, &zone).unwrap();
        for slot in &slots {
            let local = slot.start_utc.with_timezone(&tz);
            prop_assert_eq!(local.format("%H:%M").to_string(), slot.start_local.clone());
        }
    }
}
