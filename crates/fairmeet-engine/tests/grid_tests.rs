//! Tests for candidate slot grid generation.

use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use fairmeet_engine::error::EngineError;
use fairmeet_engine::{generate, slot_grid};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[test]
fn business_day_with_half_hour_slots_yields_sixteen() {
    // 09:00–17:00 local, 30-minute slots.
    let slots = generate(date(2026, 6, 5), time(9, 0), time(17, 0), 30, "Europe/Berlin").unwrap();

    assert_eq!(slots.len(), 16);
    assert_eq!(slots[0].start_local, "09:00");
    assert_eq!(slots[0].end_local, "09:30");
    assert_eq!(slots[15].start_local, "16:30");
    assert_eq!(slots[15].end_local, "17:00");
    // Local display and UTC instant describe the same moment: Berlin in June
    // is UTC+2.
    assert_eq!(
        slots[0].start_utc,
        Utc.with_ymd_and_hms(2026, 6, 5, 7, 0, 0).unwrap()
    );
}

#[test]
fn trailing_partial_slot_is_dropped() {
    // 09:00–10:50 with 30-minute slots: 110 minutes fit 3 slots, the trailing
    // 20 minutes are dropped.
    let slots = generate(date(2026, 6, 5), time(9, 0), time(10, 50), 30, "UTC").unwrap();

    assert_eq!(slots.len(), 3);
    assert_eq!(slots[2].start_local, "10:00");
    assert_eq!(slots[2].end_local, "10:30");
}

#[test]
fn slots_are_contiguous_and_ordered() {
    let slots = generate(date(2026, 6, 5), time(9, 0), time(17, 0), 45, "UTC").unwrap();

    for pair in slots.windows(2) {
        assert_eq!(pair[1].start_utc - pair[0].start_utc, Duration::minutes(45));
    }
}

#[test]
fn identical_inputs_yield_identical_output() {
    let a = generate(date(2026, 6, 5), time(9, 0), time(17, 0), 30, "Asia/Tokyo").unwrap();
    let b = generate(date(2026, 6, 5), time(9, 0), time(17, 0), 30, "Asia/Tokyo").unwrap();
    assert_eq!(a, b);
}

#[test]
fn cloned_grid_restarts_from_the_beginning() {
    let mut grid = slot_grid(date(2026, 6, 5), time(9, 0), time(17, 0), 30, "UTC").unwrap();
    let restart = grid.clone();

    grid.next();
    grid.next();

    let fresh: Vec<_> = restart.collect();
    assert_eq!(fresh.len(), 16);
    assert_eq!(fresh[0].start_local, "09:00");
}

#[test]
fn overnight_window_advances_one_calendar_day() {
    // 21:00 → 02:00 is five hours into the next day.
    let slots = generate(date(2026, 6, 5), time(21, 0), time(2, 0), 60, "UTC").unwrap();

    assert_eq!(slots.len(), 5);
    assert_eq!(slots[0].start_local, "21:00");
    assert_eq!(slots[4].start_local, "01:00");
    assert_eq!(
        slots[4].start_utc,
        Utc.with_ymd_and_hms(2026, 6, 6, 1, 0, 0).unwrap()
    );
}

#[test]
fn spring_forward_day_generates_elapsed_not_wall_clock_slots() {
    // 00:30–05:30 local on the America/New_York spring-forward day is 4 real
    // hours, so 30-minute slots number 8, not 10.
    let slots = generate(
        date(2026, 3, 8),
        time(0, 30),
        time(5, 30),
        30,
        "America/New_York",
    )
    .unwrap();

    assert_eq!(slots.len(), 8);
    // The 02:00–03:00 local hour does not exist; labels jump the gap.
    let labels: Vec<&str> = slots.iter().map(|s| s.start_local.as_str()).collect();
    assert!(labels.contains(&"01:30"));
    assert!(!labels.contains(&"02:00"));
    assert!(!labels.contains(&"02:30"));
    assert!(labels.contains(&"03:00"));
}

#[test]
fn fall_back_day_generates_extra_slots() {
    // Same local window on the fall-back day is 6 real hours → 12 slots.
    let slots = generate(
        date(2026, 11, 1),
        time(0, 30),
        time(5, 30),
        30,
        "America/New_York",
    )
    .unwrap();

    assert_eq!(slots.len(), 12);
    // The 01:00 local hour occurs twice; its labels repeat.
    let repeats = slots
        .iter()
        .filter(|s| s.start_local == "01:30")
        .count();
    assert_eq!(repeats, 2);
}

#[test]
fn zero_duration_is_rejected() {
    let err = generate(date(2026, 6, 5), time(9, 0), time(17, 0), 0, "UTC").unwrap_err();
    assert!(matches!(err, EngineError::InvalidWindow(_)));
}

#[test]
fn unknown_zone_is_rejected() {
    let err = generate(date(2026, 6, 5), time(9, 0), time(17, 0), 30, "Nowhere/Void").unwrap_err();
    assert!(matches!(err, EngineError::InvalidZone(_)));
}
