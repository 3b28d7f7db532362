use chrono::{Duration, NaiveDate, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rstest::rstest;

use campus_core::conflict::{find_conflicts, suggest_slots, Interval, DEFAULT_MAX_SUGGESTIONS};

fn interval(date: (i32, u32, u32), from: (u32, u32), to: (u32, u32)) -> Interval {
    let (y, m, d) = date;
    Interval::new(
        Utc.with_ymd_and_hms(y, m, d, from.0, from.1, 0).unwrap(),
        Utc.with_ymd_and_hms(y, m, d, to.0, to.1, 0).unwrap(),
    )
}

const DAY: (i32, u32, u32) = (2026, 3, 10);

// Half-open overlap: [10:00, 11:00) vs candidates.
#[rstest]
#[case((10, 30), (11, 30), true)] // overlaps the tail
#[case((9, 30), (10, 30), true)] // overlaps the head
#[case((10, 15), (10, 45), true)] // fully inside
#[case((9, 0), (12, 0), true)] // fully covers
#[case((11, 0), (12, 0), false)] // starts exactly at the end
#[case((9, 0), (10, 0), false)] // ends exactly at the start
#[case((12, 0), (13, 0), false)] // disjoint
fn test_half_open_overlap(
    #[case] from: (u32, u32),
    #[case] to: (u32, u32),
    #[case] expected: bool,
) {
    let existing = interval(DAY, (10, 0), (11, 0));
    let candidate = interval(DAY, from, to);

    assert_eq!(existing.overlaps(&candidate), expected);
    // Overlap is symmetric.
    assert_eq!(candidate.overlaps(&existing), expected);
}

#[test]
fn test_find_conflicts_returns_blocking_indices() {
    let occupied = vec![
        interval(DAY, (9, 0), (10, 0)),
        interval(DAY, (10, 0), (11, 0)),
        interval(DAY, (14, 0), (15, 0)),
    ];
    let candidate = interval(DAY, (10, 30), (14, 30));

    assert_eq!(find_conflicts(candidate, &occupied), vec![1, 2]);
}

#[test]
fn test_find_conflicts_empty_when_free() {
    let occupied = vec![interval(DAY, (9, 0), (10, 0))];
    let candidate = interval(DAY, (10, 0), (11, 0));

    assert!(find_conflicts(candidate, &occupied).is_empty());
}

#[test]
fn test_suggestions_on_a_free_day_start_at_working_hours() {
    let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();

    let slots = suggest_slots(date, Duration::hours(1), &[], DEFAULT_MAX_SUGGESTIONS);

    assert_eq!(slots.len(), DEFAULT_MAX_SUGGESTIONS);
    assert_eq!(slots[0], interval(DAY, (8, 0), (9, 0)));
    assert_eq!(slots[4], interval(DAY, (12, 0), (13, 0)));
}

#[test]
fn test_suggestions_skip_occupied_hours() {
    let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
    let occupied = vec![
        interval(DAY, (8, 0), (10, 0)),
        interval(DAY, (11, 0), (12, 0)),
    ];

    let slots = suggest_slots(date, Duration::hours(1), &occupied, 3);

    assert_eq!(
        slots,
        vec![
            interval(DAY, (10, 0), (11, 0)),
            interval(DAY, (12, 0), (13, 0)),
            interval(DAY, (13, 0), (14, 0)),
        ]
    );
}

#[test]
fn test_suggestions_respect_end_of_working_window() {
    let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();

    // A 3-hour slot cannot start after 15:00.
    let slots = suggest_slots(date, Duration::hours(3), &[], 100);

    assert_eq!(slots.first().unwrap(), &interval(DAY, (8, 0), (11, 0)));
    assert_eq!(slots.last().unwrap(), &interval(DAY, (15, 0), (18, 0)));
    assert_eq!(slots.len(), 8);
}

#[test]
fn test_fully_booked_day_yields_no_suggestions() {
    let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
    let occupied = vec![interval(DAY, (8, 0), (18, 0))];

    let slots = suggest_slots(date, Duration::hours(1), &occupied, DEFAULT_MAX_SUGGESTIONS);

    assert!(slots.is_empty());
}

#[test]
fn test_zero_duration_yields_no_suggestions() {
    let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();

    assert!(suggest_slots(date, Duration::zero(), &[], 5).is_empty());
    assert!(suggest_slots(date, Duration::hours(-1), &[], 5).is_empty());
}

#[test]
fn test_suggestion_cap_is_honored() {
    let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();

    let slots = suggest_slots(date, Duration::hours(1), &[], 2);

    assert_eq!(slots.len(), 2);
}
