//! # Booking Conflict Resolution
//!
//! Half-open interval overlap detection and working-hours slot suggestion.
//! These functions are pure: callers fetch the occupying bookings (pending
//! and approved) and pass their time windows in.

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Working hours scanned for slot suggestions: 08:00 to 18:00.
pub const WORKING_HOURS_START: u32 = 8;
pub const WORKING_HOURS_END: u32 = 18;

/// Suggestion cap when the caller does not specify one.
pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;

/// A half-open time interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Two intervals conflict iff they overlap under half-open semantics:
    /// `self.start < other.end && self.end > other.start`. Touching
    /// endpoints (one ends exactly when the other starts) do not conflict.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Indices of the occupied intervals that overlap the candidate.
pub fn find_conflicts(candidate: Interval, occupied: &[Interval]) -> Vec<usize> {
    occupied
        .iter()
        .enumerate()
        .filter(|(_, existing)| existing.overlaps(&candidate))
        .map(|(i, _)| i)
        .collect()
}

/// Scan the working-hours window of `date` hour by hour and collect up to
/// `max_suggestions` conflict-free slots of the given duration, in
/// chronological order. The scan stops once the slot would run past the end
/// of the working window.
pub fn suggest_slots(
    date: NaiveDate,
    duration: Duration,
    occupied: &[Interval],
    max_suggestions: usize,
) -> Vec<Interval> {
    let mut suggestions = Vec::new();
    if duration <= Duration::zero() {
        return suggestions;
    }

    let Some(start) = date.and_hms_opt(WORKING_HOURS_START, 0, 0) else {
        return suggestions;
    };
    let Some(end_of_day) = date.and_hms_opt(WORKING_HOURS_END, 0, 0) else {
        return suggestions;
    };
    let mut current = start.and_utc();
    let end_of_day = end_of_day.and_utc();

    while current + duration <= end_of_day && suggestions.len() < max_suggestions {
        let candidate = Interval::new(current, current + duration);
        if !occupied.iter().any(|o| o.overlaps(&candidate)) {
            suggestions.push(candidate);
        }
        current += Duration::hours(1);
    }

    suggestions
}
