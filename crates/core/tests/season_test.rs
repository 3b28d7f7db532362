use pretty_assertions::assert_eq;
use rstest::rstest;

use campus_core::season::{advance_progress, LevelCurve};

#[rstest]
#[case(0, 1)]
#[case(99, 1)]
#[case(100, 2)]
#[case(250, 3)]
#[case(900, 10)]
#[case(950, 10)] // capped at max level
#[case(5000, 10)]
fn test_level_for_xp(#[case] xp: u32, #[case] expected: u32) {
    let curve = LevelCurve::new(100, 10);
    assert_eq!(curve.level_for(xp), expected);
}

#[test]
fn test_progress_within_level() {
    let curve = LevelCurve::new(100, 10);

    assert_eq!(curve.progress_within(0), (0, 100));
    assert_eq!(curve.progress_within(42), (42, 100));
    assert_eq!(curve.progress_within(150), (50, 100));
}

#[test]
fn test_progress_reads_full_at_max_level() {
    let curve = LevelCurve::new(100, 10);

    assert_eq!(curve.progress_within(900), (100, 100));
    assert_eq!(curve.progress_within(12345), (100, 100));
}

#[test]
fn test_degenerate_curve_is_clamped() {
    // Zero parameters would make the division meaningless.
    let curve = LevelCurve::new(0, 0);

    assert_eq!(curve.level_for(0), 1);
    assert_eq!(curve.progress_within(7), (1, 1));
}

// Quest with target 3, advanced one step at a time: the completion signal
// fires on exactly the call that reaches the target.
#[test]
fn test_quest_completion_fires_once() {
    let target = 3;

    let (p1, done1) = advance_progress(0, 1, target);
    let (p2, done2) = advance_progress(p1, 1, target);
    let (p3, done3) = advance_progress(p2, 1, target);
    let (p4, done4) = advance_progress(p3, 1, target);

    assert_eq!((p1, done1), (1, false));
    assert_eq!((p2, done2), (2, false));
    assert_eq!((p3, done3), (3, true));
    // Progress stays clamped and completion never re-fires.
    assert_eq!((p4, done4), (3, false));
}

#[test]
fn test_overshoot_is_capped_not_banked() {
    let (progress, completed) = advance_progress(1, 10, 3);

    assert_eq!(progress, 3);
    assert!(completed);
}

#[test]
fn test_negative_amounts_do_not_regress_progress() {
    let (progress, completed) = advance_progress(2, -5, 3);

    assert_eq!(progress, 2);
    assert!(!completed);
}

#[test]
fn test_advance_from_zero_to_target_in_one_call() {
    let (progress, completed) = advance_progress(0, 3, 3);

    assert_eq!(progress, 3);
    assert!(completed);
}
