use pretty_assertions::assert_eq;
use rstest::rstest;
use uuid::Uuid;

use campus_core::errors::CampusError;
use campus_core::models::booking::BookingStatus;
use campus_core::models::event::EventStatus;
use campus_core::models::principal::{Principal, Role};
use campus_core::workflow::{booking_workflow, event_workflow, Outcome};

fn student() -> Principal {
    Principal::new(Uuid::new_v4(), Role::Student)
}

fn teacher() -> Principal {
    Principal::new(Uuid::new_v4(), Role::Teacher)
}

#[test]
fn creator_submits_draft_event() {
    let creator = student();

    let resolved = event_workflow()
        .check(
            EventStatus::Draft,
            EventStatus::Pending,
            &creator,
            Some(creator.id),
            None,
        )
        .expect("creator should be able to submit a draft");

    assert_eq!(resolved.from, EventStatus::Draft);
    assert_eq!(resolved.to, EventStatus::Pending);
    assert_eq!(resolved.comment, "Submitted for approval");
}

#[test]
fn non_creator_cannot_submit() {
    let creator_id = Uuid::new_v4();
    let stranger = student();

    let denial = event_workflow()
        .check(
            EventStatus::Draft,
            EventStatus::Pending,
            &stranger,
            Some(creator_id),
            None,
        )
        .unwrap_err();

    assert!(denial.reason().contains("creator"));
}

#[rstest]
#[case(Role::Admin)]
#[case(Role::Teacher)]
fn moderator_approves_pending_event(#[case] role: Role) {
    let moderator = Principal::new(Uuid::new_v4(), role);

    let resolved = event_workflow()
        .check(
            EventStatus::Pending,
            EventStatus::Approved,
            &moderator,
            Some(Uuid::new_v4()),
            Some("Looks good"),
        )
        .expect("moderator should approve");

    assert_eq!(resolved.comment, "Looks good");
}

#[rstest]
#[case(Role::Student)]
#[case(Role::GroupLeader)]
#[case(Role::Council)]
fn non_moderator_cannot_approve(#[case] role: Role) {
    let actor = Principal::new(Uuid::new_v4(), role);

    let denial = event_workflow()
        .check(
            EventStatus::Pending,
            EventStatus::Approved,
            &actor,
            Some(actor.id),
            None,
        )
        .unwrap_err();

    assert!(denial.reason().contains("admin or teacher"));
}

#[rstest]
#[case(None)]
#[case(Some(""))]
#[case(Some("   "))]
fn rejection_requires_a_reason(#[case] comment: Option<&str>) {
    let denial = event_workflow()
        .check(
            EventStatus::Pending,
            EventStatus::Rejected,
            &teacher(),
            Some(Uuid::new_v4()),
            comment,
        )
        .unwrap_err();

    assert_eq!(denial.reason(), "Rejection reason is required");
}

#[test]
fn rejection_with_reason_carries_it_to_the_log() {
    let resolved = event_workflow()
        .check(
            EventStatus::Pending,
            EventStatus::Rejected,
            &teacher(),
            Some(Uuid::new_v4()),
            Some("  Venue unavailable  "),
        )
        .expect("rejection with reason should resolve");

    assert_eq!(resolved.comment, "Venue unavailable");
}

// Illegal walks of the transition table are refused regardless of actor.
#[rstest]
#[case(EventStatus::Approved, EventStatus::Rejected)]
#[case(EventStatus::Rejected, EventStatus::Approved)]
#[case(EventStatus::Draft, EventStatus::Approved)]
#[case(EventStatus::Approved, EventStatus::Pending)]
fn illegal_event_transitions_are_denied(#[case] from: EventStatus, #[case] to: EventStatus) {
    let denial = event_workflow()
        .check(from, to, &teacher(), Some(Uuid::new_v4()), Some("why not"))
        .unwrap_err();

    assert!(denial.reason().contains("cannot move"));
}

#[test]
fn booking_creator_cancels_pending() {
    let creator = student();

    let resolved = booking_workflow()
        .check(
            BookingStatus::Pending,
            BookingStatus::Cancelled,
            &creator,
            Some(creator.id),
            None,
        )
        .expect("creator should cancel their own booking");

    assert_eq!(resolved.comment, "Cancelled by user");
}

#[test]
fn moderator_cancels_approved_booking() {
    let resolved = booking_workflow()
        .check(
            BookingStatus::Approved,
            BookingStatus::Cancelled,
            &teacher(),
            Some(Uuid::new_v4()),
            Some("Space closed for repairs"),
        )
        .expect("moderator should cancel an approved booking");

    assert_eq!(resolved.comment, "Space closed for repairs");
}

#[test]
fn stranger_cannot_cancel_booking() {
    let denial = booking_workflow()
        .check(
            BookingStatus::Pending,
            BookingStatus::Cancelled,
            &student(),
            Some(Uuid::new_v4()),
            None,
        )
        .unwrap_err();

    assert!(denial.reason().contains("creator"));
}

#[test]
fn cancelled_booking_is_terminal() {
    let denial = booking_workflow()
        .check(
            BookingStatus::Cancelled,
            BookingStatus::Pending,
            &teacher(),
            Some(Uuid::new_v4()),
            None,
        )
        .unwrap_err();

    assert!(denial.reason().contains("cannot move"));
}

#[test]
fn outcome_denied_maps_to_policy_error() {
    let outcome: Outcome<()> = Outcome::denied("Time slot now conflicts with 1 approved booking(s)");
    assert!(outcome.is_denied());

    let err = outcome.into_result().unwrap_err();
    match err {
        CampusError::Policy(reason) => {
            assert_eq!(reason, "Time slot now conflicts with 1 approved booking(s)");
        }
        other => panic!("expected policy error, got {:?}", other),
    }
}

#[test]
fn outcome_applied_passes_value_through() {
    let outcome = Outcome::Applied(7);
    assert_eq!(outcome.into_result().unwrap(), 7);
}
