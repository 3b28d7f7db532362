use chrono::Utc;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{from_str, to_string};
use uuid::Uuid;

use campus_core::models::{
    booking::{BookingStatus, CreateBookingRequest, SpaceType},
    event::{CreateEventRequest, EventStatus},
    ledger::{LedgerEntry, SourceType},
    principal::{Principal, Role},
    season::{AddProgressRequest, CreateSeasonRequest},
    team::TeamRequestStatus,
};

#[test]
fn test_ledger_entry_serialization() {
    let entry = LedgerEntry {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        shanyraq_id: Some(Uuid::new_v4()),
        amount: -25,
        reason: "Missed duty".to_string(),
        source_type: SourceType::Penalty,
        source_id: None,
        approved_by: Some(Uuid::new_v4()),
        created_at: Utc::now(),
    };

    let json = to_string(&entry).expect("Failed to serialize ledger entry");
    let deserialized: LedgerEntry = from_str(&json).expect("Failed to deserialize ledger entry");

    assert_eq!(deserialized.id, entry.id);
    assert_eq!(deserialized.amount, -25);
    assert_eq!(deserialized.source_type, SourceType::Penalty);
    assert_eq!(deserialized.approved_by, entry.approved_by);
}

// Statuses are persisted as lowercase text; the strum rendering is the
// wire format.
#[rstest]
#[case(EventStatus::Draft, "draft")]
#[case(EventStatus::Pending, "pending")]
#[case(EventStatus::Approved, "approved")]
#[case(EventStatus::Rejected, "rejected")]
fn test_event_status_text(#[case] status: EventStatus, #[case] text: &str) {
    assert_eq!(status.to_string(), text);
    assert_eq!(text.parse::<EventStatus>().unwrap(), status);
}

#[rstest]
#[case(BookingStatus::Pending, "pending")]
#[case(BookingStatus::Approved, "approved")]
#[case(BookingStatus::Rejected, "rejected")]
#[case(BookingStatus::Cancelled, "cancelled")]
fn test_booking_status_text(#[case] status: BookingStatus, #[case] text: &str) {
    assert_eq!(status.to_string(), text);
    assert_eq!(text.parse::<BookingStatus>().unwrap(), status);
}

#[rstest]
#[case(BookingStatus::Pending, true)]
#[case(BookingStatus::Approved, true)]
#[case(BookingStatus::Rejected, false)]
#[case(BookingStatus::Cancelled, false)]
fn test_occupies_timeline(#[case] status: BookingStatus, #[case] occupies: bool) {
    assert_eq!(status.occupies_timeline(), occupies);
}

#[rstest]
#[case(SourceType::Event, "event")]
#[case(SourceType::Activity, "activity")]
#[case(SourceType::Admin, "admin")]
#[case(SourceType::Penalty, "penalty")]
fn test_source_type_text(#[case] source: SourceType, #[case] text: &str) {
    assert_eq!(source.to_string(), text);
    assert_eq!(text.parse::<SourceType>().unwrap(), source);
}

#[rstest]
#[case(TeamRequestStatus::Pending, "pending")]
#[case(TeamRequestStatus::Accepted, "accepted")]
#[case(TeamRequestStatus::Rejected, "rejected")]
fn test_team_request_status_text(#[case] status: TeamRequestStatus, #[case] text: &str) {
    assert_eq!(status.to_string(), text);
    assert_eq!(text.parse::<TeamRequestStatus>().unwrap(), status);
}

#[test]
fn test_role_parsing_and_moderator_capability() {
    // Role tags arrive as snake_case header values from the identity
    // provider.
    assert_eq!("student".parse::<Role>().unwrap(), Role::Student);
    assert_eq!("group_leader".parse::<Role>().unwrap(), Role::GroupLeader);
    assert_eq!("council".parse::<Role>().unwrap(), Role::Council);
    assert_eq!("teacher".parse::<Role>().unwrap(), Role::Teacher);
    assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
    assert!("principal".parse::<Role>().is_err());

    assert!(Role::Admin.is_moderator());
    assert!(Role::Teacher.is_moderator());
    assert!(!Role::Student.is_moderator());
    assert!(!Role::GroupLeader.is_moderator());
    assert!(!Role::Council.is_moderator());
}

#[test]
fn test_principal_moderator_follows_role() {
    let teacher = Principal::new(Uuid::new_v4(), Role::Teacher);
    let student = Principal::new(Uuid::new_v4(), Role::Student);

    assert!(teacher.is_moderator());
    assert!(!student.is_moderator());
}

#[test]
fn test_create_event_request_defaults() {
    let start = Utc::now();
    let json = format!(
        r#"{{"title":"Science fair","start_at":"{}","end_at":"{}"}}"#,
        start.to_rfc3339(),
        (start + chrono::Duration::hours(2)).to_rfc3339()
    );

    let request: CreateEventRequest = from_str(&json).expect("Failed to deserialize");

    assert_eq!(request.title, "Science fair");
    assert_eq!(request.description, "");
    assert_eq!(request.location, "");
    assert_eq!(request.awards_xp, 0);
}

#[test]
fn test_create_booking_request_default_attendees() {
    let start = Utc::now();
    let json = format!(
        r#"{{"start_time":"{}","end_time":"{}"}}"#,
        start.to_rfc3339(),
        (start + chrono::Duration::hours(1)).to_rfc3339()
    );

    let request: CreateBookingRequest = from_str(&json).expect("Failed to deserialize");

    assert_eq!(request.attendees_count, 1);
    assert_eq!(request.purpose, "");
}

#[test]
fn test_add_progress_request_default_amount() {
    let request: AddProgressRequest = from_str("{}").expect("Failed to deserialize");
    assert_eq!(request.amount, 1);
}

#[test]
fn test_create_season_request_default_curve() {
    let json = r#"{"name":"Autumn 2026","slug":"autumn-2026","start_date":"2026-09-01","end_date":"2026-12-20"}"#;
    let request: CreateSeasonRequest = from_str(json).expect("Failed to deserialize");

    assert_eq!(request.xp_per_level, 100);
    assert_eq!(request.max_level, 10);
}

#[test]
fn test_space_type_serialization() {
    let json = to_string(&SpaceType::Auditorium).unwrap();
    assert_eq!(json, r#""auditorium""#);

    let parsed: SpaceType = from_str(r#""lab""#).unwrap();
    assert_eq!(parsed, SpaceType::Lab);
}
