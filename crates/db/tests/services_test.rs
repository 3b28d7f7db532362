//! Integration tests for the workflow services. They run against a real
//! Postgres database (TEST_DATABASE_URL, defaulting to a local
//! campus_test database) and are `#[ignore]`d so plain `cargo test` stays
//! green without one. Run them with `cargo test -- --ignored`.

use campus_core::models::booking::{BookingStatus, CreateBookingRequest};
use campus_core::models::event::{CreateEventRequest, EventStatus};
use campus_core::models::ledger::SourceType;
use campus_core::models::principal::{Principal, Role};
use campus_core::workflow::Outcome;
use campus_db::mock::create_test_pool;
use campus_db::models::{DbShanyraq, DbSpace, DbUser};
use campus_db::services::{bookings, events, points, season, teams};
use campus_db::{repositories, DbPool};
use chrono::{DateTime, Duration, Utc};
use pretty_assertions::assert_eq;
use uuid::Uuid;

async fn make_user(pool: &DbPool, role: Role) -> DbUser {
    let email = format!("{}@test.campus", Uuid::new_v4());
    repositories::user::create_user(pool, &email, "Test User", &role.to_string())
        .await
        .expect("create user")
}

async fn make_shanyraq(pool: &DbPool) -> DbShanyraq {
    let slug = format!("group-{}", Uuid::new_v4());
    repositories::shanyraq::create_shanyraq(pool, "Test Shanyraq", &slug)
        .await
        .expect("create shanyraq")
}

async fn make_space(pool: &DbPool) -> DbSpace {
    repositories::space::create_space(pool, "Room 101", "classroom", 30, "Main building")
        .await
        .expect("create space")
}

fn principal(user: &DbUser) -> Principal {
    Principal::new(user.id, user.role.parse().expect("role parses"))
}

/// Tomorrow at the given hour, far enough in the future to book.
fn tomorrow_at(hour: u32, minute: u32) -> DateTime<Utc> {
    (Utc::now() + Duration::days(1))
        .date_naive()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
        .and_utc()
}

async fn post_amount(pool: &DbPool, user_id: Uuid, amount: i64) {
    points::post(
        pool,
        points::PostPoints {
            user_id,
            shanyraq_id: None,
            amount,
            reason: "test post".to_string(),
            source_type: SourceType::Event,
            source_id: None,
            approved_by: None,
        },
    )
    .await
    .expect("post points");
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn posting_credits_user_and_group_caches() {
    let pool = create_test_pool().await;
    let user = make_user(&pool, Role::Student).await;
    let group = make_shanyraq(&pool).await;
    repositories::shanyraq::add_member(&pool, user.id, group.id, false)
        .await
        .expect("join group");

    post_amount(&pool, user.id, 50).await;

    let user = repositories::user::get_user_by_id(&pool, user.id)
        .await
        .unwrap()
        .unwrap();
    let group = repositories::shanyraq::get_shanyraq_by_id(&pool, group.id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(user.lifetime_points, 50);
    assert_eq!(user.season_points, 50);
    assert_eq!(group.total_points, 50);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn cached_total_equals_clamped_ledger_sum() {
    let pool = create_test_pool().await;
    let user = make_user(&pool, Role::Student).await;
    let group = make_shanyraq(&pool).await;
    repositories::shanyraq::add_member(&pool, user.id, group.id, false)
        .await
        .expect("join group");

    post_amount(&pool, user.id, 30).await;
    points::revoke(&pool, user.id, None, 100, "penalty", None)
        .await
        .expect("revoke");

    let refreshed = repositories::shanyraq::get_shanyraq_by_id(&pool, group.id)
        .await
        .unwrap()
        .unwrap();
    // Display total is clamped at zero...
    assert_eq!(refreshed.total_points, 0);

    // ...while the raw ledger still carries the negative history.
    let mut conn = pool.acquire().await.unwrap();
    let raw_sum = repositories::ledger::sum_for_shanyraq(&mut conn, group.id)
        .await
        .unwrap();
    assert_eq!(raw_sum, -70);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn zero_amount_post_is_a_no_op() {
    let pool = create_test_pool().await;
    let user = make_user(&pool, Role::Student).await;

    let entry = points::post(
        &pool,
        points::PostPoints {
            user_id: user.id,
            shanyraq_id: None,
            amount: 0,
            reason: "nothing".to_string(),
            source_type: SourceType::Admin,
            source_id: None,
            approved_by: None,
        },
    )
    .await
    .expect("zero post should not error");

    assert!(entry.is_none());

    let refreshed = repositories::user::get_user_by_id(&pool, user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(refreshed.lifetime_points, 0);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn revoking_non_positive_magnitude_is_an_error() {
    let pool = create_test_pool().await;
    let user = make_user(&pool, Role::Student).await;

    let result = points::revoke(&pool, user.id, None, 0, "nothing", None).await;
    assert!(result.is_err());

    let result = points::revoke(&pool, user.id, None, -5, "nothing", None).await;
    assert!(result.is_err());
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn overlapping_booking_creation_is_refused() {
    let pool = create_test_pool().await;
    let student = make_user(&pool, Role::Student).await;
    let space = make_space(&pool).await;
    let actor = principal(&student);

    let b1 = bookings::create_booking(
        &pool,
        &actor,
        space.id,
        &CreateBookingRequest {
            start_time: tomorrow_at(10, 0),
            end_time: tomorrow_at(11, 0),
            purpose: "Club meeting".to_string(),
            attendees_count: 5,
        },
    )
    .await
    .expect("first booking");
    let b1 = match b1 {
        bookings::BookingCreation::Created(b) => b,
        bookings::BookingCreation::Conflicted(_) => panic!("first booking should not conflict"),
    };

    // 10:30-11:30 overlaps 10:00-11:00.
    let b2 = bookings::create_booking(
        &pool,
        &actor,
        space.id,
        &CreateBookingRequest {
            start_time: tomorrow_at(10, 30),
            end_time: tomorrow_at(11, 30),
            purpose: "Rehearsal".to_string(),
            attendees_count: 5,
        },
    )
    .await
    .expect("second booking call");

    match b2 {
        bookings::BookingCreation::Conflicted(conflicts) => {
            assert_eq!(conflicts.len(), 1);
            assert_eq!(conflicts[0].id, b1.id);
        }
        bookings::BookingCreation::Created(_) => panic!("overlapping booking must be refused"),
    }

    // A disjoint slot is fine even after b1 is approved.
    let moderator = make_user(&pool, Role::Teacher).await;
    bookings::approve(&pool, b1.id, &principal(&moderator), None)
        .await
        .expect("approve call")
        .into_result()
        .expect("approval applies");

    let b3 = bookings::create_booking(
        &pool,
        &actor,
        space.id,
        &CreateBookingRequest {
            start_time: tomorrow_at(12, 0),
            end_time: tomorrow_at(13, 0),
            purpose: "Study group".to_string(),
            attendees_count: 5,
        },
    )
    .await
    .expect("third booking call");
    assert!(matches!(b3, bookings::BookingCreation::Created(_)));
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn first_approved_booking_wins_the_race() {
    let pool = create_test_pool().await;
    let student = make_user(&pool, Role::Student).await;
    let moderator = make_user(&pool, Role::Teacher).await;
    let space = make_space(&pool).await;

    // Two overlapping pending bookings, inserted directly to simulate the
    // creation race the service-level conflict check cannot see.
    let mut conn = pool.acquire().await.unwrap();
    let b1 = repositories::space::insert_booking(
        &mut conn,
        space.id,
        student.id,
        tomorrow_at(10, 0),
        tomorrow_at(11, 0),
        "First request",
        5,
    )
    .await
    .unwrap();
    let b2 = repositories::space::insert_booking(
        &mut conn,
        space.id,
        student.id,
        tomorrow_at(10, 30),
        tomorrow_at(11, 30),
        "Second request",
        5,
    )
    .await
    .unwrap();
    drop(conn);

    let actor = principal(&moderator);
    bookings::approve(&pool, b1.id, &actor, None)
        .await
        .expect("approve call")
        .into_result()
        .expect("first approval applies");

    let outcome = bookings::approve(&pool, b2.id, &actor, None)
        .await
        .expect("approve call");
    match outcome {
        Outcome::Denied(denial) => {
            assert!(denial.reason().contains("1 approved booking"));
        }
        Outcome::Applied(_) => panic!("second approval must lose the race"),
    }

    // The loser is still pending and can be explicitly rejected.
    let refreshed = repositories::space::get_booking_by_id(&pool, b2.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(refreshed.status, BookingStatus::Pending.to_string());
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn rejecting_event_without_reason_leaves_no_trace() {
    let pool = create_test_pool().await;
    let creator = make_user(&pool, Role::Student).await;
    let moderator = make_user(&pool, Role::Teacher).await;

    let event = events::create_event(
        &pool,
        &principal(&creator),
        &CreateEventRequest {
            title: "Science fair".to_string(),
            description: String::new(),
            start_at: tomorrow_at(9, 0),
            end_at: tomorrow_at(17, 0),
            location: "Gym".to_string(),
            awards_xp: 20,
        },
    )
    .await
    .expect("create event");

    events::submit(&pool, event.id, &principal(&creator))
        .await
        .expect("submit call")
        .into_result()
        .expect("submit applies");

    let outcome = events::reject(&pool, event.id, &principal(&moderator), Some("  "))
        .await
        .expect("reject call");
    assert!(outcome.is_denied());

    let refreshed = repositories::event::get_event_by_id(&pool, event.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(refreshed.status, EventStatus::Pending.to_string());

    // Only the submit transition is in the audit trail.
    let logs = repositories::event::approval_logs(&pool, event.id)
        .await
        .unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].to_status, EventStatus::Pending.to_string());
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn approval_log_is_a_legal_walk() {
    let pool = create_test_pool().await;
    let creator = make_user(&pool, Role::Student).await;
    let moderator = make_user(&pool, Role::Admin).await;

    let event = events::create_event(
        &pool,
        &principal(&creator),
        &CreateEventRequest {
            title: "Debate night".to_string(),
            description: String::new(),
            start_at: tomorrow_at(18, 0),
            end_at: tomorrow_at(20, 0),
            location: String::new(),
            awards_xp: 0,
        },
    )
    .await
    .expect("create event");

    events::submit(&pool, event.id, &principal(&creator))
        .await
        .unwrap()
        .into_result()
        .unwrap();
    events::approve(&pool, event.id, &principal(&moderator), None)
        .await
        .unwrap()
        .into_result()
        .unwrap();

    let logs = repositories::event::approval_logs(&pool, event.id)
        .await
        .unwrap();
    assert_eq!(logs.len(), 2);
    // Each entry's from_status matches the status the item held before it.
    assert_eq!(logs[0].from_status, EventStatus::Draft.to_string());
    assert_eq!(logs[0].to_status, EventStatus::Pending.to_string());
    assert_eq!(logs[1].from_status, EventStatus::Pending.to_string());
    assert_eq!(logs[1].to_status, EventStatus::Approved.to_string());
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn quest_completion_fires_exactly_once() {
    let pool = create_test_pool().await;
    let user = make_user(&pool, Role::Student).await;

    let today = Utc::now().date_naive();
    let season_row = repositories::season::create_season(
        &pool,
        "Test Season",
        &format!("season-{}", Uuid::new_v4()),
        today - Duration::days(7),
        today + Duration::days(7),
        100,
        10,
    )
    .await
    .unwrap();
    let quest = repositories::season::create_quest(
        &pool,
        season_row.id,
        "weekly",
        "Attend three events",
        3,
        50,
    )
    .await
    .unwrap();

    let (p1, c1) = season::add_progress(&pool, user.id, quest.id, 1).await.unwrap();
    let (p2, c2) = season::add_progress(&pool, user.id, quest.id, 1).await.unwrap();
    let (p3, c3) = season::add_progress(&pool, user.id, quest.id, 1).await.unwrap();
    let (p4, c4) = season::add_progress(&pool, user.id, quest.id, 1).await.unwrap();

    assert_eq!((p1.current_progress, c1), (1, false));
    assert_eq!((p2.current_progress, c2), (2, false));
    assert_eq!((p3.current_progress, c3), (3, true));
    assert!(p3.completed_at.is_some());
    // Idempotent after completion.
    assert_eq!((p4.current_progress, c4), (3, false));

    // Completion posted the XP reward to the ledger.
    let refreshed = repositories::user::get_user_by_id(&pool, user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(refreshed.lifetime_points, 50);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn reward_claim_is_exactly_once() {
    let pool = create_test_pool().await;
    let user = make_user(&pool, Role::Student).await;

    let today = Utc::now().date_naive();
    let season_row = repositories::season::create_season(
        &pool,
        "Claim Season",
        &format!("season-{}", Uuid::new_v4()),
        today - Duration::days(7),
        today + Duration::days(7),
        100,
        10,
    )
    .await
    .unwrap();
    repositories::season::create_reward(&pool, season_row.id, 2, "Sticker pack", "cosmetic")
        .await
        .unwrap();

    // 250 XP puts the user at level 3.
    post_amount(&pool, user.id, 250).await;

    let first = season::claim_reward(&pool, user.id, season_row.id, 2)
        .await
        .expect("claim call");
    assert!(matches!(first, Outcome::Applied(_)));

    let second = season::claim_reward(&pool, user.id, season_row.id, 2)
        .await
        .expect("claim call");
    match second {
        Outcome::Denied(denial) => assert_eq!(denial.reason(), "Already claimed"),
        Outcome::Applied(_) => panic!("second claim must be refused"),
    }
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn reward_claim_requires_the_level() {
    let pool = create_test_pool().await;
    let user = make_user(&pool, Role::Student).await;

    let today = Utc::now().date_naive();
    let season_row = repositories::season::create_season(
        &pool,
        "Locked Season",
        &format!("season-{}", Uuid::new_v4()),
        today - Duration::days(7),
        today + Duration::days(7),
        100,
        10,
    )
    .await
    .unwrap();
    repositories::season::create_reward(&pool, season_row.id, 5, "Hoodie", "cosmetic")
        .await
        .unwrap();

    let outcome = season::claim_reward(&pool, user.id, season_row.id, 5)
        .await
        .expect("claim call");
    match outcome {
        Outcome::Denied(denial) => assert_eq!(denial.reason(), "Level too low"),
        Outcome::Applied(_) => panic!("claim below level must be refused"),
    }
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn reapplying_while_pending_is_refused() {
    let pool = create_test_pool().await;
    let leader = make_user(&pool, Role::Student).await;
    let applicant = make_user(&pool, Role::Student).await;

    let team = teams::create_team(&pool, &principal(&leader), "Robotics", "We build robots")
        .await
        .expect("create team");

    let first = teams::apply(&pool, team.id, &principal(&applicant), "Let me in")
        .await
        .expect("apply call");
    assert!(matches!(first, Outcome::Applied(_)));

    let second = teams::apply(&pool, team.id, &principal(&applicant), "Please?")
        .await
        .expect("apply call");
    match second {
        Outcome::Denied(denial) => assert_eq!(denial.reason(), "Application already pending"),
        Outcome::Applied(_) => panic!("second application must be refused"),
    }

    // One request row exists for the pair.
    let request = repositories::team::get_request(&pool, team.id, applicant.id)
        .await
        .unwrap();
    assert!(request.is_some());
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn rejected_application_resets_to_pending() {
    let pool = create_test_pool().await;
    let leader = make_user(&pool, Role::Student).await;
    let applicant = make_user(&pool, Role::Student).await;

    let team = teams::create_team(&pool, &principal(&leader), "Chess club", "")
        .await
        .unwrap();

    let request = teams::apply(&pool, team.id, &principal(&applicant), "First try")
        .await
        .unwrap()
        .into_result()
        .unwrap();
    teams::reject(&pool, request.id, &principal(&leader))
        .await
        .unwrap()
        .into_result()
        .unwrap();

    // Re-application after rejection starts a fresh pending request.
    let again = teams::apply(&pool, team.id, &principal(&applicant), "Second try")
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(again.status, "pending");
    assert_eq!(again.message, "Second try");
    assert!(again.reviewed_by.is_none());
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn last_leader_cannot_leave() {
    let pool = create_test_pool().await;
    let leader = make_user(&pool, Role::Student).await;

    let team = teams::create_team(&pool, &principal(&leader), "Drama club", "")
        .await
        .unwrap();

    let outcome = teams::leave(&pool, team.id, &principal(&leader))
        .await
        .expect("leave call");
    match outcome {
        Outcome::Denied(denial) => {
            assert_eq!(denial.reason(), "Transfer leadership before leaving")
        }
        Outcome::Applied(_) => panic!("last leader must not leave"),
    }
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn invited_user_can_self_accept() {
    let pool = create_test_pool().await;
    let leader = make_user(&pool, Role::Student).await;
    let invitee = make_user(&pool, Role::Student).await;

    let team = teams::create_team(&pool, &principal(&leader), "Choir", "")
        .await
        .unwrap();

    let request = teams::invite(&pool, team.id, &principal(&leader), invitee.id, "Join us")
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(request.invited_by, Some(leader.id));

    let member = teams::accept(&pool, request.id, &principal(&invitee))
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(member.user_id, invitee.id);
    assert!(!member.is_leader);

    // Accepting the same request again is a hard failure.
    let again = teams::accept(&pool, request.id, &principal(&invitee))
        .await
        .expect("accept call");
    assert!(again.is_denied());
}
