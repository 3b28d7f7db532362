use campus_api::middleware::identity::{principal_from_headers, require_moderator};
use campus_core::errors::CampusError;
use campus_core::models::principal::{Principal, Role};
use pretty_assertions::assert_eq;
use rstest::rstest;
use uuid::Uuid;

#[test]
fn test_valid_headers_produce_a_principal() {
    let id = Uuid::new_v4();

    let principal = principal_from_headers(Some(&id.to_string()), Some("teacher"))
        .expect("valid headers should parse");

    assert_eq!(principal.id, id);
    assert_eq!(principal.role, Role::Teacher);
}

#[test]
fn test_missing_user_id_is_rejected() {
    let err = principal_from_headers(None, Some("student")).unwrap_err();

    assert!(matches!(err, CampusError::Authentication(_)));
    assert!(err.to_string().contains("X-User-Id"));
}

#[test]
fn test_malformed_user_id_is_rejected() {
    let err = principal_from_headers(Some("not-a-uuid"), Some("student")).unwrap_err();

    assert!(matches!(err, CampusError::Authentication(_)));
}

#[test]
fn test_missing_role_is_rejected() {
    let id = Uuid::new_v4().to_string();

    let err = principal_from_headers(Some(&id), None).unwrap_err();

    assert!(matches!(err, CampusError::Authentication(_)));
    assert!(err.to_string().contains("X-User-Role"));
}

#[test]
fn test_unknown_role_is_rejected() {
    let id = Uuid::new_v4().to_string();

    let err = principal_from_headers(Some(&id), Some("janitor")).unwrap_err();

    assert!(err.to_string().contains("janitor"));
}

#[rstest]
#[case("student", Role::Student)]
#[case("group_leader", Role::GroupLeader)]
#[case("council", Role::Council)]
#[case("teacher", Role::Teacher)]
#[case("admin", Role::Admin)]
fn test_all_roles_parse(#[case] header: &str, #[case] expected: Role) {
    let id = Uuid::new_v4().to_string();

    let principal = principal_from_headers(Some(&id), Some(header)).unwrap();

    assert_eq!(principal.role, expected);
}

#[rstest]
#[case(Role::Admin, true)]
#[case(Role::Teacher, true)]
#[case(Role::Student, false)]
#[case(Role::GroupLeader, false)]
#[case(Role::Council, false)]
fn test_moderator_guard(#[case] role: Role, #[case] allowed: bool) {
    let principal = Principal::new(Uuid::new_v4(), role);

    assert_eq!(require_moderator(&principal).is_ok(), allowed);
}
