use axum::http::StatusCode;
use campus_api::middleware::error_handling::{map_error, AppError};
use campus_core::errors::CampusError;
use rstest::rstest;

#[tokio::test]
async fn test_error_handling_not_found() {
    let error = CampusError::NotFound("Event not found".to_string());

    let response = map_error(error);

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_error_handling_validation() {
    let error = CampusError::Validation("End time must be after start time".to_string());

    let response = map_error(error);

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_error_handling_authentication() {
    let error = CampusError::Authentication("Missing X-User-Id header".to_string());

    let response = map_error(error);

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_error_handling_authorization() {
    let error = CampusError::Authorization("Admin or teacher role required".to_string());

    let response = map_error(error);

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// Policy refusals are well-formed requests the domain rules denied; they
// surface as 422 so the caller can show the reason to the end user.
#[tokio::test]
async fn test_error_handling_policy() {
    let error = CampusError::Policy("Rejection reason is required".to_string());

    let response = map_error(error);

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_error_handling_database() {
    let error = CampusError::Database(eyre::eyre!("connection refused"));

    let response = map_error(error);

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[rstest]
#[case(CampusError::NotFound("x".to_string()), StatusCode::NOT_FOUND)]
#[case(CampusError::Policy("x".to_string()), StatusCode::UNPROCESSABLE_ENTITY)]
#[case(CampusError::Validation("x".to_string()), StatusCode::BAD_REQUEST)]
#[tokio::test]
async fn test_app_error_into_response(#[case] error: CampusError, #[case] expected: StatusCode) {
    use axum::response::IntoResponse;

    let response = AppError(error).into_response();

    assert_eq!(response.status(), expected);
}

#[tokio::test]
async fn test_eyre_report_maps_to_internal_error() {
    let err: AppError = eyre::eyre!("pool exhausted").into();

    let response = map_error(err.0);

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
