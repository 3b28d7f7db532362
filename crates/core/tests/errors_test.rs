use campus_core::errors::{CampusError, CampusResult};
use std::error::Error;

#[test]
fn test_campus_error_display() {
    let not_found = CampusError::NotFound("Event not found".to_string());
    let validation = CampusError::Validation("Invalid input".to_string());
    let authentication = CampusError::Authentication("Missing identity header".to_string());
    let authorization = CampusError::Authorization("Not authorized".to_string());
    let policy = CampusError::Policy("Rejection reason is required".to_string());
    let database = CampusError::Database(eyre::eyre!("Database connection failed"));
    let internal = CampusError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    )));

    assert_eq!(not_found.to_string(), "Resource not found: Event not found");
    assert_eq!(validation.to_string(), "Validation error: Invalid input");
    assert_eq!(
        authentication.to_string(),
        "Authentication error: Missing identity header"
    );
    assert_eq!(
        authorization.to_string(),
        "Authorization error: Not authorized"
    );
    // Policy denials carry only the human-readable reason; the text is
    // shown to the end user verbatim.
    assert_eq!(policy.to_string(), "Rejection reason is required");
    assert!(database.to_string().contains("Database error:"));
    assert!(internal.to_string().contains("Internal server error:"));
}

#[test]
fn test_error_source() {
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "IO error");
    let campus_error = CampusError::Internal(Box::new(io_error));

    assert!(campus_error.source().is_some());
}

#[test]
fn test_campus_result() {
    let result: CampusResult<i32> = Ok(42);
    assert_eq!(result.unwrap(), 42);

    let result: CampusResult<i32> = Err(CampusError::NotFound("Not found".to_string()));
    assert!(result.is_err());
}

#[test]
fn test_from_eyre_report() {
    let report = eyre::eyre!("connection refused");
    let campus_error = CampusError::Database(report);

    assert!(campus_error.to_string().contains("connection refused"));
}

#[test]
fn test_box_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "IO error");
    let boxed_error: Box<dyn Error + Send + Sync> = Box::new(io_error);
    let campus_error = CampusError::Internal(boxed_error);

    assert!(campus_error.to_string().contains("IO error"));
}
