/// Error mapping from domain errors to HTTP responses
pub mod error_handling;
/// Principal extraction from identity-provider headers
pub mod identity;
