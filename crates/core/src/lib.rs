//! # Campus Core
//!
//! Domain types and pure logic for the Campus school community platform:
//! the approval workflow engine, booking conflict resolution, the season
//! level curve, and the shared error taxonomy.
//!
//! Everything in this crate is synchronous and free of I/O; the database
//! and HTTP layers live in `campus-db` and `campus-api`.

/// Booking conflict detection and slot suggestion
pub mod conflict;
/// Shared error types for all Campus crates
pub mod errors;
/// Domain models and API request/response types
pub mod models;
/// Season level curve and quest progress math
pub mod season;
/// Generic approval workflow engine
pub mod workflow;
