//! Workflow services: each module owns one engine and composes the
//! repositories into atomic units (state mutation + audit log + dependent
//! aggregate recompute in a single transaction).

pub mod bookings;
pub mod events;
pub mod notify;
pub mod points;
pub mod season;
pub mod teams;
