/// Event approval workflow routes
pub mod events;
/// Health and version probes
pub mod health;
/// Notification routes
pub mod notifications;
/// Points ledger and leaderboard routes
pub mod points;
/// Season, quest, and reward routes
pub mod season;
/// Shanyraq group routes
pub mod shanyraq;
/// Space and booking routes
pub mod spaces;
/// Team formation routes
pub mod teams;
/// User provisioning routes
pub mod users;
