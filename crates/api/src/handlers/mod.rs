/// Event approval workflow endpoints
pub mod events;
/// Notification listing and read-marking
pub mod notifications;
/// Points ledger, leaderboards, and contribution breakdowns
pub mod points;
/// Season, quest progress, and reward track endpoints
pub mod season;
/// Shanyraq groups, membership, and aggregate recomputation
pub mod shanyraq;
/// Spaces and booking workflow endpoints
pub mod spaces;
/// Team formation workflow endpoints
pub mod teams;
/// User provisioning and cached-balance maintenance
pub mod users;
