pub mod event;
pub mod ledger;
pub mod notification;
pub mod season;
pub mod shanyraq;
pub mod space;
pub mod team;
pub mod user;
