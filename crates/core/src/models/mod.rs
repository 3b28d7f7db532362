pub mod booking;
pub mod event;
pub mod ledger;
pub mod notification;
pub mod principal;
pub mod season;
pub mod shanyraq;
pub mod team;
pub mod user;
