use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SpaceType {
    Classroom,
    Auditorium,
    Lab,
    Conference,
    Sports,
    Other,
}

/// Booking lifecycle: Pending -> Approved | Rejected, with Cancelled
/// reachable from Pending or Approved.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl BookingStatus {
    /// Pending and approved bookings occupy the timeline; rejected and
    /// cancelled ones never block.
    pub fn occupies_timeline(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Approved)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Space {
    pub id: Uuid,
    pub name: String,
    pub space_type: SpaceType,
    pub capacity: i32,
    pub location: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceBooking {
    pub id: Uuid,
    pub space_id: Uuid,
    pub booked_by: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub purpose: String,
    pub attendees_count: i32,
    pub status: BookingStatus,
    pub rejection_reason: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSpaceRequest {
    pub name: String,
    pub space_type: SpaceType,
    pub capacity: i32,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub purpose: String,
    #[serde(default = "default_attendees")]
    pub attendees_count: i32,
}

fn default_attendees() -> i32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub space_id: Uuid,
    pub booked_by: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub purpose: String,
    pub attendees_count: i32,
    pub status: String,
    pub rejection_reason: String,
    pub created_at: DateTime<Utc>,
}

/// Creation result: the new pending booking, or the bookings blocking the
/// requested span.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingResponse {
    pub booking: Option<BookingResponse>,
    pub conflicts: Vec<BookingResponse>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceResponse {
    pub id: Uuid,
    pub name: String,
    pub space_type: String,
    pub capacity: i32,
    pub location: String,
    pub is_active: bool,
}

/// Query parameters for the availability check endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityQuery {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub available: bool,
    pub conflicts: Vec<BookingResponse>,
}

/// Query parameters for the slot suggestion endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestQuery {
    pub date: NaiveDate,
    #[serde(default = "default_duration_hours")]
    pub duration_hours: u32,
    pub count: Option<usize>,
}

fn default_duration_hours() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotSuggestion {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<SlotSuggestion>,
}
