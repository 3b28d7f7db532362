use chrono::{DateTime, Utc};
use mockall::mock;
use uuid::Uuid;

use crate::models::{
    DbEvent, DbEventApprovalLog, DbLedgerEntry, DbShanyraq, DbSpaceBooking, DbTeamRequest, DbUser,
};

// Mock repositories for testing

mock! {
    pub UserRepo {
        pub async fn get_user_by_id(&self, id: Uuid) -> eyre::Result<Option<DbUser>>;

        pub async fn create_user(
            &self,
            email: &'static str,
            display_name: &'static str,
            role: &'static str,
        ) -> eyre::Result<DbUser>;
    }
}

mock! {
    pub LedgerRepo {
        pub async fn insert_entry(
            &self,
            user_id: Uuid,
            shanyraq_id: Option<Uuid>,
            amount: i64,
            reason: &'static str,
            source_type: &'static str,
        ) -> eyre::Result<DbLedgerEntry>;

        pub async fn sum_for_shanyraq(&self, shanyraq_id: Uuid) -> eyre::Result<i64>;

        pub async fn entries_for_user(
            &self,
            user_id: Uuid,
            limit: i64,
        ) -> eyre::Result<Vec<DbLedgerEntry>>;
    }
}

mock! {
    pub ShanyraqRepo {
        pub async fn get_shanyraq_by_id(&self, id: Uuid) -> eyre::Result<Option<DbShanyraq>>;

        pub async fn set_total_points(&self, id: Uuid, total: i64) -> eyre::Result<()>;

        pub async fn top_shanyraqs(&self, limit: i64) -> eyre::Result<Vec<DbShanyraq>>;
    }
}

mock! {
    pub EventRepo {
        pub async fn get_event_by_id(&self, id: Uuid) -> eyre::Result<Option<DbEvent>>;

        pub async fn transition_status(
            &self,
            id: Uuid,
            expected: &'static str,
            to: &'static str,
        ) -> eyre::Result<Option<DbEvent>>;

        pub async fn approval_logs(&self, event_id: Uuid) -> eyre::Result<Vec<DbEventApprovalLog>>;
    }
}

mock! {
    pub BookingRepo {
        pub async fn get_booking_by_id(&self, id: Uuid) -> eyre::Result<Option<DbSpaceBooking>>;

        pub async fn overlapping_active(
            &self,
            space_id: Uuid,
            start_time: DateTime<Utc>,
            end_time: DateTime<Utc>,
            exclude_booking_id: Option<Uuid>,
        ) -> eyre::Result<Vec<DbSpaceBooking>>;
    }
}

mock! {
    pub TeamRequestRepo {
        pub async fn get_request(
            &self,
            team_id: Uuid,
            user_id: Uuid,
        ) -> eyre::Result<Option<DbTeamRequest>>;

        pub async fn insert_request(
            &self,
            team_id: Uuid,
            user_id: Uuid,
            message: &'static str,
        ) -> eyre::Result<DbTeamRequest>;
    }
}
