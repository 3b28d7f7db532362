use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            email VARCHAR(255) NOT NULL UNIQUE,
            display_name VARCHAR(255) NOT NULL,
            role VARCHAR(32) NOT NULL DEFAULT 'student',
            lifetime_points BIGINT NOT NULL DEFAULT 0,
            season_points BIGINT NOT NULL DEFAULT 0,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create shanyraqs table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS shanyraqs (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(128) NOT NULL,
            slug VARCHAR(64) NOT NULL UNIQUE,
            total_points BIGINT NOT NULL DEFAULT 0,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create shanyraq_memberships table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS shanyraq_memberships (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL REFERENCES users(id),
            shanyraq_id UUID NOT NULL REFERENCES shanyraqs(id),
            is_leader BOOLEAN NOT NULL DEFAULT FALSE,
            joined_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            UNIQUE (user_id, shanyraq_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create point_ledger table (append-only)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS point_ledger (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL REFERENCES users(id),
            shanyraq_id UUID REFERENCES shanyraqs(id),
            amount BIGINT NOT NULL,
            reason VARCHAR(255) NOT NULL DEFAULT '',
            source_type VARCHAR(20) NOT NULL DEFAULT 'admin',
            source_id UUID NULL,
            approved_by UUID NULL REFERENCES users(id),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT nonzero_amount CHECK (amount <> 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create events table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            title VARCHAR(255) NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            start_at TIMESTAMP WITH TIME ZONE NOT NULL,
            end_at TIMESTAMP WITH TIME ZONE NOT NULL,
            location VARCHAR(255) NOT NULL DEFAULT '',
            status VARCHAR(20) NOT NULL DEFAULT 'draft',
            awards_xp BIGINT NOT NULL DEFAULT 0,
            created_by UUID NOT NULL REFERENCES users(id),
            rejection_comment TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_event_range CHECK (end_at > start_at)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create event_approval_logs table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS event_approval_logs (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            event_id UUID NOT NULL REFERENCES events(id),
            from_status VARCHAR(20) NOT NULL,
            to_status VARCHAR(20) NOT NULL,
            changed_by UUID NOT NULL REFERENCES users(id),
            comment TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create spaces table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS spaces (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            space_type VARCHAR(20) NOT NULL DEFAULT 'other',
            capacity INTEGER NOT NULL DEFAULT 0,
            location VARCHAR(255) NOT NULL DEFAULT '',
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create space_bookings table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS space_bookings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            space_id UUID NOT NULL REFERENCES spaces(id),
            booked_by UUID NOT NULL REFERENCES users(id),
            start_time TIMESTAMP WITH TIME ZONE NOT NULL,
            end_time TIMESTAMP WITH TIME ZONE NOT NULL,
            purpose TEXT NOT NULL DEFAULT '',
            attendees_count INTEGER NOT NULL DEFAULT 1,
            status VARCHAR(20) NOT NULL DEFAULT 'pending',
            reviewed_by UUID NULL REFERENCES users(id),
            reviewed_at TIMESTAMP WITH TIME ZONE NULL,
            rejection_reason TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_booking_range CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create booking_approval_logs table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS booking_approval_logs (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            booking_id UUID NOT NULL REFERENCES space_bookings(id),
            from_status VARCHAR(20) NOT NULL DEFAULT '',
            to_status VARCHAR(20) NOT NULL,
            changed_by UUID NOT NULL REFERENCES users(id),
            comment TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create seasons table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS seasons (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(128) NOT NULL,
            slug VARCHAR(64) NOT NULL UNIQUE,
            start_date DATE NOT NULL,
            end_date DATE NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            xp_per_level INTEGER NOT NULL DEFAULT 100,
            max_level INTEGER NOT NULL DEFAULT 10,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create quests table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS quests (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            season_id UUID NOT NULL REFERENCES seasons(id),
            quest_type VARCHAR(20) NOT NULL DEFAULT 'milestone',
            title VARCHAR(255) NOT NULL,
            target INTEGER NOT NULL DEFAULT 1,
            xp_reward BIGINT NOT NULL DEFAULT 25,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT positive_target CHECK (target >= 1)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create user_quest_progress table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_quest_progress (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL REFERENCES users(id),
            quest_id UUID NOT NULL REFERENCES quests(id),
            current_progress INTEGER NOT NULL DEFAULT 0,
            completed_at TIMESTAMP WITH TIME ZONE NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            UNIQUE (user_id, quest_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create season_rewards table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS season_rewards (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            season_id UUID NOT NULL REFERENCES seasons(id),
            level INTEGER NOT NULL,
            name VARCHAR(128) NOT NULL,
            reward_type VARCHAR(20) NOT NULL DEFAULT 'other',
            UNIQUE (season_id, level)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create user_rewards table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_rewards (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL REFERENCES users(id),
            season_reward_id UUID NOT NULL REFERENCES season_rewards(id),
            claimed_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            UNIQUE (user_id, season_reward_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create teams table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS teams (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            created_by UUID NOT NULL REFERENCES users(id),
            is_open BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create team_members table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS team_members (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            team_id UUID NOT NULL REFERENCES teams(id),
            user_id UUID NOT NULL REFERENCES users(id),
            is_leader BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            UNIQUE (team_id, user_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create team_requests table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS team_requests (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            team_id UUID NOT NULL REFERENCES teams(id),
            user_id UUID NOT NULL REFERENCES users(id),
            message TEXT NOT NULL DEFAULT '',
            status VARCHAR(20) NOT NULL DEFAULT 'pending',
            invited_by UUID NULL REFERENCES users(id),
            reviewed_by UUID NULL REFERENCES users(id),
            reviewed_at TIMESTAMP WITH TIME ZONE NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            UNIQUE (team_id, user_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create notifications table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS notifications (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL REFERENCES users(id),
            title VARCHAR(255) NOT NULL,
            message TEXT NOT NULL DEFAULT '',
            notification_type VARCHAR(30) NOT NULL DEFAULT 'system',
            is_read BOOLEAN NOT NULL DEFAULT FALSE,
            related_id UUID NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_memberships_user_id ON shanyraq_memberships(user_id);
        CREATE INDEX IF NOT EXISTS idx_memberships_shanyraq_id ON shanyraq_memberships(shanyraq_id);
        CREATE INDEX IF NOT EXISTS idx_point_ledger_user_id ON point_ledger(user_id);
        CREATE INDEX IF NOT EXISTS idx_point_ledger_shanyraq_id ON point_ledger(shanyraq_id);
        CREATE INDEX IF NOT EXISTS idx_events_status ON events(status);
        CREATE INDEX IF NOT EXISTS idx_event_logs_event_id ON event_approval_logs(event_id);
        CREATE INDEX IF NOT EXISTS idx_bookings_space_time ON space_bookings(space_id, start_time, end_time);
        CREATE INDEX IF NOT EXISTS idx_bookings_status_start ON space_bookings(status, start_time);
        CREATE INDEX IF NOT EXISTS idx_booking_logs_booking_id ON booking_approval_logs(booking_id);
        CREATE INDEX IF NOT EXISTS idx_quests_season_id ON quests(season_id);
        CREATE INDEX IF NOT EXISTS idx_quest_progress_user_id ON user_quest_progress(user_id);
        CREATE INDEX IF NOT EXISTS idx_team_members_team_id ON team_members(team_id);
        CREATE INDEX IF NOT EXISTS idx_team_requests_team_id ON team_requests(team_id);
        CREATE INDEX IF NOT EXISTS idx_notifications_user_id ON notifications(user_id, is_read);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
