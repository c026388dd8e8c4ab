use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Needed for the equality part of the overlap exclusion constraint
    sqlx::query("CREATE EXTENSION IF NOT EXISTS btree_gist;")
        .execute(pool)
        .await?;

    // Create doctors table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS doctors (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            specialization VARCHAR(255) NOT NULL,
            work_start TIME NOT NULL,
            work_end TIME NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_working_hours CHECK (work_start < work_end)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create appointments table. Times are clinic wall-clock, hence no zone.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            doctor_id UUID NOT NULL REFERENCES doctors(id),
            start_time TIMESTAMP WITHOUT TIME ZONE NOT NULL,
            duration_minutes INTEGER NOT NULL DEFAULT 30,
            end_time TIMESTAMP WITHOUT TIME ZONE
                GENERATED ALWAYS AS (start_time + duration_minutes * INTERVAL '1 minute') STORED,
            appointment_type VARCHAR(255) NOT NULL,
            patient_name VARCHAR(255) NOT NULL,
            notes TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT positive_duration CHECK (duration_minutes > 0),
            CONSTRAINT no_overlapping_appointments EXCLUDE USING gist (
                doctor_id WITH =,
                tsrange(start_time, end_time) WITH &&
            )
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_appointments_doctor_id ON appointments(doctor_id);",
        "CREATE INDEX IF NOT EXISTS idx_appointments_start_time ON appointments(start_time);",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
