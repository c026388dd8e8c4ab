use crate::models::DbDoctor;
use chrono::{NaiveTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_doctor(
    pool: &Pool<Postgres>,
    name: &str,
    specialization: &str,
    work_start: NaiveTime,
    work_end: NaiveTime,
) -> Result<DbDoctor> {
    let id = Uuid::new_v4();

    tracing::debug!(
        "Creating doctor: id={}, name={}, hours={}-{}",
        id, name, work_start, work_end
    );

    let doctor = sqlx::query_as::<_, DbDoctor>(
        r#"
        INSERT INTO doctors (id, name, specialization, work_start, work_end, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, name, specialization, work_start, work_end, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(specialization)
    .bind(work_start)
    .bind(work_end)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(doctor)
}

pub async fn get_doctor_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbDoctor>> {
    tracing::debug!("Getting doctor by id: {}", id);

    let doctor = sqlx::query_as::<_, DbDoctor>(
        r#"
        SELECT id, name, specialization, work_start, work_end, created_at
        FROM doctors
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    if doctor.is_none() {
        tracing::debug!("Doctor not found: id={}", id);
    }

    Ok(doctor)
}

pub async fn list_doctors(pool: &Pool<Postgres>) -> Result<Vec<DbDoctor>> {
    let doctors = sqlx::query_as::<_, DbDoctor>(
        r#"
        SELECT id, name, specialization, work_start, work_end, created_at
        FROM doctors
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(doctors)
}

pub async fn count_doctors(pool: &Pool<Postgres>) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM doctors")
        .fetch_one(pool)
        .await?;

    Ok(count)
}
