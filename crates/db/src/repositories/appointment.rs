use crate::models::DbAppointment;
use chrono::{NaiveDateTime, Utc};
use clinic_core::models::appointment::{AppointmentPatch, NewAppointment};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const COLUMNS: &str = "id, doctor_id, start_time, duration_minutes, appointment_type, \
                       patient_name, notes, created_at, updated_at";

pub async fn create_appointment(
    pool: &Pool<Postgres>,
    appointment: &NewAppointment,
) -> Result<DbAppointment> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating appointment: id={}, doctor_id={}, start={}, duration={}",
        id, appointment.doctor_id, appointment.start, appointment.duration_minutes
    );

    let created = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        INSERT INTO appointments
            (id, doctor_id, start_time, duration_minutes, appointment_type,
             patient_name, notes, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(appointment.doctor_id)
    .bind(appointment.start)
    .bind(appointment.duration_minutes as i32)
    .bind(&appointment.appointment_type)
    .bind(&appointment.patient_name)
    .bind(appointment.notes.as_deref())
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(created)
}

pub async fn get_appointment_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbAppointment>> {
    tracing::debug!("Getting appointment by id: {}", id);

    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        "SELECT {COLUMNS} FROM appointments WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

pub async fn list_appointments(pool: &Pool<Postgres>) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(&format!(
        "SELECT {COLUMNS} FROM appointments ORDER BY start_time ASC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

/// Appointments of a doctor whose `[start_time, end_time)` overlaps `[from, until)`.
pub async fn get_appointments_by_doctor_in_range(
    pool: &Pool<Postgres>,
    doctor_id: Uuid,
    from: NaiveDateTime,
    until: NaiveDateTime,
) -> Result<Vec<DbAppointment>> {
    tracing::debug!(
        "Getting appointments: doctor_id={}, from={}, until={}",
        doctor_id, from, until
    );

    let appointments = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM appointments
        WHERE doctor_id = $1
          AND start_time < $3
          AND end_time > $2
        ORDER BY start_time ASC
        "#
    ))
    .bind(doctor_id)
    .bind(from)
    .bind(until)
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

/// Applies the present fields of `patch`. Returns `None` when no row has `id`.
pub async fn update_appointment(
    pool: &Pool<Postgres>,
    id: Uuid,
    patch: &AppointmentPatch,
) -> Result<Option<DbAppointment>> {
    let updated = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        UPDATE appointments
        SET doctor_id = COALESCE($2, doctor_id),
            start_time = COALESCE($3, start_time),
            duration_minutes = COALESCE($4, duration_minutes),
            appointment_type = COALESCE($5, appointment_type),
            patient_name = COALESCE($6, patient_name),
            notes = COALESCE($7, notes),
            updated_at = $8
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(patch.doctor_id)
    .bind(patch.start)
    .bind(patch.duration_minutes.map(|minutes| minutes as i32))
    .bind(patch.appointment_type.as_deref())
    .bind(patch.patient_name.as_deref())
    .bind(patch.notes.as_deref())
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(updated)
}

/// Hard delete. Returns whether a row was removed.
pub async fn delete_appointment(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
