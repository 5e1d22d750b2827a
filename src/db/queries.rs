use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::models::{Appointment, AppointmentStatus, APPOINTMENTS_PER_SLOT};

// ── Appointments ──

/// Validated booking fields, ready for insertion.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub date: String,
    pub time: String,
}

fn parse_appointment_row(row: &Row) -> anyhow::Result<Appointment> {
    let status_str: String = row.get(7)?;
    let created_at_str: String = row.get(8)?;
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, "%Y-%m-%d %H:%M:%S")
        .unwrap_or_else(|_| Utc::now().naive_utc());

    Ok(Appointment {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        service: row.get(4)?,
        date: row.get(5)?,
        time: row.get(6)?,
        status: AppointmentStatus::from_str(&status_str),
        created_at,
    })
}

const APPOINTMENT_COLUMNS: &str =
    "id, name, email, phone, service, date, time, status, created_at";

/// Inserts a pending appointment only if the (date, time) slot still has
/// room. The capacity count is re-evaluated inside the INSERT itself, so
/// check and insert are a single atomic statement against the store.
/// Returns the new id, or None when the slot is full.
pub fn insert_appointment_if_capacity(
    conn: &Connection,
    new: &NewAppointment,
    created_at: &NaiveDateTime,
) -> anyhow::Result<Option<i64>> {
    let created_at_str = created_at.format("%Y-%m-%d %H:%M:%S").to_string();

    let inserted = conn.execute(
        "INSERT INTO appointments (name, email, phone, service, date, time, status, created_at)
         SELECT ?1, ?2, ?3, ?4, ?5, ?6, 'pending', ?7
         WHERE (SELECT COUNT(*) FROM appointments
                WHERE date = ?5 AND time = ?6 AND status != 'rejected') < ?8",
        params![
            new.name,
            new.email,
            new.phone,
            new.service,
            new.date,
            new.time,
            created_at_str,
            APPOINTMENTS_PER_SLOT,
        ],
    )?;

    if inserted == 0 {
        return Ok(None);
    }
    Ok(Some(conn.last_insert_rowid()))
}

/// Non-rejected appointments booked for a slot. Read-only companion to the
/// conditional insert above.
pub fn slot_count(conn: &Connection, date: &str, time: &str) -> anyhow::Result<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM appointments
         WHERE date = ?1 AND time = ?2 AND status != 'rejected'",
        params![date, time],
        |row| row.get(0),
    )?;
    Ok(count)
}

pub fn get_appointment(conn: &Connection, id: i64) -> anyhow::Result<Option<Appointment>> {
    let result = conn.query_row(
        &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1"),
        params![id],
        |row| Ok(parse_appointment_row(row)),
    );

    match result {
        Ok(appointment) => Ok(Some(appointment?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All appointments, most recently created first. Ties on created_at (one
/// second granularity) break toward the higher id.
pub fn list_appointments(conn: &Connection) -> anyhow::Result<Vec<Appointment>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments ORDER BY created_at DESC, id DESC"
    ))?;

    let rows = stmt.query_map([], |row| Ok(parse_appointment_row(row)))?;

    let mut appointments = vec![];
    for row in rows {
        appointments.push(row??);
    }
    Ok(appointments)
}

pub fn set_appointment_status(
    conn: &Connection,
    id: i64,
    status: AppointmentStatus,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE appointments SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    Ok(count > 0)
}

pub fn delete_appointment(conn: &Connection, id: i64) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM appointments WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Rate limits ──

/// Bumps the counter for (scope, client) in the given window and returns the
/// new count. Upsert keeps this a single statement per request.
pub fn bump_rate_limit(
    conn: &Connection,
    scope: &str,
    client: &str,
    window_start: &str,
) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO rate_limits (scope, client, window_start, request_count)
         VALUES (?1, ?2, ?3, 1)
         ON CONFLICT(scope, client, window_start) DO UPDATE SET request_count = request_count + 1",
        params![scope, client, window_start],
    )?;

    let count: i64 = conn.query_row(
        "SELECT request_count FROM rate_limits
         WHERE scope = ?1 AND client = ?2 AND window_start = ?3",
        params![scope, client, window_start],
        |row| row.get(0),
    )?;
    Ok(count)
}

pub fn prune_rate_windows(conn: &Connection, cutoff: &str) -> anyhow::Result<()> {
    conn.execute(
        "DELETE FROM rate_limits WHERE window_start < ?1",
        params![cutoff],
    )?;
    Ok(())
}
