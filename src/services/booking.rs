use chrono::{NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use rusqlite::Connection;
use serde::Deserialize;

use crate::db::queries::{self, NewAppointment};
use crate::errors::{AppError, FieldError};
use crate::models::Appointment;

#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub date: String,
    pub time: String,
}

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref PHONE_CHARS_RE: Regex = Regex::new(r"^[\d\s\-\+\(\)]+$").unwrap();
    static ref TIME_RE: Regex = Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)$").unwrap();
}

fn is_valid_phone(phone: &str) -> bool {
    if !PHONE_CHARS_RE.is_match(phone) {
        return false;
    }
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    (10..=15).contains(&digits)
}

/// Checks every field before any store access and collects per-field errors.
/// On success returns the normalized record: trimmed fields, lowercased
/// email, canonical `YYYY-MM-DD` date.
pub fn validate(req: &BookingRequest) -> Result<NewAppointment, AppError> {
    let mut errors = vec![];

    let name = req.name.trim();
    if name.chars().count() < 2 || name.chars().count() > 100 {
        errors.push(FieldError {
            field: "name",
            message: "Name is required (2-100 characters)",
        });
    }

    let email = req.email.trim().to_lowercase();
    if !EMAIL_RE.is_match(&email) {
        errors.push(FieldError {
            field: "email",
            message: "Valid email is required",
        });
    }

    let phone = req.phone.trim();
    if !is_valid_phone(phone) {
        errors.push(FieldError {
            field: "phone",
            message: "Valid phone number is required",
        });
    }

    let service = req.service.trim();
    if service.is_empty() {
        errors.push(FieldError {
            field: "service",
            message: "Service is required",
        });
    }

    let date = match NaiveDate::parse_from_str(req.date.trim(), "%Y-%m-%d") {
        Ok(d) => d.format("%Y-%m-%d").to_string(),
        Err(_) => {
            errors.push(FieldError {
                field: "date",
                message: "Valid date is required",
            });
            String::new()
        }
    };

    let time = req.time.trim();
    if !TIME_RE.is_match(time) {
        errors.push(FieldError {
            field: "time",
            message: "Valid time is required",
        });
    }

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    Ok(NewAppointment {
        name: name.to_string(),
        email,
        phone: phone.to_string(),
        service: service.to_string(),
        date,
        time: time.to_string(),
    })
}

/// Admits a booking: validate, then a single conditional insert that
/// re-checks slot capacity inside the store. Returns the persisted record.
pub fn submit_booking(conn: &Connection, req: &BookingRequest) -> Result<Appointment, AppError> {
    let new = validate(req)?;

    let created_at = Utc::now().naive_utc();
    let id = queries::insert_appointment_if_capacity(conn, &new, &created_at)?
        .ok_or(AppError::SlotFull)?;

    tracing::info!(
        id,
        email = %new.email,
        service = %new.service,
        date = %new.date,
        time = %new.time,
        "appointment booked"
    );

    queries::get_appointment(conn, id)?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("inserted appointment {id} missing")))
}
