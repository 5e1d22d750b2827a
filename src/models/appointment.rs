use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Maximum simultaneous non-rejected appointments per (date, time) slot.
pub const APPOINTMENTS_PER_SLOT: i64 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    /// Calendar date, stored as `YYYY-MM-DD`.
    pub date: String,
    /// Time of day, stored as 24-hour `HH:MM`.
    pub time: String,
    pub status: AppointmentStatus,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Rejected,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "confirmed" => AppointmentStatus::Confirmed,
            "rejected" => AppointmentStatus::Rejected,
            _ => AppointmentStatus::Pending,
        }
    }
}
