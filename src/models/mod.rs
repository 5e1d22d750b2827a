pub mod appointment;

pub use appointment::{Appointment, AppointmentStatus, APPOINTMENTS_PER_SLOT};
