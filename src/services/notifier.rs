use tokio::sync::mpsc;

use crate::models::Appointment;
use crate::services::mailer::Mailer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Booked,
    Confirmed,
    Rejected,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub appointment: Appointment,
}

pub fn channel() -> (mpsc::Sender<Notification>, mpsc::Receiver<Notification>) {
    mpsc::channel(256)
}

/// Queues a notification without waiting on delivery. A full or closed
/// queue is logged and otherwise ignored; the originating operation has
/// already committed.
pub fn enqueue(tx: &mpsc::Sender<Notification>, kind: NotificationKind, appointment: Appointment) {
    let id = appointment.id;
    if let Err(e) = tx.try_send(Notification { kind, appointment }) {
        tracing::warn!(id, "dropping notification: {e}");
    }
}

pub fn compose(notification: &Notification) -> (String, String) {
    let a = &notification.appointment;
    match notification.kind {
        NotificationKind::Booked => (
            "Your Salon Appointment is Booked".to_string(),
            format!(
                "<h2>Hello {name},</h2>\
                 <p>Your appointment for <strong>{service}</strong> is scheduled on \
                 <strong>{date}</strong> at <strong>{time}</strong>.</p>\
                 <p>Status: <strong>Pending</strong></p>\
                 <p>Booking ID: <strong>{id}</strong></p>\
                 <p>We'll confirm shortly. Thank you!</p>\
                 <br><p>&ndash; Krishna Salon</p>",
                name = a.name,
                service = a.service,
                date = a.date,
                time = a.time,
                id = a.id,
            ),
        ),
        NotificationKind::Confirmed => (
            "Your Appointment is Confirmed".to_string(),
            format!(
                "<h2>Hi {name},</h2>\
                 <p>Your appointment for <strong>{service}</strong> on <strong>{date}</strong> \
                 at <strong>{time}</strong> has been <strong>confirmed</strong>.</p>\
                 <p>Booking ID: <strong>{id}</strong></p>\
                 <p>We look forward to seeing you!</p>\
                 <br><p>&ndash; Krishna Salon</p>",
                name = a.name,
                service = a.service,
                date = a.date,
                time = a.time,
                id = a.id,
            ),
        ),
        NotificationKind::Rejected => (
            "Your Appointment Update".to_string(),
            format!(
                "<h2>Hi {name},</h2>\
                 <p>We regret to inform you that your appointment for \
                 <strong>{service}</strong> on <strong>{date}</strong> at \
                 <strong>{time}</strong> could not be confirmed.</p>\
                 <p>Booking ID: <strong>{id}</strong></p>\
                 <p>Please try booking another time or contact us directly.</p>\
                 <br><p>&ndash; Krishna Salon</p>",
                name = a.name,
                service = a.service,
                date = a.date,
                time = a.time,
                id = a.id,
            ),
        ),
    }
}

/// Drains the notification queue, one delivery at a time. Mailer failures
/// are logged and never propagate back to the operation that queued them.
pub async fn run_worker(mut rx: mpsc::Receiver<Notification>, mailer: Box<dyn Mailer>) {
    while let Some(notification) = rx.recv().await {
        let (subject, html) = compose(&notification);
        let to = notification.appointment.email.clone();
        let id = notification.appointment.id;

        match mailer.send(&to, &subject, &html).await {
            Ok(()) => tracing::info!(id, email = %to, "notification email sent"),
            Err(e) => tracing::warn!(id, email = %to, "notification email failed: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::models::AppointmentStatus;

    struct MockMailer {
        sent: Arc<Mutex<Vec<(String, String)>>>,
    }

    #[async_trait]
    impl Mailer for MockMailer {
        async fn send(&self, to: &str, subject: &str, _html: &str) -> anyhow::Result<()> {
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), subject.to_string()));
            Ok(())
        }
    }

    struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _to: &str, _subject: &str, _html: &str) -> anyhow::Result<()> {
            anyhow::bail!("smtp relay down")
        }
    }

    fn appointment() -> Appointment {
        Appointment {
            id: 7,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            phone: "+1 555 000 1111".to_string(),
            service: "Haircut".to_string(),
            date: "2025-06-01".to_string(),
            time: "14:00".to_string(),
            status: AppointmentStatus::Pending,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn test_compose_includes_booking_details() {
        for kind in [
            NotificationKind::Booked,
            NotificationKind::Confirmed,
            NotificationKind::Rejected,
        ] {
            let (subject, html) = compose(&Notification {
                kind,
                appointment: appointment(),
            });
            assert!(!subject.is_empty());
            assert!(html.contains("Haircut"));
            assert!(html.contains("2025-06-01"));
            assert!(html.contains("14:00"));
            assert!(html.contains("<strong>7</strong>"));
        }
    }

    #[tokio::test]
    async fn test_worker_drains_queue() {
        let (tx, rx) = channel();
        let sent = Arc::new(Mutex::new(vec![]));
        let mailer = MockMailer {
            sent: Arc::clone(&sent),
        };

        enqueue(&tx, NotificationKind::Booked, appointment());
        enqueue(&tx, NotificationKind::Confirmed, appointment());
        drop(tx);

        run_worker(rx, Box::new(mailer)).await;

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].0, "alice@example.com");
        assert_eq!(sent[0].1, "Your Salon Appointment is Booked");
        assert_eq!(sent[1].1, "Your Appointment is Confirmed");
    }

    #[tokio::test]
    async fn test_worker_survives_mailer_failure() {
        let (tx, rx) = channel();
        enqueue(&tx, NotificationKind::Rejected, appointment());
        drop(tx);

        // Worker must complete despite the failure
        run_worker(rx, Box::new(FailingMailer)).await;
    }

    #[test]
    fn test_enqueue_on_closed_channel_does_not_panic() {
        let (tx, rx) = channel();
        drop(rx);
        enqueue(&tx, NotificationKind::Booked, appointment());
    }
}
