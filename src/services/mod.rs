pub mod auth;
pub mod booking;
pub mod mailer;
pub mod notifier;
pub mod rate_limit;
