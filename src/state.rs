use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::services::auth::AdminGate;
use crate::services::notifier::Notification;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub gate: AdminGate,
    pub notifier: mpsc::Sender<Notification>,
}
