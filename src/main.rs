use std::sync::{Arc, Mutex};

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use salonbook::config::AppConfig;
use salonbook::db;
use salonbook::handlers;
use salonbook::services::auth::AdminGate;
use salonbook::services::mailer::http::HttpApiMailer;
use salonbook::services::notifier;
use salonbook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    tracing::info!("database initialized at {}", config.database_url);

    let gate = AdminGate::from_config(&config)?;

    let mailer = HttpApiMailer::new(
        config.mail_api_url.clone(),
        config.mail_api_key.clone(),
        config.mail_from.clone(),
    );
    let (notifier_tx, notifier_rx) = notifier::channel();
    tokio::spawn(notifier::run_worker(notifier_rx, Box::new(mailer)));

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        gate,
        notifier: notifier_tx,
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/admin-login", post(handlers::auth::admin_login))
        .route("/api/book", post(handlers::booking::book))
        .route("/api/appointments", get(handlers::admin::list_appointments))
        .route("/api/confirm", post(handlers::admin::confirm_appointment))
        .route("/api/reject", post(handlers::admin::reject_appointment))
        .route(
            "/api/appointments/:id",
            delete(handlers::admin::delete_appointment),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
