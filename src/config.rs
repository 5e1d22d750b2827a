use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub admin_username: String,
    /// Argon2 PHC string for the admin password. When unset, `admin_password`
    /// is hashed at startup instead.
    pub admin_password_hash: Option<String>,
    pub admin_password: String,
    pub mail_api_url: String,
    pub mail_api_key: String,
    pub mail_from: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "salon.db".to_string()),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-secret-key-change-this".to_string()),
            admin_username: env::var("ADMIN_USER").unwrap_or_else(|_| "admin".to_string()),
            admin_password_hash: env::var("ADMIN_PASSWORD_HASH").ok(),
            admin_password: env::var("ADMIN_PASS").unwrap_or_else(|_| "admin123".to_string()),
            mail_api_url: env::var("MAIL_API_URL").unwrap_or_default(),
            mail_api_key: env::var("MAIL_API_KEY").unwrap_or_default(),
            mail_from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "bookings@krishna-salon.example".to_string()),
        }
    }
}
