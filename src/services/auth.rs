use std::sync::Arc;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::state::AppState;

/// Admin credentials stay valid for 8 hours from issuance.
pub const TOKEN_TTL_SECONDS: i64 = 8 * 60 * 60;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("argon2 hash error: {e}"))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("malformed password hash: {e}"))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Stateless session gate for the single configured administrator identity.
pub struct AdminGate {
    username: String,
    password_hash: String,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl AdminGate {
    pub fn new(username: &str, password_hash: &str, jwt_secret: &str) -> Self {
        Self {
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            encoding: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(jwt_secret.as_bytes()),
        }
    }

    /// Builds the gate from config, hashing the fallback plaintext password
    /// when no precomputed hash is configured.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let password_hash = match &config.admin_password_hash {
            Some(hash) => hash.clone(),
            None => {
                tracing::warn!("ADMIN_PASSWORD_HASH not set, hashing ADMIN_PASS at startup");
                hash_password(&config.admin_password)?
            }
        };
        Ok(Self::new(
            &config.admin_username,
            &password_hash,
            &config.jwt_secret,
        ))
    }

    /// Issues a signed credential on an exact identity match. The password
    /// verify runs before the username comparison so an unknown username
    /// costs the same as a wrong password, and both fail identically.
    pub fn login(&self, username: &str, password: &str) -> Result<String, AppError> {
        let password_ok = verify_password(password, &self.password_hash).unwrap_or(false);
        if !password_ok || username != self.username {
            tracing::warn!(username, "failed admin login attempt");
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!(username, "admin login successful");
        self.sign_at(Utc::now().timestamp()).map_err(AppError::Internal)
    }

    fn sign_at(&self, iat: i64) -> anyhow::Result<String> {
        let claims = Claims {
            sub: self.username.clone(),
            iat,
            exp: iat + TOKEN_TTL_SECONDS,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        Ok(token)
    }

    /// Checks signature and expiry; no server-side session state involved.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AppError::InvalidToken)
    }
}

/// Extractor for protected routes: verified admin identity from the bearer
/// token. A missing or schemeless header rejects with 403, a present but
/// invalid or expired token with 401.
pub struct AdminAuth(pub String);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::MissingToken)?;

        let token = auth.strip_prefix("Bearer ").ok_or(AppError::MissingToken)?;

        let claims = state.gate.verify(token)?;
        Ok(AdminAuth(claims.sub))
    }
}
