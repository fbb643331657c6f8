use crate::domain::models::auth::Claims;
use crate::error::AppError;
use crate::config::Config;
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;
use chrono::{Utc, Duration};
use rand::{distributions::Alphanumeric, Rng};

pub const SESSION_COOKIE: &str = "admin_session";
pub const SESSION_AUDIENCE: &str = "salon-admin";
pub const SESSION_HOURS: i64 = 24;

/// Issues and checks the single admin's session token.
pub struct AuthService {
    config: Config,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(config: Config) -> Self {
        let encoding_key = EncodingKey::from_secret(config.session_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.session_secret.as_bytes());

        Self { config, encoding_key, decoding_key }
    }

    pub fn verify_credentials(&self, username: &str, password: &str) -> Result<(), AppError> {
        if username != self.config.admin_username {
            return Err(AppError::Unauthorized);
        }

        let parsed_hash = PasswordHash::new(&self.config.admin_password_hash)
            .map_err(|e| AppError::Internal(format!("invalid admin password hash: {}", e)))?;

        Argon2::default().verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AppError::Unauthorized)
    }

    /// Returns `(session_token, csrf_token)`.
    pub fn issue_session(&self) -> Result<(String, String), AppError> {
        let csrf_token: String = rand::thread_rng().sample_iter(&Alphanumeric).take(32).map(char::from).collect();
        let now = Utc::now();
        let exp = (now + Duration::hours(SESSION_HOURS)).timestamp() as usize;

        let claims = Claims {
            iss: self.config.auth_issuer.clone(),
            sub: self.config.admin_username.clone(),
            aud: SESSION_AUDIENCE.to_string(),
            exp,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            csrf_token: csrf_token.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!("JWT encoding failed: {}", e);
                AppError::Internal("session token encoding failed".into())
            })?;

        Ok((token, csrf_token))
    }

    pub fn decode_session(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[SESSION_AUDIENCE]);
        validation.set_issuer(&[self.config.auth_issuer.as_str()]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized)
    }
}
