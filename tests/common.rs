use salon_booking::{
    api::router::create_router,
    config::{Config, ConflictSource},
    infra::factory::{connect_sqlite, run_sqlite_migrations, sqlite_state},
    state::AppState,
};
use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
    Router,
};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Europe::Sofia;
use serde_json::{json, Value};
use sqlx::{Pool, Sqlite};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";

pub struct AuthHeaders {
    pub session_token: String,
    pub csrf_token: String,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        Self::with_conflict_source(ConflictSource::Store).await
    }

    pub async fn with_conflict_source(conflict_source: ConflictSource) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let pool = connect_sqlite(&db_url).await;
        run_sqlite_migrations(&pool).await;

        let salt = SaltString::encode_b64(b"salon-test-salt").unwrap();
        let admin_password_hash = Argon2::default()
            .hash_password(ADMIN_PASSWORD.as_bytes(), &salt)
            .unwrap()
            .to_string();

        let config = Config {
            database_url: db_url,
            port: 0,
            salon_timezone: Sofia,
            booking_horizon_days: 60,
            conflict_source,
            admin_username: ADMIN_USERNAME.to_string(),
            admin_password_hash,
            session_secret: "test-session-secret".to_string(),
            auth_issuer: "test-issuer".to_string(),
        };

        let state = Arc::new(sqlite_state(&config, pool.clone()));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>, auth: Option<&AuthHeaders>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder
                .header(header::COOKIE, format!("admin_session={}", auth.session_token))
                .header("X-CSRF-Token", &auth.csrf_token);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    pub async fn login(&self) -> AuthHeaders {
        let response = self.request(
            "POST",
            "/api/v1/auth/login",
            Some(json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD })),
            None,
        ).await;

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let session_cookie = response.headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|h| h.to_str().unwrap().to_string())
            .find(|c| c.starts_with("admin_session="))
            .expect("No admin_session cookie returned");

        let session_token = session_cookie["admin_session=".len()..]
            .split(';')
            .next()
            .unwrap()
            .to_string();

        let body_json = parse_body(response).await;
        let csrf_token = body_json["csrf_token"].as_str().expect("No csrf_token in body").to_string();

        AuthHeaders {
            session_token,
            csrf_token,
        }
    }

    /// Creates an active procedure through the admin API and returns its id.
    pub async fn create_procedure(&self, auth: &AuthHeaders, name: &str, duration_minutes: i32) -> String {
        let response = self.request(
            "POST",
            "/api/v1/admin/procedures",
            Some(json!({
                "name": name,
                "description": "Test procedure",
                "duration_minutes": duration_minutes,
                "price": 40.0,
                "type": "Нокти",
                "technician": "Мария"
            })),
            Some(auth),
        ).await;

        assert_eq!(response.status(), 201, "procedure creation failed");
        parse_body(response).await["id"].as_str().unwrap().to_string()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}

pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// A salon-local date `days` ahead of today.
#[allow(dead_code)]
pub fn days_ahead(days: i64) -> NaiveDate {
    Utc::now().with_timezone(&Sofia).date_naive() + Duration::days(days)
}

/// UTC instant of a salon-local wall clock time.
#[allow(dead_code)]
pub fn sofia(date: NaiveDate, hour: u32, minute: u32) -> DateTime<Utc> {
    Sofia
        .from_local_datetime(&date.and_hms_opt(hour, minute, 0).unwrap())
        .earliest()
        .unwrap()
        .with_timezone(&Utc)
}

#[allow(dead_code)]
pub fn reservation_body(procedure_id: &str, start: DateTime<Utc>, phone: &str) -> Value {
    json!({
        "office": "sofia",
        "procedure_id": procedure_id,
        "start": start.to_rfc3339(),
        "first_name": "Иван",
        "last_name": "Петров",
        "phone": phone,
        "email": "ivan@example.com",
        "note": ""
    })
}
