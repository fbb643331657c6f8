use axum::{
    body::Body,
    extract::Request,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{auth, availability, closure, health, procedure, reservation, statistics};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout))

        // Public catalog
        .route("/api/v1/procedures", get(procedure::list_procedures))
        .route("/api/v1/procedures/catalog", get(procedure::get_catalog))
        .route("/api/v1/procedures/discounted", get(procedure::list_discounted))
        .route("/api/v1/procedures/popular", get(procedure::list_popular))
        .route("/api/v1/procedures/{id}", get(procedure::get_procedure))

        // Public booking flow
        .route("/api/v1/offices/{office}/closures", get(closure::list_upcoming_closures))
        .route("/api/v1/offices/{office}/slots", get(availability::get_slots))
        .route("/api/v1/offices/{office}/calendar", get(availability::get_calendar))
        .route("/api/v1/reservations", post(reservation::create_reservation))

        // Admin
        .route("/api/v1/admin/procedures", get(procedure::admin_list_procedures).post(procedure::create_procedure))
        .route("/api/v1/admin/procedures/{id}", put(procedure::update_procedure).delete(procedure::delete_procedure))
        .route("/api/v1/admin/procedures/{id}/active", post(procedure::set_procedure_active))
        .route("/api/v1/admin/closures", get(closure::admin_list_closures).post(closure::create_closure))
        .route("/api/v1/admin/closures/{id}", delete(closure::delete_closure))
        .route("/api/v1/admin/reservations", get(reservation::list_reservations))
        .route("/api/v1/admin/reservations/{id}", get(reservation::get_reservation))
        .route("/api/v1/admin/statistics", get(statistics::get_statistics))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        admin = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
