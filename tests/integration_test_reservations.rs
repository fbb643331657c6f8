mod common;

use chrono::{DateTime, Duration, Utc};
use common::{days_ahead, parse_body, reservation_body, sofia, TestApp};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;
use axum::{body::Body, http::{header, Request, StatusCode}};

#[tokio::test]
async fn test_create_reservation_returns_confirmation() {
    let app = TestApp::new().await;
    let auth = app.login().await;
    let procedure_id = app.create_procedure(&auth, "Класически маникюр", 45).await;
    let start = sofia(days_ahead(7), 14, 0);

    let mut body = reservation_body(&procedure_id, start, "0888 123 456");
    body["note"] = json!("  Моля, без лак  ");

    let response = app.request("POST", "/api/v1/reservations", Some(body), None).await;
    assert_eq!(response.status(), 201);

    let confirmation = parse_body(response).await;
    assert_eq!(confirmation["office_name"], "sofia");
    assert_eq!(confirmation["procedure_id"], procedure_id);
    assert_eq!(confirmation["procedure_name"], "Класически маникюр");
    assert_eq!(confirmation["duration_minutes"], 45);
    assert_eq!(confirmation["phone"], "+359888123456");
    assert_eq!(confirmation["note"], "Моля, без лак");
    assert_eq!(confirmation["technician"], "Мария");

    let start_time: DateTime<Utc> = confirmation["start_time"].as_str().unwrap().parse().unwrap();
    let end_time: DateTime<Utc> = confirmation["end_time"].as_str().unwrap().parse().unwrap();
    assert_eq!(start_time, start);
    assert_eq!(end_time - start_time, Duration::minutes(45));

    let stored = app.state.reservation_repo
        .find_by_id(confirmation["id"].as_str().unwrap())
        .await
        .unwrap()
        .expect("reservation persisted");
    assert_eq!(stored.first_name, "Иван");

    let logs = app.state.reservation_repo.list_logs().await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].procedure_id, procedure_id);
    assert_eq!(logs[0].source, "website");
}

#[tokio::test]
async fn test_taken_slot_conflicts_but_adjacent_slot_does_not() {
    let app = TestApp::new().await;
    let auth = app.login().await;
    let procedure_id = app.create_procedure(&auth, "Маникюр", 30).await;
    let date = days_ahead(3);

    let first = app.request("POST", "/api/v1/reservations", Some(reservation_body(&procedure_id, sofia(date, 10, 0), "0888123456")), None).await;
    assert_eq!(first.status(), 201);

    let again = app.request("POST", "/api/v1/reservations", Some(reservation_body(&procedure_id, sofia(date, 10, 0), "0899123456")), None).await;
    assert_eq!(again.status(), 409);

    let adjacent = app.request("POST", "/api/v1/reservations", Some(reservation_body(&procedure_id, sofia(date, 10, 30), "0899123456")), None).await;
    assert_eq!(adjacent.status(), 201);

    // same time at the other office is free
    let mut lom = reservation_body(&procedure_id, sofia(date, 10, 0), "0877123456");
    lom["office"] = json!("Лом");
    let other_office = app.request("POST", "/api/v1/reservations", Some(lom), None).await;
    assert_eq!(other_office.status(), 201);
    assert_eq!(parse_body(other_office).await["office_name"], "lom");
}

#[tokio::test]
async fn test_reservation_rejected_for_missing_or_inactive_procedure() {
    let app = TestApp::new().await;
    let auth = app.login().await;
    let procedure_id = app.create_procedure(&auth, "Маникюр", 30).await;
    let start = sofia(days_ahead(3), 12, 0);

    let unknown = app.request("POST", "/api/v1/reservations", Some(reservation_body("missing", start, "0888123456")), None).await;
    assert_eq!(unknown.status(), 404);

    app.request(
        "POST",
        &format!("/api/v1/admin/procedures/{}/active", procedure_id),
        Some(json!({ "is_active": false })),
        Some(&auth),
    ).await;

    let inactive = app.request("POST", "/api/v1/reservations", Some(reservation_body(&procedure_id, start, "0888123456")), None).await;
    assert_eq!(inactive.status(), 404);
}

#[tokio::test]
async fn test_contact_validation_reports_every_problem() {
    let app = TestApp::new().await;
    let auth = app.login().await;
    let procedure_id = app.create_procedure(&auth, "Маникюр", 30).await;

    let response = app.request(
        "POST",
        "/api/v1/reservations",
        Some(json!({
            "office": "sofia",
            "procedure_id": procedure_id,
            "start": sofia(days_ahead(3), 12, 0).to_rfc3339(),
            "first_name": "И",
            "last_name": "Petrov1",
            "phone": "12345",
            "email": "not-an-email",
        })),
        None,
    ).await;
    assert_eq!(response.status(), 400);

    let error = parse_body(response).await["error"].as_str().unwrap().to_string();
    assert!(error.contains("First name"));
    assert!(error.contains("Last name"));
    assert!(error.contains("phone"));
    assert!(error.contains("email"));
    assert!(app.state.reservation_repo.list_logs().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reservation_time_rules() {
    let app = TestApp::new().await;
    let auth = app.login().await;
    let procedure_id = app.create_procedure(&auth, "Маникюр", 30).await;
    let date = days_ahead(3);

    let cases = [
        (sofia(days_ahead(-2), 10, 0), StatusCode::BAD_REQUEST),
        (sofia(days_ahead(90), 10, 0), StatusCode::BAD_REQUEST),
        (sofia(date, 10, 15), StatusCode::BAD_REQUEST),
        (sofia(date, 7, 0), StatusCode::BAD_REQUEST),
        (sofia(date, 19, 0), StatusCode::CONFLICT),
    ];

    for (start, expected) in cases {
        let response = app.request("POST", "/api/v1/reservations", Some(reservation_body(&procedure_id, start, "0888123456")), None).await;
        assert_eq!(response.status(), expected, "start {}", start);
    }

    let mut bad_office = reservation_body(&procedure_id, sofia(date, 10, 0), "0888123456");
    bad_office["office"] = json!("varna");
    let response = app.request("POST", "/api/v1/reservations", Some(bad_office), None).await;
    assert_eq!(response.status(), 400);

    let mut bad_start = reservation_body(&procedure_id, sofia(date, 10, 0), "0888123456");
    bad_start["start"] = json!("tomorrow at ten");
    let response = app.request("POST", "/api/v1/reservations", Some(bad_start), None).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_reservation_inside_closure_conflicts() {
    let app = TestApp::new().await;
    let auth = app.login().await;
    let procedure_id = app.create_procedure(&auth, "Маникюр", 30).await;
    let date = days_ahead(8);

    app.request(
        "POST",
        "/api/v1/admin/closures",
        Some(json!({
            "office": "sofia",
            "closed_date_start": sofia(date, 0, 0).to_rfc3339(),
            "closed_date_end": sofia(date, 23, 59).to_rfc3339(),
        })),
        Some(&auth),
    ).await;

    let response = app.request("POST", "/api/v1/reservations", Some(reservation_body(&procedure_id, sofia(date, 11, 0), "0888123456")), None).await;
    assert_eq!(response.status(), 409);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reservations_for_one_slot_have_one_winner() {
    let app = Arc::new(TestApp::new().await);
    let auth = app.login().await;
    let procedure_id = app.create_procedure(&auth, "Маникюр", 30).await;
    let start = sofia(days_ahead(2), 16, 0);

    let mut handles = Vec::new();
    for i in 0..10 {
        let router = app.router.clone();
        let body = reservation_body(&procedure_id, start, &format!("08881234{:02}", i));
        handles.push(tokio::spawn(async move {
            router.oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/reservations")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap()
            ).await.unwrap().status()
        }));
    }

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::CREATED => created += 1,
            StatusCode::CONFLICT => conflicts += 1,
            other => panic!("unexpected status {}", other),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(conflicts, 9);

    let (day_start, day_end) = (start - Duration::hours(12), start + Duration::hours(12));
    let stored = app.state.reservation_repo.list_by_range("sofia", day_start, day_end).await.unwrap();
    assert_eq!(stored.len(), 1);
}
