mod common;

use axum::http::header;
use common::{days_ahead, parse_body, reservation_body, sofia, AuthHeaders, TestApp, ADMIN_USERNAME};
use serde_json::json;

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = TestApp::new().await;

    let wrong_password = app.request(
        "POST",
        "/api/v1/auth/login",
        Some(json!({ "username": ADMIN_USERNAME, "password": "guess" })),
        None,
    ).await;
    assert_eq!(wrong_password.status(), 401);

    let wrong_user = app.request(
        "POST",
        "/api/v1/auth/login",
        Some(json!({ "username": "root", "password": common::ADMIN_PASSWORD })),
        None,
    ).await;
    assert_eq!(wrong_user.status(), 401);
}

#[tokio::test]
async fn test_admin_routes_require_session_and_csrf() {
    let app = TestApp::new().await;

    let anonymous = app.request("GET", "/api/v1/admin/procedures", None, None).await;
    assert_eq!(anonymous.status(), 401);

    let forged = AuthHeaders { session_token: "not-a-jwt".to_string(), csrf_token: "x".to_string() };
    let response = app.request("GET", "/api/v1/admin/statistics", None, Some(&forged)).await;
    assert_eq!(response.status(), 401);

    let auth = app.login().await;
    let listed = app.request("GET", "/api/v1/admin/procedures", None, Some(&auth)).await;
    assert_eq!(listed.status(), 200);

    let wrong_csrf = AuthHeaders { session_token: auth.session_token.clone(), csrf_token: "wrong".to_string() };
    let response = app.request(
        "POST",
        "/api/v1/admin/closures",
        Some(json!({
            "office": "sofia",
            "closed_date_start": sofia(days_ahead(1), 9, 0).to_rfc3339(),
            "closed_date_end": sofia(days_ahead(1), 12, 0).to_rfc3339(),
        })),
        Some(&wrong_csrf),
    ).await;
    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn test_logout_clears_session_cookie() {
    let app = TestApp::new().await;
    let auth = app.login().await;

    let response = app.request("POST", "/api/v1/auth/logout", None, Some(&auth)).await;
    assert_eq!(response.status(), 200);

    let cleared = response.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|h| h.to_str().unwrap().to_string())
        .find(|c| c.starts_with("admin_session="))
        .expect("logout should reset the session cookie");
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_procedure_lifecycle() {
    let app = TestApp::new().await;
    let auth = app.login().await;

    let invalid = app.request(
        "POST",
        "/api/v1/admin/procedures",
        Some(json!({
            "name": "",
            "duration_minutes": 0,
            "price": -5.0,
            "discount_percentage": 120,
            "type": "Нокти",
            "technician": "Мария"
        })),
        Some(&auth),
    ).await;
    assert_eq!(invalid.status(), 400);
    let error = parse_body(invalid).await["error"].as_str().unwrap().to_string();
    assert!(error.contains("Name"));
    assert!(error.contains("Duration"));
    assert!(error.contains("Price"));
    assert!(error.contains("Discount"));

    let id = app.create_procedure(&auth, "Гел лак", 60).await;

    let updated = app.request(
        "PUT",
        &format!("/api/v1/admin/procedures/{}", id),
        Some(json!({ "price": 50.0, "discount_percentage": 20 })),
        Some(&auth),
    ).await;
    assert_eq!(updated.status(), 200);
    let body = parse_body(updated).await;
    assert_eq!(body["name"], "Гел лак");
    assert_eq!(body["price"], 50.0);
    assert_eq!(body["discount_percentage"], 20);
    assert_eq!(body["discounted_price"], 40.0);

    let discounted = parse_body(app.request("GET", "/api/v1/procedures/discounted", None, None).await).await;
    assert_eq!(discounted.as_array().unwrap().len(), 1);

    let cleared = parse_body(app.request(
        "PUT",
        &format!("/api/v1/admin/procedures/{}", id),
        Some(json!({ "discount_percentage": 0 })),
        Some(&auth),
    ).await).await;
    assert!(cleared["discount_percentage"].is_null());

    app.request(
        "POST",
        &format!("/api/v1/admin/procedures/{}/active", id),
        Some(json!({ "is_active": false })),
        Some(&auth),
    ).await;

    let public = app.request("GET", &format!("/api/v1/procedures/{}", id), None, None).await;
    assert_eq!(public.status(), 404);
    let as_admin = app.request("GET", &format!("/api/v1/procedures/{}", id), None, Some(&auth)).await;
    assert_eq!(as_admin.status(), 200);
    assert_eq!(parse_body(as_admin).await["is_active"], false);

    let all = parse_body(app.request("GET", "/api/v1/admin/procedures", None, Some(&auth)).await).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
    let active = parse_body(app.request("GET", "/api/v1/procedures", None, None).await).await;
    assert!(active.as_array().unwrap().is_empty());

    let deleted = app.request("DELETE", &format!("/api/v1/admin/procedures/{}", id), None, Some(&auth)).await;
    assert_eq!(deleted.status(), 200);
    let missing = app.request("DELETE", &format!("/api/v1/admin/procedures/{}", id), None, Some(&auth)).await;
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn test_booked_procedure_cannot_be_deleted() {
    let app = TestApp::new().await;
    let auth = app.login().await;
    let id = app.create_procedure(&auth, "Маникюр", 30).await;

    let booked = app.request("POST", "/api/v1/reservations", Some(reservation_body(&id, sofia(days_ahead(2), 9, 0), "0888123456")), None).await;
    assert_eq!(booked.status(), 201);

    let response = app.request("DELETE", &format!("/api/v1/admin/procedures/{}", id), None, Some(&auth)).await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn test_closure_lifecycle() {
    let app = TestApp::new().await;
    let auth = app.login().await;
    let date = days_ahead(10);

    let backwards = app.request(
        "POST",
        "/api/v1/admin/closures",
        Some(json!({
            "office": "sofia",
            "closed_date_start": sofia(date, 12, 0).to_rfc3339(),
            "closed_date_end": sofia(date, 12, 0).to_rfc3339(),
        })),
        Some(&auth),
    ).await;
    assert_eq!(backwards.status(), 400);

    let created = app.request(
        "POST",
        "/api/v1/admin/closures",
        Some(json!({
            "office": "Лом",
            "closed_date_start": sofia(date, 0, 0).to_rfc3339(),
            "closed_date_end": sofia(date + chrono::Duration::days(2), 23, 59).to_rfc3339(),
        })),
        Some(&auth),
    ).await;
    assert_eq!(created.status(), 201);
    let closure = parse_body(created).await;
    assert_eq!(closure["office_name"], "lom");
    let closure_id = closure["id"].as_str().unwrap().to_string();

    let upcoming = parse_body(app.request("GET", "/api/v1/offices/lom/closures", None, None).await).await;
    assert_eq!(upcoming.as_array().unwrap().len(), 1);
    let other_office = parse_body(app.request("GET", "/api/v1/offices/sofia/closures", None, None).await).await;
    assert!(other_office.as_array().unwrap().is_empty());

    let listed = parse_body(app.request("GET", "/api/v1/admin/closures", None, Some(&auth)).await).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let deleted = app.request("DELETE", &format!("/api/v1/admin/closures/{}", closure_id), None, Some(&auth)).await;
    assert_eq!(deleted.status(), 200);
    let again = app.request("DELETE", &format!("/api/v1/admin/closures/{}", closure_id), None, Some(&auth)).await;
    assert_eq!(again.status(), 404);
}

#[tokio::test]
async fn test_admin_reservation_window() {
    let app = TestApp::new().await;
    let auth = app.login().await;
    let id = app.create_procedure(&auth, "Маникюр", 30).await;

    for (days, office) in [(2, "sofia"), (3, "lom"), (20, "sofia")] {
        let mut body = reservation_body(&id, sofia(days_ahead(days), 10, 0), "0888123456");
        body["office"] = json!(office);
        let response = app.request("POST", "/api/v1/reservations", Some(body), None).await;
        assert_eq!(response.status(), 201);
    }

    let default_week = parse_body(app.request("GET", "/api/v1/admin/reservations", None, Some(&auth)).await).await;
    assert_eq!(default_week.as_array().unwrap().len(), 2);

    let window = parse_body(app.request(
        "GET",
        &format!("/api/v1/admin/reservations?start={}&end={}", days_ahead(3), days_ahead(30)),
        None,
        Some(&auth),
    ).await).await;
    assert_eq!(window.as_array().unwrap().len(), 2);

    let anonymous = app.request("GET", "/api/v1/admin/reservations", None, None).await;
    assert_eq!(anonymous.status(), 401);
}

#[tokio::test]
async fn test_admin_reservation_lookup() {
    let app = TestApp::new().await;
    let auth = app.login().await;
    let id = app.create_procedure(&auth, "Маникюр", 30).await;

    let created = parse_body(app.request(
        "POST",
        "/api/v1/reservations",
        Some(reservation_body(&id, sofia(days_ahead(2), 11, 0), "0888123456")),
        None,
    ).await).await;
    let reservation_id = created["id"].as_str().unwrap();
    let uri = format!("/api/v1/admin/reservations/{}", reservation_id);

    let found = app.request("GET", &uri, None, Some(&auth)).await;
    assert_eq!(found.status(), 200);
    let found = parse_body(found).await;
    assert_eq!(found["id"], reservation_id);
    assert_eq!(found["procedure_id"], id);
    assert_eq!(found["phone"], "+359888123456");

    let missing = app.request("GET", "/api/v1/admin/reservations/no-such-id", None, Some(&auth)).await;
    assert_eq!(missing.status(), 404);

    let anonymous = app.request("GET", &uri, None, None).await;
    assert_eq!(anonymous.status(), 401);
}

#[tokio::test]
async fn test_statistics_rank_procedures() {
    let app = TestApp::new().await;
    let auth = app.login().await;
    let popular = app.create_procedure(&auth, "Маникюр", 30).await;
    let rare = app.create_procedure(&auth, "Педикюр", 30).await;
    let _unbooked = app.create_procedure(&auth, "Масаж", 30).await;

    let date = days_ahead(4);
    for (hour, id) in [(9, &popular), (10, &popular), (11, &popular), (12, &rare)] {
        let response = app.request("POST", "/api/v1/reservations", Some(reservation_body(id, sofia(date, hour, 0), "0888123456")), None).await;
        assert_eq!(response.status(), 201);
    }

    let stats = parse_body(app.request("GET", "/api/v1/admin/statistics", None, Some(&auth)).await).await;
    assert_eq!(stats["total_reservations"], 4);

    let procedures = stats["procedures"].as_array().unwrap();
    assert_eq!(procedures.len(), 3);
    assert_eq!(procedures[0]["procedure_id"], popular);
    assert_eq!(procedures[0]["count"], 3);
    assert_eq!(procedures[0]["percentage"], 75.0);
    assert_eq!(procedures[0]["popularity"], "MOST_POPULAR");
    assert_eq!(procedures[1]["procedure_id"], rare);
    assert_eq!(procedures[1]["popularity"], "LESS_POPULAR");
    assert_eq!(procedures[2]["popularity"], "LEAST_POPULAR");

    let top = parse_body(app.request("GET", "/api/v1/procedures/popular?limit=1", None, None).await).await;
    let top = top.as_array().unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0]["id"], popular);
    assert_eq!(top[0]["bookings"], 3);
}
