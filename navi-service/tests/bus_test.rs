mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn create_bus_applies_defaults() {
    let app = TestApp::spawn().await;
    let token = app.authority_token().await;

    let (status, body) = app
        .post("/api/buses", Some(&token), json!({ "name": "X1", "route": "R1" }))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["msg"], "Bus added");

    let bus = &body["bus"];
    assert_eq!(bus["name"], "X1");
    assert_eq!(bus["route"], "R1");
    assert_eq!(bus["lat"], 0.0);
    assert_eq!(bus["lng"], 0.0);
    assert_eq!(bus["status"], "On Time");
    assert_eq!(bus["driver"], "New Driver");
    assert_eq!(bus["speed"], 0.0);
    assert_eq!(bus["capacity"], 40);
    assert_eq!(bus["passengers"], 0);
    assert!(bus["updated_at"].is_string());
}

#[tokio::test]
async fn create_bus_accepts_optional_fields() {
    let app = TestApp::spawn().await;
    let token = app.authority_token().await;

    let (status, body) = app
        .post(
            "/api/buses",
            Some(&token),
            json!({ "name": "BGarden", "route": "Route 101", "lat": 22.5726, "lng": 88.3639, "driver": "Driver X" }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["bus"]["lat"], 22.5726);
    assert_eq!(body["bus"]["lng"], 88.3639);
    assert_eq!(body["bus"]["driver"], "Driver X");
}

#[tokio::test]
async fn create_bus_requires_name_and_route() {
    let app = TestApp::spawn().await;
    let token = app.authority_token().await;

    let (status, body) = app
        .post("/api/buses", Some(&token), json!({ "name": "X1" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["msg"].as_str().unwrap().contains("Name and route are required"));

    let (_, list) = app.get("/api/buses", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn list_returns_buses_in_insertion_order() {
    let app = TestApp::spawn().await;
    let token = app.authority_token().await;

    for (name, route) in [("BGarden", "Route 101"), ("L238", "Route 202"), ("DN17", "Route 303")] {
        app.create_bus(&token, name, route).await;
    }

    let (status, body) = app.get("/api/buses", None).await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["BGarden", "L238", "DN17"]);
}

#[tokio::test]
async fn update_overwrites_only_provided_fields() {
    let app = TestApp::spawn().await;
    let token = app.authority_token().await;
    let id = app.create_bus(&token, "X1", "R1").await;

    let (status, body) = app
        .put(
            &format!("/api/buses/{}", id),
            Some(&token),
            json!({ "lat": 22.57, "lng": 88.36, "speed": 32.5, "status": "Delayed", "unknown": true }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "Updated");
    assert_eq!(body["bus"]["lat"], 22.57);
    assert_eq!(body["bus"]["speed"], 32.5);
    assert_eq!(body["bus"]["status"], "Delayed");
    assert_eq!(body["bus"]["name"], "X1");
    assert_eq!(body["bus"]["capacity"], 40);
}

#[tokio::test]
async fn update_unknown_bus_is_not_found_and_changes_nothing() {
    let app = TestApp::spawn().await;
    let token = app.authority_token().await;
    let id = app.create_bus(&token, "X1", "R1").await;
    let (_, before) = app.get("/api/buses", None).await;

    let (status, body) = app
        .put(
            &format!("/api/buses/{}", id + 1000),
            Some(&token),
            json!({ "passengers": 12 }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["msg"].is_string());

    let (_, after) = app.get("/api/buses", None).await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn update_rejects_invalid_values() {
    let app = TestApp::spawn().await;
    let token = app.authority_token().await;
    let id = app.create_bus(&token, "X1", "R1").await;
    let uri = format!("/api/buses/{}", id);

    for body in [
        json!({ "passengers": -1 }),
        json!({ "capacity": "lots" }),
        json!({ "lat": "north" }),
        json!({ "name": "" }),
    ] {
        let (status, _) = app.put(&uri, Some(&token), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (_, list) = app.get("/api/buses", None).await;
    assert_eq!(list[0]["passengers"], 0);
    assert_eq!(list[0]["name"], "X1");
}

#[tokio::test]
async fn update_passengers_action_coerces_numeric_strings() {
    let app = TestApp::spawn().await;
    let token = app.authority_token().await;
    let id = app.create_bus(&token, "X1", "R1").await;
    let uri = format!("/api/buses/{}/action", id);

    let (status, body) = app
        .post(&uri, Some(&token), json!({ "action": "update_passengers", "passengers": "5" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "Action applied");
    assert_eq!(body["bus"]["passengers"], 5);

    let (status, _) = app
        .post(&uri, Some(&token), json!({ "action": "update_passengers", "passengers": "abc" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = app.get("/api/buses", None).await;
    assert_eq!(list[0]["passengers"], 5);
}

#[tokio::test]
async fn set_status_action_requires_status() {
    let app = TestApp::spawn().await;
    let token = app.authority_token().await;
    let id = app.create_bus(&token, "X1", "R1").await;
    let uri = format!("/api/buses/{}/action", id);

    let (status, _) = app
        .post(&uri, Some(&token), json!({ "action": "set_status" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(&uri, Some(&token), json!({ "action": "set_status", "status": "Detoured" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bus"]["status"], "Detoured");
}

#[tokio::test]
async fn unknown_action_is_rejected() {
    let app = TestApp::spawn().await;
    let token = app.authority_token().await;
    let id = app.create_bus(&token, "X1", "R1").await;

    let (status, body) = app
        .post(
            &format!("/api/buses/{}/action", id),
            Some(&token),
            json!({ "action": "teleport" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["msg"]
        .as_str()
        .unwrap()
        .starts_with("Unknown action or missing parameters"));
}

#[tokio::test]
async fn action_on_unknown_bus_is_not_found() {
    let app = TestApp::spawn().await;
    let token = app.authority_token().await;

    let (status, _) = app
        .post("/api/buses/99/action", Some(&token), json!({ "action": "emergency_stop" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn emergency_broadcast_stops_every_bus() {
    let app = TestApp::spawn().await;
    let token = app.authority_token().await;

    let (status, body) = app.post("/api/emergency", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["affected"], 0);

    for name in ["A", "B", "C", "D"] {
        app.create_bus(&token, name, "R").await;
    }

    let (status, body) = app.post("/api/emergency", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "Emergency applied to all buses");
    assert_eq!(body["affected"], 4);

    let (_, list) = app.get("/api/buses", None).await;
    assert!(list
        .as_array()
        .unwrap()
        .iter()
        .all(|b| b["status"] == "Emergency Stop"));
}

#[tokio::test]
async fn create_stop_and_report_end_to_end() {
    let app = TestApp::spawn().await;
    let token = app.authority_token().await;

    let (status, body) = app
        .post("/api/buses", Some(&token), json!({ "name": "X1", "route": "R1" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["bus"]["capacity"], 40);
    assert_eq!(body["bus"]["passengers"], 0);
    assert_eq!(body["bus"]["status"], "On Time");
    let id = body["bus"]["id"].as_i64().unwrap();

    let (status, body) = app
        .post(
            &format!("/api/buses/{}/action", id),
            Some(&token),
            json!({ "action": "emergency_stop" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bus"]["status"], "Emergency Stop");

    let (status, body) = app.get("/api/report", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["report"],
        json!(["X1 - R1 - Emergency Stop - 0/40 passengers"])
    );
}

#[tokio::test]
async fn non_numeric_bus_id_is_not_found_with_json_body() {
    let app = TestApp::spawn().await;
    let token = app.authority_token().await;

    let (status, body) = app
        .put("/api/buses/abc", Some(&token), json!({ "passengers": 3 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["msg"], "Bus abc not found");

    let (status, body) = app
        .post("/api/buses/abc/action", Some(&token), json!({ "action": "emergency_stop" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["msg"].is_string());
}
