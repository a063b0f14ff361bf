use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use serde_json::{Value, json};
use timetable::api::router;
use timetable::db::MemoryStore;
use timetable::state::AppState;
use tower::ServiceExt;

fn app() -> Router {
    router(AppState::new(Arc::new(MemoryStore::new())))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, HeaderMap, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let request = builder
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, bytes.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> Value {
    let (status, _, body) = send(app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).unwrap()
}

async fn post_json(app: &Router, uri: &str, body: Value) -> Value {
    let (status, _, body) = send(app, Method::POST, uri, Some(&body.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).unwrap()
}

/// Creates one teacher, group, subject and classroom and returns their ids.
async fn seed_references(app: &Router) -> (i64, i64, i64, i64) {
    let t = post_json(app, "/api/teachers", json!({"fullName": "A. Ivanov"})).await;
    let g = post_json(app, "/api/groups", json!({"groupName": "CS-101"})).await;
    let s = post_json(app, "/api/subjects", json!({"subjectName": "Algebra"})).await;
    let c = post_json(app, "/api/classrooms", json!({"roomName": "204"})).await;
    (
        t["id"].as_i64().unwrap(),
        g["id"].as_i64().unwrap(),
        s["id"].as_i64().unwrap(),
        c["id"].as_i64().unwrap(),
    )
}

#[tokio::test]
async fn create_then_list_teacher() {
    let app = app();

    let created = post_json(&app, "/api/teachers", json!({"fullName": "A. Ivanov"})).await;
    assert_eq!(created, json!({"id": 1, "fullName": "A. Ivanov"}));

    let listed = get_json(&app, "/api/teachers").await;
    assert_eq!(listed, json!([{"id": 1, "fullName": "A. Ivanov"}]));
}

#[tokio::test]
async fn empty_list_is_an_empty_array() {
    let app = app();
    let (status, headers, body) = send(&app, Method::GET, "/api/subjects", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["content-type"], "application/json");
    assert_eq!(body, b"[]");
}

#[tokio::test]
async fn create_assigns_fresh_ids_and_ignores_client_id() {
    let app = app();

    let first = post_json(&app, "/api/groups", json!({"id": 77, "groupName": "A"})).await;
    let second = post_json(&app, "/api/groups", json!({"groupName": "B"})).await;
    assert_eq!(first["id"], 1);
    assert_eq!(second["id"], 2);

    let listed = get_json(&app, "/api/groups").await;
    assert_eq!(listed.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn create_without_content_type_is_accepted() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/classrooms")
        .body(Body::from(r#"{"roomName":"101"}"#))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn update_overwrites_name_and_keeps_id() {
    let app = app();
    post_json(&app, "/api/subjects", json!({"subjectName": "Algebra"})).await;

    let (status, _, body) = send(
        &app,
        Method::PUT,
        "/api/subjects",
        Some(r#"{"id":1,"subjectName":"Geometry"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let listed = get_json(&app, "/api/subjects").await;
    assert_eq!(listed, json!([{"id": 1, "subjectName": "Geometry"}]));
}

#[tokio::test]
async fn update_of_unknown_id_still_succeeds() {
    let app = app();
    let (status, _, _) = send(
        &app,
        Method::PUT,
        "/api/teachers",
        Some(r#"{"id":42,"fullName":"Nobody"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(get_json(&app, "/api/teachers").await, json!([]));
}

#[tokio::test]
async fn update_requires_id() {
    let app = app();
    let (status, _, body) = send(
        &app,
        Method::PUT,
        "/api/teachers",
        Some(r#"{"fullName":"No Id"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let error: Value = serde_json::from_slice(&body).unwrap();
    assert!(error["message"].as_str().unwrap().contains("id"));
}

#[tokio::test]
async fn delete_is_idempotent() {
    let app = app();
    post_json(&app, "/api/classrooms", json!({"roomName": "204"})).await;

    let (status, _, _) = send(&app, Method::DELETE, "/api/classrooms?id=1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(get_json(&app, "/api/classrooms").await, json!([]));

    let (status, _, _) = send(&app, Method::DELETE, "/api/classrooms?id=1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn delete_without_id_is_rejected() {
    let app = app();
    post_json(&app, "/api/teachers", json!({"fullName": "Kept"})).await;

    for uri in ["/api/teachers", "/api/teachers?id=", "/api/teachers?other=1"] {
        let (status, _, _) = send(&app, Method::DELETE, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    }
    assert_eq!(get_json(&app, "/api/teachers").await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn delete_with_non_numeric_id_is_rejected() {
    let app = app();
    let (status, _, body) = send(&app, Method::DELETE, "/api/schedules?id=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["message"], "Invalid id: abc");
}

#[tokio::test]
async fn malformed_body_is_rejected_without_side_effects() {
    let app = app();

    let (status, _, _) = send(&app, Method::POST, "/api/teachers", Some("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = send(
        &app,
        Method::POST,
        "/api/schedules",
        Some(r#"{"dayOfWeek":"Monday","timeslot":"first"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(get_json(&app, "/api/teachers").await, json!([]));
    assert_eq!(get_json(&app, "/api/schedules").await, json!([]));
}

#[tokio::test]
async fn malformed_update_leaves_rows_unchanged() {
    let app = app();
    let (t, g, s, c) = seed_references(&app).await;
    let body = json!({
        "dayOfWeek": "Monday",
        "timeslot": 1,
        "teacherId": t,
        "groupId": g,
        "subjectId": s,
        "classroomId": c
    });
    post_json(&app, "/api/schedules", body).await;
    let schedules_before = get_json(&app, "/api/schedules").await;
    let teachers_before = get_json(&app, "/api/teachers").await;

    let (status, _, _) = send(
        &app,
        Method::PUT,
        "/api/schedules",
        Some(r#"{"id":1,"timeslot":"x"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = send(
        &app,
        Method::PUT,
        "/api/teachers",
        Some(r#"{"id":1,"fullName":"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = send(
        &app,
        Method::PUT,
        "/api/teachers",
        Some(r#"{"fullName":"No Id"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(get_json(&app, "/api/schedules").await, schedules_before);
    assert_eq!(get_json(&app, "/api/teachers").await, teachers_before);
}

#[tokio::test]
async fn create_with_absent_or_null_fields_uses_zero_values() {
    let app = app();

    let created = post_json(&app, "/api/teachers", json!({})).await;
    assert_eq!(created, json!({"id": 1, "fullName": ""}));

    let created = post_json(&app, "/api/groups", json!({"groupName": null})).await;
    assert_eq!(created, json!({"id": 1, "groupName": ""}));

    assert_eq!(
        get_json(&app, "/api/teachers").await,
        json!([{"id": 1, "fullName": ""}])
    );
}

#[tokio::test]
async fn schedule_with_null_reference_is_a_store_failure() {
    let app = app();
    let (_, g, s, c) = seed_references(&app).await;

    let body = json!({
        "dayOfWeek": "Monday",
        "timeslot": null,
        "teacherId": null,
        "groupId": g,
        "subjectId": s,
        "classroomId": c
    });
    let (status, _, _) = send(&app, Method::POST, "/api/schedules", Some(&body.to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(get_json(&app, "/api/schedules").await, json!([]));
}

#[tokio::test]
async fn unsupported_method_is_405_with_empty_body() {
    let app = app();
    let (status, _, body) = send(&app, Method::PATCH, "/api/groups", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(body.is_empty());
}

#[tokio::test]
async fn options_short_circuits_with_cors_headers() {
    let app = app();
    let (status, headers, body) = send(&app, Method::OPTIONS, "/api/teachers", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(
        headers["access-control-allow-methods"],
        "GET, POST, PUT, DELETE, OPTIONS"
    );
    assert_eq!(
        headers["access-control-allow-headers"],
        "Content-Type, Authorization"
    );
}

#[tokio::test]
async fn every_response_carries_cors_headers() {
    let app = app();

    let (_, headers, _) = send(&app, Method::GET, "/api/schedules", None).await;
    assert_eq!(headers["access-control-allow-origin"], "*");

    let (_, headers, _) = send(&app, Method::DELETE, "/api/groups", None).await;
    assert_eq!(headers["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn schedule_list_joins_reference_names() {
    let app = app();
    let (t, g, s, c) = seed_references(&app).await;

    let body = json!({
        "dayOfWeek": "Monday",
        "timeslot": 2,
        "teacherId": t,
        "groupId": g,
        "subjectId": s,
        "classroomId": c
    });
    let created = post_json(&app, "/api/schedules", body).await;
    assert_eq!(created["id"], 1);
    assert_eq!(created["dayOfWeek"], "Monday");

    let listed = get_json(&app, "/api/schedules").await;
    assert_eq!(
        listed,
        json!([{
            "id": 1,
            "dayOfWeek": "Monday",
            "timeslot": 2,
            "teacherId": t,
            "teacherName": "A. Ivanov",
            "groupId": g,
            "groupName": "CS-101",
            "subjectId": s,
            "subjectName": "Algebra",
            "classroomId": c,
            "classroomName": "204"
        }])
    );
}

#[tokio::test]
async fn schedule_list_is_ordered_by_id() {
    let app = app();
    let (t, g, s, c) = seed_references(&app).await;

    for day in ["Tuesday", "Monday", "Friday"] {
        let body = json!({
            "dayOfWeek": day,
            "timeslot": 1,
            "teacherId": t,
            "groupId": g,
            "subjectId": s,
            "classroomId": c
        });
        post_json(&app, "/api/schedules", body).await;
    }

    let listed = get_json(&app, "/api/schedules").await;
    let ids: Vec<i64> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn schedule_update_and_delete() {
    let app = app();
    let (t, g, s, c) = seed_references(&app).await;
    let other = post_json(&app, "/api/teachers", json!({"fullName": "B. Petrova"})).await;

    let body = json!({
        "dayOfWeek": "Monday",
        "timeslot": 1,
        "teacherId": t,
        "groupId": g,
        "subjectId": s,
        "classroomId": c
    });
    post_json(&app, "/api/schedules", body).await;

    let update = json!({
        "id": 1,
        "dayOfWeek": "Wednesday",
        "timeslot": 4,
        "teacherId": other["id"],
        "groupId": g,
        "subjectId": s,
        "classroomId": c
    });
    let (status, _, _) = send(&app, Method::PUT, "/api/schedules", Some(&update.to_string())).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let listed = get_json(&app, "/api/schedules").await;
    assert_eq!(listed[0]["dayOfWeek"], "Wednesday");
    assert_eq!(listed[0]["timeslot"], 4);
    assert_eq!(listed[0]["teacherName"], "B. Petrova");

    let (status, _, _) = send(&app, Method::DELETE, "/api/schedules?id=1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(get_json(&app, "/api/schedules").await, json!([]));
}

#[tokio::test]
async fn overlapping_schedules_are_allowed() {
    let app = app();
    let (t, g, s, c) = seed_references(&app).await;

    let body = json!({
        "dayOfWeek": "Monday",
        "timeslot": 1,
        "teacherId": t,
        "groupId": g,
        "subjectId": s,
        "classroomId": c
    });
    post_json(&app, "/api/schedules", body.clone()).await;
    post_json(&app, "/api/schedules", body).await;

    assert_eq!(get_json(&app, "/api/schedules").await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn schedule_with_missing_reference_is_a_store_failure() {
    let app = app();
    let (_, g, s, c) = seed_references(&app).await;

    let body = json!({
        "dayOfWeek": "Monday",
        "timeslot": 1,
        "teacherId": 999,
        "groupId": g,
        "subjectId": s,
        "classroomId": c
    });
    let (status, _, response) =
        send(&app, Method::POST, "/api/schedules", Some(&body.to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let error: Value = serde_json::from_slice(&response).unwrap();
    assert_eq!(error["message"], "Database error occurred");
    assert_eq!(get_json(&app, "/api/schedules").await, json!([]));
}

#[tokio::test]
async fn schedule_update_with_missing_reference_is_a_store_failure() {
    let app = app();
    let (t, g, s, c) = seed_references(&app).await;
    let body = json!({
        "dayOfWeek": "Monday",
        "timeslot": 1,
        "teacherId": t,
        "groupId": g,
        "subjectId": s,
        "classroomId": c
    });
    post_json(&app, "/api/schedules", body).await;

    let update = json!({
        "id": 1,
        "dayOfWeek": "Monday",
        "timeslot": 1,
        "teacherId": 999,
        "groupId": g,
        "subjectId": s,
        "classroomId": c
    });
    let (status, _, _) = send(&app, Method::PUT, "/api/schedules", Some(&update.to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let listed = get_json(&app, "/api/schedules").await;
    assert_eq!(listed[0]["teacherId"], t);
}

#[tokio::test]
async fn deleting_a_referenced_teacher_fails() {
    let app = app();
    let (t, g, s, c) = seed_references(&app).await;
    let body = json!({
        "dayOfWeek": "Monday",
        "timeslot": 1,
        "teacherId": t,
        "groupId": g,
        "subjectId": s,
        "classroomId": c
    });
    post_json(&app, "/api/schedules", body).await;

    let uri = format!("/api/teachers?id={t}");
    let (status, _, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(get_json(&app, "/api/schedules").await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app();
    let (status, _, _) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}
