use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use pokepick_server::{router, AppState};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
        Value::String(String::from_utf8_lossy(&bytes).into_owned())
    });
    (status, value)
}

fn member(id: u64) -> Value {
    json!({
        "id": id,
        "name": format!("mon-{id}"),
        "image": "",
        "types": [{ "type": { "name": "grass" } }],
        "stats": [],
        "moves": ["a", "b", "c", "d"],
    })
}

#[tokio::test]
async fn root_reports_running() {
    let app = router(AppState::in_memory());
    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("Pokepick backend running".into()));
}

#[tokio::test]
async fn team_add_remove_clear() {
    let app = router(AppState::in_memory());

    let (status, body) = send(&app, Method::GET, "/api/team", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "team": [] }));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/team/add",
        Some(json!({ "pokemon": member(25) })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "team": [member(25)] }));

    send(&app, Method::POST, "/api/team/add", Some(json!({ "pokemon": member(1) }))).await;
    let (status, body) = send(&app, Method::POST, "/api/team/remove", Some(json!({ "id": 25 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "team": [member(1)] }));

    let (status, body) = send(&app, Method::POST, "/api/team/clear", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "team": [] }));
}

#[tokio::test]
async fn team_rejections_use_error_bodies() {
    let app = router(AppState::in_memory());

    let (status, body) = send(&app, Method::POST, "/api/team/add", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Missing pokemon data or id" }));

    for id in 1..=6 {
        send(&app, Method::POST, "/api/team/add", Some(json!({ "pokemon": member(id) }))).await;
    }
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/team/add",
        Some(json!({ "pokemon": member(3) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Pokemon already in team" }));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/team/add",
        Some(json!({ "pokemon": member(7) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Team cannot have more than 6 Pokémon" }));

    let (status, body) = send(&app, Method::POST, "/api/team/remove", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Missing pokemon id" }));
}

#[tokio::test]
async fn remove_with_a_string_id_leaves_numeric_members() {
    let app = router(AppState::in_memory());
    send(&app, Method::POST, "/api/team/add", Some(json!({ "pokemon": member(25) }))).await;

    let (status, body) = send(&app, Method::POST, "/api/team/remove", Some(json!({ "id": "25" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "team": [member(25)] }));

    let (status, body) = send(&app, Method::POST, "/api/team/remove", Some(json!({ "id": 0 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Missing pokemon id" }));
}

#[tokio::test]
async fn contact_lifecycle() {
    let app = router(AppState::in_memory());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/contact/submit",
        Some(json!({
            "name": " Misty ",
            "email": "misty@cerulean.gym",
            "subject": "Bike",
            "message": "You still owe me a bike.",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    let id = body["messageId"].as_i64().expect("message id");

    let (_, body) = send(&app, Method::GET, "/api/contact/messages", None).await;
    let messages = body["messages"].as_array().cloned().unwrap_or_default();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["name"], json!("Misty"));
    assert_eq!(messages[0]["status"], json!("unread"));

    let (status, body) = send(&app, Method::PUT, &format!("/api/contact/messages/{id}/read"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"]["status"], json!("read"));

    let (status, body) = send(&app, Method::DELETE, &format!("/api/contact/messages/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "message": "Message deleted" }));

    let (status, body) = send(&app, Method::DELETE, &format!("/api/contact/messages/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Message not found" }));
}

#[tokio::test]
async fn contact_validation() {
    let app = router(AppState::in_memory());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/contact/submit",
        Some(json!({ "name": "Brock", "email": "brock@pewter.gym" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "All fields are required" }));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/contact/submit",
        Some(json!({
            "name": "Brock",
            "email": "brock-at-pewter",
            "subject": "Rocks",
            "message": "Onix says hi",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Please enter a valid email address" }));

    let (status, _) = send(&app, Method::PUT, "/api/contact/messages/abc/read", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
