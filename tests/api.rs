use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use heartchat::{
    AppState,
    chat::Chat,
    clock::ManualClock,
    router,
    store::SqliteStore,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // for `oneshot`

fn app() -> (Arc<ManualClock>, Arc<Chat>, Router) {
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let chat = Arc::new(Chat::in_memory(clock.clone()));
    let app = router(AppState { chat: chat.clone() });
    (clock, chat, app)
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post(uri: &str, user: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(user) = user {
        builder = builder.header("User", user);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, user: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(user) = user {
        builder = builder.header("User", user);
    }
    builder.body(Body::empty()).unwrap()
}

async fn join(app: &Router, name: &str) -> (StatusCode, Value) {
    call(app, post("/participants", None, json!({ "name": name }))).await
}

async fn say(app: &Router, from: &str, to: &str, text: &str, kind: &str) -> StatusCode {
    let body = json!({ "to": to, "text": text, "type": kind });
    call(app, post("/messages", Some(from), body)).await.0
}

#[tokio::test]
async fn health() {
    let (_, _, app) = app();
    let response = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn joining_twice_conflicts() {
    let (_, _, app) = app();

    let (status, body) = join(&app, "Maria").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Maria");
    assert_eq!(body["lastStatus"], 1_700_000_000_000i64);

    let (status, body) = join(&app, "Maria").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("Maria"));

    let (status, _) = join(&app, "").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _) = call(&app, post("/participants", None, json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _) = join(&app, "Todos").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = call(&app, get("/participants", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn joining_announces_the_participant() {
    let (_, _, app) = app();
    join(&app, "Maria").await;

    let (status, body) = call(&app, get("/messages", Some("Joao"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body[0],
        json!({
            "id": body[0]["id"],
            "from": "Maria",
            "to": "Todos",
            "text": "joined",
            "type": "status",
            "time": "22:13:20",
            "timestamp": 1_700_000_000_000i64,
        })
    );
}

#[tokio::test]
async fn messages_are_filtered_per_reader() {
    let (_, _, app) = app();
    join(&app, "A").await;

    assert_eq!(say(&app, "A", "Todos", "hello", "message").await, StatusCode::CREATED);
    assert_eq!(say(&app, "A", "B", "to B", "private_message").await, StatusCode::CREATED);
    assert_eq!(say(&app, "A", "C", "to C", "private_message").await, StatusCode::CREATED);

    let (_, body) = call(&app, get("/messages", Some("B"))).await;
    let texts: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["joined", "hello", "to B"]);

    let (_, body) = call(&app, get("/messages", None)).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn limit_returns_the_tail() {
    let (_, _, app) = app();
    join(&app, "A").await;
    for i in 0..9 {
        say(&app, "A", "Todos", &format!("m{i}"), "message").await;
    }

    let (status, body) = call(&app, get("/messages?limit=3", Some("B"))).await;
    assert_eq!(status, StatusCode::OK);
    let texts: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["m6", "m7", "m8"]);

    let (_, body) = call(&app, get("/messages?limit=0", Some("B"))).await;
    assert_eq!(body.as_array().unwrap().len(), 10);

    let (status, _) = call(&app, get("/messages?limit=lots", Some("B"))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn bad_messages_are_unprocessable() {
    let (_, _, app) = app();
    join(&app, "A").await;

    assert_eq!(say(&app, "A", "B", "hey", "message").await, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        say(&app, "A", "Todos", "hey", "private_message").await,
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(say(&app, "A", "Todos", "", "message").await, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(say(&app, "A", "Todos", "hey", "shout").await, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(say(&app, "ghost", "Todos", "boo", "message").await, StatusCode::UNPROCESSABLE_ENTITY);

    let body = json!({ "to": "Todos", "text": "who am I", "type": "message" });
    let (status, _) = call(&app, post("/messages", None, body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = call(&app, get("/messages", Some("A"))).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn status_keeps_participants_alive() {
    let (clock, chat, app) = app();
    join(&app, "A").await;
    join(&app, "B").await;

    clock.advance(Duration::from_secs(8));
    let (status, _) = call(&app, post("/status", Some("A"), json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    clock.advance(Duration::from_secs(8));

    assert_eq!(chat.evict_expired(Duration::from_secs(10)).await.unwrap(), vec!["B"]);

    let (_, body) = call(&app, get("/participants", None)).await;
    assert_eq!(body, json!([{ "name": "A", "lastStatus": 1_700_000_008_000i64 }]));

    let (status, _) = call(&app, post("/status", Some("B"), json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&app, post("/status", None, json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(say(&app, "B", "Todos", "wait", "message").await, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn sqlite_backed_room() {
    let clock = Arc::new(ManualClock::new(0));
    let store = Arc::new(SqliteStore::new(
        heartchat::db::connect_in_memory().await.unwrap(),
    ));
    let chat = Arc::new(Chat::new(store.clone(), store, clock.clone()));
    let app = router(AppState { chat: chat.clone() });

    assert_eq!(join(&app, "A").await.0, StatusCode::CREATED);
    assert_eq!(join(&app, "A").await.0, StatusCode::CONFLICT);
    assert_eq!(say(&app, "A", "B", "psst", "private_message").await, StatusCode::CREATED);

    clock.advance(Duration::from_secs(11));
    assert_eq!(chat.evict_expired(Duration::from_secs(10)).await.unwrap(), vec!["A"]);

    let (_, body) = call(&app, get("/messages", Some("C"))).await;
    let texts: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["joined", "left"]);
}
