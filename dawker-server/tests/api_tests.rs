//! Integration tests for dawker-server API endpoints
//!
//! Each test builds the router over a fresh in-memory database and drives it
//! with `oneshot` requests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use dawker_common::db::init_memory_database;
use dawker_server::{build_router, AppState};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: Create app over an empty in-memory database
async fn setup_app() -> Router {
    let db = init_memory_database()
        .await
        .expect("Should create in-memory database");
    build_router(AppState::new(db))
}

/// Test helper: Request without body
fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: Request with JSON body
fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Test helper: Send a request and return status plus JSON body (Null if empty)
async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Should parse JSON")
    };
    (status, body)
}

/// Test helper: Register a user and return its id
async fn register(app: &Router, username: &str) -> i64 {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/users",
            json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": "pw"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

/// Test helper: Create an empty DAW and return its JSON
async fn create_daw(app: &Router, user_id: i64, name: &str) -> Value {
    let (status, body) = send(
        app,
        json_request("POST", "/api/daws", json!({"userId": user_id, "name": name})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

fn reverb_config() -> Value {
    json!({
        "name": "Main",
        "components": [{
            "instanceId": "c-1",
            "name": "Reverb",
            "type": "reverb",
            "settings": {
                "technology": "RNBO",
                "exportName": "cloud_v1",
                "parameters": {"decay": 0.85, "mix": 0.4}
            }
        }]
    })
}

// =============================================================================
// Health Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app().await;

    let response = app.oneshot(test_request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "dawker-server");
    assert!(body["version"].is_string());
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn test_health_reports_closed_database() {
    let db = init_memory_database().await.unwrap();
    let app = build_router(AppState::new(db.clone()));
    db.close().await;

    let (status, body) = send(&app, test_request("GET", "/health")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "unavailable");
}

// =============================================================================
// DAW Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_create_empty_daw() {
    let app = setup_app().await;
    let user_id = register(&app, "ana").await;

    let daw = create_daw(&app, user_id, "Rig1").await;

    assert_eq!(daw["userId"], user_id);
    assert_eq!(daw["name"], "Rig1");
    assert_eq!(daw["exportCount"], 0);
    assert_eq!(daw["version"], 1);
    assert_eq!(daw["configs"], json!([]));
}

#[tokio::test]
async fn test_create_daw_for_unknown_user() {
    let app = setup_app().await;

    let (status, body) = send(
        &app,
        json_request("POST", "/api/daws", json!({"userId": 99, "name": "Rig1"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["message"], "User not found with ID: 99");
}

#[tokio::test]
async fn test_rig1_main_reverb_scenario() {
    let app = setup_app().await;
    let user_id = register(&app, "ana").await;
    let daw = create_daw(&app, user_id, "Rig1").await;

    let (status, saved) = send(
        &app,
        json_request(
            "PUT",
            "/api/daws",
            json!({
                "id": daw["id"],
                "userId": user_id,
                "name": "Rig1",
                "version": daw["version"],
                "configs": [reverb_config()]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["version"], 2);

    let uri = format!("/api/daws/{}", daw["id"].as_str().unwrap());
    let (status, fetched) = send(&app, test_request("GET", &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, saved);

    let configs = fetched["configs"].as_array().unwrap();
    assert_eq!(configs.len(), 1);
    assert_eq!(configs[0]["name"], "Main");
    assert!(configs[0]["id"].is_i64());

    let components = configs[0]["components"].as_array().unwrap();
    assert_eq!(components.len(), 1);
    let reverb = &components[0];
    assert!(reverb["id"].is_i64());
    assert_eq!(reverb["instanceId"], "c-1");
    assert_eq!(reverb["name"], "Reverb");
    assert_eq!(reverb["type"], "reverb");
    assert!(reverb["settings"]["id"].is_i64());
    assert_eq!(reverb["settings"]["technology"], "RNBO");
    assert_eq!(reverb["settings"]["exportName"], "cloud_v1");
    assert_eq!(
        reverb["settings"]["parameters"],
        json!({"decay": 0.85, "mix": 0.4})
    );
}

#[tokio::test]
async fn test_save_empty_configs_clears_tree() {
    let app = setup_app().await;
    let user_id = register(&app, "ana").await;
    let daw = create_daw(&app, user_id, "Rig1").await;

    let (_, saved) = send(
        &app,
        json_request(
            "PUT",
            "/api/daws",
            json!({"id": daw["id"], "userId": user_id, "name": "Rig1", "version": 1, "configs": [reverb_config()]}),
        ),
    )
    .await;

    let (status, cleared) = send(
        &app,
        json_request(
            "PUT",
            "/api/daws",
            json!({"id": daw["id"], "userId": user_id, "name": "Rig1", "version": saved["version"], "configs": []}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let uri = format!("/api/daws/{}", daw["id"].as_str().unwrap());
    let (_, fetched) = send(&app, test_request("GET", &uri)).await;
    assert_eq!(fetched["configs"], json!([]));
    assert_eq!(fetched["version"], cleared["version"]);
}

#[tokio::test]
async fn test_fetched_tree_saves_back_unchanged() {
    let app = setup_app().await;
    let user_id = register(&app, "ana").await;
    let daw = create_daw(&app, user_id, "Rig1").await;

    let (_, saved) = send(
        &app,
        json_request(
            "PUT",
            "/api/daws",
            json!({"id": daw["id"], "userId": user_id, "name": "Rig1", "version": 1, "configs": [reverb_config(), reverb_config()]}),
        ),
    )
    .await;

    let (status, resaved) = send(&app, json_request("PUT", "/api/daws", saved.clone())).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(resaved["configs"], saved["configs"]);
    assert_eq!(resaved["version"], 3);
}

#[tokio::test]
async fn test_stale_version_conflict() {
    let app = setup_app().await;
    let user_id = register(&app, "ana").await;
    let daw = create_daw(&app, user_id, "Rig1").await;

    let first = json!({"id": daw["id"], "userId": user_id, "name": "Rig A", "version": 1, "configs": [reverb_config()]});
    let second = json!({"id": daw["id"], "userId": user_id, "name": "Rig B", "version": 1, "configs": []});

    let (status, _) = send(&app, json_request("PUT", "/api/daws", first)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, json_request("PUT", "/api/daws", second)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let uri = format!("/api/daws/{}", daw["id"].as_str().unwrap());
    let (_, fetched) = send(&app, test_request("GET", &uri)).await;
    assert_eq!(fetched["name"], "Rig A");
    assert_eq!(fetched["configs"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_save_unknown_daw_id() {
    let app = setup_app().await;
    let user_id = register(&app, "ana").await;

    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            "/api/daws",
            json!({"id": "no-such-daw", "userId": user_id, "name": "Rig1", "version": 1, "configs": []}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_name_is_bad_request() {
    let app = setup_app().await;
    let user_id = register(&app, "ana").await;

    let (status, body) = send(
        &app,
        json_request("POST", "/api/daws", json!({"userId": user_id, "name": "  "})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_user_daw_summaries() {
    let app = setup_app().await;
    let user_id = register(&app, "ana").await;

    let (status, body) = send(&app, test_request("GET", &format!("/api/users/{}/daws", user_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    create_daw(&app, user_id, "Rig1").await;
    create_daw(&app, user_id, "Rig2").await;

    let (_, body) = send(&app, test_request("GET", &format!("/api/users/{}/daws", user_id))).await;
    let summaries = body.as_array().unwrap();
    assert_eq!(summaries.len(), 2);
    assert!(summaries.iter().all(|s| s.get("configs").is_none()));

    let (status, _) = send(&app, test_request("GET", "/api/users/999/daws")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_all_daws() {
    let app = setup_app().await;
    let ana = register(&app, "ana").await;
    let ben = register(&app, "ben").await;
    create_daw(&app, ana, "Rig1").await;
    create_daw(&app, ben, "Rig2").await;

    let (status, body) = send(&app, test_request("GET", "/api/daws")).await;

    assert_eq!(status, StatusCode::OK);
    let daws = body.as_array().unwrap();
    assert_eq!(daws.len(), 2);
    assert!(daws.iter().all(|d| d["configs"].is_array()));
}

#[tokio::test]
async fn test_record_export() {
    let app = setup_app().await;
    let user_id = register(&app, "ana").await;
    let daw = create_daw(&app, user_id, "Rig1").await;
    let uri = format!("/api/daws/{}/exports", daw["id"].as_str().unwrap());

    let (status, summary) = send(&app, test_request("POST", &uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["exportCount"], 1);
    assert_eq!(summary["version"], 2);

    let (status, _) = send(&app, test_request("POST", "/api/daws/missing/exports")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_daw() {
    let app = setup_app().await;
    let user_id = register(&app, "ana").await;
    let daw = create_daw(&app, user_id, "Rig1").await;
    let uri = format!("/api/daws/{}", daw["id"].as_str().unwrap());

    let (status, _) = send(&app, test_request("DELETE", &uri)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, test_request("GET", &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, test_request("DELETE", &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// User Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_register_and_fetch_user() {
    let app = setup_app().await;
    let user_id = register(&app, "ana").await;

    let (status, user) = send(&app, test_request("GET", &format!("/api/users/{}", user_id))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["username"], "ana");
    assert_eq!(user["email"], "ana@example.com");
    assert_eq!(user["role"], "USER");
    assert!(user.get("password").is_none());
    assert!(user.get("passwordHash").is_none());

    let (_, users) = send(&app, test_request("GET", "/api/users")).await;
    assert_eq!(users.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_register_duplicate_user_conflict() {
    let app = setup_app().await;
    register(&app, "ana").await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/users",
            json!({"username": "ana", "email": "other@example.com", "password": "pw"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_authenticate_endpoint() {
    let app = setup_app().await;
    let user_id = register(&app, "ana").await;

    let (status, user) = send(
        &app,
        json_request(
            "POST",
            "/api/users/auth",
            json!({"email": "ana@example.com", "password": "pw"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["id"], user_id);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/users/auth",
            json!({"email": "ana@example.com", "password": "wrong"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_delete_user_cascades() {
    let app = setup_app().await;
    let user_id = register(&app, "ana").await;
    let daw = create_daw(&app, user_id, "Rig1").await;
    send(
        &app,
        json_request(
            "POST",
            "/api/notes",
            json!({"userId": user_id, "title": "Tone", "content": "more mids"}),
        ),
    )
    .await;

    let (status, _) = send(&app, test_request("DELETE", &format!("/api/users/{}", user_id))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        test_request("GET", &format!("/api/daws/{}", daw["id"].as_str().unwrap())),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, notes) = send(&app, test_request("GET", &format!("/api/users/{}/notes", user_id))).await;
    assert_eq!(notes, json!([]));
}

// =============================================================================
// Note Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_note_lifecycle() {
    let app = setup_app().await;
    let user_id = register(&app, "ana").await;

    let (status, created) = send(
        &app,
        json_request(
            "POST",
            "/api/notes",
            json!({"userId": user_id, "title": "Tone", "content": "more mids"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let note_id = created["id"].as_i64().unwrap();

    let (_, updated) = send(
        &app,
        json_request(
            "POST",
            "/api/notes",
            json!({"id": note_id, "userId": user_id, "title": "Tone", "content": "less mids"}),
        ),
    )
    .await;
    assert_eq!(updated["id"], note_id);

    let (status, fetched) = send(&app, test_request("GET", &format!("/api/notes/{}", note_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["content"], "less mids");

    let (_, listed) = send(&app, test_request("GET", &format!("/api/users/{}/notes", user_id))).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, test_request("DELETE", &format!("/api/notes/{}", note_id))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, test_request("GET", &format!("/api/notes/{}", note_id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_note_of_another_user_is_not_overwritten() {
    let app = setup_app().await;
    let owner = register(&app, "ana").await;
    let other = register(&app, "ben").await;

    let (_, created) = send(
        &app,
        json_request(
            "POST",
            "/api/notes",
            json!({"userId": owner, "title": "Tone", "content": "more mids"}),
        ),
    )
    .await;
    let note_id = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/notes",
            json!({"id": note_id, "userId": other, "title": "Tone", "content": "hijacked"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let (_, fetched) = send(&app, test_request("GET", &format!("/api/notes/{}", note_id))).await;
    assert_eq!(fetched["content"], "more mids");
    assert_eq!(fetched["userId"], owner);
}

// =============================================================================
// Preset Endpoint Tests
// =============================================================================

/// Test helper: Add a catalog entry and return its id
async fn add_gear(app: &Router, model: &str, kind: &str) -> i64 {
    let (status, body) = send(
        app,
        json_request("POST", "/api/gear", json!({"modelName": model, "gearType": kind})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_preset_chain_lifecycle() {
    let app = setup_app().await;
    let user_id = register(&app, "ana").await;
    let pedal = add_gear(&app, "Tube Screamer", "PEDAL").await;
    let amp = add_gear(&app, "JCM800", "AMP").await;

    let (status, created) = send(
        &app,
        json_request(
            "POST",
            "/api/presets",
            json!({
                "userId": user_id,
                "name": "Crunch",
                "gear": [
                    {"gearItemId": pedal, "gainValue": 0.7},
                    {"gearItemId": amp, "gainValue": 0.5, "toneValue": 0.6}
                ]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let preset_id = created["id"].as_i64().unwrap();
    assert_eq!(created["gear"][0]["modelName"], "Tube Screamer");
    assert_eq!(created["gear"][1]["position"], 1);
    assert_eq!(created["gear"][1]["toneValue"], 0.6);

    // Swap the chain order
    let (status, updated) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/presets/{}", preset_id),
            json!({
                "userId": user_id,
                "name": "Crunch",
                "gear": [{"gearItemId": amp}, {"gearItemId": pedal}]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["gear"][0]["gearItemId"], amp);
    assert_eq!(updated["gear"][0]["position"], 0);
    assert_eq!(updated["gear"][1]["gearItemId"], pedal);

    let (_, listed) = send(&app, test_request("GET", &format!("/api/users/{}/presets", user_id))).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, test_request("DELETE", &format!("/api/presets/{}", preset_id))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, test_request("GET", &format!("/api/presets/{}", preset_id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_popular_gear_ranking() {
    let app = setup_app().await;
    let user_id = register(&app, "ana").await;
    let amp = add_gear(&app, "JCM800", "AMP").await;
    let cab = add_gear(&app, "V30 4x12", "CABINET").await;

    for (name, chain) in [("A", json!([{"gearItemId": amp}, {"gearItemId": cab}])), ("B", json!([{"gearItemId": amp}]))] {
        let (status, _) = send(
            &app,
            json_request("POST", "/api/presets", json!({"userId": user_id, "name": name, "gear": chain})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, ranking) = send(&app, test_request("GET", "/api/gear/popular")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ranking[0]["gearItemId"], amp);
    assert_eq!(ranking[0]["usageCount"], 2);
    assert_eq!(ranking.as_array().unwrap().len(), 2);

    let (_, top) = send(&app, test_request("GET", "/api/gear/popular?limit=1")).await;
    assert_eq!(top.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, test_request("GET", "/api/gear/popular?limit=0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_preset_with_unknown_gear_not_found() {
    let app = setup_app().await;
    let user_id = register(&app, "ana").await;

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/presets",
            json!({"userId": user_id, "name": "Ghost", "gear": [{"gearItemId": 404}]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Forum Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_forum_thread() {
    let app = setup_app().await;
    let ana = register(&app, "ana").await;
    let ben = register(&app, "ben").await;

    let (status, post) = send(
        &app,
        json_request(
            "POST",
            "/api/forum/posts",
            json!({
                "userId": ana,
                "title": "Neon Valley",
                "description": "Synthwave rig, feedback welcome",
                "postType": "SHOWCASE",
                "tags": ["synthwave", "reverb"]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(post["author"], "ana");
    assert_eq!(post["postType"], "SHOWCASE");
    let post_id = post["id"].as_i64().unwrap();

    let (status, comment) = send(
        &app,
        json_request(
            "POST",
            &format!("/api/forum/posts/{}/comments", post_id),
            json!({"userId": ben, "content": "Love the pads"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(comment["author"], "ben");

    let (_, thread) = send(&app, test_request("GET", &format!("/api/forum/posts/{}", post_id))).await;
    assert_eq!(thread["comments"].as_array().unwrap().len(), 1);
    assert_eq!(thread["tags"], json!(["synthwave", "reverb"]));

    let (_, all) = send(&app, test_request("GET", "/api/forum/posts")).await;
    assert_eq!(all.as_array().unwrap().len(), 1);

    let (_, bens) = send(&app, test_request("GET", &format!("/api/users/{}/posts", ben))).await;
    assert!(bens.as_array().unwrap().is_empty());

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/forum/posts/999/comments",
            json!({"userId": ben, "content": "anyone?"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, test_request("DELETE", &format!("/api/forum/posts/{}", post_id))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

// =============================================================================
// Rating Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_rate_daw() {
    let app = setup_app().await;
    let ana = register(&app, "ana").await;
    let ben = register(&app, "ben").await;
    let daw = create_daw(&app, ana, "Neon Valley").await;
    let ratings_uri = format!("/api/daws/{}/ratings", daw["id"].as_str().unwrap());

    let (status, empty) = send(&app, test_request("GET", &ratings_uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty["count"], 0);

    send(&app, json_request("POST", &ratings_uri, json!({"userId": ana, "rating": 5.0}))).await;
    let (status, page) = send(
        &app,
        json_request("POST", &ratings_uri, json!({"userId": ben, "rating": 2.0, "comment": "too wet"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["rating"], 3.5);
    assert_eq!(page["count"], 2);
    assert_eq!(page["comments"][1]["username"], "ben");

    let (status, _) = send(
        &app,
        json_request("POST", &ratings_uri, json!({"userId": ben, "rating": 9})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, test_request("GET", "/api/daws/missing/ratings")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Ratings go with the project
    send(&app, test_request("DELETE", &format!("/api/daws/{}", daw["id"].as_str().unwrap()))).await;
    let (status, _) = send(&app, test_request("GET", &ratings_uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
