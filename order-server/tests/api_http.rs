//! HTTP-level tests going through the full router, middleware included.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use order_server::auth::JwtConfig;
use order_server::core::{Config, ServerState, build_router};
use order_server::notify::Notification;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    // Held so the work dir outlives the state
    _dir: TempDir,
    state: ServerState,
    router: Router,
}

async fn test_app() -> TestApp {
    let dir = TempDir::new().expect("temp dir");
    let mut config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    config.jwt = JwtConfig {
        secret: "integration-test-secret-integration-test".to_string(),
        expiration_minutes: 60,
        issuer: "order-server".to_string(),
    };
    // Keep estimates independent of the wall clock
    config.estimator.peak_factor = 1.0;

    let state = ServerState::initialize(&config).await;
    let router = build_router(state.clone());
    TestApp {
        _dir: dir,
        state,
        router,
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router call");
    let status = response.status();
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn post_empty(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn admin_token(app: &TestApp) -> String {
    let (status, _) = send(
        &app.router,
        post_json(
            "/api/auth/register",
            json!({"email": "chef@example.com", "password": "kitchen-secret"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app.router,
        post_json(
            "/api/auth/login",
            json!({"email": "chef@example.com", "password": "kitchen-secret"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().expect("token").to_string()
}

/// First menu item id from the seeded demo menu.
async fn first_menu_item(app: &TestApp) -> i64 {
    let (status, body) = send(&app.router, get("/api/menu")).await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().expect("menu array");
    assert!(!items.is_empty(), "demo menu should be seeded");
    items[0]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn health_reports_database_status() {
    let app = test_app().await;
    let (status, body) = send(&app.router, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn auth_bootstrap_then_locked_registration() {
    let app = test_app().await;

    let (status, body) = send(&app.router, get("/api/auth/info")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hasAdmin"], false);

    // First registration is open
    let token = admin_token(&app).await;

    let (status, body) = send(&app.router, get("/api/auth/info")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hasAdmin"], true);

    // Second registration needs a valid admin token
    let (status, _) = send(
        &app.router,
        post_json(
            "/api/auth/register",
            json!({"email": "second@example.com", "password": "another-secret"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app.router,
        post_json(
            "/api/auth/register",
            json!({"email": "second@example.com", "password": "another-secret"}),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Weak passwords are rejected up front
    let (status, body) = send(
        &app.router,
        post_json(
            "/api/auth/register",
            json!({"email": "third@example.com", "password": "short"}),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");
}

#[tokio::test]
async fn login_failures_share_one_error_message() {
    let app = test_app().await;
    admin_token(&app).await;

    let (status, wrong_password) = send(
        &app.router,
        post_json(
            "/api/auth/login",
            json!({"email": "chef@example.com", "password": "wrong"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, unknown_user) = send(
        &app.router,
        post_json(
            "/api/auth/login",
            json!({"email": "ghost@example.com", "password": "wrong"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_password["message"], unknown_user["message"]);
}

#[tokio::test]
async fn full_order_lifecycle_over_http() {
    let app = test_app().await;
    let token = admin_token(&app).await;
    let item = first_menu_item(&app).await;
    let mut rx = app.state.hub.subscribe();

    // Place an order
    let (status, created) = send(
        &app.router,
        post_json(
            "/api/orders",
            json!({
                "client_uid": "device-1",
                "customer_name": "Ana",
                "items": [{"menu_item_id": item, "quantity": 2}],
            }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = created["id"].as_i64().unwrap();
    assert_eq!(created["order_number"], 1);
    assert!(created["ticket_number"].is_null());
    assert!(created["estimated_wait_seconds"].as_i64().unwrap() > 0);

    // Creation broadcasts both channels
    let first = rx.recv().await.unwrap();
    assert!(matches!(first, Notification::QueueUpdate(_)));
    match rx.recv().await.unwrap() {
        Notification::ClientOrdersUpdate {
            client_uid,
            payload,
        } => {
            assert_eq!(client_uid, "device-1");
            assert_eq!(payload.orders.len(), 1);
        }
        other => panic!("unexpected notification: {other:?}"),
    }

    // Staff transitions are locked down
    let (status, _) = send(&app.router, post_empty(&format!("/api/orders/{order_id}/validate"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, validated) = send(
        &app.router,
        post_empty(&format!("/api/orders/{order_id}/validate"), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(validated["ticket_number"], 1);

    // Double validation is a conflict carrying the current status
    let (status, conflict) = send(
        &app.router,
        post_empty(&format!("/api/orders/{order_id}/validate"), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(conflict["code"], "E0005");
    assert!(conflict["message"].as_str().unwrap().contains("VALIDATED"));

    // The queue board shows the ticket
    let (status, queue) = send(&app.router, get("/api/orders/queue")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(queue["current_serving"], 0);
    assert_eq!(queue["queue"][0]["ticket_number"], 1);

    // Kitchen finishes, order is handed over
    let (status, ready) = send(
        &app.router,
        post_empty(&format!("/api/orders/{order_id}/ready"), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ready["status"], "READY");

    let (status, served) = send(
        &app.router,
        post_empty(&format!("/api/orders/{order_id}/served"), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(served["status"], "SERVED");

    // Served orders leave the board and advance the serving counter
    let (_, queue) = send(&app.router, get("/api/orders/queue")).await;
    assert_eq!(queue["current_serving"], 1);
    assert_eq!(queue["queue"].as_array().unwrap().len(), 0);

    // Receipt lines carry the snapshotted price
    let (status, items) = send(&app.router, get(&format!("/api/orders/{order_id}/items"))).await;
    assert_eq!(status, StatusCode::OK);
    let lines = items.as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["quantity"], 2);
    assert!(lines[0]["unit_price_cents"].as_i64().unwrap() > 0);

    // Client view shows the served order
    let (status, client) = send(&app.router, get("/api/orders/client/device-1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(client["orders"][0]["status"], "SERVED");
}

#[tokio::test]
async fn cancel_is_open_but_guarded_by_the_state_machine() {
    let app = test_app().await;
    let token = admin_token(&app).await;
    let item = first_menu_item(&app).await;

    let (_, created) = send(
        &app.router,
        post_json(
            "/api/orders",
            json!({"client_uid": "device-2", "items": [{"menu_item_id": item}]}),
            None,
        ),
    )
    .await;
    let order_id = created["id"].as_i64().unwrap();

    // No auth needed to cancel
    let (status, cancelled) = send(
        &app.router,
        post_empty(&format!("/api/orders/{order_id}/cancel"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "CANCELLED");

    // Cancelled orders leave the client view
    let (_, client) = send(&app.router, get("/api/orders/client/device-2")).await;
    assert_eq!(client["orders"].as_array().unwrap().len(), 0);

    // And cannot re-enter the pipeline
    let (status, body) = send(
        &app.router,
        post_empty(&format!("/api/orders/{order_id}/validate"), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "E0005");
}

#[tokio::test]
async fn invalid_orders_are_rejected_with_details() {
    let app = test_app().await;

    // Empty cart
    let (status, body) = send(
        &app.router,
        post_json("/api/orders", json!({"items": []}), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");

    // Unknown menu item
    let (status, body) = send(
        &app.router,
        post_json(
            "/api/orders",
            json!({"items": [{"menu_item_id": 424242}]}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "E0003");

    // Unknown order id
    let (status, body) = send(&app.router, get("/api/orders/424242")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "E0003");
}

#[tokio::test]
async fn menu_writes_require_the_admin_role() {
    let app = test_app().await;
    let token = admin_token(&app).await;

    let (status, _) = send(
        &app.router,
        post_json(
            "/api/menu",
            json!({"name": "Udon", "description": "", "price_cents": 900, "avg_prep_seconds": 480}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, created) = send(
        &app.router,
        post_json(
            "/api/menu",
            json!({"name": "Udon", "description": "", "price_cents": 900, "avg_prep_seconds": 480}),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["name"], "Udon");

    // Negative prices never reach the database
    let (status, body) = send(
        &app.router,
        post_json(
            "/api/menu",
            json!({"name": "Broken", "description": "", "price_cents": -1}),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");
}
