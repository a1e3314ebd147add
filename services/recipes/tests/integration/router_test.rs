use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum_test::{TestRequest, TestServer};
use chrono::Utc;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use serde_json::{Value, json};
use uuid::Uuid;

use foodgram_recipes::router::build_router;
use foodgram_recipes_schema::{edges, recipes, users};
use foodgram_recipes::state::AppState;
use foodgram_testing::auth::MockAuth;

/// Server whose database is unreachable: only requests rejected before any
/// store access can succeed or fail deterministically.
fn offline_server() -> TestServer {
    let state = AppState {
        db: DatabaseConnection::Disconnected,
    };
    TestServer::new(build_router(state)).unwrap()
}

/// Server over a scripted database that answers queries in the given order.
fn scripted_server(db: MockDatabase) -> TestServer {
    let state = AppState {
        db: db.into_connection(),
    };
    TestServer::new(build_router(state)).unwrap()
}

/// Row returned by the `SELECT id ... FOR SHARE` that guards an edge insert.
fn locked_id(id: Uuid) -> BTreeMap<&'static str, sea_orm::Value> {
    BTreeMap::from([("id", id.into())])
}

fn inserted_rows(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

fn with_auth(mut request: TestRequest, auth: &MockAuth) -> TestRequest {
    for (name, value) in auth.headers().iter() {
        request = request.add_header(name.clone(), value.clone());
    }
    request
}

#[tokio::test]
async fn should_report_liveness() {
    let server = offline_server();
    let response = server.get("/healthz").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn should_report_not_ready_without_database() {
    let server = offline_server();
    let response = server.get("/readyz").await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_require_identity_for_writes() {
    let server = offline_server();
    let response = server
        .post("/recipes")
        .json(&json!({"name": "Toast", "cooking_time": 3}))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = server.get("/users/@me/subscriptions").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_zero_cooking_time_before_store_access() {
    let server = offline_server();
    let auth = MockAuth::user(Uuid::now_v7());
    let request = server.post("/recipes").json(&json!({
        "name": "Toast",
        "cooking_time": 0,
        "tags": [1],
        "ingredients": [{"id": 1, "amount": 2}],
    }));
    let response = with_auth(request, &auth).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INVALID_COOKING_TIME");
}

#[tokio::test]
async fn should_reject_recipe_without_tags() {
    let server = offline_server();
    let auth = MockAuth::user(Uuid::now_v7());
    let request = server.post("/recipes").json(&json!({
        "name": "Toast",
        "cooking_time": 3,
        "ingredients": [{"id": 1, "amount": 2}],
    }));
    let response = with_auth(request, &auth).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "MISSING_TAG");
}

#[tokio::test]
async fn should_forbid_catalog_writes_for_non_admins() {
    let server = offline_server();
    let auth = MockAuth::user(Uuid::now_v7());

    let request = server
        .post("/tags")
        .json(&json!({"name": "Breakfast", "color": "green", "slug": "breakfast"}));
    let response = with_auth(request, &auth).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["kind"], "FORBIDDEN");

    let request = server
        .post("/ingredients")
        .json(&json!({"name": "Flour", "measurement_unit": "g"}));
    let response = with_auth(request, &auth).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_reject_invalid_tag_color_for_admins() {
    let server = offline_server();
    let auth = MockAuth::admin(Uuid::now_v7());
    let request = server
        .post("/tags")
        .json(&json!({"name": "Breakfast", "color": "#123456", "slug": "breakfast"}));
    let response = with_auth(request, &auth).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INVALID_COLOR");
}

#[tokio::test]
async fn should_reject_unknown_download_format() {
    let server = offline_server();
    let auth = MockAuth::user(Uuid::now_v7());
    let request = server
        .get("/recipes/download-shopping-cart")
        .add_query_param("format", "pdf");
    let response = with_auth(request, &auth).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INVALID_FORMAT");
}

#[tokio::test]
async fn should_forbid_deleting_another_user() {
    let server = offline_server();
    let auth = MockAuth::user(Uuid::now_v7());
    let request = server.delete(&format!("/users/{}", Uuid::now_v7()));
    let response = with_auth(request, &auth).await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_reject_self_subscription_before_store_access() {
    let server = offline_server();
    let me = Uuid::now_v7();
    let auth = MockAuth::user(me);
    let request = server.post(&format!("/users/{me}/subscribe"));
    let response = with_auth(request, &auth).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "SELF_SUBSCRIPTION");
}

#[tokio::test]
async fn should_return_short_recipe_when_favoriting() {
    let (me, author, recipe_id) = (Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7());
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[locked_id(recipe_id)]])
        .append_exec_results([inserted_rows(1)])
        .append_query_results([[recipes::Model {
            id: recipe_id,
            author_id: author,
            name: "Borscht".into(),
            text: "Simmer beets.".into(),
            image: "borscht.png".into(),
            cooking_time: 90,
            created_at: Utc::now(),
        }]]);
    let server = scripted_server(db);
    let request = server.post(&format!("/recipes/{recipe_id}/favorite"));
    let response = with_auth(request, &MockAuth::user(me)).await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({
            "id": recipe_id.to_string(),
            "name": "Borscht",
            "image": "borscht.png",
            "cooking_time": 90,
        })
    );
}

#[tokio::test]
async fn should_report_duplicate_cart_entry() {
    let (me, recipe_id) = (Uuid::now_v7(), Uuid::now_v7());
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[locked_id(recipe_id)]])
        .append_exec_results([inserted_rows(0)]);
    let server = scripted_server(db);
    let request = server.post(&format!("/recipes/{recipe_id}/shopping-cart"));
    let response = with_auth(request, &MockAuth::user(me)).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "DUPLICATE_EDGE");
}

#[tokio::test]
async fn should_return_author_profile_when_subscribing() {
    let (me, author) = (Uuid::now_v7(), Uuid::now_v7());
    let now = Utc::now();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[locked_id(author)]])
        .append_exec_results([inserted_rows(1)])
        .append_query_results([[users::Model {
            id: author,
            email: "julia@example.com".into(),
            username: "julia".into(),
            first_name: "Julia".into(),
            last_name: "Child".into(),
            created_at: now,
        }]])
        .append_query_results([[BTreeMap::from([("num_items", sea_orm::Value::from(4i64))])]])
        .append_query_results([[edges::Model {
            kind: "subscription".into(),
            subject_id: me,
            object_id: author,
            created_at: now,
        }]]);
    let server = scripted_server(db);
    let request = server.post(&format!("/users/{author}/subscribe"));
    let response = with_auth(request, &MockAuth::user(me)).await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["id"], author.to_string());
    assert_eq!(body["username"], "julia");
    assert_eq!(body["is_subscribed"], true);
    assert_eq!(body["recipes_count"], 4);
}

#[tokio::test]
async fn should_reject_favorite_of_unknown_recipe() {
    let empty: Vec<BTreeMap<&'static str, sea_orm::Value>> = Vec::new();
    let db = MockDatabase::new(DatabaseBackend::Postgres).append_query_results([empty]);
    let server = scripted_server(db);
    let request = server.post(&format!("/recipes/{}/favorite", Uuid::now_v7()));
    let response = with_auth(request, &MockAuth::user(Uuid::now_v7())).await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
