use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::{Duration, Utc};
use configuration::Settings;
use database::{connect, run_migrations, DbRepository};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use web_server::{build_router, AppState};

async fn app_with_repo() -> (Router, DbRepository) {
    let mut settings = Settings::default();
    settings.database.url = "sqlite::memory:".to_string();
    settings.database.max_connections = 1;

    let pool = connect(&settings.database).await.unwrap();
    run_migrations(&pool).await.unwrap();
    let repo = DbRepository::new(pool);
    let app = build_router(Arc::new(AppState::new(repo.clone(), settings)));
    (app, repo)
}

async fn app() -> Router {
    app_with_repo().await.0
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn form_request(method: &str, uri: &str, cookie: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::COOKIE, cookie)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Registers and logs in `username`, returning the `name=value` session cookie.
async fn login_as(app: &Router, username: &str) -> String {
    let credentials = format!(r#"{{"username":"{username}","password":"secret"}}"#);
    let response = send(app, json_request("POST", "/api/register", None, &credentials)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(app, json_request("POST", "/api/login", None, &credentials)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

const SCENARIO: &str = "company_name=Acme&industry=Retail&year=2024&unit=1000\
    &sales=1%2C000%2C000&gross_profit=250000&net_income=100000&total_assets=2000000\
    &equity=500000&current_assets=300000&current_liabilities=150000&liabilities=800000\
    &employees=10";

#[tokio::test]
async fn health_is_public() {
    let app = app().await;
    let response = send(&app, get("/api/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let app = app().await;
    for uri in ["/api/records", "/api/industries", "/api/chart", "/api/export", "/api/records/1"] {
        let response = send(&app, get(uri, None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
    let response = send(&app, get("/api/records", Some("fintrack_session=forged"))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn registration_rejects_duplicates_and_blanks() {
    let app = app().await;
    login_as(&app, "alice").await;

    let again = r#"{"username":"alice","password":"other"}"#;
    let response = send(&app, json_request("POST", "/api/register", None, again)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let blank = r#"{"username":"  ","password":"pw"}"#;
    let response = send(&app, json_request("POST", "/api/register", None, blank)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let wrong = r#"{"username":"alice","password":"nope"}"#;
    let response = send(&app, json_request("POST", "/api/login", None, wrong)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_scales_by_unit_and_edit_does_not() {
    let app = app().await;
    let cookie = login_as(&app, "alice").await;

    let response = send(&app, form_request("POST", "/api/records", &cookie, SCENARIO)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["sales"], 1_000_000_000.0);
    assert_eq!(created["employees"], 10);
    assert_eq!(created["gross_profit_margin"], 0.25);
    assert_eq!(created["roe"], 0.2);
    assert_eq!(created["current_ratio"], 2.0);
    assert_eq!(created["debt_ratio"], 0.4);
    assert_eq!(created["sales_per_employee"], 100_000_000.0);
    assert_eq!(created["productivity"], 10_000_000.0);
    let id = created["id"].as_i64().unwrap();

    let edit = "company_name=Acme&industry=Retail&year=2024&sales=2000000&gross_profit=500000\
        &net_income=100000&total_assets=2000000&equity=0&current_assets=300000\
        &current_liabilities=150000&liabilities=800000&employees=0&unit=1000";
    let uri = format!("/api/records/{id}");
    let response = send(&app, form_request("PUT", &uri, &cookie, edit)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let edited = body_json(response).await;
    assert_eq!(edited["sales"], 2_000_000.0);
    assert_eq!(edited["gross_profit_margin"], 0.25);
    assert_eq!(edited["roe"], 0.0);
    assert_eq!(edited["sales_per_employee"], 0.0);
    assert_eq!(edited["productivity"], 0.0);

    let response = send(&app, get(&uri, Some(cookie.as_str()))).await;
    let fetched = body_json(response).await;
    assert_eq!(fetched["sales"], 2_000_000.0);
    assert_eq!(fetched["comments"], Value::Array(vec![]));
}

#[tokio::test]
async fn malformed_figures_are_a_bad_request() {
    let app = app().await;
    let cookie = login_as(&app, "alice").await;

    let body = "company_name=Acme&sales=abc&employees=twelve";
    let response = send(&app, form_request("POST", "/api/records", &cookie, body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_json(response).await;
    assert!(error["error"].as_str().unwrap().contains("sales"));

    let response = send(&app, get("/api/records", Some(cookie.as_str()))).await;
    assert_eq!(body_json(response).await, Value::Array(vec![]));
}

#[tokio::test]
async fn records_are_private_to_their_owner() {
    let app = app().await;
    let alice = login_as(&app, "alice").await;
    let bob = login_as(&app, "bob").await;

    let response = send(&app, form_request("POST", "/api/records", &alice, SCENARIO)).await;
    let id = body_json(response).await["id"].as_i64().unwrap();
    let uri = format!("/api/records/{id}");

    let response = send(&app, get(&uri, Some(bob.as_str()))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, form_request("PUT", &uri, &bob, "sales=1")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let comment_uri = format!("{uri}/comments");
    let response = send(&app, json_request("POST", &comment_uri, Some(bob.as_str()), r#"{"content":"x"}"#)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, get("/api/records", Some(bob.as_str()))).await;
    assert_eq!(body_json(response).await, Value::Array(vec![]));
}

#[tokio::test]
async fn comments_industries_chart_and_export() {
    let app = app().await;
    let cookie = login_as(&app, "alice").await;

    let response = send(&app, form_request("POST", "/api/records", &cookie, SCENARIO)).await;
    let id = body_json(response).await["id"].as_i64().unwrap();
    let second = SCENARIO.replace("year=2024", "year=2023").replace("industry=Retail", "industry=Energy");
    send(&app, form_request("POST", "/api/records", &cookie, &second)).await;

    let comment_uri = format!("/api/records/{id}/comments");
    let response = send(&app, json_request("POST", &comment_uri, Some(cookie.as_str()), r#"{"content":"solid"}"#)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let comment_id = body_json(response).await["id"].as_i64().unwrap();

    let response = send(&app, json_request("POST", &comment_uri, Some(cookie.as_str()), r#"{"content":"   "}"#)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let edit_uri = format!("/api/comments/{comment_id}");
    let response = send(&app, json_request("PUT", &edit_uri, Some(cookie.as_str()), r#"{"content":"very solid"}"#)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["content"], "very solid");

    let listed = body_json(send(&app, get("/api/records", Some(cookie.as_str()))).await).await;
    assert_eq!(listed.as_array().unwrap().len(), 2);
    assert_eq!(listed[0]["comments"][0]["content"], "very solid");

    let industries = body_json(send(&app, get("/api/industries", Some(cookie.as_str()))).await).await;
    assert_eq!(industries, serde_json::json!(["Energy", "Retail"]));

    let chart = body_json(send(&app, get("/api/chart", Some(cookie.as_str()))).await).await;
    assert_eq!(chart.as_array().unwrap().len(), 1);
    assert_eq!(chart[0]["company_name"], "Acme");
    assert_eq!(chart[0]["points"][0]["year"], 2023);
    assert_eq!(chart[0]["points"][1]["year"], 2024);

    let response = send(&app, get("/api/export", Some(cookie.as_str()))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.contains("financial_data.csv"));
    let csv = body_text(response).await;
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().ends_with("productivity,comments"));
    assert!(csv.contains("very solid"));
    assert_eq!(csv.lines().count(), 3);

    let response = send(&app, json_request("DELETE", &edit_uri, Some(cookie.as_str()), "")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["financial_id"], id);
    let response = send(&app, json_request("DELETE", &edit_uri, Some(cookie.as_str()), "")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = app().await;
    let cookie = login_as(&app, "alice").await;

    let response = send(&app, json_request("POST", "/api/logout", Some(cookie.as_str()), "")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, get("/api/records", Some(cookie.as_str()))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_cookie_carries_the_configured_lifetime() {
    let app = app().await;
    let credentials = r#"{"username":"carol","password":"secret"}"#;
    send(&app, json_request("POST", "/api/register", None, credentials)).await;

    let response = send(&app, json_request("POST", "/api/login", None, credentials)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains(&format!("Max-Age={}", 7 * 24 * 60 * 60)));
}

#[tokio::test]
async fn expired_session_is_rejected_and_removed() {
    let (app, repo) = app_with_repo().await;
    login_as(&app, "dave").await;
    repo.create_session("stale-token", "dave", Utc::now() - Duration::minutes(5))
        .await
        .unwrap();

    let cookie = "fintrack_session=stale-token";
    let response = send(&app, get("/api/records", Some(cookie))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(repo.find_session("stale-token").await.unwrap().is_none());
}
