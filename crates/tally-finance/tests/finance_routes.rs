//! Router-level tests for the finance tracker.
//!
//! Run with: cargo test --package tally-finance --test finance_routes

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use tally_core::{AppConfig, AppContext, db, server::build_router};
use tally_finance::{
    BRAND, DEFAULTS, SCHEMA, TransactionKind, create_router,
    handlers::{ADDED_MESSAGE, IMPORTED_MESSAGE, NO_FILE_MESSAGE},
    report, spreadsheet, store,
};
use tower::ServiceExt;

const BOUNDARY: &str = "tally-test-boundary";

async fn app() -> (Router, AppContext) {
    let mut config = AppConfig::with_defaults(DEFAULTS);
    config.database.path = ":memory:".to_string();
    let pool = db::memory_pool().await.unwrap();
    db::init_schema(&pool, SCHEMA).await.unwrap();
    let ctx = AppContext::from_parts(config, pool, BRAND);
    (build_router(ctx.clone(), create_router()), ctx)
}

fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut req = Request::post(uri).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        req = req.header(header::COOKIE, cookie);
    }
    req.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, cookie: &str) -> Request<Body> {
    Request::get(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

/// `multipart/form-data` upload with a single `file` part.
fn upload(filename: &str, content: &[u8], cookie: &str) -> Request<Body> {
    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: {}\r\n\r\n",
        spreadsheet::XLSX_CONTENT_TYPE
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::post("/import")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::COOKIE, cookie)
        .body(Body::from(body))
        .unwrap()
}

fn location(resp: &Response) -> &str {
    resp.headers()[header::LOCATION].to_str().unwrap()
}

async fn body_bytes(resp: Response) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_text(resp: Response) -> String {
    String::from_utf8(body_bytes(resp).await).unwrap()
}

async fn sign_in(app: &Router, username: &str, password: &str) -> String {
    let creds = format!("username={username}&password={password}");
    app.clone()
        .oneshot(post_form("/register", &creds, None))
        .await
        .unwrap();
    let resp = app
        .clone()
        .oneshot(post_form("/login", &creds, None))
        .await
        .unwrap();
    let set_cookie = resp.headers()[header::SET_COOKIE].to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

async fn user_id(ctx: &AppContext, username: &str) -> i64 {
    tally_core::auth::find_by_username(ctx.pool(), username)
        .await
        .unwrap()
        .unwrap()
        .id
}

async fn add(app: &Router, cookie: &str, body: &str) -> Response {
    app.clone()
        .oneshot(post_form("/add_transaction", body, Some(cookie)))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_anonymous_requests_go_to_login() {
    let (app, _) = app().await;
    for uri in ["/", "/add_transaction", "/export"] {
        let req = Request::get(uri).body(Body::empty()).unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(location(&resp), "/login", "{uri}");
    }
}

#[tokio::test]
async fn test_salary_and_food_dashboard() {
    let (app, ctx) = app().await;
    let cookie = sign_in(&app, "alice", "pw1").await;

    let resp = add(
        &app,
        &cookie,
        "date=2024-01-01&amount=100&category=Salary&type=income&description=",
    )
    .await;
    assert_eq!(location(&resp), "/");
    add(
        &app,
        &cookie,
        "date=2024-01-05&amount=40&category=Food&type=expense&description=lunch",
    )
    .await;

    let resp = app.clone().oneshot(get("/", &cookie)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page = body_text(resp).await;
    assert!(page.contains("60.00"));
    assert!(page.contains(ADDED_MESSAGE));
    assert!(page.contains(r#""labels":["Food"],"values":[40.0]"#));

    let alice = user_id(&ctx, "alice").await;
    let summary = report::summarize(&store::list_transactions(ctx.pool(), alice).await.unwrap());
    assert_eq!(summary.balance, 60.0);
    assert_eq!(summary.expense_breakdown, vec![("Food".to_string(), 40.0)]);

    // Flash is shown once.
    let page = body_text(app.oneshot(get("/", &cookie)).await.unwrap()).await;
    assert!(!page.contains(ADDED_MESSAGE));
}

#[tokio::test]
async fn test_invalid_transaction_is_rejected() {
    let (app, ctx) = app().await;
    let cookie = sign_in(&app, "alice", "pw1").await;

    for body in [
        "date=2024-01-01&amount=-5&category=Food&type=expense",
        "date=2024-01-01&amount=5&category=Food&type=gift",
        "date=01.01.2024&amount=5&category=Food&type=expense",
        "date=2024-01-01&amount=5&category=&type=expense",
    ] {
        let resp = add(&app, &cookie, body).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{body}");
    }

    let alice = user_id(&ctx, "alice").await;
    assert!(store::list_transactions(ctx.pool(), alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_dashboard() {
    let (app, _) = app().await;
    let cookie = sign_in(&app, "alice", "pw1").await;
    let page = body_text(app.oneshot(get("/", &cookie)).await.unwrap()).await;
    assert!(page.contains("0.00"));
    assert!(!page.contains("data-chart"));
}

#[tokio::test]
async fn test_users_see_only_their_transactions() {
    let (app, _) = app().await;
    let alice = sign_in(&app, "alice", "pw1").await;
    let bob = sign_in(&app, "bob", "pw2").await;
    add(
        &app,
        &alice,
        "date=2024-01-01&amount=100&category=Salary&type=income&description=secret+bonus",
    )
    .await;

    let page = body_text(app.oneshot(get("/", &bob)).await.unwrap()).await;
    assert!(!page.contains("secret bonus"));
    assert!(page.contains("No transactions yet"));
}

#[tokio::test]
async fn test_export_then_import_round_trip() {
    let (app, ctx) = app().await;
    let alice = sign_in(&app, "alice", "pw1").await;
    add(&app, &alice, "date=2024-01-01&amount=100&category=Salary&type=income").await;
    add(&app, &alice, "date=2024-01-05&amount=40&category=Food&type=expense").await;
    add(&app, &alice, "date=2024-01-06&amount=2.5&category=Coffee&type=expense").await;

    let resp = app.clone().oneshot(get("/export", &alice)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::CONTENT_TYPE],
        spreadsheet::XLSX_CONTENT_TYPE
    );
    assert_eq!(
        resp.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"transactions.xlsx\""
    );
    let workbook = body_bytes(resp).await;

    let bob = sign_in(&app, "bob", "pw2").await;
    let resp = app
        .clone()
        .oneshot(upload("transactions.xlsx", &workbook, &bob))
        .await
        .unwrap();
    assert_eq!(location(&resp), "/");

    let bob_id = user_id(&ctx, "bob").await;
    let imported = store::list_transactions(ctx.pool(), bob_id).await.unwrap();
    let summary = report::summarize(&imported);
    assert_eq!(summary.total_income, 100.0);
    assert_eq!(summary.total_expense, 42.5);
    assert!(imported.iter().any(|t| t.kind == TransactionKind::Income
        && t.category == spreadsheet::IMPORTED_INCOME_CATEGORY));

    let page = body_text(app.oneshot(get("/", &bob)).await.unwrap()).await;
    assert!(page.contains(IMPORTED_MESSAGE));
}

#[tokio::test]
async fn test_import_without_file() {
    let (app, ctx) = app().await;
    let cookie = sign_in(&app, "alice", "pw1").await;

    let resp = app.clone().oneshot(upload("", b"", &cookie)).await.unwrap();
    assert_eq!(location(&resp), "/");

    let page = body_text(app.oneshot(get("/", &cookie)).await.unwrap()).await;
    assert!(page.contains(NO_FILE_MESSAGE));
    let alice = user_id(&ctx, "alice").await;
    assert!(store::list_transactions(ctx.pool(), alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_import_of_garbage_commits_nothing() {
    let (app, ctx) = app().await;
    let cookie = sign_in(&app, "alice", "pw1").await;

    let resp = app
        .clone()
        .oneshot(upload("notes.xlsx", b"not a spreadsheet", &cookie))
        .await
        .unwrap();
    assert_eq!(location(&resp), "/");

    let page = body_text(app.oneshot(get("/", &cookie)).await.unwrap()).await;
    assert!(page.contains("Import failed:"));
    let alice = user_id(&ctx, "alice").await;
    assert!(store::list_transactions(ctx.pool(), alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_import_without_multipart_body() {
    let (app, _) = app().await;
    let cookie = sign_in(&app, "alice", "pw1").await;

    let resp = app
        .clone()
        .oneshot(post_form("/import", "", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");

    let page = body_text(app.oneshot(get("/", &cookie)).await.unwrap()).await;
    assert!(page.contains(NO_FILE_MESSAGE));
}
