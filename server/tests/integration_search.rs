use axum::body::{Body, Bytes};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use server::{build_app, seed_from_dir, AppState};
use std::fs;
use tempfile::tempdir;
use textlens_core::StopWordSets;
use tower::ServiceExt;

async fn call(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Bytes) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(v) => builder.header("content-type", "application/json").body(Body::from(v.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

fn json_of(body: &Bytes) -> Value {
    serde_json::from_slice(body).unwrap()
}

async fn upload(app: &Router, name: &str, content: &str) -> (StatusCode, Value) {
    let (status, body) =
        call(app.clone(), Method::POST, "/documents", Some(json!({ "name": name, "content": content }))).await;
    (status, json_of(&body))
}

#[tokio::test]
async fn upload_then_search_reports_original_offsets() {
    let app = build_app(AppState::new(StopWordSets::default()));
    let text = "She runs every morning. Yesterday she ran far.";
    let (status, record) = upload(&app, "runner.txt", text).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(record["name"], "runner.txt");
    assert!(record["id"].as_str().unwrap().starts_with("doc_"));

    let (status, body) = call(app, Method::GET, "/search?q=running", None).await;
    assert_eq!(status, StatusCode::OK);
    let json = json_of(&body);
    assert_eq!(json["total_hits"], 1);
    let terms: Vec<&str> = json["terms"].as_array().unwrap().iter().map(|t| t["term"].as_str().unwrap()).collect();
    assert_eq!(terms, ["running", "run"]);
    let matches = json["results"][0]["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["matched_text"], "runs");
    assert_eq!(matches[0]["position"].as_u64().unwrap() as usize, text.find("runs").unwrap());
}

#[tokio::test]
async fn rejected_upload_is_unprocessable_with_reason() {
    let app = build_app(AppState::default());
    let (status, json) = upload(&app, "scan.pdf", "%PDF-1.7 stream endstream").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["kind"], "invalid_input");
    assert!(!json["error"].as_str().unwrap().is_empty());

    let (_, body) = call(app, Method::GET, "/documents", None).await;
    assert_eq!(json_of(&body).as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn documents_can_be_fetched_and_deleted() {
    let app = build_app(AppState::default());
    let (_, record) = upload(&app, "cats.txt", "The cat sat on the mat.").await;
    let id = record["id"].as_str().unwrap().to_string();

    let (status, body) = call(app.clone(), Method::GET, &format!("/documents/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_of(&body)["word_count"], 3);

    let (status, _) = call(app.clone(), Method::DELETE, &format!("/documents/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(app, Method::GET, &format!("/documents/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_of(&body)["kind"], "not_found");
}

#[tokio::test]
async fn seeded_corpus_keeps_upload_order_in_results() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "running shoes for the road").unwrap();
    fs::write(dir.path().join("b.txt"), "the budget overrun hurt").unwrap();
    fs::write(dir.path().join("c.txt"), "go for a run today").unwrap();
    fs::write(dir.path().join("d.txt"), "%PDF-1.4").unwrap();

    let state = AppState::default();
    assert_eq!(seed_from_dir(&state, dir.path()).unwrap(), 3);
    let app = build_app(state);

    let (status, body) = call(app, Method::GET, "/search?q=run*", None).await;
    assert_eq!(status, StatusCode::OK);
    let json = json_of(&body);
    let names: Vec<&str> = json["results"].as_array().unwrap().iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["a.txt", "c.txt"]);
    assert_eq!(json["results"][0]["matches"][0]["is_wildcard"], true);
}

#[tokio::test]
async fn empty_query_is_a_bad_request() {
    let app = build_app(AppState::default());
    let (status, _) = call(app, Method::GET, "/search?q=", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn classify_and_stem_endpoints() {
    let app = build_app(AppState::default());
    let (status, body) = call(app.clone(), Method::POST, "/classify", Some(json!({ "content": "" }))).await;
    assert_eq!(status, StatusCode::OK);
    let json = json_of(&body);
    assert_eq!(json["accept"], false);
    assert!(!json["reason"].as_str().unwrap().is_empty());

    let (_, body) = call(app.clone(), Method::GET, "/stem/walking", None).await;
    let json = json_of(&body);
    assert_eq!(json["stem"], "walk");
    assert!(json["inflections"].as_array().unwrap().iter().any(|f| f == "walks"));

    let (status, body) = call(app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"ok");
}
