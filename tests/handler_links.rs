mod common;

use chrono::{Duration, Utc};
use link_lifecycle::api::dto::link::MAX_TAGS;
use link_lifecycle::domain::repositories::LinkRepository;
use serde_json::{Value, json};

#[tokio::test]
async fn test_create_link_success() {
    let (server, _repo) = common::create_test_server();

    let response = server
        .post("/api/links")
        .json(&json!({
            "originalUrl": "https://example.com/article",
            "tags": ["news", "tech"]
        }))
        .await;

    assert_eq!(response.status_code(), 201);

    let json = response.json::<Value>();
    let code = json["shortCode"].as_str().unwrap();
    assert_eq!(code.len(), 8);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(json["originalUrl"], "https://example.com/article");
    assert_eq!(json["shortUrl"], format!("{}/{}", common::BASE_URL, code));
    assert_eq!(json["tags"], json!(["news", "tech"]));
    assert_eq!(json["isActive"], true);
    assert!(json.get("lastAccessedAt").is_none());
}

#[tokio::test]
async fn test_create_link_reuses_active_code() {
    let (server, repo) = common::create_test_server();
    let body = json!({ "originalUrl": "https://example.com/a" });

    let first = server.post("/api/links").json(&body).await.json::<Value>();
    let second = server.post("/api/links").json(&body).await.json::<Value>();

    assert_eq!(first["shortCode"], second["shortCode"]);
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn test_create_link_after_expiry_mints_new_code() {
    let (server, repo) = common::create_test_server();
    let expired = common::create_expired_link(&repo, "oldcode1", "https://example.com/a").await;

    let json = server
        .post("/api/links")
        .json(&json!({ "originalUrl": "https://example.com/a" }))
        .await
        .json::<Value>();

    assert_ne!(json["shortCode"], expired.short_code);
    assert_eq!(json["isActive"], true);
}

#[tokio::test]
async fn test_create_link_with_expiry_date() {
    let (server, repo) = common::create_test_server();

    let json = server
        .post("/api/links")
        .json(&json!({
            "originalUrl": "https://example.com/promo",
            "expiresAt": "2099-12-31"
        }))
        .await
        .json::<Value>();

    let code = json["shortCode"].as_str().unwrap();
    let link = repo.find_by_code(code).await.unwrap().unwrap();
    assert_eq!(
        link.expires_at.unwrap().to_rfc3339(),
        "2099-12-31T00:00:00+00:00"
    );
}

#[tokio::test]
async fn test_create_link_missing_url() {
    let (server, repo) = common::create_test_server();

    let response = server.post("/api/links").json(&json!({ "tags": ["x"] })).await;

    assert_eq!(response.status_code(), 400);
    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "validation_error");
    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_create_link_tag_limit() {
    let (server, repo) = common::create_test_server();
    let tags: Vec<String> = (0..=MAX_TAGS).map(|i| format!("t{i}")).collect();

    let response = server
        .post("/api/links")
        .json(&json!({ "originalUrl": "https://example.com/many", "tags": tags }))
        .await;

    assert_eq!(response.status_code(), 400);
    assert!(repo.is_empty().await);

    let response = server
        .post("/api/links")
        .json(&json!({ "originalUrl": "https://example.com/many", "tags": &tags[1..] }))
        .await;

    assert_eq!(response.status_code(), 201);
}

#[tokio::test]
async fn test_create_link_rejects_unknown_field() {
    let (server, repo) = common::create_test_server();

    let response = server
        .post("/api/links")
        .json(&json!({
            "originalUrl": "https://example.com",
            "customAlias": "mine"
        }))
        .await;

    assert_eq!(response.status_code(), 422);
    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_create_link_rejects_non_http_url() {
    let (server, _repo) = common::create_test_server();

    let response = server
        .post("/api/links")
        .json(&json!({ "originalUrl": "ftp://files.example.com/a" }))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_create_link_rejects_bad_expiry() {
    let (server, repo) = common::create_test_server();

    let response = server
        .post("/api/links")
        .json(&json!({
            "originalUrl": "https://example.com",
            "expiresAt": "next tuesday"
        }))
        .await;

    assert_eq!(response.status_code(), 400);
    let json = response.json::<Value>();
    assert_eq!(json["error"]["details"]["field"], "expiresAt");
    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_link_details_any_state() {
    let (server, repo) = common::create_test_server();
    common::create_inactive_link(&repo, "gone0001", "https://example.com/gone").await;

    let response = server.get("/api/links/gone0001").await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["shortCode"], "gone0001");
    assert_eq!(json["isActive"], false);
    assert_eq!(json["shortUrl"], "https://sho.rt/s/gone0001");
}

#[tokio::test]
async fn test_link_details_does_not_expire_lazily() {
    let (server, repo) = common::create_test_server();
    common::create_expired_link(&repo, "expired1", "https://example.com").await;

    server.get("/api/links/expired1").await.assert_status_ok();

    let link = repo.find_by_code("expired1").await.unwrap().unwrap();
    assert!(link.is_active);
}

#[tokio::test]
async fn test_link_details_not_found() {
    let (server, _repo) = common::create_test_server();

    let response = server.get("/api/links/nothere1").await;

    assert_eq!(response.status_code(), 404);
    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "not_found");
    assert_eq!(json["error"]["details"]["reason"], "missing");
}

#[tokio::test]
async fn test_links_by_tags_newest_first() {
    let (server, repo) = common::create_test_server();
    let now = Utc::now();
    common::create_tagged_link(&repo, "older001", &["news"], now - Duration::hours(2)).await;
    common::create_tagged_link(&repo, "newer001", &["news", "tech"], now - Duration::hours(1))
        .await;
    common::create_tagged_link(&repo, "sports01", &["sports"], now).await;
    common::create_inactive_link(&repo, "inact001", "https://example.com").await;

    let response = server.get("/api/links").add_query_param("tags", "news").await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    let codes: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["shortCode"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["newer001", "older001"]);
}

#[tokio::test]
async fn test_links_by_tags_is_union() {
    let (server, repo) = common::create_test_server();
    let now = Utc::now();
    common::create_tagged_link(&repo, "news0001", &["news"], now - Duration::hours(1)).await;
    common::create_tagged_link(&repo, "tech0001", &["tech"], now).await;

    let json = server
        .get("/api/links")
        .add_query_param("tags", " news , tech ,")
        .await
        .json::<Value>();

    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[0]["shortCode"], "tech0001");
}

#[tokio::test]
async fn test_links_by_tags_requires_a_tag() {
    let (server, _repo) = common::create_test_server();

    assert_eq!(server.get("/api/links").await.status_code(), 400);
    assert_eq!(
        server
            .get("/api/links")
            .add_query_param("tags", " , ")
            .await
            .status_code(),
        400
    );
}

#[tokio::test]
async fn test_cleanup_expired() {
    let (server, repo) = common::create_test_server();
    common::create_expired_link(&repo, "expired1", "https://example.com/1").await;
    common::create_expired_link(&repo, "expired2", "https://example.com/2").await;
    common::create_test_link(&repo, "forever1", "https://example.com/3").await;

    let response = server.post("/api/links/cleanup/expired").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "deactivatedCount": 2 }));

    assert!(!repo.find_by_code("expired1").await.unwrap().unwrap().is_active);
    assert!(!repo.find_by_code("expired2").await.unwrap().unwrap().is_active);
    assert!(repo.find_by_code("forever1").await.unwrap().unwrap().is_active);

    let again = server.post("/api/links/cleanup/expired").await;
    assert_eq!(again.json::<Value>()["deactivatedCount"], 0);
}
