#![allow(dead_code)]

use axum_test::TestServer;
use chrono::{DateTime, Duration, Utc};
use link_lifecycle::config::ShortenerSettings;
use link_lifecycle::domain::entities::ShortLink;
use link_lifecycle::infrastructure::persistence::MemoryLinkRepository;
use link_lifecycle::routes::app_routes;
use link_lifecycle::state::AppState;
use std::sync::Arc;

pub const BASE_URL: &str = "https://sho.rt/s";

pub fn test_settings() -> ShortenerSettings {
    ShortenerSettings {
        public_base_url: BASE_URL.to_string(),
        ..ShortenerSettings::default()
    }
}

pub fn create_test_state() -> (AppState, Arc<MemoryLinkRepository>) {
    let repo = Arc::new(MemoryLinkRepository::new());
    let state = AppState::new(repo.clone(), &test_settings()).unwrap();
    (state, repo)
}

/// All application routes over a fresh in-memory store.
pub fn create_test_server() -> (TestServer, Arc<MemoryLinkRepository>) {
    let (state, repo) = create_test_state();
    let server = TestServer::new(app_routes(state, None)).unwrap();
    (server, repo)
}

fn link(code: &str, url: &str, created_at: DateTime<Utc>) -> ShortLink {
    ShortLink {
        id: 0,
        short_code: code.to_string(),
        original_url: url.to_string(),
        is_active: true,
        expires_at: None,
        tags: vec![],
        last_accessed_at: None,
        custom_alias: None,
        user_id: None,
        created_at,
        updated_at: created_at,
    }
}

pub async fn create_test_link(repo: &MemoryLinkRepository, code: &str, url: &str) -> ShortLink {
    repo.insert(link(code, url, Utc::now() - Duration::minutes(1)))
        .await
        .unwrap()
}

pub async fn create_expired_link(repo: &MemoryLinkRepository, code: &str, url: &str) -> ShortLink {
    let mut l = link(code, url, Utc::now() - Duration::hours(2));
    l.expires_at = Some(Utc::now() - Duration::hours(1));
    repo.insert(l).await.unwrap()
}

pub async fn create_inactive_link(repo: &MemoryLinkRepository, code: &str, url: &str) -> ShortLink {
    let mut l = link(code, url, Utc::now() - Duration::hours(1));
    l.is_active = false;
    repo.insert(l).await.unwrap()
}

pub async fn create_tagged_link(
    repo: &MemoryLinkRepository,
    code: &str,
    tags: &[&str],
    created_at: DateTime<Utc>,
) -> ShortLink {
    let mut l = link(code, &format!("https://example.com/{code}"), created_at);
    l.tags = tags.iter().map(|t| t.to_string()).collect();
    repo.insert(l).await.unwrap()
}
