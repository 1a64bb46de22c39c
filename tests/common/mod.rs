//! Shared helpers for integration tests: a stand-in Tvheadend HTTP server and
//! configuration builders.

#![allow(dead_code)]

use axum::{
    Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use antennas::config::Config;

/// `admin:secret`
pub const BASIC_AUTH: &str = "Basic YWRtaW46c2VjcmV0";

#[derive(Default)]
pub struct MockTvheadend {
    pub channels: Vec<Value>,
    pub events: Vec<Value>,
    /// Raw body returned for every EPG page instead of serializing `events`
    pub raw_epg_body: Option<String>,
    pub total_count: Option<u64>,
    pub require_auth: bool,
    pub epg_requests: AtomicUsize,
    pub channel_requests: AtomicUsize,
}

impl MockTvheadend {
    pub fn epg_requests(&self) -> usize {
        self.epg_requests.load(Ordering::SeqCst)
    }
}

#[derive(Deserialize)]
struct GridQuery {
    #[serde(default)]
    start: usize,
    #[serde(default)]
    limit: Option<usize>,
}

fn authorized(mock: &MockTvheadend, headers: &HeaderMap) -> bool {
    !mock.require_auth
        || headers
            .get(header::AUTHORIZATION)
            .is_some_and(|value| value == BASIC_AUTH)
}

fn grid(entries: &[Value], query: &GridQuery, total: usize) -> Response {
    let page: Vec<&Value> = entries
        .iter()
        .skip(query.start)
        .take(query.limit.unwrap_or(usize::MAX))
        .collect();
    let body = json!({ "entries": page, "totalCount": total });
    (
        [(header::CONTENT_TYPE, "application/json")],
        body.to_string(),
    )
        .into_response()
}

async fn channel_grid(
    State(mock): State<Arc<MockTvheadend>>,
    Query(query): Query<GridQuery>,
    headers: HeaderMap,
) -> Response {
    mock.channel_requests.fetch_add(1, Ordering::SeqCst);
    if !authorized(&mock, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    grid(&mock.channels, &query, mock.channels.len())
}

async fn epg_grid(
    State(mock): State<Arc<MockTvheadend>>,
    Query(query): Query<GridQuery>,
    headers: HeaderMap,
) -> Response {
    mock.epg_requests.fetch_add(1, Ordering::SeqCst);
    if !authorized(&mock, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if let Some(raw) = &mock.raw_epg_body {
        return ([(header::CONTENT_TYPE, "application/json")], raw.clone()).into_response();
    }
    let total = mock
        .total_count
        .map(|t| t as usize)
        .unwrap_or(mock.events.len());
    grid(&mock.events, &query, total)
}

/// Serve `mock` on an ephemeral local port and return its base URL
pub async fn spawn_tvheadend(mock: Arc<MockTvheadend>) -> String {
    let app = Router::new()
        .route("/api/channel/grid", get(channel_grid))
        .route("/api/epg/events/grid", get(epg_grid))
        .with_state(mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn channel(uuid: &str, name: &str, number: Option<u32>) -> Value {
    let mut entry = json!({ "uuid": uuid, "name": name, "enabled": true });
    if let Some(number) = number {
        entry["number"] = json!(number);
    }
    entry
}

pub fn event(channel_uuid: &str, start: i64, title: &str) -> Value {
    json!({
        "channelUuid": channel_uuid,
        "start": start,
        "stop": start + 1800,
        "title": title,
    })
}

/// Configuration pointing at `backend_url`, with the guide under `guide_dir`
pub fn test_config(backend_url: &str, guide_dir: &std::path::Path) -> Config {
    config_with_credentials(backend_url, guide_dir, "admin", "secret")
}

pub fn config_with_credentials(
    backend_url: &str,
    guide_dir: &std::path::Path,
    username: &str,
    password: &str,
) -> Config {
    Config::from_toml_str(&format!(
        r#"
        [backend]
        url = "{backend_url}"
        username = "{username}"
        password = "{password}"
        request_timeout = "2s"

        [web]
        base_url = "http://192.168.1.10:5004"

        [guide]
        path = "{}"
        run_on_startup = false

        [discovery]
        enabled = false
        "#,
        guide_dir.join("epg.xml").display()
    ))
    .unwrap()
}
