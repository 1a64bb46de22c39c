//! Tvheadend HTTP API client
//!
//! Talks to the `/api/channel/grid` and `/api/epg/events/grid` endpoints with
//! credentials resolved once from configuration. No retries and no backoff: a
//! failed request is terminal for that request only.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{ListingsBackend, sanitize_payload};
use crate::config::BackendConfig;
use crate::errors::{AppResult, BackendError, BackendResult, ConnectionStatus};
use crate::models::{Channel, Page, Programme, TvhChannel, TvhEpgEvent, TvhGrid};
use crate::utils::url::UrlUtils;

pub struct TvheadendClient {
    client: Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
    channel_limit: u32,
    stream_profile: String,
    stream_weight: u32,
}

impl TvheadendClient {
    /// Build a client; the request timeout bounds every page fetch
    pub fn new(config: &BackendConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout()?)
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.clone(),
            username: config.username.clone().filter(|u| !u.is_empty()),
            password: config.password.clone(),
            channel_limit: config.channel_limit,
            stream_profile: config.stream_profile.clone(),
            stream_weight: config.stream_weight,
        })
    }

    /// Backend URL with credentials removed, for logs and status output
    pub fn display_url(&self) -> String {
        UrlUtils::obfuscate_credentials(&self.base_url)
    }

    /// Resolve a relative `imagecache/...` icon path against the backend URL
    fn resolve_icon(&self, icon: String) -> String {
        if icon.starts_with("http://") || icon.starts_with("https://") {
            return icon;
        }
        UrlUtils::join(&self.base_url, &icon).unwrap_or(icon)
    }

    async fn get_grid<T: DeserializeOwned>(&self, path: &str) -> BackendResult<TvhGrid<T>> {
        let url = UrlUtils::join(&self.base_url, path)
            .map_err(|e| BackendError::parse(format!("Invalid backend URL: {e}")))?;
        let safe_url = UrlUtils::obfuscate_credentials(&url);
        debug!("Fetching backend grid: {}", safe_url);

        let mut request = self.client.get(&url);
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_ref());
        }

        let response = request
            .send()
            .await
            .map_err(|e| BackendError::from_transport(&safe_url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::from_status(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown"),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| BackendError::from_transport(&safe_url, &e))?;

        let payload = sanitize_payload(&body);
        if payload.len() != body.len() {
            debug!(
                "Stripped {} bytes of control characters from {}",
                body.len() - payload.len(),
                safe_url
            );
        }

        serde_json::from_str(&payload)
            .map_err(|e| BackendError::parse(format!("Invalid grid payload from {safe_url}: {e}")))
    }
}

#[async_trait]
impl ListingsBackend for TvheadendClient {
    async fn fetch_channels(&self) -> BackendResult<Vec<Channel>> {
        let path = format!("api/channel/grid?start=0&limit={}", self.channel_limit);
        let grid: TvhGrid<TvhChannel> = self.get_grid(&path).await?;
        let page: Page<Channel> = grid.into_page();
        debug!("Fetched {} channels", page.entries.len());
        Ok(page
            .entries
            .into_iter()
            .map(|mut channel| {
                channel.logo = channel.logo.map(|logo| self.resolve_icon(logo));
                channel
            })
            .collect())
    }

    async fn fetch_programmes_page(
        &self,
        offset: u64,
        limit: u64,
    ) -> BackendResult<Page<Programme>> {
        let path = format!("api/epg/events/grid?start={offset}&limit={limit}");
        let grid: TvhGrid<TvhEpgEvent> = self.get_grid(&path).await?;
        let page: Page<Programme> = grid.into_page();
        debug!(
            "Fetched {} programmes at offset {} (total {})",
            page.entries.len(),
            offset,
            page.total_count
        );
        Ok(page)
    }

    async fn check_connection(&self) -> ConnectionStatus {
        match self
            .get_grid::<serde_json::Value>("api/channel/grid?start=0&limit=1")
            .await
        {
            Ok(_) => ConnectionStatus::Ok,
            Err(e) => {
                warn!(
                    "Antennas failed to connect to Tvheadend at {}: {}. Check that Tvheadend is running, \
                     that the configured URL and port are right, and that the credentials are correct",
                    self.display_url(),
                    e
                );
                e.connection_status()
            }
        }
    }

    fn stream_url(&self, channel_id: &str) -> String {
        let base = match UrlUtils::with_credentials(
            &self.base_url,
            self.username.as_deref(),
            self.password.as_deref(),
        ) {
            Ok(url) => url.to_string(),
            Err(_) => self.base_url.clone(),
        };
        format!(
            "{}/stream/channel/{}?profile={}&weight={}",
            UrlUtils::trim_trailing_slash(&base),
            channel_id,
            self.stream_profile,
            self.stream_weight
        )
    }
}
