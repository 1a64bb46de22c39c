//! Upstream listings backend
//!
//! [`ListingsBackend`] is the seam between the guide compiler / protocol
//! responder and the PVR server. [`TvheadendClient`] is the production
//! implementation; tests substitute fakes or mocks.

use async_trait::async_trait;
use std::borrow::Cow;
use tracing::warn;

use crate::errors::{BackendResult, ConnectionStatus};
use crate::models::{Channel, Page, Programme};

pub mod tvheadend;

#[cfg(test)]
pub(crate) mod fake;

pub use tvheadend::TvheadendClient;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingsBackend: Send + Sync {
    /// Fetch the whole channel catalog in a single unbounded page
    async fn fetch_channels(&self) -> BackendResult<Vec<Channel>>;

    /// Fetch one page of EPG events
    async fn fetch_programmes_page(
        &self,
        offset: u64,
        limit: u64,
    ) -> BackendResult<Page<Programme>>;

    /// Probe the backend and classify the outcome for operators
    async fn check_connection(&self) -> ConnectionStatus;

    /// Playback URL a client uses to tune the given channel
    fn stream_url(&self, channel_id: &str) -> String;
}

/// Fetch channels, degrading to an empty list when the backend fails.
///
/// Guide generation and the lineup both prefer an empty section over an error.
pub async fn channels_or_empty(backend: &dyn ListingsBackend) -> Vec<Channel> {
    match backend.fetch_channels().await {
        Ok(channels) => channels,
        Err(e) => {
            warn!("Failed to fetch channels from backend, continuing with none: {}", e);
            Vec::new()
        }
    }
}

/// Strip control characters that are not valid inside a JSON payload.
///
/// Tvheadend occasionally emits stray control bytes inside EPG text; JSON
/// whitespace (tab, CR, LF) is kept. Borrows when nothing needs stripping.
pub fn sanitize_payload(body: &str) -> Cow<'_, str> {
    let is_stray = |c: char| c.is_control() && !matches!(c, '\t' | '\n' | '\r');
    if body.chars().any(is_stray) {
        Cow::Owned(body.chars().filter(|&c| !is_stray(c)).collect())
    } else {
        Cow::Borrowed(body)
    }
}
