//! In-memory backend used by unit tests

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Notify;

use super::ListingsBackend;
use crate::errors::{BackendError, BackendResult, ConnectionStatus};
use crate::models::{Channel, Page, Programme};

#[derive(Default)]
pub struct FakeBackend {
    pub channels: Vec<Channel>,
    pub programmes: Vec<Programme>,
    /// Reported total, defaults to the number of programmes
    pub total_count: Option<u64>,
    /// Zero-based page index that fails with a transport error
    pub fail_on_page: Option<u64>,
    /// When set, every programme fetch waits for a notification first
    pub gate: Option<Arc<Notify>>,
    pub page_requests: AtomicU64,
}

impl FakeBackend {
    pub fn with_listings(channels: Vec<Channel>, programmes: Vec<Programme>) -> Self {
        Self {
            channels,
            programmes,
            ..Default::default()
        }
    }

    pub fn page_requests(&self) -> u64 {
        self.page_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ListingsBackend for FakeBackend {
    async fn fetch_channels(&self) -> BackendResult<Vec<Channel>> {
        Ok(self.channels.clone())
    }

    async fn fetch_programmes_page(
        &self,
        offset: u64,
        limit: u64,
    ) -> BackendResult<Page<Programme>> {
        let index = self.page_requests.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail_on_page == Some(index) {
            return Err(BackendError::Timeout {
                url: "http://fake/api/epg/events/grid".to_string(),
            });
        }

        let entries = self
            .programmes
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(Page {
            entries,
            total_count: self.total_count.unwrap_or(self.programmes.len() as u64),
        })
    }

    async fn check_connection(&self) -> ConnectionStatus {
        ConnectionStatus::Ok
    }

    fn stream_url(&self, channel_id: &str) -> String {
        format!("http://fake/stream/channel/{channel_id}?profile=pass&weight=300")
    }
}

pub fn channel(id: &str, name: &str, number: Option<u32>) -> Channel {
    Channel {
        id: id.to_string(),
        name: name.to_string(),
        number,
        logo: None,
        enabled: true,
    }
}

pub fn programme(channel_id: &str, start: i64, title: &str) -> Programme {
    Programme {
        channel_id: channel_id.to_string(),
        start,
        stop: start + 1800,
        title: title.to_string(),
        subtitle: None,
        summary: None,
    }
}
