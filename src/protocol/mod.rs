//! HDHomeRun-style protocol documents
//!
//! Every document is a pure function of the device identity and, for the
//! lineup, of the channel list fetched for the current request.

use serde::Serialize;

use crate::backend::{ListingsBackend, channels_or_empty};
use crate::models::Channel;

pub mod templates;

pub use templates::{CONNECTION_MANAGER_SCPD, CONTENT_DIRECTORY_SCPD, device_descriptor};

pub const LINEUP_SOURCE: &str = "Cable";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LineupStatus {
    pub scan_in_progress: u8,
    pub scan_possible: u8,
    pub source: &'static str,
    pub source_list: Vec<&'static str>,
}

/// No scan in progress, scanning possible, a single cable source
pub fn lineup_status() -> LineupStatus {
    LineupStatus {
        scan_in_progress: 0,
        scan_possible: 1,
        source: LINEUP_SOURCE,
        source_list: vec![LINEUP_SOURCE],
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineupEntry {
    #[serde(rename = "GuideNumber")]
    pub guide_number: String,
    #[serde(rename = "GuideName")]
    pub guide_name: String,
    #[serde(rename = "URL")]
    pub url: String,
}

impl LineupEntry {
    pub fn for_channel(channel: &Channel, stream_url: String) -> Self {
        Self {
            guide_number: channel
                .number
                .map(|n| n.to_string())
                .unwrap_or_else(|| channel.name.clone()),
            guide_name: channel.name.clone(),
            url: stream_url,
        }
    }
}

/// Build lineup entries for the enabled channels, in backend order
pub fn lineup_entries(channels: &[Channel], backend: &dyn ListingsBackend) -> Vec<LineupEntry> {
    channels
        .iter()
        .filter(|channel| channel.enabled)
        .map(|channel| LineupEntry::for_channel(channel, backend.stream_url(&channel.id)))
        .collect()
}

/// Fetch the live channel list and render the lineup.
///
/// A backend failure yields an empty lineup rather than an error response.
pub async fn lineup(backend: &dyn ListingsBackend) -> Vec<LineupEntry> {
    let channels = channels_or_empty(backend).await;
    lineup_entries(&channels, backend)
}
