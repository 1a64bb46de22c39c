use serde::{Deserialize, Serialize};

/// A live channel as served by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// Stable opaque identifier, unique within one guide generation
    pub id: String,
    pub name: String,
    pub number: Option<u32>,
    pub logo: Option<String>,
    pub enabled: bool,
}

/// A single EPG event belonging to a channel by identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Programme {
    pub channel_id: String,
    /// Unix epoch seconds
    pub start: i64,
    /// Unix epoch seconds
    pub stop: i64,
    pub title: String,
    pub subtitle: Option<String>,
    /// `Some("")` is distinct from `None`: presence drives `<desc>` emission
    pub summary: Option<String>,
}

/// One page of a paginated backend listing
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub entries: Vec<T>,
    pub total_count: u64,
}

/// Transient pagination state for one fetch sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub offset: u64,
    pub limit: u64,
    /// Total reported by the first page, `None` until a page arrives
    pub total_count: Option<u64>,
}

impl PageCursor {
    pub fn new(limit: u64) -> Self {
        Self {
            offset: 0,
            limit,
            total_count: None,
        }
    }

    /// Record the total reported by a page.
    ///
    /// The first page's total is authoritative. A different value on a later
    /// page is returned as drift and otherwise ignored.
    pub fn observe_total(&mut self, reported: u64) -> Option<u64> {
        match self.total_count {
            None => {
                self.total_count = Some(reported);
                None
            }
            Some(known) if known != reported => Some(known),
            Some(_) => None,
        }
    }

    /// Whether another page lies beyond the current one
    pub fn has_more(&self) -> bool {
        match self.total_count {
            Some(total) => self.offset.saturating_add(self.limit) < total,
            None => false,
        }
    }

    pub fn advance(&mut self) {
        self.offset = self.offset.saturating_add(self.limit);
    }

    /// Number of pages a reliable backend needs for `total` entries
    pub fn expected_pages(total: u64, limit: u64) -> u64 {
        if limit == 0 {
            return 0;
        }
        total.div_ceil(limit).max(1)
    }
}

/// Channel entry as returned by `/api/channel/grid`
#[derive(Debug, Clone, Deserialize)]
pub struct TvhChannel {
    pub uuid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub icon_public_url: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// EPG entry as returned by `/api/epg/events/grid`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TvhEpgEvent {
    pub channel_uuid: String,
    pub start: i64,
    pub stop: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Envelope shared by every grid endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TvhGrid<T> {
    #[serde(default = "Vec::new")]
    pub entries: Vec<T>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

impl From<TvhChannel> for Channel {
    fn from(entry: TvhChannel) -> Self {
        Self {
            id: entry.uuid,
            name: entry.name.unwrap_or_default(),
            number: entry.number,
            logo: entry.icon_public_url.filter(|icon| !icon.is_empty()),
            enabled: entry.enabled,
        }
    }
}

impl From<TvhEpgEvent> for Programme {
    fn from(entry: TvhEpgEvent) -> Self {
        Self {
            channel_id: entry.channel_uuid,
            start: entry.start,
            stop: entry.stop,
            title: entry.title,
            subtitle: entry.subtitle,
            summary: entry.summary.or(entry.description),
        }
    }
}

impl<T> TvhGrid<T> {
    /// Convert into a page, falling back to the entry count when no total is reported
    pub fn into_page<U: From<T>>(self) -> Page<U> {
        let total_count = self.total_count.unwrap_or(self.entries.len() as u64);
        Page {
            entries: self.entries.into_iter().map(U::from).collect(),
            total_count,
        }
    }
}
