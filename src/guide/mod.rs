//! Guide compilation
//!
//! [`GuideCompiler`] pulls channels and paginated programmes from a
//! [`ListingsBackend`] and streams them into an XMLTV document that replaces
//! the current guide only once it has been completely written.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::backend::{ListingsBackend, channels_or_empty};
use crate::errors::AppResult;
use crate::models::PageCursor;

pub mod format;
pub mod service;
pub mod writer;

pub use format::{escape_xml, format_xmltv_time};
pub use service::{GuideService, ProcessingTrigger, RegenerationOutcome};
pub use writer::GuideWriter;

/// Summary of one guide generation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    pub channels: usize,
    pub programmes: usize,
    pub pages_fetched: u64,
    pub skipped_programmes: usize,
    /// A programme page failed and the remaining pages were not fetched
    pub truncated: bool,
    pub duration_ms: u64,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct SectionCounts {
    channels: usize,
    programmes: usize,
    pages_fetched: u64,
    skipped_programmes: usize,
    truncated: bool,
}

pub struct GuideCompiler {
    backend: Arc<dyn ListingsBackend>,
    path: PathBuf,
    page_size: u64,
}

impl GuideCompiler {
    pub fn new(backend: Arc<dyn ListingsBackend>, path: impl Into<PathBuf>, page_size: u64) -> Self {
        Self {
            backend,
            path: path.into(),
            page_size: page_size.max(1),
        }
    }

    /// Location of the current guide artifact
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Produce a complete guide document and atomically make it current.
    ///
    /// Backend failures degrade the affected section; only local I/O errors
    /// abort the run, in which case the previous guide is left in place.
    pub async fn compile(&self) -> AppResult<GenerationReport> {
        let started = Instant::now();
        let mut writer = GuideWriter::create(&self.path).await?;
        let mut counts = SectionCounts::default();

        if let Err(e) = self.write_sections(&mut writer, &mut counts).await {
            writer.discard().await;
            return Err(e);
        }
        let bytes = writer.commit().await?;

        let report = GenerationReport {
            channels: counts.channels,
            programmes: counts.programmes,
            pages_fetched: counts.pages_fetched,
            skipped_programmes: counts.skipped_programmes,
            truncated: counts.truncated,
            duration_ms: started.elapsed().as_millis() as u64,
            completed_at: Utc::now(),
        };
        info!(
            "Guide generated: {} channels, {} programmes over {} pages ({} bytes, {}ms){}",
            report.channels,
            report.programmes,
            report.pages_fetched,
            bytes,
            report.duration_ms,
            if report.truncated { " [truncated]" } else { "" }
        );
        Ok(report)
    }

    async fn write_sections(
        &self,
        writer: &mut GuideWriter,
        counts: &mut SectionCounts,
    ) -> AppResult<()> {
        let channels = channels_or_empty(self.backend.as_ref()).await;
        for channel in &channels {
            writer.write_channel(channel).await?;
        }
        counts.channels = channels.len();

        let mut cursor = PageCursor::new(self.page_size);
        loop {
            let page = match self
                .backend
                .fetch_programmes_page(cursor.offset, cursor.limit)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    warn!(
                        "Programme page at offset {} failed, skipping remaining pages: {}",
                        cursor.offset, e
                    );
                    counts.truncated = true;
                    break;
                }
            };
            counts.pages_fetched += 1;

            if let Some(known) = cursor.observe_total(page.total_count) {
                warn!(
                    "Backend total changed mid-run ({} -> {}), keeping first reported total",
                    known, page.total_count
                );
            }

            for programme in &page.entries {
                let times = if programme.start < programme.stop {
                    format_xmltv_time(programme.start).zip(format_xmltv_time(programme.stop))
                } else {
                    None
                };
                match times {
                    Some((start, stop)) => {
                        writer.write_programme(programme, &start, &stop).await?;
                        counts.programmes += 1;
                    }
                    None => {
                        debug!(
                            "Skipping programme '{}' on {} with invalid times {}..{}",
                            programme.title, programme.channel_id, programme.start, programme.stop
                        );
                        counts.skipped_programmes += 1;
                    }
                }
            }

            if !cursor.has_more() {
                break;
            }
            cursor.advance();
        }

        if counts.skipped_programmes > 0 {
            warn!(
                "Skipped {} programmes with invalid start/stop times",
                counts.skipped_programmes
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockListingsBackend;
    use crate::backend::fake::{FakeBackend, channel, programme};
    use crate::errors::BackendError;
    use crate::models::{Page, Programme};
    use proptest::prelude::*;
    use quick_xml::Reader;
    use quick_xml::events::Event;
    use tracing_test::traced_test;

    /// Parse the document, failing on malformed markup, and count element names
    fn element_counts(xml: &str) -> (usize, usize) {
        let mut reader = Reader::from_str(xml);
        let (mut channels, mut programmes) = (0, 0);
        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"channel" => channels += 1,
                    b"programme" => programmes += 1,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => panic!("malformed guide at {}: {e}", reader.buffer_position()),
            }
        }
        (channels, programmes)
    }

    async fn compile_with(backend: Arc<dyn ListingsBackend>, page_size: u64) -> (GenerationReport, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("epg.xml");
        let compiler = GuideCompiler::new(backend, &path, page_size);
        let report = compiler.compile().await.unwrap();
        let xml = tokio::fs::read_to_string(&path).await.unwrap();
        (report, xml)
    }

    #[tokio::test]
    async fn test_two_channels_single_page() {
        let mut backend = MockListingsBackend::new();
        backend.expect_fetch_channels().times(1).returning(|| {
            Ok(vec![channel("c1", "One", Some(1)), channel("c2", "Two", Some(2))])
        });
        backend
            .expect_fetch_programmes_page()
            .withf(|offset, limit| *offset == 0 && *limit == 1000)
            .times(1)
            .returning(|_, _| {
                Ok(Page {
                    entries: vec![programme("c1", 1_700_000_000, "News")],
                    total_count: 1,
                })
            });

        let (report, xml) = compile_with(Arc::new(backend), 1000).await;

        assert_eq!(element_counts(&xml), (2, 1));
        assert_eq!(report.pages_fetched, 1);
        assert!(!report.truncated);
        assert!(xml.contains(
            "<programme start=\"20231114221320 +0000\" stop=\"20231114224320 +0000\" channel=\"c1\">"
        ));
    }

    #[tokio::test]
    async fn test_empty_backend_is_well_formed() {
        let backend = FakeBackend::default();
        let (report, xml) = compile_with(Arc::new(backend), 1000).await;

        assert_eq!(element_counts(&xml), (0, 0));
        assert!(xml.contains("<tv generator-info-name=\"antennas\">"));
        assert!(xml.ends_with("</tv>\n"));
        // An empty first page is still requested to learn the total
        assert_eq!(report.pages_fetched, 1);
    }

    #[tokio::test]
    async fn test_ampersands_are_escaped() {
        let mut news = programme("c1", 100, "Q&A");
        news.summary = Some("Rock & Roll <live>".to_string());
        let backend = FakeBackend::with_listings(vec![channel("c1", "Food & Drink", None)], vec![news]);

        let (_, xml) = compile_with(Arc::new(backend), 1000).await;

        assert_eq!(element_counts(&xml), (1, 1));
        assert!(xml.contains("<display-name>Food &amp; Drink</display-name>"));
        assert!(xml.contains("<title lang=\"en\">Q&amp;A</title>"));
        assert!(xml.contains("<desc lang=\"en\">Rock &amp; Roll &lt;live&gt;</desc>"));
    }

    #[tokio::test]
    async fn test_text_outside_xml_charset_is_dropped() {
        let mut news = programme("c1", 100, "News\u{0007}Night");
        news.summary = Some("Late\u{001b} edition\u{FFFF}".to_string());
        let backend = FakeBackend::with_listings(vec![channel("c1", "One\u{0000}", None)], vec![news]);

        let (_, xml) = compile_with(Arc::new(backend), 1000).await;

        assert!(xml.chars().all(format::is_xml_char));
        assert_eq!(element_counts(&xml), (1, 1));
        assert!(xml.contains("<display-name>One</display-name>"));
        assert!(xml.contains("<title lang=\"en\">NewsNight</title>"));
        assert!(xml.contains("<desc lang=\"en\">Late edition</desc>"));
    }

    #[tokio::test]
    async fn test_programmes_beyond_four_digit_years_are_skipped() {
        let backend = FakeBackend::with_listings(
            Vec::new(),
            vec![programme("c1", 0, "Fine"), programme("c1", 253_402_300_800, "Year 10000")],
        );

        let (report, xml) = compile_with(Arc::new(backend), 1000).await;

        assert_eq!((report.programmes, report.skipped_programmes), (1, 1));
        assert!(!xml.contains("Year 10000"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_channel_failure_degrades_to_empty_section() {
        let mut backend = MockListingsBackend::new();
        backend
            .expect_fetch_channels()
            .returning(|| Err(BackendError::parse("unexpected shape")));
        backend.expect_fetch_programmes_page().times(1).returning(|_, _| {
            Ok(Page {
                entries: vec![programme("c1", 100, "News")],
                total_count: 1,
            })
        });

        let (report, xml) = compile_with(Arc::new(backend), 1000).await;

        assert_eq!(report.channels, 0);
        assert_eq!(element_counts(&xml), (0, 1));
        assert!(logs_contain("Failed to fetch channels"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_page_failure_truncates() {
        let programmes: Vec<Programme> = (0..25).map(|i| programme("c1", i * 1800, "Show")).collect();
        let backend = Arc::new(FakeBackend {
            fail_on_page: Some(1),
            ..FakeBackend::with_listings(vec![channel("c1", "One", None)], programmes)
        });

        let (report, xml) = compile_with(backend.clone(), 10).await;

        assert!(report.truncated);
        assert_eq!(report.pages_fetched, 1);
        assert_eq!(backend.page_requests(), 2);
        assert_eq!(element_counts(&xml), (1, 10));
        assert!(logs_contain("skipping remaining pages"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_first_total_is_authoritative() {
        let mut backend = MockListingsBackend::new();
        backend.expect_fetch_channels().returning(|| Ok(Vec::new()));
        backend
            .expect_fetch_programmes_page()
            .times(3)
            .returning(|offset, _| {
                // The total shrinks after the first page
                let total_count = if offset == 0 { 25 } else { 5 };
                Ok(Page {
                    entries: vec![programme("c1", offset as i64 * 1800, "Show")],
                    total_count,
                })
            });

        let (report, _) = compile_with(Arc::new(backend), 10).await;

        assert_eq!(report.pages_fetched, 3);
        assert!(logs_contain("Backend total changed mid-run"));
    }

    #[tokio::test]
    async fn test_invalid_programmes_are_skipped() {
        let mut reversed = programme("c1", 5000, "Backwards");
        reversed.stop = 4000;
        let mut unrepresentable = programme("c1", 0, "Far future");
        unrepresentable.stop = i64::MAX;
        let backend = FakeBackend::with_listings(
            Vec::new(),
            vec![programme("c1", 0, "Fine"), reversed, unrepresentable],
        );

        let (report, xml) = compile_with(Arc::new(backend), 1000).await;

        assert_eq!(report.programmes, 1);
        assert_eq!(report.skipped_programmes, 2);
        assert_eq!(element_counts(&xml), (0, 1));
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_guide() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the temp file should go makes the create fail
        let path = dir.path().join("epg.xml");
        tokio::fs::write(&path, "previous").await.unwrap();
        tokio::fs::create_dir(dir.path().join("epg.xml.tmp")).await.unwrap();

        let compiler = GuideCompiler::new(Arc::new(FakeBackend::default()), &path, 10);
        assert!(compiler.compile().await.is_err());
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "previous");
    }

    fn run_pagination(total: u64, page_size: u64, fail_on_page: Option<u64>) -> (u64, GenerationReport) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async {
            let programmes = (0..total as i64).map(|i| programme("c1", i * 60, "P")).collect();
            let backend = Arc::new(FakeBackend {
                fail_on_page,
                ..FakeBackend::with_listings(Vec::new(), programmes)
            });
            let (report, _) = compile_with(backend.clone(), page_size).await;
            (backend.page_requests(), report)
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_reliable_backend_visits_expected_pages(total in 0u64..600, page_size in 1u64..120) {
            let (requests, report) = run_pagination(total, page_size, None);
            prop_assert_eq!(requests, PageCursor::expected_pages(total, page_size));
            prop_assert_eq!(report.programmes as u64, total);
            prop_assert!(!report.truncated);
        }

        #[test]
        fn prop_failing_page_stays_below_bound(
            total in 1u64..600,
            page_size in 1u64..120,
            fail_seed in 0u64..1000,
        ) {
            let bound = PageCursor::expected_pages(total, page_size);
            let fail_at = fail_seed % bound;
            let (requests, report) = run_pagination(total, page_size, Some(fail_at));
            prop_assert_eq!(requests, fail_at + 1);
            prop_assert_eq!(report.pages_fetched, fail_at);
            prop_assert!(report.pages_fetched < bound);
            prop_assert!(report.truncated);
        }
    }
}
