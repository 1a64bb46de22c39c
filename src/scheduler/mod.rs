//! Periodic guide regeneration
//!
//! Runs regeneration inline on each cron fire time, so a slow run delays the
//! next tick instead of overlapping with it.

use chrono::{DateTime, Utc};
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::GuideConfig;
use crate::errors::{AppError, AppResult};
use crate::guide::{GuideService, ProcessingTrigger, RegenerationOutcome};

pub struct GuideScheduler {
    service: Arc<GuideService>,
    schedule: Schedule,
    run_on_startup: bool,
}

impl GuideScheduler {
    pub fn new(service: Arc<GuideService>, config: &GuideConfig) -> AppResult<Self> {
        let schedule = Schedule::from_str(&config.update_cron).map_err(|e| {
            AppError::configuration(format!(
                "guide.update_cron '{}' is invalid: {e}",
                config.update_cron
            ))
        })?;
        Ok(Self {
            service,
            schedule,
            run_on_startup: config.run_on_startup,
        })
    }

    /// Next fire time strictly after `after`
    pub fn next_run_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(&after).next()
    }

    /// Run until `cancel` fires.
    ///
    /// Only the wait between runs is cancellable; a regeneration that has
    /// started always finishes so no partial guide is left behind.
    pub async fn run(self, cancel: CancellationToken) {
        info!("Guide scheduler started");

        if self.run_on_startup && !cancel.is_cancelled() {
            self.trigger(ProcessingTrigger::Startup).await;
        }

        loop {
            let now = Utc::now();
            let Some(next) = self.next_run_after(now) else {
                warn!("Guide schedule has no upcoming fire times, scheduler stopping");
                break;
            };
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
            debug!("Next guide regeneration at {}", next);

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(wait) => {}
            }
            self.trigger(ProcessingTrigger::Scheduler).await;
        }

        info!("Guide scheduler stopped");
    }

    async fn trigger(&self, trigger: ProcessingTrigger) {
        match self.service.regenerate(trigger).await {
            Ok(RegenerationOutcome::Completed(report)) => {
                debug!(
                    "Scheduled regeneration finished in {}ms",
                    report.duration_ms
                );
            }
            Ok(RegenerationOutcome::Skipped) => {}
            Err(e) => error!("Guide regeneration ({} trigger) failed: {}", trigger, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::{FakeBackend, channel};
    use crate::guide::GuideCompiler;
    use chrono::TimeZone;
    use tokio::sync::Notify;

    fn scheduler(dir: &tempfile::TempDir, cron: &str, run_on_startup: bool) -> GuideScheduler {
        let backend = Arc::new(FakeBackend::with_listings(vec![channel("c1", "One", None)], Vec::new()));
        let compiler = GuideCompiler::new(backend, dir.path().join("epg.xml"), 100);
        let config = GuideConfig {
            path: dir.path().join("epg.xml"),
            page_size: 100,
            update_cron: cron.to_string(),
            run_on_startup,
        };
        GuideScheduler::new(Arc::new(GuideService::new(compiler)), &config).unwrap()
    }

    #[test]
    fn test_default_schedule_fires_every_ten_minutes() {
        let dir = tempfile::tempdir().unwrap();
        let scheduler = scheduler(&dir, "0 */10 * * * *", false);
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 3, 10).unwrap();

        assert_eq!(
            scheduler.next_run_after(now),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 10, 0).unwrap())
        );
    }

    #[test]
    fn test_invalid_cron_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = GuideCompiler::new(Arc::new(FakeBackend::default()), dir.path().join("epg.xml"), 100);
        let config = GuideConfig {
            update_cron: "every ten minutes".to_string(),
            ..GuideConfig::default()
        };
        let result = GuideScheduler::new(Arc::new(GuideService::new(compiler)), &config);
        assert!(matches!(result, Err(AppError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_startup_run_then_cancel() {
        let dir = tempfile::tempdir().unwrap();
        let scheduler = scheduler(&dir, "0 0 0 1 1 *", true);
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(scheduler.run(cancel.clone()));
        let path = dir.path().join("epg.xml");
        tokio::time::timeout(Duration::from_secs(5), async {
            while !path.exists() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_cancel_during_run_lets_it_finish() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("epg.xml");
        let gate = Arc::new(Notify::new());
        let backend = Arc::new(FakeBackend {
            gate: Some(gate.clone()),
            ..FakeBackend::with_listings(vec![channel("c1", "One", None)], Vec::new())
        });
        let compiler = GuideCompiler::new(backend.clone(), &path, 100);
        let config = GuideConfig {
            path: path.clone(),
            update_cron: "0 0 0 1 1 *".to_string(),
            run_on_startup: true,
            ..GuideConfig::default()
        };
        let scheduler = GuideScheduler::new(Arc::new(GuideService::new(compiler)), &config).unwrap();
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(scheduler.run(cancel.clone()));
        while backend.page_requests() == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        cancel.cancel();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!handle.is_finished());

        gate.notify_one();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("epg.xml.tmp").exists());
    }
}
