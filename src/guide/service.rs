//! Single-flight guide regeneration and access to the current artifact

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use super::{GenerationReport, GuideCompiler};
use crate::errors::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingTrigger {
    Startup,
    Scheduler,
    Manual,
}

impl std::fmt::Display for ProcessingTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingTrigger::Startup => write!(f, "startup"),
            ProcessingTrigger::Scheduler => write!(f, "scheduler"),
            ProcessingTrigger::Manual => write!(f, "manual"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum RegenerationOutcome {
    Completed(GenerationReport),
    /// Another regeneration was already in flight
    Skipped,
}

pub struct GuideService {
    compiler: GuideCompiler,
    in_flight: Mutex<()>,
    last_report: RwLock<Option<GenerationReport>>,
}

impl GuideService {
    pub fn new(compiler: GuideCompiler) -> Self {
        Self {
            compiler,
            in_flight: Mutex::new(()),
            last_report: RwLock::new(None),
        }
    }

    /// Regenerate the guide unless a run is already in progress.
    ///
    /// Overlapping triggers are dropped rather than queued so there is never
    /// more than one writer for the artifact.
    pub async fn regenerate(&self, trigger: ProcessingTrigger) -> AppResult<RegenerationOutcome> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            info!("Guide regeneration already running, skipping {} trigger", trigger);
            return Ok(RegenerationOutcome::Skipped);
        };

        info!("Regenerating guide ({} trigger)", trigger);
        match self.compiler.compile().await {
            Ok(report) => {
                *self.last_report.write().await = Some(report.clone());
                Ok(RegenerationOutcome::Completed(report))
            }
            Err(e) => {
                warn!("Guide regeneration ({} trigger) failed: {}", trigger, e);
                Err(e)
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    pub async fn last_report(&self) -> Option<GenerationReport> {
        self.last_report.read().await.clone()
    }

    /// Read the current guide document, `None` before the first generation
    pub async fn read_current(&self) -> AppResult<Option<Vec<u8>>> {
        match tokio::fs::read(self.compiler.path()).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
