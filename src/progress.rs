use chrono::{DateTime, SubsecRound, Utc};
use serde::{de, Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog;
use crate::persistence::{PersistenceAdapter, PROGRESS_KEY};

/// Completion state of one course module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleProgress {
    pub id: String,
    pub completed: bool,
    /// Percentage; only the upper bound is clamped
    pub progress: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "iso_millis")]
    pub last_accessed: Option<DateTime<Utc>>,
}

impl ModuleProgress {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            completed: false,
            progress: 0,
            quiz_score: None,
            last_accessed: None,
        }
    }
}

/// Timestamps are stored as RFC 3339 UTC strings with millisecond precision
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => {
                serializer.serialize_some(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(serde::de::Error::custom)
        })
        .transpose()
    }
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fresh records for every catalog module, in course order
pub fn default_modules() -> Vec<ModuleProgress> {
    catalog::catalog()
        .module_ids()
        .map(ModuleProgress::new)
        .collect()
}

pub fn encode(modules: &[ModuleProgress]) -> serde_json::Result<String> {
    serde_json::to_string(modules)
}

/// Parses a stored blob and lines it up with the catalog: one record per
/// catalog module, catalog order, unknown ids dropped.
///
/// A record above 100 percent or with a quiz score above 100 makes the whole
/// blob malformed. Negative progress is kept as stored.
pub fn decode(blob: &str) -> serde_json::Result<Vec<ModuleProgress>> {
    let mut stored: Vec<ModuleProgress> = serde_json::from_str(blob)?;
    if let Some(bad) = stored
        .iter()
        .find(|m| m.progress > 100 || m.quiz_score.is_some_and(|s| s > 100))
    {
        return Err(de::Error::custom(format!(
            "module {} out of range: progress {}, quiz score {:?}",
            bad.id, bad.progress, bad.quiz_score
        )));
    }

    let catalog = catalog::catalog();
    let modules = catalog
        .module_ids()
        .map(|id| match stored.iter().position(|m| m.id == id) {
            Some(idx) => stored.swap_remove(idx),
            None => ModuleProgress::new(id),
        })
        .collect();

    for leftover in &stored {
        if catalog.module(&leftover.id).is_some() {
            warn!(id = %leftover.id, "dropping duplicate stored progress for module");
        } else {
            warn!(id = %leftover.id, "dropping stored progress for unknown module");
        }
    }
    Ok(modules)
}

fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Operations the lesson flow needs from the progress store
pub trait ProgressSink {
    fn progress_of(&self, id: &str) -> Option<i32>;
    fn update_module_progress(&mut self, id: &str, percentage: i32);
    fn complete_module(&mut self, id: &str, score: Option<u32>);
}

/// Owner of all module progress records. Every mutation is written through
/// to the backend immediately.
pub struct ProgressStore<S: PersistenceAdapter> {
    backend: S,
    clock: Box<dyn Clock>,
    modules: Vec<ModuleProgress>,
}

impl<S: PersistenceAdapter> ProgressStore<S> {
    pub fn initialize(backend: S) -> Self {
        Self::with_clock(backend, Box::new(SystemClock))
    }

    /// Loads persisted progress, substituting the default catalog when the
    /// blob is absent, unreadable or malformed.
    pub fn with_clock(backend: S, clock: Box<dyn Clock>) -> Self {
        let modules = match backend.load(PROGRESS_KEY) {
            Ok(Some(blob)) => match decode(&blob) {
                Ok(modules) => {
                    info!(count = modules.len(), "loaded saved progress");
                    modules
                }
                Err(err) => {
                    warn!(error = %err, "failed to parse progress data, using defaults");
                    default_modules()
                }
            },
            Ok(None) => default_modules(),
            Err(err) => {
                warn!(error = %err, "failed to read progress data, using defaults");
                default_modules()
            }
        };

        Self {
            backend,
            clock,
            modules,
        }
    }

    pub fn modules(&self) -> &[ModuleProgress] {
        &self.modules
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn module_progress(&self, id: &str) -> Option<&ModuleProgress> {
        self.modules.iter().find(|m| m.id == id)
    }

    /// Mean module progress rounded half-up
    pub fn total_progress(&self) -> i32 {
        if self.modules.is_empty() {
            return 0;
        }
        let total: i64 = self.modules.iter().map(|m| m.progress as i64).sum();
        round_half_up(total as f64 / self.modules.len() as f64)
    }

    /// True when every module sits at 100, independent of rounding
    pub fn all_modules_complete(&self) -> bool {
        self.modules.iter().all(|m| m.progress >= 100)
    }

    pub fn completed_count(&self) -> usize {
        self.modules.iter().filter(|m| m.completed).count()
    }

    /// Sets a module's progress to `min(100, percentage)`. Unknown ids are
    /// ignored.
    pub fn update_module_progress(&mut self, id: &str, percentage: i32) {
        let now = self.timestamp();
        let Some(module) = self.modules.iter_mut().find(|m| m.id == id) else {
            debug!(id, "ignoring progress update for unknown module");
            return;
        };
        module.progress = percentage.min(100);
        module.last_accessed = Some(now);
        debug!(id, progress = module.progress, "module progress updated");
        self.persist();
    }

    pub fn complete_module(&mut self, id: &str, score: Option<u32>) {
        let now = self.timestamp();
        let Some(module) = self.modules.iter_mut().find(|m| m.id == id) else {
            debug!(id, "ignoring completion for unknown module");
            return;
        };
        module.completed = true;
        module.progress = 100;
        module.quiz_score = score;
        module.last_accessed = Some(now);
        info!(id, ?score, "module completed");
        self.persist();
    }

    /// Restores the default catalog and clears the persisted blob
    pub fn reset_progress(&mut self) {
        self.modules = default_modules();
        if let Err(err) = self.backend.remove(PROGRESS_KEY) {
            warn!(error = %err, "failed to clear saved progress");
        }
        info!("progress reset");
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.clock.now().trunc_subsecs(3)
    }

    fn persist(&self) {
        let result = encode(&self.modules)
            .map_err(|e| e.to_string())
            .and_then(|blob| {
                self.backend
                    .save(PROGRESS_KEY, &blob)
                    .map_err(|e| e.to_string())
            });
        if let Err(err) = result {
            warn!(error = %err, "failed to save progress");
        }
    }
}

impl<S: PersistenceAdapter> ProgressSink for ProgressStore<S> {
    fn progress_of(&self, id: &str) -> Option<i32> {
        self.module_progress(id).map(|m| m.progress)
    }

    fn update_module_progress(&mut self, id: &str, percentage: i32) {
        ProgressStore::update_module_progress(self, id, percentage);
    }

    fn complete_module(&mut self, id: &str, score: Option<u32>) {
        ProgressStore::complete_module(self, id, score);
    }
}
