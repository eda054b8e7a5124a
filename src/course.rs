use std::path::Path;
use std::rc::Rc;

use tracing::info;

use crate::app_dirs::AppDirs;
use crate::certificate::CertificateGate;
use crate::config::StorageKind;
use crate::language::LanguagePreference;
use crate::persistence::{FileStore, MemoryStore, PersistenceAdapter, SqliteStore, StoreError};
use crate::progress::ProgressStore;
use crate::sequencer::LessonSequencer;

pub type SharedBackend = Rc<dyn PersistenceAdapter>;

/// Opens the configured backend rooted at `data_dir`
pub fn open_backend(kind: StorageKind, data_dir: &Path) -> Result<SharedBackend, StoreError> {
    let location = AppDirs::storage_location(kind, data_dir);
    info!(storage = %kind, location = %location.display(), "opening progress storage");
    let backend: SharedBackend = match kind {
        StorageKind::File => Rc::new(FileStore::new(location)),
        StorageKind::Sqlite => Rc::new(SqliteStore::open(location)?),
    };
    Ok(backend)
}

pub fn ephemeral_backend() -> SharedBackend {
    Rc::new(MemoryStore::new())
}

/// Application-wide state: progress and language preference over one backend.
/// Built once at startup and handed to whatever presents the course.
pub struct Course<S: PersistenceAdapter + Clone = SharedBackend> {
    pub progress: ProgressStore<S>,
    pub language: LanguagePreference<S>,
}

impl<S: PersistenceAdapter + Clone> Course<S> {
    pub fn open(backend: S) -> Self {
        Self {
            language: LanguagePreference::load(backend.clone()),
            progress: ProgressStore::initialize(backend),
        }
    }

    pub fn start_lesson(&self, module_id: &str) -> LessonSequencer {
        LessonSequencer::new(Some(module_id))
    }

    pub fn certificate_unlocked(&self) -> bool {
        CertificateGate::is_eligible(&self.progress)
    }
}
