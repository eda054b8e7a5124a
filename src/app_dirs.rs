use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use crate::config::StorageKind;

pub const APP_NAME: &str = "hajj-course";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// State directory holding progress data and the log file
    pub fn data_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join(APP_NAME),
            )
        } else {
            ProjectDirs::from("", "", APP_NAME).map(|pd| pd.data_local_dir().to_path_buf())
        }
    }

    /// Explicit override first, then the platform location, then the cwd
    pub fn resolve_data_dir(override_dir: Option<&Path>) -> PathBuf {
        override_dir
            .map(Path::to_path_buf)
            .or_else(Self::data_dir)
            .unwrap_or_else(|| PathBuf::from(".hajj-course"))
    }

    pub fn sqlite_path(data_dir: &Path) -> PathBuf {
        data_dir.join("progress.db")
    }

    pub fn log_path(data_dir: &Path) -> PathBuf {
        data_dir.join("hajj.log")
    }

    /// Where a given backend keeps its data
    pub fn storage_location(kind: StorageKind, data_dir: &Path) -> PathBuf {
        match kind {
            StorageKind::File => data_dir.to_path_buf(),
            StorageKind::Sqlite => Self::sqlite_path(data_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins() {
        let dir = AppDirs::resolve_data_dir(Some(Path::new("/tmp/hajj-test")));
        assert_eq!(dir, PathBuf::from("/tmp/hajj-test"));
    }

    #[test]
    fn storage_locations() {
        let base = Path::new("/data");
        assert_eq!(AppDirs::storage_location(StorageKind::File, base), PathBuf::from("/data"));
        assert_eq!(
            AppDirs::storage_location(StorageKind::Sqlite, base),
            PathBuf::from("/data/progress.db")
        );
        assert_eq!(AppDirs::log_path(base), PathBuf::from("/data/hajj.log"));
    }
}
