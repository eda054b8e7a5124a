use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Storage key holding the serialized module progress records
pub const PROGRESS_KEY: &str = "hajj_progress";
/// Storage key holding the language preference code
pub const LANGUAGE_KEY: &str = "hajj_language";

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Durable key/value blob storage used for progress and preferences.
///
/// Backends are synchronous; every call completes before the next user
/// action is processed.
pub trait PersistenceAdapter {
    /// Returns `Ok(None)` when nothing has been stored under `key`.
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, blob: &str) -> Result<()>;
    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: PersistenceAdapter + ?Sized> PersistenceAdapter for Rc<T> {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, blob: &str) -> Result<()> {
        (**self).save(key, blob)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<T: PersistenceAdapter + ?Sized> PersistenceAdapter for Box<T> {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, blob: &str) -> Result<()> {
        (**self).save(key, blob)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Process-local store, used for `--ephemeral` runs and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl PersistenceAdapter for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, blob: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// One JSON file per key under a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl PersistenceAdapter for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, blob: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(path, blob)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Single-table key/value store in a sqlite database file
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            [],
        )?;
        Ok(Self { conn })
    }
}

impl PersistenceAdapter for SqliteStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn save(&self, key: &str, blob: &str) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, CURRENT_TIMESTAMP)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
            "#,
            params![key, blob],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn exercise(store: &dyn PersistenceAdapter) {
        assert_eq!(store.load(PROGRESS_KEY).unwrap(), None);

        store.save(PROGRESS_KEY, "[1]").unwrap();
        store.save(PROGRESS_KEY, "[2]").unwrap();
        store.save(LANGUAGE_KEY, "bn").unwrap();
        assert_eq!(store.load(PROGRESS_KEY).unwrap().as_deref(), Some("[2]"));
        assert_eq!(store.load(LANGUAGE_KEY).unwrap().as_deref(), Some("bn"));

        store.remove(PROGRESS_KEY).unwrap();
        assert_eq!(store.load(PROGRESS_KEY).unwrap(), None);
        assert_eq!(store.load(LANGUAGE_KEY).unwrap().as_deref(), Some("bn"));

        // removing twice is fine
        store.remove(PROGRESS_KEY).unwrap();
    }

    #[test]
    fn memory_store_semantics() {
        exercise(&MemoryStore::new());
    }

    #[test]
    fn file_store_semantics() {
        let dir = tempdir().unwrap();
        exercise(&FileStore::new(dir.path().join("nested").join("state")));
    }

    #[test]
    fn sqlite_store_semantics() {
        exercise(&SqliteStore::open_in_memory().unwrap());
    }

    #[test]
    fn sqlite_store_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("progress.db");
        {
            let store = SqliteStore::open(&path).unwrap();
            store.save(LANGUAGE_KEY, "ar").unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.load(LANGUAGE_KEY).unwrap().as_deref(), Some("ar"));
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.save("../escape", "x"),
            Err(StoreError::InvalidKey(_))
        ));
    }

    #[test]
    fn shared_handle_sees_same_entries() {
        let store = Rc::new(MemoryStore::new());
        let handle: Rc<dyn PersistenceAdapter> = store.clone();
        handle.save(LANGUAGE_KEY, "en").unwrap();
        assert!(store.contains(LANGUAGE_KEY));
    }
}
