//! # tvplay-prefs
//!
//! Persisted player preferences for tvplay.
//!
//! The backend kind and decode mode survive across sessions as small
//! integers. `SqlitePreferences` keeps them in a one-table `SQLite` database;
//! `MemoryPreferences` keeps them for the lifetime of the process.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use directories::ProjectDirs;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info, warn};
use tvplay_core::{BackendKind, DecodeMode, Error, Result};

const KEY_BACKEND: &str = "player";
const KEY_DECODE: &str = "decode";

/// Storage for the user's player choices.
pub trait Preferences: Send + Sync {
    fn backend(&self) -> BackendKind;

    fn set_backend(&self, kind: BackendKind) -> Result<()>;

    fn decode_mode(&self) -> DecodeMode;

    fn set_decode_mode(&self, mode: DecodeMode) -> Result<()>;
}

/// Preferences stored in `SQLite`.
pub struct SqlitePreferences {
    db: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl SqlitePreferences {
    /// Open the store in the default data directory.
    pub fn new() -> Result<Self> {
        let project_dirs = ProjectDirs::from("com", "tvplay", "TvPlay")
            .ok_or_else(|| Error::Preferences("Failed to determine data directory".to_string()))?;

        Self::with_path(project_dirs.data_dir())
    }

    /// Open the store inside `dir`, creating it if needed.
    pub fn with_path(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)
            .map_err(|e| Error::Preferences(format!("Failed to create data directory: {e}")))?;

        let db_path = dir.join("prefs.db");
        let db = Connection::open(&db_path)
            .map_err(|e| Error::Database(format!("Failed to open database: {e}")))?;
        Self::init(db, Some(db_path))
    }

    /// Store that lives only as long as this value.
    pub fn in_memory() -> Result<Self> {
        let db = Connection::open_in_memory()
            .map_err(|e| Error::Database(format!("Failed to open database: {e}")))?;
        Self::init(db, None)
    }

    fn init(db: Connection, path: Option<PathBuf>) -> Result<Self> {
        db.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value INTEGER NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
        )
        .map_err(|e| Error::Database(format!("Failed to initialize database: {e}")))?;

        match &path {
            Some(p) => info!("Preferences opened at {}", p.display()),
            None => debug!("Preferences opened in memory"),
        }

        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            path,
        })
    }

    /// Database file, if the store is on disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        let db = self.db.lock();
        db.query_row("SELECT value FROM settings WHERE key = ?", [key], |row| {
            row.get::<_, i64>(0)
        })
        .optional()
        .unwrap_or_else(|e| {
            warn!("Failed to read preference {key}: {e}");
            None
        })
    }

    fn put_int(&self, key: &str, value: i64) -> Result<()> {
        let db = self.db.lock();
        db.execute(
            "INSERT OR REPLACE INTO settings (key, value, updated_at) VALUES (?, ?, ?)",
            rusqlite::params![key, value, Utc::now().to_rfc3339()],
        )
        .map_err(|e| Error::Database(format!("Failed to store preference {key}: {e}")))?;

        debug!("Stored preference {key}={value}");
        Ok(())
    }
}

impl Preferences for SqlitePreferences {
    fn backend(&self) -> BackendKind {
        self.get_int(KEY_BACKEND)
            .map(BackendKind::from_code)
            .unwrap_or_default()
    }

    fn set_backend(&self, kind: BackendKind) -> Result<()> {
        self.put_int(KEY_BACKEND, kind.code())
    }

    fn decode_mode(&self) -> DecodeMode {
        self.get_int(KEY_DECODE)
            .map(DecodeMode::from_code)
            .unwrap_or_default()
    }

    fn set_decode_mode(&self, mode: DecodeMode) -> Result<()> {
        self.put_int(KEY_DECODE, mode.code())
    }
}

/// Preferences kept in memory.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: Mutex<(BackendKind, DecodeMode)>,
}

impl MemoryPreferences {
    pub fn new(backend: BackendKind, decode: DecodeMode) -> Self {
        Self {
            values: Mutex::new((backend, decode)),
        }
    }
}

impl Preferences for MemoryPreferences {
    fn backend(&self) -> BackendKind {
        self.values.lock().0
    }

    fn set_backend(&self, kind: BackendKind) -> Result<()> {
        self.values.lock().0 = kind;
        Ok(())
    }

    fn decode_mode(&self) -> DecodeMode {
        self.values.lock().1
    }

    fn set_decode_mode(&self, mode: DecodeMode) -> Result<()> {
        self.values.lock().1 = mode;
        Ok(())
    }
}
