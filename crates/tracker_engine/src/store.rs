use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

use tracker_core::JobHandle;
use tracker_logging::tracker_warn;

/// Well-known filename holding the active batch id.
pub const STATE_FILENAME: &str = ".tracker_state.ron";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state directory missing or not writable: {0}")]
    StateDir(String),
    #[error("serialize error: {0}")]
    Serialize(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Persists the handle of the batch currently being tracked.
///
/// `load` with nothing saved returns `Ok(None)`; `clear` is idempotent.
/// The tracking logic depends only on this trait, so tests substitute an
/// in-memory implementation.
pub trait HandleStore: Send + Sync {
    fn save(&self, handle: &JobHandle) -> Result<(), StoreError>;
    fn load(&self) -> Result<Option<JobHandle>, StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedHandle {
    batch_id: String,
}

/// File-backed store: one RON document holding the active batch id,
/// written atomically so a crash never leaves a half-written file.
pub struct FileHandleStore {
    dir: PathBuf,
}

impl FileHandleStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path(&self) -> PathBuf {
        self.dir.join(STATE_FILENAME)
    }
}

impl HandleStore for FileHandleStore {
    fn save(&self, handle: &JobHandle) -> Result<(), StoreError> {
        let doc = PersistedHandle {
            batch_id: handle.as_str().to_string(),
        };
        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(&doc, pretty)
            .map_err(|err| StoreError::Serialize(err.to_string()))?;
        write_atomic(&self.dir, STATE_FILENAME, &content)
    }

    fn load(&self) -> Result<Option<JobHandle>, StoreError> {
        let content = match fs::read_to_string(self.path()) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::Io(err)),
        };

        match ron::from_str::<PersistedHandle>(&content) {
            Ok(doc) => Ok(Some(JobHandle::new(doc.batch_id))),
            Err(err) => {
                // An unreadable state file is treated as "nothing tracked"
                // rather than an error the caller has to handle.
                tracker_warn!("Discarding unreadable state file {:?}: {}", self.path(), err);
                Ok(None)
            }
        }
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(self.path()) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::Io(err)),
        }
    }
}

/// Ensure the state directory exists; create if missing.
fn ensure_state_dir(dir: &Path) -> Result<(), StoreError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| StoreError::StateDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(StoreError::StateDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| StoreError::StateDir(e.to_string()))?;
    }
    Ok(())
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file
/// then renaming.
fn write_atomic(dir: &Path, filename: &str, content: &str) -> Result<(), StoreError> {
    ensure_state_dir(dir)?;

    let target = dir.join(filename);
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;

    // Replace an existing file if present.
    if target.exists() {
        fs::remove_file(&target)?;
    }
    tmp.persist(&target).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}

/// In-memory store for tests and ephemeral tracking.
#[derive(Debug, Default)]
pub struct MemoryHandleStore {
    slot: Mutex<Option<JobHandle>>,
}

impl MemoryHandleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HandleStore for MemoryHandleStore {
    fn save(&self, handle: &JobHandle) -> Result<(), StoreError> {
        *self.slot.lock().expect("store lock") = Some(handle.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<JobHandle>, StoreError> {
        Ok(self.slot.lock().expect("store lock").clone())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot.lock().expect("store lock") = None;
        Ok(())
    }
}
