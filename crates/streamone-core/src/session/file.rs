use std::fs::OpenOptions;
use std::io::{self, Write};
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use super::state::{ActiveSession, SessionState};
use super::{CacheValue, SessionError, SessionStore};

/// Session file name in the store directory
const SESSION_FILE: &str = "session.json";

/// The session file holds the session key, so only the owner may read it
#[cfg(unix)]
const SESSION_FILE_MODE: u32 = 0o600;

/// Session storage mirrored to a JSON file.
///
/// The session, its deadline and its cache are written through to
/// `<dir>/session.json` on every change, so a session outlives the process
/// that created it. The in-memory copy is authoritative: a failed write is
/// logged and can be retried with [`FileSessionStore::flush`].
///
/// Writes go through a temporary file renamed over `session.json`. When the
/// directory refuses the rename the file is rewritten in place, and an ended
/// session whose file can not be removed is overwritten with the empty state,
/// so a cleared session never comes back on the next open.
pub struct FileSessionStore {
    path: PathBuf,
    state: Mutex<SessionState>,
}

impl FileSessionStore {
    /// Open the store in `dir`, loading a previously saved session.
    ///
    /// A saved session whose deadline has passed is discarded and its file
    /// removed. So is a file that can not be parsed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create session directory: {}", dir.display()))?;

        let path = dir.join(SESSION_FILE);
        let mut state = load(&path)?;
        if state.expire(Utc::now()) {
            write(&path, &state)?;
        }

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    /// Location of the session file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrite the session file from the in-memory state.
    pub fn flush(&self) -> Result<()> {
        let state = self.lock();
        write(&self.path, &state)
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // State is consistent between statements, so a poisoned lock is still usable
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write `state` through to disk, keeping memory authoritative on failure.
    fn persist(&self, state: &SessionState) {
        if let Err(e) = write(&self.path, state) {
            warn!(path = %self.path.display(), error = %e, "Failed to persist session");
        }
    }

    /// Run `op` on the live session. `mutates` says whether `op` changes it.
    ///
    /// An expiry noticed here is written through even when `op` is a read.
    fn with_live<T>(
        &self,
        mutates: bool,
        op: impl FnOnce(&mut ActiveSession, DateTime<Utc>) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        let now = Utc::now();
        let mut state = self.lock();
        if state.expire(now) {
            self.persist(&state);
            return Err(SessionError::NoSession);
        }
        let result = op(state.live(now)?, now);
        if mutates && result.is_ok() {
            self.persist(&state);
        }
        result
    }
}

impl SessionStore for FileSessionStore {
    fn has_session(&self) -> bool {
        self.with_live(false, |_, _| Ok(())).is_ok()
    }

    fn clear_session(&self) {
        let mut state = self.lock();
        state.clear();
        self.persist(&state);
    }

    fn set_session(&self, id: &str, key: &str, user_id: &str, timeout: Duration) {
        let mut state = self.lock();
        *state = SessionState::establish(id, key, user_id, timeout, Utc::now());
        self.persist(&state);
        debug!(user_id = %user_id, path = %self.path.display(), "Session established");
    }

    fn set_timeout(&self, timeout: Duration) -> Result<(), SessionError> {
        self.with_live(true, |session, now| {
            session.extend(timeout, now);
            Ok(())
        })
    }

    fn id(&self) -> Result<String, SessionError> {
        self.with_live(false, |session, _| Ok(session.id.clone()))
    }

    fn key(&self) -> Result<String, SessionError> {
        self.with_live(false, |session, _| Ok(session.key.clone()))
    }

    fn user_id(&self) -> Result<String, SessionError> {
        self.with_live(false, |session, _| Ok(session.user_id.clone()))
    }

    fn timeout(&self) -> Result<Duration, SessionError> {
        self.with_live(false, |session, now| Ok(session.remaining(now)))
    }

    fn has_cache_key(&self, key: &str) -> Result<bool, SessionError> {
        self.with_live(false, |session, _| Ok(session.cache.contains_key(key)))
    }

    fn get_cache_key(&self, key: &str) -> Result<CacheValue, SessionError> {
        self.with_live(false, |session, _| session.get(key))
    }

    fn set_cache_key(&self, key: &str, value: CacheValue) -> Result<(), SessionError> {
        self.with_live(true, |session, _| {
            session.cache.insert(key.to_string(), value);
            Ok(())
        })
    }

    fn unset_cache_key(&self, key: &str) -> Result<(), SessionError> {
        self.with_live(true, |session, _| session.remove(key))
    }
}

fn load(path: &Path) -> Result<SessionState> {
    if !path.exists() {
        return Ok(SessionState::None);
    }
    let contents = std::fs::read_to_string(path).context("Failed to read session file")?;
    match serde_json::from_str(&contents) {
        Ok(state) => Ok(state),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Discarding unreadable session file");
            if let Err(e) = write(path, &SessionState::None) {
                warn!(path = %path.display(), error = %e, "Failed to discard session file");
            }
            Ok(SessionState::None)
        }
    }
}

fn write(path: &Path, state: &SessionState) -> Result<()> {
    if !state.is_active() {
        match std::fs::remove_file(path) {
            Ok(()) => return Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to remove session file, overwriting it");
            }
        }
    }

    let contents = serde_json::to_string_pretty(state)?;
    if let Err(e) = replace(path, &contents) {
        debug!(path = %path.display(), error = %e, "Rename failed, rewriting session file in place");
        overwrite(path, &contents)?;
    }
    Ok(())
}

/// Swap in `contents` atomically through a temporary file in the same directory.
fn replace(path: &Path, contents: &str) -> Result<()> {
    let dir = path
        .parent()
        .context("Session file has no parent directory")?;
    let mut file = tempfile::NamedTempFile::new_in(dir)
        .context("Failed to create temporary session file")?;
    file.write_all(contents.as_bytes())
        .context("Failed to write temporary session file")?;
    file.as_file()
        .sync_all()
        .context("Failed to sync temporary session file")?;
    file.persist(path).context("Failed to replace session file")?;
    Ok(())
}

fn overwrite(path: &Path, contents: &str) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(SESSION_FILE_MODE);

    let mut file = options.open(path).context("Failed to open session file")?;
    file.write_all(contents.as_bytes())
        .context("Failed to write session file")?;
    Ok(())
}
