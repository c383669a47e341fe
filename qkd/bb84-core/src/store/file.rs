use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::document::SessionDocument;
use crate::error::SessionError;
use crate::store::SessionStore;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
#[cfg(unix)]
use std::os::unix::io::AsRawFd;

#[cfg(unix)]
extern "C" {
    fn flock(fd: i32, operation: i32) -> i32;
}

#[cfg(unix)]
const LOCK_EX: i32 = 2;
#[cfg(unix)]
const LOCK_UN: i32 = 8;

/// Holds an exclusive advisory lock on the sibling `.lock` file for the
/// duration of a read-check-write cycle, serializing compare-and-swap
/// against concurrent actor processes.
struct LockGuard {
    #[allow(dead_code)]
    file: fs::File,
}

impl LockGuard {
    fn exclusive(path: &Path) -> Result<Self, SessionError> {
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;
        #[cfg(unix)]
        {
            let rc = unsafe { flock(file.as_raw_fd(), LOCK_EX) };
            if rc != 0 {
                return Err(SessionError::Io(std::io::Error::last_os_error()));
            }
        }
        Ok(Self { file })
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        #[cfg(unix)]
        {
            let _ = unsafe { flock(self.file.as_raw_fd(), LOCK_UN) };
        }
    }
}

/// Shared session document in a JSON file at a well-known path reachable by
/// every participating process.
pub struct FileStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let lock_path = path.with_extension("lock");
        Self { path, lock_path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_or_default(&self) -> Result<SessionDocument, SessionError> {
        match fs::read(&self.path) {
            Ok(data) => Ok(serde_json::from_slice(&data).unwrap_or_default()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SessionDocument::default()),
            Err(e) => Err(SessionError::Io(e)),
        }
    }

    fn write_atomic(&self, doc: &SessionDocument) -> Result<(), SessionError> {
        let data = serde_json::to_vec_pretty(doc)
            .map_err(|e| SessionError::MalformedDocument(format!("serialize: {e}")))?;
        let tmp = self.path.with_extension("tmp");
        let mut opts = fs::OpenOptions::new();
        opts.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            opts.mode(0o600);
        }
        let mut f = opts.open(&tmp)?;
        f.write_all(&data)?;
        f.sync_all()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SessionStore for FileStore {
    fn load(&self) -> Result<SessionDocument, SessionError> {
        self.read_or_default()
    }

    fn load_strict(&self) -> Result<Option<SessionDocument>, SessionError> {
        match fs::read(&self.path) {
            Ok(data) => serde_json::from_slice(&data)
                .map(Some)
                .map_err(|e| SessionError::MalformedDocument(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SessionError::Io(e)),
        }
    }

    fn compare_and_swap(
        &self,
        expected: u64,
        mut doc: SessionDocument,
    ) -> Result<SessionDocument, SessionError> {
        let _guard = LockGuard::exclusive(&self.lock_path)?;
        let current = self.read_or_default()?;
        if current.version != expected {
            return Err(SessionError::StaleWriteConflict {
                expected,
                found: current.version,
            });
        }
        doc.version = expected + 1;
        self.write_atomic(&doc)?;
        Ok(doc)
    }

    fn overwrite(&self, mut doc: SessionDocument) -> Result<(), SessionError> {
        doc.version += 1;
        self.write_atomic(&doc)
    }
}
