//! Append-only JSONL session files
//!
//! [`SessionWriter`] is the fallible low-level writer. It reopens the log in
//! append mode for every entry so that no handle outlives a write, and
//! recreates the file if it was removed while the session was running.

use crate::classifier::PatternError;
use crate::events::LogEntry;
use crate::id::SessionId;
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors from reading or writing session files
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to serialize entry: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("session log already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("malformed entry on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Writes entries to a session's JSONL log
#[derive(Debug)]
pub struct SessionWriter {
    id: SessionId,
    log_dir: PathBuf,
    path: PathBuf,
    entry_count: u64,
    fsync: bool,
}

impl SessionWriter {
    /// Create the log file for a new session
    ///
    /// The log directory is created if needed. Fails with
    /// [`SessionError::AlreadyExists`] if the session already has a log.
    pub fn create(log_dir: impl AsRef<Path>, id: SessionId) -> Result<Self, SessionError> {
        let log_dir = log_dir.as_ref().to_path_buf();
        fs::create_dir_all(&log_dir)?;

        let path = log_dir.join(id.log_file_name());
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(SessionError::AlreadyExists(path));
            }
            Err(e) => return Err(e.into()),
        }

        info!(session = %id, path = %path.display(), "created session log");

        Ok(Self {
            id,
            log_dir,
            path,
            entry_count: 0,
            fsync: false,
        })
    }

    /// Sync file data to disk after every append
    pub fn with_fsync(mut self, fsync: bool) -> Self {
        self.fsync = fsync;
        self
    }

    /// Append one entry as a single JSON line
    pub fn append(&mut self, entry: &LogEntry) -> Result<(), SessionError> {
        let mut line = entry.to_jsonl()?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.flush()?;
        if self.fsync {
            file.sync_data()?;
        }

        self.entry_count += 1;
        debug!(
            session = %self.id,
            event_type = entry.event_type(),
            entry = self.entry_count,
            "appended entry"
        );
        Ok(())
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Path of the JSONL log
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries appended through this writer
    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }
}

/// Load every entry of a session log, in file order
///
/// Blank lines are skipped; any other line must be a valid entry.
pub fn load_entries(path: impl AsRef<Path>) -> Result<Vec<LogEntry>, SessionError> {
    let file = fs::File::open(path.as_ref())?;
    let reader = BufReader::new(file);

    let mut entries = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let entry = LogEntry::from_jsonl(&line).map_err(|source| SessionError::Parse {
            line: index + 1,
            source,
        })?;
        entries.push(entry);
    }

    Ok(entries)
}

/// List the sessions that have a log in `log_dir`, oldest first
///
/// Files whose stem is not a session id are ignored. A missing directory
/// has no sessions.
pub fn list_sessions(log_dir: impl AsRef<Path>) -> Result<Vec<SessionId>, SessionError> {
    let log_dir = log_dir.as_ref();
    if !log_dir.exists() {
        return Ok(Vec::new());
    }

    let mut sessions = Vec::new();
    for entry in fs::read_dir(log_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("jsonl") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if let Ok(id) = SessionId::parse(stem) {
            sessions.push(id);
        }
    }

    sessions.sort();
    Ok(sessions)
}
