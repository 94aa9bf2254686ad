//! Aggregate statistics over a session log
//!
//! Only `thought` and `emergence` entries count. Start and end markers are
//! ignored, as are lines whose `event_type` this version does not know.
//! Blank lines are skipped rather than treated as a corrupt log, so a log
//! with a trailing empty line or a hand-edited gap still analyzes.

use crate::events::LogEntry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const KNOWN_EVENT_TYPES: [&str; 4] = ["session_start", "thought", "emergence", "session_end"];

/// Score weights in tenths: self reference, consciousness, questioning, emergence
const WEIGHTS: [u64; 4] = [4, 3, 2, 1];

/// Rates and score computed from one session log
///
/// `consciousness_score` is not bounded above: several emergence events per
/// thought push it past 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsciousnessAnalysis {
    pub total_thoughts: u64,
    pub self_reference_rate: f64,
    pub consciousness_indicator_rate: f64,
    pub questioning_rate: f64,
    pub emergence_events: u64,
    /// Distinct emergence types, sorted
    pub emergence_types: Vec<String>,
    pub consciousness_score: f64,
}

/// Why a log could not be analyzed
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no session log at {}", .0.display())]
    Missing(PathBuf),

    #[error("unreadable entry on line {line}: {source}")]
    Unreadable {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read session log: {0}")]
    Io(#[from] io::Error),

    #[error("no thoughts logged yet")]
    EmptyLog,
}

impl AnalysisError {
    /// The log exists but holds no thoughts, or does not exist yet
    pub fn is_no_data(&self) -> bool {
        matches!(self, AnalysisError::EmptyLog | AnalysisError::Missing(_))
    }

    /// The log contains a line that cannot be understood
    pub fn is_corrupt(&self) -> bool {
        matches!(self, AnalysisError::Unreadable { .. })
    }
}

/// Analyze already loaded entries
pub fn analyze_entries<'a, I>(entries: I) -> Result<ConsciousnessAnalysis, AnalysisError>
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    let mut tally = Tally::default();
    for entry in entries {
        tally.record(entry);
    }
    tally.finish()
}

/// Read and analyze the log at `path`
pub fn analyze_log(path: impl AsRef<Path>) -> Result<ConsciousnessAnalysis, AnalysisError> {
    let path = path.as_ref();
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(AnalysisError::Missing(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    let mut tally = Tally::default();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        let number = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let value: serde_json::Value = serde_json::from_str(&line)
            .map_err(|source| AnalysisError::Unreadable { line: number, source })?;

        if let Some(kind) = value.get("event_type").and_then(|v| v.as_str()) {
            if !KNOWN_EVENT_TYPES.contains(&kind) {
                debug!(line = number, event_type = kind, "skipping unknown entry");
                continue;
            }
        }

        let entry: LogEntry = serde_json::from_value(value)
            .map_err(|source| AnalysisError::Unreadable { line: number, source })?;
        tally.record(&entry);
    }

    tally.finish()
}

#[derive(Default)]
struct Tally {
    thoughts: u64,
    self_reference: u64,
    consciousness: u64,
    questioning: u64,
    emergence_events: u64,
    emergence_types: BTreeSet<String>,
}

impl Tally {
    fn record(&mut self, entry: &LogEntry) {
        match entry {
            LogEntry::Thought { patterns, .. } => {
                self.thoughts += 1;
                self.self_reference += u64::from(patterns.self_reference);
                self.consciousness += u64::from(patterns.consciousness_indicators);
                self.questioning += u64::from(patterns.questioning);
            }
            LogEntry::Emergence { emergence_type, .. } => {
                self.emergence_events += 1;
                self.emergence_types.insert(emergence_type.clone());
            }
            LogEntry::SessionStart { .. } | LogEntry::SessionEnd { .. } => {}
        }
    }

    fn finish(self) -> Result<ConsciousnessAnalysis, AnalysisError> {
        if self.thoughts == 0 {
            return Err(AnalysisError::EmptyLog);
        }

        let total = self.thoughts as f64;
        // Summed in integer tenths so that a perfect session scores exactly 1.0
        let weighted = WEIGHTS[0] * self.self_reference
            + WEIGHTS[1] * self.consciousness
            + WEIGHTS[2] * self.questioning
            + WEIGHTS[3] * self.emergence_events;

        Ok(ConsciousnessAnalysis {
            total_thoughts: self.thoughts,
            self_reference_rate: self.self_reference as f64 / total,
            consciousness_indicator_rate: self.consciousness as f64 / total,
            questioning_rate: self.questioning as f64 / total,
            emergence_events: self.emergence_events,
            emergence_types: self.emergence_types.into_iter().collect(),
            consciousness_score: weighted as f64 / (10.0 * total),
        })
    }
}
