//! Thought logging over a single session
//!
//! [`SessionLogger`] owns the session's writer and counters. Writes never
//! fail from the caller's point of view: I/O errors are reported through
//! `tracing` and the session carries on. The `session_end` entry is written
//! by [`SessionLogger::finish`] or, failing that, when the logger is dropped.

use crate::analysis::{analyze_log, AnalysisError, ConsciousnessAnalysis};
use crate::classifier::PatternClassifier;
use crate::emergence::EmergenceDetector;
use crate::events::{LogEntry, SessionSummary, StartMetadata};
use crate::export::{export_session, ExportError, ExportFormat};
use crate::id::SessionId;
use crate::session::{SessionError, SessionWriter};
use mindtrace_config::{LoggerConfig, MindtraceConfig};
use mindtrace_sensors::{SensorSnapshot, SensorSource};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Logger shared between producer threads
pub type SharedSessionLogger = Arc<Mutex<SessionLogger>>;

/// Running counters for one session
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Also the id of the most recent thought
    pub thought_count: u64,
    pub output_count: u64,
    pub emergence_count: u64,
    pub emergence_types: BTreeSet<String>,
    pub started_at: Instant,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            thought_count: 0,
            output_count: 0,
            emergence_count: 0,
            emergence_types: BTreeSet::new(),
            started_at: Instant::now(),
        }
    }
}

impl SessionState {
    /// Seconds since the session started
    pub fn uptime_seconds(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}

/// Logs thoughts and detected emergence events to one session file
#[derive(Debug)]
pub struct SessionLogger {
    writer: SessionWriter,
    classifier: PatternClassifier,
    detector: EmergenceDetector,
    state: SessionState,
    finished: bool,
}

impl SessionLogger {
    /// Start a session in `log_dir` with the default patterns and metadata
    pub fn new(log_dir: impl AsRef<Path>) -> Result<Self, SessionError> {
        Self::with_session_id(log_dir, SessionId::now())
    }

    /// Start a session with an explicit id
    pub fn with_session_id(
        log_dir: impl AsRef<Path>,
        id: SessionId,
    ) -> Result<Self, SessionError> {
        let config = LoggerConfig {
            log_dir: log_dir.as_ref().to_path_buf(),
            ..Default::default()
        };
        Self::start(&config, id, PatternClassifier::default())
    }

    /// Start a session from loaded configuration
    pub fn from_config(config: &MindtraceConfig) -> Result<Self, SessionError> {
        let classifier = PatternClassifier::from_table(&config.patterns)?;
        Self::start(&config.logger, SessionId::now(), classifier)
    }

    fn start(
        config: &LoggerConfig,
        id: SessionId,
        classifier: PatternClassifier,
    ) -> Result<Self, SessionError> {
        let writer =
            SessionWriter::create(&config.log_dir, id)?.with_fsync(config.fsync_each_write);

        let mut logger = Self {
            writer,
            classifier,
            detector: EmergenceDetector::default(),
            state: SessionState::default(),
            finished: false,
        };

        let metadata = StartMetadata {
            model: config.model.clone(),
            experiment_version: config.experiment_version.clone(),
            ..Default::default()
        };
        let start = LogEntry::session_start(logger.writer.id().clone(), metadata);
        logger.write(&start);

        Ok(logger)
    }

    /// Replace the emergence detector
    pub fn with_detector(mut self, detector: EmergenceDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Log a thought and any emergence events it triggers
    ///
    /// Returns the thought's id. The thought entry is written before its
    /// emergence entries, which follow in rule order.
    pub fn log_thought(
        &mut self,
        content: &str,
        sensor_data: SensorSnapshot,
        was_output: bool,
    ) -> u64 {
        self.state.thought_count += 1;
        if was_output {
            self.state.output_count += 1;
        }
        let thought_id = self.state.thought_count;

        let patterns = self.classifier.classify(content);
        let candidates = self.detector.detect(&patterns);

        let entry = LogEntry::thought(thought_id, content, was_output, sensor_data, patterns);
        self.write(&entry);

        for candidate in candidates {
            self.log_emergence(candidate.kind.as_str(), content, candidate.confidence);
        }

        thought_id
    }

    /// Sample `sensors` and log a thought with the snapshot
    pub fn log_thought_with(
        &mut self,
        content: &str,
        sensors: &mut impl SensorSource,
        was_output: bool,
    ) -> u64 {
        let snapshot = sensors.snapshot();
        self.log_thought(content, snapshot, was_output)
    }

    /// Record an emergence event against the most recent thought
    ///
    /// `confidence` is clamped to `[0, 1]`.
    pub fn log_emergence(&mut self, emergence_type: &str, content: &str, confidence: f64) {
        self.state.emergence_count += 1;
        self.state.emergence_types.insert(emergence_type.to_string());

        let entry = LogEntry::emergence(
            emergence_type,
            content,
            confidence,
            self.state.thought_count,
            self.state.uptime_seconds(),
        );
        self.write(&entry);
    }

    /// Summary of the session so far
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_file: self.writer.path().to_path_buf(),
            total_thoughts: self.state.thought_count,
            spontaneous_outputs: self.state.output_count,
            emergence_events: self.state.emergence_count,
            emergence_types: self.state.emergence_types.iter().cloned().collect(),
            session_duration_minutes: self.state.uptime_seconds() / 60.0,
        }
    }

    /// Analyze everything written to the log so far
    pub fn analyze(&self) -> Result<ConsciousnessAnalysis, AnalysisError> {
        analyze_log(self.writer.path())
    }

    /// Export the summary beside the log; `format` is `json`, `markdown` or `md`
    pub fn export(&self, format: &str) -> Result<PathBuf, ExportError> {
        let format: ExportFormat = format.parse()?;
        export_session(self.writer.path(), &self.summary(), format)
    }

    /// Write the session end entry and return the final summary
    pub fn finish(mut self) -> SessionSummary {
        self.close()
    }

    /// Wrap the logger for use from several threads
    pub fn into_shared(self) -> SharedSessionLogger {
        Arc::new(Mutex::new(self))
    }

    pub fn session_id(&self) -> &SessionId {
        self.writer.id()
    }

    /// Path of the session's JSONL log
    pub fn log_path(&self) -> &Path {
        self.writer.path()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn close(&mut self) -> SessionSummary {
        let summary = self.summary();
        if !self.finished {
            self.finished = true;
            let end = LogEntry::session_end(summary.clone());
            self.write(&end);
            info!(
                session = %self.writer.id(),
                thoughts = summary.total_thoughts,
                emergence_events = summary.emergence_events,
                "session finished"
            );
        }
        summary
    }

    fn write(&mut self, entry: &LogEntry) {
        match self.writer.append(entry) {
            Ok(()) => debug!(event_type = entry.event_type(), "logged entry"),
            Err(e) => warn!(
                session = %self.writer.id(),
                event_type = entry.event_type(),
                error = %e,
                "failed to write log entry"
            ),
        }
    }
}

impl Drop for SessionLogger {
    fn drop(&mut self) {
        self.close();
    }
}
