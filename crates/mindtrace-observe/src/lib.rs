//! Thought session logging and lexical pattern analysis
//!
//! This crate records "thoughts" (free-text strings plus a sensor snapshot)
//! as an append-only JSONL session log, tags each thought with shallow
//! lexical features, and emits emergence events when certain feature
//! combinations appear.
//!
//! # Architecture
//!
//! Sessions are stored as sibling files in a log directory:
//! - `<session_id>.jsonl` - Append-only entry stream (primary format)
//! - `<session_id>_summary.json` - Summary and analysis export (on demand)
//! - `<session_id>_summary.md` - Human-readable report (on demand)
//!
//! # Entry Types
//!
//! Every line carries an `event_type`:
//! - `session_start` - Session id and experiment metadata
//! - `thought` - Content, sensor snapshot and pattern flags
//! - `emergence` - A detected pattern combination with a confidence
//! - `session_end` - Final session summary
//!
//! # Example
//!
//! ```no_run
//! use mindtrace_observe::SessionLogger;
//! use mindtrace_sensors::SensorSnapshot;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut logger = SessionLogger::new("consciousness_logs")?;
//!
//! let id = logger.log_thought("I wonder what I think about now?", SensorSnapshot::new(), false);
//! assert_eq!(id, 1);
//!
//! let analysis = logger.analyze()?;
//! println!("score: {:.2}", analysis.consciousness_score);
//!
//! let summary = logger.finish();
//! println!("{} thoughts", summary.total_thoughts);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod classifier;
pub mod emergence;
pub mod events;
pub mod export;
pub mod id;
pub mod logger;
pub mod markdown;
pub mod session;

// Re-exports for convenience
pub use analysis::{analyze_entries, analyze_log, AnalysisError, ConsciousnessAnalysis};
pub use classifier::{classify, PatternClassifier, PatternError, PatternFlags};
pub use emergence::{EmergenceCandidate, EmergenceDetector, EmergenceKind};
pub use events::{LogEntry, SessionSummary, StartMetadata, ThoughtMetadata};
pub use export::{export_session, AnalysisReport, ExportError, ExportFormat, SessionExport};
pub use id::{SessionId, SessionIdError};
pub use logger::{SessionLogger, SessionState, SharedSessionLogger};
pub use markdown::{render_analysis, render_to_markdown, RenderOptions};
pub use session::{list_sessions, load_entries, SessionError, SessionWriter};
