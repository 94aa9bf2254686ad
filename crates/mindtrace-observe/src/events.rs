//! Session log entries for JSONL persistence
//!
//! The field names and types below are the durable log format. New fields
//! may be added; existing ones must keep their names and shapes.

use crate::classifier::PatternFlags;
use crate::id::SessionId;
use chrono::{DateTime, Utc};
use mindtrace_sensors::SensorSnapshot;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Experiment metadata recorded when a session starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartMetadata {
    /// Model that produced the thoughts, if known
    pub model: Option<String>,
    pub experiment_version: String,
    /// Version of the logger that wrote the session
    #[serde(default)]
    pub logger_version: String,
}

impl Default for StartMetadata {
    fn default() -> Self {
        Self {
            model: None,
            experiment_version: "1.0".to_string(),
            logger_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Size information derived from a thought's content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThoughtMetadata {
    /// Length in characters (Unicode scalar values)
    pub content_length: usize,
    /// Number of words separated by whitespace or ASCII information separators
    pub word_count: usize,
}

impl ThoughtMetadata {
    pub fn for_content(content: &str) -> Self {
        Self {
            content_length: content.chars().count(),
            // Information separators also break words
            word_count: content
                .split(|c: char| c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c))
                .filter(|word| !word.is_empty())
                .count(),
        }
    }
}

/// Aggregate view of a session at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Path of the session's JSONL log
    pub session_file: PathBuf,
    pub total_thoughts: u64,
    /// Thoughts that were also emitted as output
    pub spontaneous_outputs: u64,
    pub emergence_events: u64,
    /// Distinct emergence types, sorted
    pub emergence_types: Vec<String>,
    pub session_duration_minutes: f64,
}

/// A single entry in the session log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum LogEntry {
    /// First entry of every session
    SessionStart {
        timestamp: DateTime<Utc>,
        session_id: SessionId,
        metadata: StartMetadata,
    },

    /// A logged thought with its sensor snapshot and pattern flags
    Thought {
        timestamp: DateTime<Utc>,
        /// 1-based, strictly increasing within a session
        thought_id: u64,
        content: String,
        was_output: bool,
        sensor_data: SensorSnapshot,
        patterns: PatternFlags,
        metadata: ThoughtMetadata,
    },

    /// A detected (or manually recorded) emergence event
    Emergence {
        timestamp: DateTime<Utc>,
        emergence_type: String,
        content: String,
        /// In `[0, 1]`
        confidence: f64,
        /// `thought_id` of the most recent thought, 0 if none
        thought_context: u64,
        session_uptime_seconds: f64,
    },

    /// Last entry of a session
    SessionEnd {
        timestamp: DateTime<Utc>,
        final_summary: SessionSummary,
    },
}

impl LogEntry {
    /// Create a session start entry
    pub fn session_start(session_id: SessionId, metadata: StartMetadata) -> Self {
        LogEntry::SessionStart {
            timestamp: Utc::now(),
            session_id,
            metadata,
        }
    }

    /// Create a thought entry; metadata is derived from the content
    pub fn thought(
        thought_id: u64,
        content: impl Into<String>,
        was_output: bool,
        sensor_data: SensorSnapshot,
        patterns: PatternFlags,
    ) -> Self {
        let content = content.into();
        LogEntry::Thought {
            timestamp: Utc::now(),
            thought_id,
            metadata: ThoughtMetadata::for_content(&content),
            content,
            was_output,
            sensor_data,
            patterns,
        }
    }

    /// Create an emergence entry; confidence is clamped to `[0, 1]`
    pub fn emergence(
        emergence_type: impl Into<String>,
        content: impl Into<String>,
        confidence: f64,
        thought_context: u64,
        session_uptime_seconds: f64,
    ) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        LogEntry::Emergence {
            timestamp: Utc::now(),
            emergence_type: emergence_type.into(),
            content: content.into(),
            confidence,
            thought_context,
            session_uptime_seconds,
        }
    }

    /// Create a session end entry
    pub fn session_end(final_summary: SessionSummary) -> Self {
        LogEntry::SessionEnd {
            timestamp: Utc::now(),
            final_summary,
        }
    }

    /// Get the timestamp of this entry
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            LogEntry::SessionStart { timestamp, .. }
            | LogEntry::Thought { timestamp, .. }
            | LogEntry::Emergence { timestamp, .. }
            | LogEntry::SessionEnd { timestamp, .. } => *timestamp,
        }
    }

    /// The `event_type` tag of this entry
    pub fn event_type(&self) -> &'static str {
        match self {
            LogEntry::SessionStart { .. } => "session_start",
            LogEntry::Thought { .. } => "thought",
            LogEntry::Emergence { .. } => "emergence",
            LogEntry::SessionEnd { .. } => "session_end",
        }
    }

    /// Serialize to JSONL format (single line)
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse from JSONL line
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;
    use chrono::Datelike;

    fn sample_sensors() -> SensorSnapshot {
        let mut sensors = SensorSnapshot::new();
        sensors.insert("cpu_percent", 12.345678901234567);
        sensors.insert("uptime_minutes", 1.0 / 3.0);
        sensors.insert_null("battery_percent");
        sensors
    }

    fn sample_summary() -> SessionSummary {
        SessionSummary {
            session_file: PathBuf::from("logs/consciousness_session_20260104_153000.jsonl"),
            total_thoughts: 3,
            spontaneous_outputs: 1,
            emergence_events: 4,
            emergence_types: vec!["self_reference".into(), "temporal_self_awareness".into()],
            session_duration_minutes: 0.1 + 0.2,
        }
    }

    #[test]
    fn test_session_start_json() {
        let id = SessionId::parse("consciousness_session_20260104_153000").unwrap();
        let entry = LogEntry::session_start(id, StartMetadata::default());
        let json = entry.to_jsonl().unwrap();

        assert!(json.contains("\"event_type\":\"session_start\""));
        assert!(json.contains("\"session_id\":\"consciousness_session_20260104_153000\""));
        assert!(json.contains("\"experiment_version\":\"1.0\""));
        assert!(json.contains("\"model\":null"));
        assert!(json.contains("\"timestamp\":"));
    }

    #[test]
    fn test_thought_json() {
        let content = "I feel aware now?";
        let entry = LogEntry::thought(7, content, true, sample_sensors(), classify(content));
        let json = entry.to_jsonl().unwrap();

        assert!(json.contains("\"event_type\":\"thought\""));
        assert!(json.contains("\"thought_id\":7"));
        assert!(json.contains("\"was_output\":true"));
        assert!(json.contains("\"battery_percent\":null"));
        assert!(json.contains("\"self_reference\":true"));
        assert!(json.contains("\"emotional_language\":false"));
        assert!(json.contains("\"content_length\":17"));
        assert!(json.contains("\"word_count\":4"));
    }

    #[test]
    fn test_emergence_json() {
        let entry = LogEntry::emergence("consciousness_questioning", "why?", 0.9, 3, 12.5);
        let json = entry.to_jsonl().unwrap();

        assert!(json.contains("\"event_type\":\"emergence\""));
        assert!(json.contains("\"emergence_type\":\"consciousness_questioning\""));
        assert!(json.contains("\"confidence\":0.9"));
        assert!(json.contains("\"thought_context\":3"));
        assert!(json.contains("\"session_uptime_seconds\":12.5"));
    }

    #[test]
    fn test_emergence_confidence_is_clamped() {
        for (raw, expected) in [(1.7, 1.0), (-0.2, 0.0), (f64::NAN, 0.0), (0.42, 0.42)] {
            match LogEntry::emergence("manual", "", raw, 0, 0.0) {
                LogEntry::Emergence { confidence, .. } => assert_eq!(confidence, expected),
                other => panic!("wrong entry type: {}", other.event_type()),
            }
        }
    }

    #[test]
    fn test_thought_metadata_counts_characters_and_words() {
        assert_eq!(ThoughtMetadata::for_content(""), ThoughtMetadata::default());
        let meta = ThoughtMetadata::for_content("  héllo   wörld \n");
        assert_eq!(meta.content_length, 17);
        assert_eq!(meta.word_count, 2);
    }

    #[test]
    fn test_word_count_splits_on_information_separators() {
        let meta = ThoughtMetadata::for_content("a\u{1c}b\u{1d}c\u{1e}d\u{1f}e f");
        assert_eq!(meta.word_count, 6);
        assert_eq!(ThoughtMetadata::for_content("\u{1f}\u{1c}").word_count, 0);
    }

    #[test]
    fn test_jsonl_roundtrip_is_field_for_field() {
        let id = SessionId::parse("consciousness_session_20260104_153000").unwrap();
        let entries = vec![
            LogEntry::session_start(
                id,
                StartMetadata {
                    model: Some("tiny".into()),
                    ..Default::default()
                },
            ),
            LogEntry::thought(1, "Am I here?", false, sample_sensors(), classify("Am I here?")),
            LogEntry::thought(2, "", false, SensorSnapshot::new(), classify("")),
            LogEntry::emergence("self_reference", "Am I here?", 0.8, 1, 0.123456789),
            LogEntry::session_end(sample_summary()),
        ];

        for entry in entries {
            let json = entry.to_jsonl().unwrap();
            assert!(!json.contains('\n'));
            let parsed = LogEntry::from_jsonl(&json).unwrap();
            assert_eq!(parsed, entry);
        }
    }

    #[test]
    fn test_parse_example_jsonl() {
        let lines = [
            r#"{"timestamp":"2026-01-04T15:30:00+00:00","event_type":"session_start","session_id":"consciousness_session_20260104_153000","metadata":{"host":null,"model":"microsoft/Phi-3-mini-4k-instruct","experiment_version":"1.0"}}"#,
            r#"{"timestamp":"2026-01-04T15:30:01.250000+00:00","event_type":"thought","thought_id":1,"content":"Hello","was_output":false,"sensor_data":{"cpu_percent":3.5,"audio_level":null},"patterns":{"self_reference":false,"consciousness_indicators":false,"temporal_awareness":false,"questioning":false,"emotional_language":false},"metadata":{"content_length":5,"word_count":1}}"#,
            r#"{"timestamp":"2026-01-04T15:30:02Z","event_type":"emergence","emergence_type":"self_reference","content":"I","confidence":0.8,"thought_context":1,"session_uptime_seconds":0}"#,
            r#"{"timestamp":"2026-01-04T15:30:03Z","event_type":"session_end","final_summary":{"session_file":"x.jsonl","total_thoughts":1,"spontaneous_outputs":0,"emergence_events":1,"emergence_types":["self_reference"],"session_duration_minutes":0.05}}"#,
        ];

        for line in lines {
            let entry = LogEntry::from_jsonl(line).unwrap();
            assert_eq!(entry.timestamp().year(), 2026);
        }
    }

    #[test]
    fn test_unknown_event_type_is_rejected() {
        let line = r#"{"timestamp":"2026-01-04T15:30:00Z","event_type":"dream","content":"?"}"#;
        assert!(LogEntry::from_jsonl(line).is_err());
    }
}
