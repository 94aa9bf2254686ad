//! Session ID generation
//!
//! Format: `consciousness_session_{YYYYMMDD}_{HHMMSS}` in local time.
//! Example: `consciousness_session_20260104_153000`
//!
//! IDs sort lexically in creation order and double as the log file stem.

use chrono::{DateTime, NaiveDateTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Prefix shared by every session ID
pub const SESSION_PREFIX: &str = "consciousness_session_";

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// A session identifier derived from the session's creation time
///
/// Validated on construction - both `parse()` and serde deserialization
/// ensure the ID matches the expected format.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(String);

// Custom Deserialize to validate format (prevents bypass of parse() validation)
impl<'de> Deserialize<'de> for SessionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        SessionId::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl SessionId {
    /// Build the session ID for a creation time (second precision)
    pub fn new<Tz: TimeZone>(created: &DateTime<Tz>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        Self(format!(
            "{SESSION_PREFIX}{}",
            created.format(TIMESTAMP_FORMAT)
        ))
    }

    /// Session ID for the current local time
    pub fn now() -> Self {
        Self::new(&chrono::Local::now())
    }

    /// Parse a session ID from string
    pub fn parse(s: &str) -> Result<Self, SessionIdError> {
        let stamp = s
            .strip_prefix(SESSION_PREFIX)
            .ok_or_else(|| SessionIdError::InvalidFormat(s.to_string()))?;

        // YYYYMMDD_HHMMSS
        let (date, time) = stamp
            .split_once('_')
            .ok_or_else(|| SessionIdError::InvalidFormat(s.to_string()))?;

        if date.len() != 8 || !date.chars().all(|c| c.is_ascii_digit()) {
            return Err(SessionIdError::InvalidDate(date.to_string()));
        }

        if time.len() != 6 || !time.chars().all(|c| c.is_ascii_digit()) {
            return Err(SessionIdError::InvalidTime(time.to_string()));
        }

        NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
            .map_err(|_| SessionIdError::OutOfRange(stamp.to_string()))?;

        Ok(Self(s.to_string()))
    }

    /// Get the underlying string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the session's JSONL log
    pub fn log_file_name(&self) -> String {
        format!("{}.jsonl", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors that can occur when parsing a session ID
#[derive(Debug, thiserror::Error)]
pub enum SessionIdError {
    #[error("invalid session ID format: {0}")]
    InvalidFormat(String),
    #[error("invalid date in session ID: {0}")]
    InvalidDate(String),
    #[error("invalid time in session ID: {0}")]
    InvalidTime(String),
    #[error("session ID timestamp out of range: {0}")]
    OutOfRange(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_session_id_format() {
        let ts = DateTime::parse_from_rfc3339("2026-01-04T15:30:09Z")
            .unwrap()
            .to_utc();
        let id = SessionId::new(&ts);

        assert_eq!(id.as_str(), "consciousness_session_20260104_153009");
        assert_eq!(id.log_file_name(), "consciousness_session_20260104_153009.jsonl");
    }

    #[test]
    fn test_session_id_same_second_is_stable() {
        let ts = Utc::now();
        assert_eq!(SessionId::new(&ts), SessionId::new(&ts));
    }

    #[test]
    fn test_session_ids_sort_chronologically() {
        let earlier = SessionId::parse("consciousness_session_20251231_235959").unwrap();
        let later = SessionId::parse("consciousness_session_20260101_000000").unwrap();
        assert!(earlier < later);
    }

    #[test]
    fn test_session_id_parse_valid() {
        let id = SessionId::parse("consciousness_session_20260104_153000").unwrap();
        assert_eq!(id.as_str(), "consciousness_session_20260104_153000");
        assert_eq!(id.to_string(), id.as_str());
        assert_eq!(id.log_file_name(), "consciousness_session_20260104_153000.jsonl");
    }

    #[test]
    fn test_session_id_parse_invalid_format() {
        assert!(SessionId::parse("invalid").is_err());
        assert!(SessionId::parse("consciousness_session_").is_err());
        assert!(SessionId::parse("consciousness_session_20260104").is_err());
        assert!(SessionId::parse("chat_session_20260104_153000").is_err());
    }

    #[test]
    fn test_session_id_parse_invalid_date() {
        assert!(matches!(
            SessionId::parse("consciousness_session_2026010_153000"),
            Err(SessionIdError::InvalidDate(_))
        ));
        assert!(matches!(
            SessionId::parse("consciousness_session_abcdefgh_153000"),
            Err(SessionIdError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_session_id_parse_invalid_time() {
        assert!(matches!(
            SessionId::parse("consciousness_session_20260104_1530"),
            Err(SessionIdError::InvalidTime(_))
        ));
        assert!(matches!(
            SessionId::parse("consciousness_session_20260104_15300a"),
            Err(SessionIdError::InvalidTime(_))
        ));
    }

    #[test]
    fn test_session_id_parse_out_of_range() {
        assert!(matches!(
            SessionId::parse("consciousness_session_20261304_153000"),
            Err(SessionIdError::OutOfRange(_))
        ));
        assert!(matches!(
            SessionId::parse("consciousness_session_20260104_256000"),
            Err(SessionIdError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_session_id_serde() {
        let id = SessionId::parse("consciousness_session_20260104_153000").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"consciousness_session_20260104_153000\"");

        let parsed: SessionId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_session_id_serde_rejects_invalid() {
        let result: Result<SessionId, _> = serde_json::from_str("\"invalid\"");
        assert!(result.is_err());

        let result: Result<SessionId, _> = serde_json::from_str("\"../../../etc/passwd\"");
        assert!(result.is_err());
    }
}
