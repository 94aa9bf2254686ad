//! Summary exports written beside a session log
//!
//! - `json` writes `<session_id>_summary.json`
//! - `markdown` (or `md`) writes `<session_id>_summary.md`

use crate::analysis::{analyze_entries, analyze_log, ConsciousnessAnalysis};
use crate::events::SessionSummary;
use crate::markdown::{render_analysis, render_to_markdown, RenderOptions};
use crate::session::load_entries;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    /// File extension of the exported document
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "md",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Export failures
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Analysis section of an export; holds the error message when analysis failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisReport {
    Complete(ConsciousnessAnalysis),
    Failed { error: String },
}

/// Document written by the JSON export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionExport {
    pub session_summary: SessionSummary,
    pub consciousness_analysis: AnalysisReport,
    pub export_timestamp: DateTime<Utc>,
}

/// Write a summary export for the log at `log_path` and return its path
pub fn export_session(
    log_path: &Path,
    summary: &SessionSummary,
    format: ExportFormat,
) -> Result<PathBuf, ExportError> {
    let target = summary_path(log_path, format);

    let body = match format {
        ExportFormat::Json => {
            let report = match analyze_log(log_path) {
                Ok(analysis) => AnalysisReport::Complete(analysis),
                Err(e) => AnalysisReport::Failed {
                    error: e.to_string(),
                },
            };
            let export = SessionExport {
                session_summary: summary.clone(),
                consciousness_analysis: report,
                export_timestamp: Utc::now(),
            };
            serde_json::to_string_pretty(&export)?
        }
        ExportFormat::Markdown => render_report(log_path, summary),
    };

    fs::write(&target, body)?;
    info!(path = %target.display(), %format, "exported session summary");
    Ok(target)
}

fn summary_path(log_path: &Path, format: ExportFormat) -> PathBuf {
    let stem = log_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("session");
    log_path.with_file_name(format!("{stem}_summary.{}", format.extension()))
}

fn render_report(log_path: &Path, summary: &SessionSummary) -> String {
    let mut output = String::from("# Session Report\n\n");

    match load_entries(log_path) {
        Ok(entries) => {
            match analyze_entries(&entries) {
                Ok(analysis) => output.push_str(&render_analysis(&analysis)),
                Err(e) => output.push_str(&format!("> Analysis unavailable: {e}\n\n")),
            }
            output.push_str(&render_to_markdown(&entries, &RenderOptions::default()));
        }
        Err(e) => {
            output.push_str(&format!("> Session log unreadable: {e}\n\n"));
            output.push_str(&format!(
                "- {} thoughts, {} emergence events\n",
                summary.total_thoughts, summary.emergence_events
            ));
        }
    }

    output
}
