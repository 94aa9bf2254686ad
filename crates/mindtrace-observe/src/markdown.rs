//! JSONL to Markdown rendering for session reports

use crate::analysis::ConsciousnessAnalysis;
use crate::events::LogEntry;
use std::fmt::Write;

/// Options for markdown rendering
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Include timestamps in output
    pub include_timestamps: bool,
    /// Include each thought's sensor readings
    pub include_sensors: bool,
    /// Include the set pattern flags under each thought
    pub include_patterns: bool,
    /// Maximum content length before truncation (0 = no limit)
    pub max_content_length: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_timestamps: false,
            include_sensors: false,
            include_patterns: true,
            max_content_length: 0,
        }
    }
}

/// Render a sequence of log entries to markdown
pub fn render_to_markdown(entries: &[LogEntry], options: &RenderOptions) -> String {
    let mut output = String::new();

    for entry in entries {
        render_entry(&mut output, entry, options);
    }

    output
}

/// Render an analysis as a markdown table
pub fn render_analysis(analysis: &ConsciousnessAnalysis) -> String {
    let mut output = String::new();

    writeln!(output, "## Analysis\n").unwrap();
    writeln!(output, "| Metric | Value |").unwrap();
    writeln!(output, "|---|---|").unwrap();
    writeln!(output, "| Thoughts | {} |", analysis.total_thoughts).unwrap();
    writeln!(
        output,
        "| Self reference rate | {:.3} |",
        analysis.self_reference_rate
    )
    .unwrap();
    writeln!(
        output,
        "| Consciousness indicator rate | {:.3} |",
        analysis.consciousness_indicator_rate
    )
    .unwrap();
    writeln!(output, "| Questioning rate | {:.3} |", analysis.questioning_rate).unwrap();
    writeln!(output, "| Emergence events | {} |", analysis.emergence_events).unwrap();
    writeln!(
        output,
        "| Consciousness score | {:.3} |",
        analysis.consciousness_score
    )
    .unwrap();

    if !analysis.emergence_types.is_empty() {
        writeln!(
            output,
            "\nEmergence types: {}",
            analysis.emergence_types.join(", ")
        )
        .unwrap();
    }
    writeln!(output).unwrap();

    output
}

fn render_entry(output: &mut String, entry: &LogEntry, options: &RenderOptions) {
    match entry {
        LogEntry::SessionStart {
            timestamp,
            session_id,
            metadata,
        } => {
            writeln!(output, "---").unwrap();
            writeln!(output, "session: {session_id}").unwrap();
            writeln!(output, "started: {}", timestamp.to_rfc3339()).unwrap();
            if let Some(model) = &metadata.model {
                writeln!(output, "model: {model}").unwrap();
            }
            writeln!(output, "experiment_version: {}", metadata.experiment_version).unwrap();
            writeln!(output, "---\n").unwrap();
        }

        LogEntry::Thought {
            timestamp,
            thought_id,
            content,
            was_output,
            sensor_data,
            patterns,
            ..
        } => {
            if options.include_timestamps {
                writeln!(output, "<!-- {} -->", timestamp.format("%H:%M:%S")).unwrap();
            }

            let mut header = format!("## Thought {thought_id}");
            if *was_output {
                header.push_str(" (output)");
            }
            writeln!(output, "{header}\n").unwrap();

            writeln!(
                output,
                "{}\n",
                truncate(content, options.max_content_length)
            )
            .unwrap();

            if options.include_patterns && patterns.any() {
                writeln!(output, "*Patterns: {}*\n", patterns.names().join(", ")).unwrap();
            }

            if options.include_sensors && !sensor_data.is_empty() {
                writeln!(output, "> [!sensors]- Sensors").unwrap();
                for (name, value) in sensor_data {
                    match value {
                        Some(v) => writeln!(output, "> - {name}: {v}").unwrap(),
                        None => writeln!(output, "> - {name}: n/a").unwrap(),
                    }
                }
                writeln!(output).unwrap();
            }
        }

        LogEntry::Emergence {
            timestamp,
            emergence_type,
            confidence,
            thought_context,
            ..
        } => {
            if options.include_timestamps {
                writeln!(output, "<!-- emergence: {} -->", timestamp.format("%H:%M:%S")).unwrap();
            }
            writeln!(
                output,
                "> [!emergence] `{emergence_type}` ({confidence:.2}) in thought {thought_context}\n"
            )
            .unwrap();
        }

        LogEntry::SessionEnd {
            timestamp,
            final_summary,
        } => {
            if options.include_timestamps {
                writeln!(output, "<!-- end: {} -->", timestamp.format("%H:%M:%S")).unwrap();
            }
            writeln!(output, "---\n**Session Summary**\n").unwrap();
            writeln!(
                output,
                "- {} thoughts, {} spontaneous outputs",
                final_summary.total_thoughts, final_summary.spontaneous_outputs
            )
            .unwrap();
            writeln!(
                output,
                "- {} emergence events",
                final_summary.emergence_events
            )
            .unwrap();
            writeln!(
                output,
                "- {:.2} minutes\n",
                final_summary.session_duration_minutes
            )
            .unwrap();
        }
    }
}

fn truncate(s: &str, max_len: usize) -> &str {
    if max_len == 0 || s.len() <= max_len {
        s
    } else {
        // Find char boundary
        let mut end = max_len;
        while !s.is_char_boundary(end) && end > 0 {
            end -= 1;
        }
        &s[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;
    use crate::events::{SessionSummary, StartMetadata};
    use crate::id::SessionId;
    use mindtrace_sensors::SensorSnapshot;

    fn thought(id: u64, text: &str, was_output: bool) -> LogEntry {
        let mut sensors = SensorSnapshot::new();
        sensors.insert("cpu_percent", 12.5);
        sensors.insert_null("battery_percent");
        LogEntry::thought(id, text, was_output, sensors, classify(text))
    }

    #[test]
    fn test_render_session_start() {
        let entries = vec![LogEntry::session_start(
            SessionId::parse("consciousness_session_20260104_153000").unwrap(),
            StartMetadata {
                model: Some("tiny-model".into()),
                ..Default::default()
            },
        )];
        let md = render_to_markdown(&entries, &RenderOptions::default());

        assert!(md.starts_with("---\n"));
        assert!(md.contains("session: consciousness_session_20260104_153000"));
        assert!(md.contains("model: tiny-model"));
    }

    #[test]
    fn test_render_thought_with_patterns() {
        let entries = vec![thought(3, "Am I aware?", true)];
        let md = render_to_markdown(&entries, &RenderOptions::default());

        assert!(md.contains("## Thought 3 (output)"));
        assert!(md.contains("Am I aware?"));
        assert!(md.contains("*Patterns: self_reference, consciousness_indicators, questioning*"));
        assert!(!md.contains("cpu_percent"));
    }

    #[test]
    fn test_render_plain_thought_has_no_pattern_line() {
        let entries = vec![thought(1, "The weather is nice.", false)];
        let md = render_to_markdown(&entries, &RenderOptions::default());

        assert!(md.contains("## Thought 1\n"));
        assert!(!md.contains("Patterns"));
    }

    #[test]
    fn test_render_with_sensors() {
        let entries = vec![thought(1, "hello", false)];
        let md = render_to_markdown(
            &entries,
            &RenderOptions {
                include_sensors: true,
                ..Default::default()
            },
        );

        assert!(md.contains("[!sensors]-"));
        assert!(md.contains("- cpu_percent: 12.5"));
        assert!(md.contains("- battery_percent: n/a"));
    }

    #[test]
    fn test_render_emergence() {
        let entries = vec![LogEntry::emergence("consciousness_questioning", "", 0.9, 4, 1.0)];
        let md = render_to_markdown(&entries, &RenderOptions::default());

        assert!(md.contains("> [!emergence] `consciousness_questioning` (0.90) in thought 4"));
    }

    #[test]
    fn test_render_session_end() {
        let entries = vec![LogEntry::session_end(SessionSummary {
            session_file: "x.jsonl".into(),
            total_thoughts: 5,
            spontaneous_outputs: 2,
            emergence_events: 3,
            emergence_types: vec![],
            session_duration_minutes: 1.5,
        })];
        let md = render_to_markdown(&entries, &RenderOptions::default());

        assert!(md.contains("**Session Summary**"));
        assert!(md.contains("- 5 thoughts, 2 spontaneous outputs"));
        assert!(md.contains("- 3 emergence events"));
        assert!(md.contains("- 1.50 minutes"));
    }

    #[test]
    fn test_render_with_timestamps() {
        let entries = vec![thought(1, "Hello", false)];
        let md = render_to_markdown(
            &entries,
            &RenderOptions {
                include_timestamps: true,
                ..Default::default()
            },
        );

        assert!(md.contains("<!--"));
    }

    #[test]
    fn test_render_analysis_table() {
        let analysis = ConsciousnessAnalysis {
            total_thoughts: 4,
            self_reference_rate: 0.5,
            consciousness_indicator_rate: 0.25,
            questioning_rate: 0.75,
            emergence_events: 2,
            emergence_types: vec!["self_reference".into()],
            consciousness_score: 0.475,
        };
        let md = render_analysis(&analysis);

        assert!(md.contains("| Thoughts | 4 |"));
        assert!(md.contains("| Questioning rate | 0.750 |"));
        assert!(md.contains("Emergence types: self_reference"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 0), "hello"); // no limit
        assert_eq!(truncate("hello", 10), "hello"); // under limit
        assert_eq!(truncate("hello", 3), "hel"); // at limit
        assert_eq!(truncate("héllo", 2), "h"); // mid-char
    }
}
