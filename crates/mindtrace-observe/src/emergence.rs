//! Emergence detection from pattern flags
//!
//! Rules are evaluated in a fixed order and each one that holds emits a
//! candidate; consumers rely on that order when reading the log.
//!
//! 1. `self_reference` -> `self_reference` (0.8)
//! 2. `consciousness_indicators` and `questioning` -> `consciousness_questioning` (0.9)
//! 3. `self_reference` and `temporal_awareness` -> `temporal_self_awareness` (0.7)
//! 4. three or more flags -> `complex_self_reflection` (0.2 per flag, capped at 1.0)
//!
//! The default detector only evaluates the rules when `self_reference` or
//! `consciousness_indicators` is set, so e.g. a question that is temporal
//! and emotional never reaches rule 4.

use crate::classifier::PatternFlags;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SELF_REFERENCE_CONFIDENCE: f64 = 0.8;
pub const CONSCIOUSNESS_QUESTIONING_CONFIDENCE: f64 = 0.9;
pub const TEMPORAL_SELF_AWARENESS_CONFIDENCE: f64 = 0.7;

/// Minimum number of set flags for a complex self-reflection event
pub const COMPLEX_REFLECTION_MIN_FLAGS: usize = 3;

/// Confidence contributed by each set flag to a complex self-reflection
pub const CONFIDENCE_PER_FLAG: f64 = 0.2;

/// Kinds of emergence event the detector can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmergenceKind {
    SelfReference,
    ConsciousnessQuestioning,
    TemporalSelfAwareness,
    ComplexSelfReflection,
}

impl EmergenceKind {
    /// Name written to the log's `emergence_type` field
    pub fn as_str(&self) -> &'static str {
        match self {
            EmergenceKind::SelfReference => "self_reference",
            EmergenceKind::ConsciousnessQuestioning => "consciousness_questioning",
            EmergenceKind::TemporalSelfAwareness => "temporal_self_awareness",
            EmergenceKind::ComplexSelfReflection => "complex_self_reflection",
        }
    }
}

impl fmt::Display for EmergenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EmergenceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "self_reference" => Ok(EmergenceKind::SelfReference),
            "consciousness_questioning" => Ok(EmergenceKind::ConsciousnessQuestioning),
            "temporal_self_awareness" => Ok(EmergenceKind::TemporalSelfAwareness),
            "complex_self_reflection" => Ok(EmergenceKind::ComplexSelfReflection),
            other => Err(format!("unknown emergence type: {other}")),
        }
    }
}

/// One detected emergence event, before it is logged
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmergenceCandidate {
    pub kind: EmergenceKind,
    pub confidence: f64,
}

impl EmergenceCandidate {
    pub fn new(kind: EmergenceKind, confidence: f64) -> Self {
        Self { kind, confidence }
    }
}

/// Applies the emergence rules to pattern flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmergenceDetector {
    gated: bool,
}

impl Default for EmergenceDetector {
    /// Gated detector: rules run only for self-referential or
    /// consciousness-related thoughts
    fn default() -> Self {
        Self { gated: true }
    }
}

impl EmergenceDetector {
    /// Detector that evaluates every rule for every thought
    pub fn ungated() -> Self {
        Self { gated: false }
    }

    /// Whether the rules run for these flags
    pub fn should_inspect(&self, flags: &PatternFlags) -> bool {
        !self.gated || flags.self_reference || flags.consciousness_indicators
    }

    /// Emit candidates in rule order
    pub fn detect(&self, flags: &PatternFlags) -> Vec<EmergenceCandidate> {
        let mut candidates = Vec::new();
        if !self.should_inspect(flags) {
            return candidates;
        }

        if flags.self_reference {
            candidates.push(EmergenceCandidate::new(
                EmergenceKind::SelfReference,
                SELF_REFERENCE_CONFIDENCE,
            ));
        }

        if flags.consciousness_indicators && flags.questioning {
            candidates.push(EmergenceCandidate::new(
                EmergenceKind::ConsciousnessQuestioning,
                CONSCIOUSNESS_QUESTIONING_CONFIDENCE,
            ));
        }

        if flags.self_reference && flags.temporal_awareness {
            candidates.push(EmergenceCandidate::new(
                EmergenceKind::TemporalSelfAwareness,
                TEMPORAL_SELF_AWARENESS_CONFIDENCE,
            ));
        }

        let count = flags.count();
        if count >= COMPLEX_REFLECTION_MIN_FLAGS {
            candidates.push(EmergenceCandidate::new(
                EmergenceKind::ComplexSelfReflection,
                (count as f64 * CONFIDENCE_PER_FLAG).min(1.0),
            ));
        }

        candidates
    }
}
