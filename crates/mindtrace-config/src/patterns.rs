//! Lexical pattern tables for thought classification
//!
//! Each of the five pattern categories is described by a list of words and
//! a [`MatchMode`]. The tables are plain data so they can be loaded from a
//! config file and extended; compilation into matchers happens in the
//! classifier.
//!
//! # Example
//!
//! ```rust
//! use mindtrace_config::{MatchMode, PatternCategoryKind, PatternTable};
//!
//! let mut table = PatternTable::default();
//! table.add_word(PatternCategoryKind::Emotional, "anxious");
//! assert!(table.emotional_language.words.contains(&"anxious".to_string()));
//! assert_eq!(table.questioning.mode, MatchMode::Literal);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the words of a category are matched against a thought
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Case-insensitive match bounded by word boundaries on both sides
    WholeWord,
    /// Case-insensitive containment anywhere in the text
    Substring,
    /// Case-sensitive containment of the literal characters
    Literal,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::WholeWord => write!(f, "whole_word"),
            MatchMode::Substring => write!(f, "substring"),
            MatchMode::Literal => write!(f, "literal"),
        }
    }
}

/// Words for one pattern category plus the way they are matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPatterns {
    /// Match mode applied to every word in the list
    pub mode: MatchMode,
    /// Words or literals; an empty list never matches
    #[serde(default)]
    pub words: Vec<String>,
}

impl CategoryPatterns {
    /// Build a category from a mode and a static word list
    pub fn new(mode: MatchMode, words: &[&str]) -> Self {
        Self {
            mode,
            words: words.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Add a word if it is not already present (empty words are ignored)
    pub fn add_word(&mut self, word: impl Into<String>) -> bool {
        let word = word.into();
        if word.is_empty() || self.words.contains(&word) {
            return false;
        }
        self.words.push(word);
        true
    }
}

/// Identifies one of the five fixed pattern categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternCategoryKind {
    /// First-person references
    SelfReference,
    /// Vocabulary of awareness and cognition
    Consciousness,
    /// Words about time and memory
    Temporal,
    /// Question marks
    Questioning,
    /// Emotional vocabulary
    Emotional,
}

/// The full pattern table, one entry per category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternTable {
    /// First-person references ("I", "me", "my", ...)
    pub self_reference: CategoryPatterns,
    /// Awareness vocabulary ("aware", "think", "feel", ...)
    pub consciousness_indicators: CategoryPatterns,
    /// Temporal vocabulary ("now", "before", "remember", ...)
    pub temporal_awareness: CategoryPatterns,
    /// Question marks
    pub questioning: CategoryPatterns,
    /// Emotional vocabulary ("happy", "curious", ...)
    pub emotional_language: CategoryPatterns,
}

impl Default for PatternTable {
    fn default() -> Self {
        Self {
            self_reference: CategoryPatterns::new(
                MatchMode::WholeWord,
                &["I", "me", "my", "myself", "I'm", "I've", "I'll", "I'd"],
            ),
            consciousness_indicators: CategoryPatterns::new(
                MatchMode::WholeWord,
                &[
                    "aware",
                    "conscious",
                    "think",
                    "feel",
                    "experience",
                    "perceive",
                    "realize",
                    "understand",
                ],
            ),
            temporal_awareness: CategoryPatterns::new(
                MatchMode::WholeWord,
                &[
                    "now",
                    "currently",
                    "present",
                    "moment",
                    "before",
                    "after",
                    "remember",
                    "future",
                ],
            ),
            questioning: CategoryPatterns::new(MatchMode::Literal, &["?"]),
            emotional_language: CategoryPatterns::new(
                MatchMode::Substring,
                &["happy", "sad", "excited", "worried", "curious", "confused"],
            ),
        }
    }
}

impl PatternTable {
    /// Get the patterns for a category
    pub fn category(&self, kind: PatternCategoryKind) -> &CategoryPatterns {
        match kind {
            PatternCategoryKind::SelfReference => &self.self_reference,
            PatternCategoryKind::Consciousness => &self.consciousness_indicators,
            PatternCategoryKind::Temporal => &self.temporal_awareness,
            PatternCategoryKind::Questioning => &self.questioning,
            PatternCategoryKind::Emotional => &self.emotional_language,
        }
    }

    /// Get mutable patterns for a category
    pub fn category_mut(&mut self, kind: PatternCategoryKind) -> &mut CategoryPatterns {
        match kind {
            PatternCategoryKind::SelfReference => &mut self.self_reference,
            PatternCategoryKind::Consciousness => &mut self.consciousness_indicators,
            PatternCategoryKind::Temporal => &mut self.temporal_awareness,
            PatternCategoryKind::Questioning => &mut self.questioning,
            PatternCategoryKind::Emotional => &mut self.emotional_language,
        }
    }

    /// Add a word to a category, returning whether it was new
    pub fn add_word(&mut self, kind: PatternCategoryKind, word: impl Into<String>) -> bool {
        self.category_mut(kind).add_word(word)
    }

    /// Merge another table into this one (words are unioned, modes kept)
    pub fn merge(&self, other: &PatternTable) -> PatternTable {
        let mut merged = self.clone();
        for kind in [
            PatternCategoryKind::SelfReference,
            PatternCategoryKind::Consciousness,
            PatternCategoryKind::Temporal,
            PatternCategoryKind::Questioning,
            PatternCategoryKind::Emotional,
        ] {
            for word in &other.category(kind).words {
                merged.add_word(kind, word.clone());
            }
        }
        merged
    }
}
