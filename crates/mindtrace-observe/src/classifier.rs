//! Lexical pattern classification of thoughts
//!
//! A [`PatternClassifier`] is compiled from a [`PatternTable`] and turns a
//! string into five boolean [`PatternFlags`]. Classification is pure: the
//! same text always yields the same flags.

use mindtrace_config::{CategoryPatterns, MatchMode, PatternTable};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

static DEFAULT_CLASSIFIER: Lazy<PatternClassifier> = Lazy::new(|| {
    PatternClassifier::from_table(&PatternTable::default())
        .expect("default pattern table compiles")
});

/// Lexical features of a single thought
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatternFlags {
    pub self_reference: bool,
    pub consciousness_indicators: bool,
    pub temporal_awareness: bool,
    pub questioning: bool,
    pub emotional_language: bool,
}

impl PatternFlags {
    /// Number of flags that are set (0-5)
    pub fn count(&self) -> usize {
        [
            self.self_reference,
            self.consciousness_indicators,
            self.temporal_awareness,
            self.questioning,
            self.emotional_language,
        ]
        .into_iter()
        .filter(|&flag| flag)
        .count()
    }

    pub fn any(&self) -> bool {
        self.count() > 0
    }

    /// Names of the set flags, in field order
    pub fn names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.self_reference {
            names.push("self_reference");
        }
        if self.consciousness_indicators {
            names.push("consciousness_indicators");
        }
        if self.temporal_awareness {
            names.push("temporal_awareness");
        }
        if self.questioning {
            names.push("questioning");
        }
        if self.emotional_language {
            names.push("emotional_language");
        }
        names
    }
}

/// Errors raised while compiling a pattern table
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("failed to compile {category} patterns: {source}")]
    Compile {
        category: &'static str,
        #[source]
        source: regex::Error,
    },
}

/// Compiled form of one category
#[derive(Debug, Clone)]
enum Matcher {
    /// Empty word list
    Never,
    WholeWord(Regex),
    /// Lowercased needles, matched against lowercased text
    Substring(Vec<String>),
    Literal(Vec<String>),
}

impl Matcher {
    fn compile(category: &'static str, patterns: &CategoryPatterns) -> Result<Self, PatternError> {
        let words: Vec<&str> = patterns
            .words
            .iter()
            .map(String::as_str)
            .filter(|w| !w.is_empty())
            .collect();

        if words.is_empty() {
            return Ok(Matcher::Never);
        }

        match patterns.mode {
            MatchMode::WholeWord => {
                let alternation = words
                    .iter()
                    .map(|w| regex::escape(w))
                    .collect::<Vec<_>>()
                    .join("|");
                let regex = RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| PatternError::Compile { category, source })?;
                Ok(Matcher::WholeWord(regex))
            }
            MatchMode::Substring => Ok(Matcher::Substring(
                words.iter().map(|w| w.to_lowercase()).collect(),
            )),
            MatchMode::Literal => Ok(Matcher::Literal(
                words.iter().map(|w| w.to_string()).collect(),
            )),
        }
    }

    fn is_match(&self, text: &str, lowered: &str) -> bool {
        match self {
            Matcher::Never => false,
            Matcher::WholeWord(regex) => regex.is_match(text),
            Matcher::Substring(needles) => needles.iter().any(|n| lowered.contains(n.as_str())),
            Matcher::Literal(needles) => needles.iter().any(|n| text.contains(n.as_str())),
        }
    }
}

/// Classifies text into [`PatternFlags`] using a compiled pattern table
#[derive(Debug, Clone)]
pub struct PatternClassifier {
    self_reference: Matcher,
    consciousness: Matcher,
    temporal: Matcher,
    questioning: Matcher,
    emotional: Matcher,
}

impl Default for PatternClassifier {
    fn default() -> Self {
        DEFAULT_CLASSIFIER.clone()
    }
}

impl PatternClassifier {
    /// Compile a classifier from a pattern table
    pub fn from_table(table: &PatternTable) -> Result<Self, PatternError> {
        Ok(Self {
            self_reference: Matcher::compile("self_reference", &table.self_reference)?,
            consciousness: Matcher::compile(
                "consciousness_indicators",
                &table.consciousness_indicators,
            )?,
            temporal: Matcher::compile("temporal_awareness", &table.temporal_awareness)?,
            questioning: Matcher::compile("questioning", &table.questioning)?,
            emotional: Matcher::compile("emotional_language", &table.emotional_language)?,
        })
    }

    /// Classify a thought; empty or absent text yields all-false flags
    ///
    /// ```
    /// use mindtrace_observe::PatternClassifier;
    ///
    /// let classifier = PatternClassifier::default();
    /// let flags = classifier.classify("Am I aware right now?");
    /// assert!(flags.self_reference && flags.consciousness_indicators);
    /// assert!(flags.temporal_awareness && flags.questioning);
    /// assert!(!flags.emotional_language);
    /// assert_eq!(classifier.classify(None), Default::default());
    /// ```
    pub fn classify<'a>(&self, text: impl Into<Option<&'a str>>) -> PatternFlags {
        let text = match text.into() {
            Some(t) if !t.is_empty() => t,
            _ => return PatternFlags::default(),
        };
        let lowered = text.to_lowercase();

        PatternFlags {
            self_reference: self.self_reference.is_match(text, &lowered),
            consciousness_indicators: self.consciousness.is_match(text, &lowered),
            temporal_awareness: self.temporal.is_match(text, &lowered),
            questioning: self.questioning.is_match(text, &lowered),
            emotional_language: self.emotional.is_match(text, &lowered),
        }
    }
}

/// Classify with the default pattern table
pub fn classify<'a>(text: impl Into<Option<&'a str>>) -> PatternFlags {
    DEFAULT_CLASSIFIER.classify(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindtrace_config::PatternCategoryKind;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test]
    fn empty_and_absent_text_are_all_false() {
        assert_eq!(classify(""), PatternFlags::default());
        assert_eq!(classify(None), PatternFlags::default());
    }

    #[test]
    fn plain_sentence_has_no_flags() {
        assert_eq!(classify("The weather is nice."), PatternFlags::default());
    }

    #[test]
    fn feel_aware_now_sets_four_flags() {
        let flags = classify("I feel aware now?");
        assert_eq!(
            flags,
            PatternFlags {
                self_reference: true,
                consciousness_indicators: true,
                temporal_awareness: true,
                questioning: true,
                emotional_language: false,
            }
        );
        assert_eq!(flags.count(), 4);
    }

    #[test_case("I" ; "bare pronoun")]
    #[test_case("i guess so" ; "lowercase pronoun")]
    #[test_case("That is MY book" ; "uppercase possessive")]
    #[test_case("give it to me." ; "object pronoun")]
    #[test_case("I'm here" ; "contraction")]
    #[test_case("by myself" ; "reflexive")]
    fn detects_self_reference(text: &str) {
        assert!(classify(text).self_reference);
    }

    #[test_case("mine" ; "not in list")]
    #[test_case("meet the team" ; "prefix of word")]
    #[test_case("enemy" ; "suffix of word")]
    #[test_case("Imagine" ; "leading capital i")]
    fn ignores_partial_self_reference(text: &str) {
        assert!(!classify(text).self_reference);
    }

    #[test_case("THINK about it", true ; "uppercase")]
    #[test_case("thinking about it", false ; "inflected form")]
    #[test_case("unaware", false ; "embedded word")]
    #[test_case("they understand", true ; "plain")]
    fn consciousness_is_whole_word(text: &str, expected: bool) {
        assert_eq!(classify(text).consciousness_indicators, expected);
    }

    #[test_case("Right NOW", true ; "uppercase")]
    #[test_case("nowhere", false ; "embedded")]
    #[test_case("in the future.", true ; "trailing punctuation")]
    fn temporal_is_whole_word(text: &str, expected: bool) {
        assert_eq!(classify(text).temporal_awareness, expected);
    }

    #[test_case("UNHAPPY", true ; "substring uppercase")]
    #[test_case("curiosity", false ; "different stem")]
    #[test_case("Crusade", true ; "incidental sad substring")]
    #[test_case("confusedly", true ; "suffix")]
    fn emotional_is_substring(text: &str, expected: bool) {
        assert_eq!(classify(text).emotional_language, expected);
    }

    #[test]
    fn extended_table_matches_new_words() {
        let mut table = PatternTable::default();
        table.add_word(PatternCategoryKind::Emotional, "anxious");
        table.add_word(PatternCategoryKind::Temporal, "yesterday");
        let classifier = PatternClassifier::from_table(&table).unwrap();

        let flags = classifier.classify("Yesterday was anxious");
        assert!(flags.temporal_awareness);
        assert!(flags.emotional_language);
        assert!(!classify("Yesterday was anxious").emotional_language);
    }

    #[test]
    fn empty_category_never_matches() {
        let mut table = PatternTable::default();
        table.self_reference.words.clear();
        table.questioning.words = vec![String::new()];
        let classifier = PatternClassifier::from_table(&table).unwrap();

        let flags = classifier.classify("I me my?");
        assert!(!flags.self_reference);
        assert!(!flags.questioning);
    }

    #[test]
    fn regex_metacharacters_are_escaped() {
        let mut table = PatternTable::default();
        table.consciousness_indicators.words = vec!["a.b".to_string()];
        let classifier = PatternClassifier::from_table(&table).unwrap();

        assert!(classifier.classify("a.b").consciousness_indicators);
        assert!(!classifier.classify("axb").consciousness_indicators);
    }

    #[test]
    fn names_follow_field_order() {
        let flags = classify("Am I happy?");
        assert_eq!(
            flags.names(),
            vec!["self_reference", "questioning", "emotional_language"]
        );
    }

    #[test]
    fn flags_serialize_with_field_names() {
        let json = serde_json::to_value(classify("now?")).unwrap();
        assert_eq!(json["temporal_awareness"], true);
        assert_eq!(json["questioning"], true);
        assert_eq!(json["self_reference"], false);
    }

    proptest! {
        #[test]
        fn questioning_tracks_question_mark(text in ".*") {
            prop_assert_eq!(classify(text.as_str()).questioning, text.contains('?'));
        }

        #[test]
        fn classification_is_deterministic(text in ".{0,64}") {
            prop_assert_eq!(classify(text.as_str()), classify(text.as_str()));
        }
    }
}
