//! Immutable stopword sets.
//!
//! A [`StopwordSet`] is built once (from the `stop-words` reference lists or
//! from caller-supplied words) and then shared read-only, typically behind an
//! `Arc`, by every pipeline invocation.

use std::collections::HashSet;

use stop_words::{get, LANGUAGE};

/// Requested language has no bundled stopword list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no stopword list for language {0:?}")]
pub struct UnknownLanguage(pub String);

/// A fixed set of lowercase stopwords.
///
/// Membership is an exact, case-sensitive match; callers lowercase their
/// candidates before asking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    /// The reference English list.
    pub fn english() -> Self {
        Self::from_reference(LANGUAGE::English)
    }

    /// Reference list for a language code or English name (`"en"`, `"german"`).
    pub fn for_language(language: &str) -> Result<Self, UnknownLanguage> {
        let lang = match language.trim().to_lowercase().as_str() {
            "en" | "english" => LANGUAGE::English,
            "de" | "german" => LANGUAGE::German,
            "fr" | "french" => LANGUAGE::French,
            "es" | "spanish" => LANGUAGE::Spanish,
            "it" | "italian" => LANGUAGE::Italian,
            "pt" | "portuguese" => LANGUAGE::Portuguese,
            "nl" | "dutch" => LANGUAGE::Dutch,
            "sv" | "swedish" => LANGUAGE::Swedish,
            "no" | "norwegian" => LANGUAGE::Norwegian,
            "da" | "danish" => LANGUAGE::Danish,
            "fi" | "finnish" => LANGUAGE::Finnish,
            _ => return Err(UnknownLanguage(language.to_string())),
        };
        Ok(Self::from_reference(lang))
    }

    /// An empty set; filters nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a set from arbitrary words, lowercasing and trimming each one.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::empty().with_extra(words)
    }

    /// Parses a plain-text list: one word per line, `#` starts a comment.
    pub fn from_list_text(text: &str) -> Self {
        Self::empty().with_list_text(text)
    }

    /// Returns a new set extended with the words of a plain-text list.
    pub fn with_list_text(self, text: &str) -> Self {
        self.with_extra(parse_list(text))
    }

    /// Returns a new set extended with `words`.
    pub fn with_extra<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words.extend(
            words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty()),
        );
        self
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn from_reference(lang: LANGUAGE) -> Self {
        Self::from_words(get(lang).iter().map(|s| s.to_string()))
    }
}

fn parse_list(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
}
