use std::sync::Arc;

use crate::{StopwordSet, TokenBag};

/// Non-letter characters that survive filtering, so that names such as
/// "c++" or "d3" stay distinguishable tokens.
pub const RESERVED_SYMBOLS: [char; 2] = ['+', '3'];

/// Whether `c` may appear in a token before lowercasing.
pub fn is_token_char(c: char) -> bool {
    c.is_ascii_alphabetic() || RESERVED_SYMBOLS.contains(&c)
}

/// Replaces every character outside the token class with exactly one space.
///
/// Runs of disallowed characters become runs of spaces; whitespace
/// splitting collapses them later.
pub fn substitute_disallowed(text: &str) -> String {
    text.chars()
        .map(|c| if is_token_char(c) { c } else { ' ' })
        .collect()
}

/// Turns normalized text into a token bag.
///
/// A pure function of the input text and the stopword set it was built with.
#[derive(Debug, Clone)]
pub struct TokenFilter {
    stopwords: Arc<StopwordSet>,
}

impl TokenFilter {
    pub fn new(stopwords: Arc<StopwordSet>) -> Self {
        Self { stopwords }
    }

    pub fn stopwords(&self) -> &StopwordSet {
        &self.stopwords
    }

    pub fn filter(&self, text: &str) -> TokenBag {
        let cleaned = substitute_disallowed(text).to_ascii_lowercase();
        cleaned
            .split_whitespace()
            .filter(|candidate| !self.stopwords.contains(candidate))
            .collect()
    }
}
