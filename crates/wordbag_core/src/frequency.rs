use std::collections::HashMap;

use serde::Serialize;

use crate::TokenBag;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenCount {
    pub token: String,
    pub documents: usize,
}

/// Counts, per token, how many documents contain it.
///
/// Each bag is already deduplicated, so a token contributes at most one
/// count per document.
#[derive(Debug, Clone, Default)]
pub struct DocumentFrequency {
    documents: usize,
    counts: HashMap<String, usize>,
}

impl DocumentFrequency {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, bag: &TokenBag) {
        self.documents += 1;
        for token in bag.iter() {
            *self.counts.entry(token.to_string()).or_insert(0) += 1;
        }
    }

    pub fn documents(&self) -> usize {
        self.documents
    }

    pub fn count(&self, token: &str) -> usize {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// The `n` most common tokens, highest count first, ties alphabetical.
    pub fn top(&self, n: usize) -> Vec<TokenCount> {
        let mut ranked: Vec<TokenCount> = self
            .counts
            .iter()
            .map(|(token, &documents)| TokenCount {
                token: token.clone(),
                documents,
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.documents
                .cmp(&a.documents)
                .then_with(|| a.token.cmp(&b.token))
        });
        ranked.truncate(n);
        ranked
    }
}

impl<'a> Extend<&'a TokenBag> for DocumentFrequency {
    fn extend<I: IntoIterator<Item = &'a TokenBag>>(&mut self, iter: I) {
        for bag in iter {
            self.add(bag);
        }
    }
}
