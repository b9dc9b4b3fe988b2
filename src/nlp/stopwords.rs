//! Stopword filtering
//!
//! The English list is NLTK's corpus list from the `stop-words` crate,
//! including the apostrophe-less contraction fragments (`don`, `ll`, `ve`)
//! the tokenizer can leave behind.

use rustc_hash::FxHashSet;
use stop_words::{get, Language};

/// A read-only set of lowercase stopwords
#[derive(Debug, Clone)]
pub struct StopwordFilter {
    stopwords: FxHashSet<String>,
}

impl Default for StopwordFilter {
    fn default() -> Self {
        Self::english()
    }
}

impl StopwordFilter {
    /// The NLTK English stopword list
    pub fn english() -> Self {
        Self::from_list(get(Language::English))
    }

    /// Create a stopword filter from a custom list
    pub fn from_list(words: &[&str]) -> Self {
        let stopwords = words.iter().map(|w| w.to_lowercase()).collect();
        Self { stopwords }
    }

    /// Check if a word is a stopword. `word` must already be lowercase.
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }
}
