//! Natural Language Processing components
//!
//! Tokenization, stopword filtering and stemming, combined by
//! [`TextNormalizer`] into the token stream the categorizer matches against.

pub mod stemmer;
pub mod stopwords;
pub mod tokenizer;

pub use stemmer::PorterStemmer;
pub use stopwords::StopwordFilter;
pub use tokenizer::tokenize;

/// Turns raw article text into lowercase, stopword-free stems.
///
/// Built once per process and shared read-only between workers.
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    stopwords: StopwordFilter,
    stemmer: PorterStemmer,
}

impl TextNormalizer {
    pub fn new(stopwords: StopwordFilter, stemmer: PorterStemmer) -> Self {
        Self { stopwords, stemmer }
    }

    /// English stopwords and the Porter stemmer
    pub fn english() -> Self {
        Self::new(StopwordFilter::english(), PorterStemmer::new())
    }

    /// Tokenize, lowercase, drop non-alphabetic tokens and stopwords, stem.
    ///
    /// Order and duplicates are preserved. Input without any alphabetic word
    /// yields an empty vector.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        tokenize(text)
            .into_iter()
            .filter(|token| is_alphabetic(token))
            .map(|token| token.to_lowercase())
            .filter(|token| !self.stopwords.is_stopword(token))
            .map(|token| self.stemmer.stem(&token))
            .collect()
    }

    /// Bring a single keyword into the form [`normalize`](Self::normalize)
    /// produces for it. Phrases and non-alphabetic terms are only lowercased,
    /// so they never equal a token.
    pub fn normalize_term(&self, term: &str) -> String {
        let lower = term.trim().to_lowercase();
        if is_alphabetic(&lower) {
            self.stemmer.stem(&lower)
        } else {
            lower
        }
    }
}

fn is_alphabetic(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphabetic)
}
