//! Word-level tokenization
//!
//! Follows Penn Treebank conventions closely enough for keyword work:
//! hyphenated and dotted compounds stay whole, every punctuation mark becomes
//! its own token, and English contractions split into a head and a clitic
//! (`don't` → `do`, `n't`).

use once_cell::sync::Lazy;
use regex::Regex;

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+(?:[-'’.]\w+)*|[^\w\s]").expect("valid token pattern"));

/// Clitics split off after an apostrophe (`it's`, `we're`, `they'll`, ...).
const CLITICS: [&str; 6] = ["s", "m", "d", "re", "ve", "ll"];

/// Split `text` into word and punctuation tokens, preserving order and case.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for m in TOKEN_RE.find_iter(text) {
        split_contraction(m.as_str(), &mut tokens);
    }
    tokens
}

fn split_contraction(word: &str, out: &mut Vec<String>) {
    let Some(pos) = word.rfind(|c: char| c == '\'' || c == '’') else {
        out.push(word.to_string());
        return;
    };
    let apostrophe_len = word[pos..].chars().next().map_or(1, char::len_utf8);
    let head = &word[..pos];
    let tail = &word[pos + apostrophe_len..];

    // n't binds to the negation, not the verb: "doesn't" -> "does" + "n't"
    if tail.eq_ignore_ascii_case("t")
        && head.len() > 1
        && head.ends_with(|c: char| c == 'n' || c == 'N')
    {
        let split = head.len() - 1;
        out.push(word[..split].to_string());
        out.push(word[split..].to_string());
        return;
    }

    if !head.is_empty() && CLITICS.contains(&tail.to_ascii_lowercase().as_str()) {
        out.push(head.to_string());
        out.push(word[pos..].to_string());
        return;
    }

    out.push(word.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_punctuation_is_separate() {
        assert_eq!(
            tokenize("Hello, world! How are you?"),
            vec!["Hello", ",", "world", "!", "How", "are", "you", "?"]
        );
    }

    #[test]
    fn test_hyphenated_words_stay_whole() {
        assert_eq!(
            tokenize("terrorism-related protest"),
            vec!["terrorism-related", "protest"]
        );
    }

    #[test]
    fn test_contractions() {
        assert_eq!(tokenize("don't"), vec!["do", "n't"]);
        assert_eq!(tokenize("It's fine"), vec!["It", "'s", "fine"]);
        assert_eq!(tokenize("they’ll"), vec!["they", "’ll"]);
        assert_eq!(tokenize("o'clock"), vec!["o'clock"]);
    }

    #[test]
    fn test_numbers_and_abbreviations() {
        assert_eq!(tokenize("3.5% in the U.S."), vec!["3.5", "%", "in", "the", "U.S", "."]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t ").is_empty());
    }
}
