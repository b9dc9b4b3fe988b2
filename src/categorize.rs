//! Keyword-rule categorization of article text.
//!
//! Rules are evaluated in order against the normalized token stream and the
//! first rule with a trigger present wins. Matching is exact token
//! membership: a multi-word trigger such as `natural disaster` can never equal
//! a single token, so only its single-word siblings ever fire.
use crate::nlp::TextNormalizer;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_CATEGORY: &str = "Others";

/// A category label and the keywords that select it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryRule {
    pub label: String,
    pub triggers: Vec<String>,
}

impl CategoryRule {
    pub fn new(label: &str, triggers: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            triggers: triggers.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// The built-in rule set, in evaluation order.
pub fn default_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new(
            "Terrorism/Protest/Political Unrest/Riot",
            &["terrorism", "protest", "political unrest", "riot"],
        ),
        CategoryRule::new("Positive/Uplifting", &["positive", "uplifting", "inspiring"]),
        CategoryRule::new(
            "Natural Disasters",
            &["natural disaster", "earthquake", "flood", "hurricane"],
        ),
    ]
}

#[derive(Debug, Clone)]
struct CompiledRule {
    label: String,
    triggers: Vec<String>,
}

/// Immutable after construction; share it between workers with an `Arc`.
#[derive(Debug, Clone)]
pub struct Categorizer {
    normalizer: Arc<TextNormalizer>,
    rules: Vec<CompiledRule>,
    default_label: String,
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::new(
            Arc::new(TextNormalizer::english()),
            default_rules(),
            DEFAULT_CATEGORY,
        )
    }
}

impl Categorizer {
    /// Triggers are normalized with the same normalizer as article text.
    pub fn new(
        normalizer: Arc<TextNormalizer>,
        rules: Vec<CategoryRule>,
        default_label: impl Into<String>,
    ) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| CompiledRule {
                triggers: rule
                    .triggers
                    .iter()
                    .map(|t| normalizer.normalize_term(t))
                    .collect(),
                label: rule.label,
            })
            .collect();
        Self {
            normalizer,
            rules,
            default_label: default_label.into(),
        }
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    pub fn default_label(&self) -> &str {
        &self.default_label
    }

    /// Label for `content`, or the default label when no rule matches.
    pub fn categorize(&self, content: &str) -> &str {
        self.categorize_tokens(&self.normalizer.normalize(content))
    }

    /// Same as [`categorize`](Self::categorize) for already normalized tokens.
    pub fn categorize_tokens(&self, tokens: &[String]) -> &str {
        let present: FxHashSet<&str> = tokens.iter().map(String::as_str).collect();
        self.rules
            .iter()
            .find(|rule| rule.triggers.iter().any(|t| present.contains(t.as_str())))
            .map(|rule| rule.label.as_str())
            .unwrap_or(self.default_label.as_str())
    }
}
