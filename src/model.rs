use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum JobKind {
    CategorizeArticle,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::CategorizeArticle => "categorize_article",
        }
    }

    pub fn parse_kind(s: &str) -> Option<Self> {
        match s {
            "categorize_article" => Some(JobKind::CategorizeArticle),
            _ => None,
        }
    }
}

/// A stored article as read back from `news_articles`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub content: String,
    pub pub_date: DateTime<Utc>,
    pub source_url: String,
    pub category: String,
}

/// An incoming article; the category is always assigned later.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewArticle {
    pub id: String,
    pub title: String,
    pub content: String,
    pub pub_date: DateTime<Utc>,
    pub source_url: String,
}
