use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Publish,
    Draft,
    Trash,
}

impl ArticleStatus {
    pub const ALL: [ArticleStatus; 3] = [Self::Publish, Self::Draft, Self::Trash];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Publish => "publish",
            ArticleStatus::Draft => "draft",
            ArticleStatus::Trash => "trash",
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "status must be one of publish, draft, trash (got {:?})",
            self.0
        )
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for ArticleStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownStatus(value.to_owned()))
    }
}

/// An article as stored server-side. Only ever produced by
/// [`validate_article`](crate::validate_article), so every instance has
/// passed the full response schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    pub status: ArticleStatus,
    pub created_date: Option<String>,
    pub updated_date: Option<String>,
}

impl Article {
    pub fn is_draft(&self) -> bool {
        self.status == ArticleStatus::Draft
    }

    pub fn created_at(&self) -> Option<NaiveDateTime> {
        self.created_date.as_deref().and_then(parse_timestamp)
    }

    pub fn updated_at(&self) -> Option<NaiveDateTime> {
        self.updated_date.as_deref().and_then(parse_timestamp)
    }
}

// The backend emits naive ISO-8601 timestamps, with or without fractional seconds.
fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").ok()
}
