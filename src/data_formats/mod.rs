mod request;
mod response;
mod wrapper;

pub use request::*;
pub use response::*;
pub use wrapper::*;

use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: u32 = 10;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListArticlesParams {
    #[serde(default = "get_default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub published_only: bool,
}

impl Default for ListArticlesParams {
    fn default() -> Self {
        Self {
            limit: get_default_limit(),
            offset: 0,
            published_only: false,
        }
    }
}

impl ListArticlesParams {
    pub fn new(limit: Option<u32>, offset: Option<u64>, published_only: bool) -> Self {
        Self {
            limit: limit.unwrap_or_else(get_default_limit),
            offset: offset.unwrap_or_default(),
            published_only,
        }
    }

    /// Window for a zero-based page index.
    pub fn for_page(page_index: u32, limit: u32, published_only: bool) -> Self {
        Self {
            limit,
            offset: u64::from(page_index) * u64::from(limit),
            published_only,
        }
    }
}

fn get_default_limit() -> u32 {
    DEFAULT_LIMIT
}
