use serde::{Deserialize, Serialize};

/// One window of a larger server-side collection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PagedResponse<T> {
    pub items: Vec<T>,
    pub offset: u64,
    pub limit: u64,
    pub total_count: u64,
}

impl<T> PagedResponse<T> {
    pub fn page_count(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.total_count.div_ceil(self.limit)
    }

    /// Zero-based index of the page this window starts on.
    pub fn page_index(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.offset / self.limit
    }
}
