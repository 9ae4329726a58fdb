//! Limit/offset pagination window for listing notes.

use serde::{Deserialize, Serialize};

use crate::{StorageError, StorageResult};

/// Upper bound on a single page. Larger limits are clamped.
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// A validated limit/offset window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    limit: i64,
    offset: i64,
}

impl Page {
    /// Validate a raw limit/offset pair.
    ///
    /// Negative values are rejected. `limit == 0` yields an empty page;
    /// anything above [`MAX_PAGE_LIMIT`] is clamped.
    pub fn new(limit: i64, offset: i64) -> StorageResult<Self> {
        if limit < 0 {
            return Err(StorageError::InvalidArgument {
                field: "limit".to_string(),
                reason: "must not be negative".to_string(),
            });
        }
        if offset < 0 {
            return Err(StorageError::InvalidArgument {
                field: "offset".to_string(),
                reason: "must not be negative".to_string(),
            });
        }

        Ok(Self {
            limit: limit.min(MAX_PAGE_LIMIT),
            offset,
        })
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

/// The first page at the maximum size.
impl Default for Page {
    fn default() -> Self {
        Self {
            limit: MAX_PAGE_LIMIT,
            offset: 0,
        }
    }
}
