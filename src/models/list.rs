//! Pagination and search parameters shared by list endpoints.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PAGE_SIZE: i64 = 15;

/// Query string accepted by list endpoints.
///
/// `GET /api/v1/balances?page=2&size=10&query=Trav`
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    /// 1-based page number
    #[serde(default = "default_page")]
    pub page: i64,

    /// Page length
    #[serde(default = "default_size")]
    pub size: i64,

    /// Case-sensitive substring matched against the name
    #[serde(default)]
    pub query: Option<String>,
}

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
            query: None,
        }
    }
}

/// Row window derived from a `ListQuery`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub take: i64,
    pub skip: i64,
}

impl ListQuery {
    /// Translate page/size into a `take`/`skip` window.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` when `page` or `size` is below 1, or the offset
    /// does not fit in an i64.
    pub fn page(&self) -> Result<Page, AppError> {
        if self.page < 1 {
            return Err(AppError::InvalidRequest(
                "page must be at least 1".to_string(),
            ));
        }
        if self.size < 1 {
            return Err(AppError::InvalidRequest(
                "size must be at least 1".to_string(),
            ));
        }

        let skip = self
            .size
            .checked_mul(self.page - 1)
            .ok_or_else(|| AppError::InvalidRequest("page is out of range".to_string()))?;

        Ok(Page {
            take: self.size,
            skip,
        })
    }

    /// Search term, treating an empty string as no filter.
    pub fn search(&self) -> Option<&str> {
        self.query.as_deref().filter(|q| !q.is_empty())
    }
}

/// One page of results plus the number of rows matching the filter.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
}
