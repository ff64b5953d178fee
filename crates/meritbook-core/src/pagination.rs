//! Pagination utilities for API responses.
//!
//! List endpoints accept either `limit`/`offset` or `limit`/`page` query
//! parameters; when `page` is present it wins. Responses carry a
//! [`PaginationMeta`] next to the data:
//!
//! ```json
//! { "data": [...], "meta": { "total": 42, "limit": 20, "page": 1, "has_more": true } }
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Deserializes an optional query-string value into an optional i64,
/// treating an empty string as absent.
fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Metadata about a paginated response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Total number of items across all pages
    pub total: i64,
    /// The limit that was applied
    pub limit: i64,
    /// Number of items skipped (offset-based pagination only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    /// Current page number (page-based pagination only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    /// Whether there are more items after this page
    pub has_more: bool,
}

impl PaginationMeta {
    /// Build the meta block for a page of `returned` items out of `total`.
    pub fn new(params: &PaginationParams, returned: usize, total: i64) -> Self {
        let offset = params.offset();
        Self {
            total,
            limit: params.limit(),
            offset: Some(offset),
            page: params.page(),
            has_more: offset + (returned as i64) < total,
        }
    }
}

/// Query parameters for pagination.
///
/// `limit` is clamped to [1, 100] and defaults to 20; `page` is 1-indexed
/// and takes precedence over `offset`.
#[derive(Debug, Clone, Hash, Deserialize, ToSchema)]
pub struct PaginationParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub offset: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            limit: Some(20),
            offset: Some(0),
            page: Some(1),
        }
    }
}

impl PaginationParams {
    /// Effective limit, clamped to [1, 100]; defaults to 20.
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }

    /// Effective offset. Derived from `page` when present, else the explicit
    /// offset clamped to a minimum of 0.
    #[must_use]
    pub fn offset(&self) -> i64 {
        if let Some(page) = self.page {
            (page.max(1) - 1) * self.limit()
        } else {
            self.offset.unwrap_or(0).max(0)
        }
    }

    /// Page number if provided, clamped to a minimum of 1.
    #[must_use]
    pub fn page(&self) -> Option<i64> {
        self.page.map(|p| p.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PaginationParams::default();
        assert_eq!(params.limit(), 20);
        assert_eq!(params.offset(), 0);
        assert_eq!(params.page(), Some(1));
    }

    #[test]
    fn test_limit_clamping() {
        let params = PaginationParams {
            limit: Some(500),
            offset: None,
            page: None,
        };
        assert_eq!(params.limit(), 100);

        let params = PaginationParams {
            limit: Some(-3),
            offset: None,
            page: None,
        };
        assert_eq!(params.limit(), 1);
    }

    #[test]
    fn test_page_wins_over_offset() {
        let params = PaginationParams {
            limit: Some(20),
            offset: Some(99),
            page: Some(3),
        };
        assert_eq!(params.offset(), 40);
    }

    #[test]
    fn test_negative_offset_clamped() {
        let params = PaginationParams {
            limit: Some(10),
            offset: Some(-5),
            page: None,
        };
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_meta_has_more() {
        let params = PaginationParams {
            limit: Some(10),
            offset: Some(0),
            page: None,
        };
        let meta = PaginationMeta::new(&params, 10, 25);
        assert!(meta.has_more);
        assert_eq!(meta.total, 25);

        let last = PaginationParams {
            limit: Some(10),
            offset: Some(20),
            page: None,
        };
        let meta = PaginationMeta::new(&last, 5, 25);
        assert!(!meta.has_more);
    }

    #[test]
    fn test_empty_string_params_treated_as_absent() {
        let params: PaginationParams =
            serde_json::from_value(serde_json::json!({"limit": "", "page": ""})).unwrap();
        assert_eq!(params.limit, None);
        assert_eq!(params.limit(), 20);
    }
}
