//! Common types used across the platform

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Decimal-place policy for displayed means and differences.
///
/// The dashboard renders yields and differences with one decimal place;
/// plant populations are rounded to whole plants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundingPolicy {
    pub decimal_places: u32,
}

impl RoundingPolicy {
    /// Whole-number rounding, used for plant populations.
    pub const WHOLE: RoundingPolicy = RoundingPolicy { decimal_places: 0 };

    pub fn new(decimal_places: u32) -> Self {
        Self { decimal_places }
    }

    pub fn round(&self, value: Decimal) -> Decimal {
        value.round_dp(self.decimal_places)
    }
}

impl Default for RoundingPolicy {
    fn default() -> Self {
        Self { decimal_places: 1 }
    }
}

/// Pagination parameters for tabular endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 100,
        }
    }
}

impl Pagination {
    /// Slice `items` down to the requested page.
    ///
    /// Page numbers are 1-based; a page past the end yields an empty slice.
    pub fn apply<'a, T>(&self, items: &'a [T]) -> (&'a [T], PaginationMeta) {
        let per_page = self.per_page.max(1);
        let page = self.page.max(1);
        let total_items = items.len() as u64;
        let total_pages = ((total_items + per_page as u64 - 1) / per_page as u64) as u32;

        let start = ((page - 1) as usize).saturating_mul(per_page as usize);
        let end = start.saturating_add(per_page as usize).min(items.len());
        let slice = if start >= items.len() {
            &items[0..0]
        } else {
            &items[start..end]
        };

        let meta = PaginationMeta {
            page,
            per_page,
            total_items,
            total_pages,
        };
        (slice, meta)
    }
}

/// Paginated response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}
