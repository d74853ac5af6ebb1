//! Page envelope of the list endpoints and the query that requests a page.

use serde::{Deserialize, Serialize};

use crate::model::marche::MarcheFilters;

/// Page size used by the marchés list.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// One page of a collection, in the shape `GET /marches` answers with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default = "first_page")]
    pub page: usize,
    #[serde(default)]
    pub limit: usize,
    #[serde(rename = "totalPages", default = "first_page")]
    pub total_pages: usize,
    #[serde(rename = "totalItems", default)]
    pub total_items: usize,
}

fn first_page() -> usize {
    1
}

impl<T> Page<T> {
    /// Everything on a single page.
    pub fn single(data: Vec<T>) -> Self {
        let total = data.len();
        Self {
            data,
            page: 1,
            limit: total,
            total_pages: 1,
            total_items: total,
        }
    }

    pub fn empty(limit: usize) -> Self {
        Self {
            data: Vec::new(),
            page: 1,
            limit,
            total_pages: 1,
            total_items: 0,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Number of pages needed for `total` items; an empty collection still has
/// one (empty) page.
pub fn total_pages(total: usize, limit: usize) -> usize {
    if limit == 0 {
        return 1;
    }
    total.div_ceil(limit).max(1)
}

/// In-memory pagination with the API's contract. `page` is 1-based and
/// clamped to `1..`; a page past the end is empty.
pub fn paginate<T: Clone>(items: &[T], page: usize, limit: usize) -> Page<T> {
    let page = page.max(1);
    let limit = limit.max(1);
    let start = (page - 1).saturating_mul(limit);
    let data = items.iter().skip(start).take(limit).cloned().collect();
    Page {
        data,
        page,
        limit,
        total_pages: total_pages(items.len(), limit),
        total_items: items.len(),
    }
}

/// A page request on `GET /marches`.
#[derive(Debug, Clone, PartialEq)]
pub struct MarcheQuery {
    pub page: usize,
    pub limit: usize,
    pub filters: MarcheFilters,
}

impl MarcheQuery {
    pub fn new(page: usize, limit: usize, filters: MarcheFilters) -> Self {
        Self {
            page: page.max(1),
            limit,
            filters,
        }
    }

    /// Query-string pairs: paging first, then the non-blank filters.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("limit", self.limit.to_string())];
        pairs.extend(self.filters.query_pairs());
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(total_pages(0, 25), 1);
        assert_eq!(total_pages(25, 25), 1);
        assert_eq!(total_pages(26, 25), 2);
    }

    #[test]
    fn out_of_range_page_is_empty() {
        let items: Vec<u32> = (0..10).collect();
        let page = paginate(&items, 4, 5);
        assert!(page.data.is_empty());
        assert_eq!(page.total_pages, 2);
        assert!(!page.has_next());
    }

    #[test]
    fn query_starts_with_paging() {
        let filters = MarcheFilters {
            annee: "2024".into(),
            ..Default::default()
        };
        let query = MarcheQuery::new(0, 25, filters);
        assert_eq!(
            query.query_pairs(),
            vec![
                ("page", "1".to_string()),
                ("limit", "25".to_string()),
                ("annee", "2024".to_string())
            ]
        );
    }

    #[test]
    fn envelope_uses_camel_case_totals() {
        let page: Page<u8> =
            serde_json::from_str(r#"{"data":[1,2],"page":2,"limit":2,"totalPages":3,"totalItems":6}"#)
                .unwrap();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 6);
        assert!(page.has_previous() && page.has_next());
    }
}
