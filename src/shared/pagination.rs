//! Page slicing over an already filtered and sorted collection.
//!
//! The engine is stateless: the caller keeps the current page and resets it to
//! 1 whenever the page size or the search criteria change.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::DEFAULT_PAGE_SIZE;

/// Pagination metadata for response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    pub page: i64,
    pub page_size: i64,
    pub total_items: i64,
    /// Never below 1, so "page 1 of 1" renders for an empty list
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(page: i64, page_size: i64, total_items: i64) -> Self {
        let page_size = normalize_page_size(page_size);
        let mut total_pages = total_items / page_size;
        if total_items % page_size != 0 {
            total_pages += 1;
        }

        Self {
            page: page.max(1),
            page_size,
            total_items,
            total_pages: total_pages.max(1),
        }
    }
}

/// One page of items plus the metadata describing where it sits
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PaginationMeta,
}

fn normalize_page_size(page_size: i64) -> i64 {
    if page_size < 1 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size
    }
}

/// Cut page `page` (1-indexed) of `page_size` items out of `items`.
///
/// A page below 1 is treated as page 1 and a non-positive page size falls back
/// to the default. A page past the end yields no items.
pub fn paginate<T: Clone>(items: &[T], page: i64, page_size: i64) -> Page<T> {
    let meta = PaginationMeta::new(page, page_size, items.len() as i64);

    let start = (meta.page - 1).saturating_mul(meta.page_size);
    let end = start.saturating_add(meta.page_size).min(meta.total_items);

    let items = if start >= meta.total_items {
        Vec::new()
    } else {
        items[start as usize..end as usize].to_vec()
    };

    Page { items, meta }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn test_twenty_five_items_split_over_two_pages() {
        let items = numbers(25);

        let first = paginate(&items, 1, 20);
        assert_eq!(first.items.len(), 20);
        assert_eq!(first.items[0], 0);
        assert_eq!(first.meta.total_items, 25);
        assert_eq!(first.meta.total_pages, 2);

        let second = paginate(&items, 2, 20);
        assert_eq!(second.items, vec![20, 21, 22, 23, 24]);
        assert_eq!(second.meta.total_pages, 2);
    }

    #[test]
    fn test_empty_collection_reports_one_page() {
        let page = paginate::<usize>(&[], 1, 20);
        assert!(page.items.is_empty());
        assert_eq!(page.meta.total_items, 0);
        assert_eq!(page.meta.total_pages, 1);
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let items = numbers(10);
        let page = paginate(&items, 5, 20);
        assert!(page.items.is_empty());
        assert_eq!(page.meta.page, 5);
        assert_eq!(page.meta.total_pages, 1);
    }

    #[test]
    fn test_page_below_one_is_clamped() {
        let items = numbers(30);
        for requested in [0, -3, i64::MIN] {
            let page = paginate(&items, requested, 20);
            assert_eq!(page.meta.page, 1);
            assert_eq!(page.items.first(), Some(&0));
        }
    }

    #[test]
    fn test_non_positive_page_size_falls_back_to_default() {
        let items = numbers(45);
        let page = paginate(&items, 1, 0);
        assert_eq!(page.meta.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(page.items.len(), DEFAULT_PAGE_SIZE as usize);

        let page = paginate(&items, 2, -50);
        assert_eq!(page.items.len(), DEFAULT_PAGE_SIZE as usize);
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_page() {
        let items = numbers(100);
        let page = paginate(&items, 1, 50);
        assert_eq!(page.meta.total_pages, 2);
        assert!(paginate(&items, 3, 50).items.is_empty());
    }

    #[test]
    fn test_page_never_exceeds_page_size() {
        let items = numbers(237);
        for page_size in [1, 7, 20, 50, 100, 500] {
            for page in 0..30 {
                let result = paginate(&items, page, page_size);
                assert!(result.items.len() as i64 <= page_size);
            }
        }
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let items = numbers(3);
        let page = paginate(&items, i64::MAX, i64::MAX);
        assert!(page.items.is_empty());
        assert_eq!(page.meta.total_pages, 1);
    }
}
