//! Pagination.
//!
//! Slices a sorted collection into fixed-size pages. Out-of-range page
//! requests clamp instead of failing; the page-reset-on-filter-change policy
//! belongs to the callers (see the view layer).

use serde::Serialize;

/// One page of a sorted collection.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: u32,
}

/// Slice `rows` into the requested page.
///
/// `total_pages = ceil(total / page_size)`, 0 for an empty input. `page`
/// clamps into `[1, max(1, total_pages)]`; a zero `page_size` is normalized
/// to 1. Never panics.
pub fn paginate<T: Clone>(rows: &[T], page: u32, page_size: u32) -> Page<T> {
    let page_size = page_size.max(1);
    let total = rows.len() as u32;
    let total_pages = total.div_ceil(page_size);

    let page = page.clamp(1, total_pages.max(1));
    let start = ((page - 1) * page_size) as usize;
    let end = (start + page_size as usize).min(rows.len());
    let items = if start >= rows.len() {
        Vec::new()
    } else {
        rows[start..end].to_vec()
    };

    Page { items, total_pages }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: u32) -> Vec<u32> {
        (0..n).collect()
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        assert_eq!(paginate(&rows(25), 1, 10).total_pages, 3);
        assert_eq!(paginate(&rows(30), 1, 10).total_pages, 3);
        assert_eq!(paginate(&rows(31), 1, 10).total_pages, 4);
        assert_eq!(paginate(&rows(1), 1, 10).total_pages, 1);
    }

    #[test]
    fn test_empty_input() {
        let page = paginate(&rows(0), 1, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_never_more_than_page_size_items() {
        for total in 0..40u32 {
            let data = rows(total);
            for page in 1..6 {
                assert!(paginate(&data, page, 7).items.len() <= 7);
            }
        }
    }

    #[test]
    fn test_last_page_holds_remainder() {
        let page = paginate(&rows(25), 3, 10);
        assert_eq!(page.items, vec![20, 21, 22, 23, 24]);
    }

    #[test]
    fn test_out_of_range_page_clamps_to_last() {
        let data = rows(25);
        let last = paginate(&data, 3, 10);
        let beyond = paginate(&data, 8, 10); // total_pages + 5
        assert_eq!(beyond.items, last.items);
        assert_eq!(beyond.total_pages, last.total_pages);
    }

    #[test]
    fn test_page_zero_clamps_to_first() {
        let page = paginate(&rows(25), 0, 10);
        assert_eq!(page.items, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_zero_page_size_normalized() {
        let page = paginate(&rows(5), 1, 0);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_pages, 5);
    }
}
