//! Page slicing and the "Showing a-b of n" summary.

use serde::Serialize;

/// Number of pages needed for `count` items; never less than one
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Clamp a 1-based page number into `1..=total_pages`
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// The items on a 1-based `page`.
///
/// Page 0 is read as page 1, and a page past the end yields an empty slice.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let size = page_size.max(1);
    let start = (page.max(1) - 1).saturating_mul(size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(size).min(items.len());
    &items[start..end]
}

/// Position of the current page within a result list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    pub total_results: usize,
    pub total_pages: usize,
}

impl PageInfo {
    pub fn new(page: usize, page_size: usize, total_results: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_pages(total_results, page_size);
        Self {
            page: clamp_page(page, total_pages),
            page_size,
            total_results,
            total_pages,
        }
    }

    /// 1-based index of the first item on the page
    pub fn start(&self) -> usize {
        (self.page - 1) * self.page_size + 1
    }

    /// 1-based index of the last item on the page
    pub fn end(&self) -> usize {
        (self.page * self.page_size).min(self.total_results)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether page navigation should be shown at all
    pub fn is_paginated(&self) -> bool {
        self.total_pages > 1
    }

    /// Status line shown above the results
    pub fn summary(&self, loading: bool) -> String {
        if loading {
            "Searching...".to_string()
        } else if self.total_results == 0 {
            "No results found".to_string()
        } else if self.total_results <= self.page_size {
            format!(
                "Showing {} of {} Results",
                self.total_results, self.total_results
            )
        } else {
            format!(
                "Showing {}-{} of {} Results",
                self.start(),
                self.end(),
                self.total_results
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn test_pages_reconstruct_input() {
        let items: Vec<u32> = (1..=7).collect();
        for size in 1..=8 {
            let pages = total_pages(items.len(), size);
            let rebuilt: Vec<u32> = (1..=pages)
                .flat_map(|page| paginate(&items, page, size).to_vec())
                .collect();
            assert_eq!(rebuilt, items, "page size {size}");
        }
    }

    #[test]
    fn test_out_of_range_pages() {
        let items = [1, 2, 3];
        assert!(paginate(&items, 3, 2).is_empty());
        assert!(paginate(&items, usize::MAX, 2).is_empty());
        assert_eq!(paginate(&items, 0, 2), &[1, 2]);
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(5, 3), 3);
        assert_eq!(clamp_page(2, 0), 1);
    }

    #[test]
    fn test_summary_text() {
        assert_eq!(PageInfo::new(1, 10, 0).summary(false), "No results found");
        assert_eq!(PageInfo::new(1, 10, 6).summary(false), "Showing 6 of 6 Results");
        assert_eq!(PageInfo::new(2, 4, 6).summary(false), "Showing 5-6 of 6 Results");
        assert_eq!(PageInfo::new(9, 4, 6).summary(false), "Showing 5-6 of 6 Results");
        assert_eq!(PageInfo::new(1, 4, 6).summary(true), "Searching...");
    }

    #[test]
    fn test_navigation_flags() {
        let info = PageInfo::new(1, 2, 6);
        assert!(info.is_paginated());
        assert!(!info.has_previous());
        assert!(info.has_next());
        assert!(!PageInfo::new(1, 10, 6).is_paginated());
    }
}
