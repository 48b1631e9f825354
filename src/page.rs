// 📄 Pages - bounded slices of a query result plus totals

use crate::error::{CatalogError, Result};
use serde::Serialize;

/// Zero-indexed page request. Only built through `new`, `from_one_based`
/// or `default`, so the size is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    number: usize,
    size: usize,
}

impl PageRequest {
    pub const DEFAULT_SIZE: usize = 10;

    pub fn new(number: usize, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(CatalogError::InvalidPage { number, size });
        }
        Ok(PageRequest { number, size })
    }

    /// Build from the 1-based page number used by list views and the CLI.
    pub fn from_one_based(page_num: usize, size: usize) -> Result<Self> {
        if page_num == 0 {
            return Err(CatalogError::InvalidPage { number: page_num, size });
        }
        Self::new(page_num - 1, size)
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn offset(&self) -> usize {
        self.number.saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            number: 0,
            size: Self::DEFAULT_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: usize,
    pub size: usize,
    pub total_elements: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: usize) -> Self {
        Page {
            content,
            number: request.number,
            size: request.size,
            total_elements,
            total_pages: total_elements.div_ceil(request.size),
        }
    }

    pub fn is_first(&self) -> bool {
        self.number == 0
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    pub fn has_next(&self) -> bool {
        self.number + 1 < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 0
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_is_rejected() {
        let err = PageRequest::new(0, 0).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidPage { size: 0, .. }));
    }

    #[test]
    fn test_one_based_conversion() {
        let request = PageRequest::from_one_based(3, 10).unwrap();
        assert_eq!(request.number(), 2);
        assert_eq!(request.size(), 10);
        assert_eq!(request.offset(), 20);
        assert!(PageRequest::from_one_based(0, 10).is_err());
    }

    #[test]
    fn test_every_constructor_yields_a_usable_size() {
        assert_eq!(PageRequest::default().size(), PageRequest::DEFAULT_SIZE);
        assert!(PageRequest::from_one_based(1, 0).is_err());

        let page: Page<()> = Page::new(vec![], PageRequest::default(), 25);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page = Page::new(vec![1, 2, 3], PageRequest::new(0, 3).unwrap(), 7);
        assert_eq!(page.total_pages, 3);
        assert!(page.is_first());
        assert!(page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn test_last_page_and_empty_result() {
        let last = Page::new(vec![7], PageRequest::new(2, 3).unwrap(), 7);
        assert!(last.is_last());
        assert!(last.has_previous());

        let empty: Page<i32> = Page::new(vec![], PageRequest::default(), 0);
        assert_eq!(empty.total_pages, 0);
        assert!(empty.is_first());
        assert!(empty.is_last());
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = Page::new(vec![1, 2], PageRequest::new(1, 2).unwrap(), 5);
        let mapped = page.map(|n| n * 10);
        assert_eq!(mapped.content, vec![10, 20]);
        assert_eq!(mapped.number, 1);
        assert_eq!(mapped.total_pages, 3);
    }
}
