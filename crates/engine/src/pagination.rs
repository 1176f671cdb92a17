//! Fixed-size, 1-indexed paging over an in-memory list.

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    page: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pager {
    /// A zero page size is bumped to 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            page: 1,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages for `len` items. An empty list still has one (empty)
    /// page.
    pub fn page_count(&self, len: usize) -> usize {
        len.div_ceil(self.page_size).max(1)
    }

    pub fn set_page(&mut self, page: usize, len: usize) {
        self.page = page.clamp(1, self.page_count(len));
    }

    pub fn next(&mut self, len: usize) {
        self.set_page(self.page + 1, len);
    }

    pub fn prev(&mut self, len: usize) {
        self.set_page(self.page.saturating_sub(1), len);
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Keeps the current page in range after the list shrank.
    pub fn clamp(&mut self, len: usize) {
        self.set_page(self.page, len);
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.page - 1) * self.page_size;
        if start >= items.len() {
            return &[];
        }
        let end = (start + self.page_size).min(items.len());
        &items[start..end]
    }
}
