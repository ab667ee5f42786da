//! Client-side pagination over already fetched lists

use serde::Serialize;

use crate::config::PaginationConfig;

/// Pagination state for a list of `total_items` entries
///
/// Pages are numbered from 1. The current page is always kept inside
/// `[1, total_pages]` and there is always at least one page, even for an
/// empty list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    total_items: usize,
    page_size: usize,
    current_page: usize,
    #[serde(skip)]
    max_page_size: usize,
}

impl Pagination {
    /// Create pagination state, clamping the page size and requested page
    pub fn new(total_items: usize, page_size: usize, requested_page: usize) -> Self {
        Self::bounded(total_items, page_size, requested_page, usize::MAX)
    }

    /// Create pagination state using the configured page size limits
    pub fn from_config(total_items: usize, config: &PaginationConfig) -> Self {
        Self::bounded(
            total_items,
            config.default_page_size,
            1,
            config.max_page_size,
        )
    }

    fn bounded(
        total_items: usize,
        page_size: usize,
        requested_page: usize,
        max_page_size: usize,
    ) -> Self {
        let max_page_size = max_page_size.max(1);
        let mut pagination = Self {
            total_items,
            page_size: page_size.clamp(1, max_page_size),
            current_page: 1,
            max_page_size,
        };
        pagination.go_to_page(requested_page);
        pagination
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Number of pages, never less than 1
    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size).max(1)
    }

    /// Jump to a page, clamped into range
    pub fn go_to_page(&mut self, page: usize) {
        self.current_page = page.clamp(1, self.total_pages());
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.current_page.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.go_to_page(self.current_page.saturating_sub(1));
    }

    /// Change the page size and return to the first page
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.clamp(1, self.max_page_size);
        self.current_page = 1;
    }

    /// Update the item count after the list was refetched or filtered
    pub fn set_total_items(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.go_to_page(self.current_page);
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }

    /// Index of the first item on the current page
    pub fn start_index(&self) -> usize {
        ((self.current_page - 1) * self.page_size).min(self.total_items)
    }

    /// One past the last item on the current page
    pub fn end_index(&self) -> usize {
        self.start_index()
            .saturating_add(self.page_size)
            .min(self.total_items)
    }

    /// Borrow the current page out of `items`
    ///
    /// Tolerates a slice shorter than `total_items`.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.start_index().min(items.len());
        let end = self.end_index().min(items.len());
        &items[start..end]
    }
}

/// One page of items together with its pagination state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cut a page out of an owned list
pub fn paginate<T>(items: Vec<T>, page_size: usize, page: usize) -> Page<T> {
    let pagination = Pagination::new(items.len(), page_size, page);
    page_of(items, pagination)
}

pub(crate) fn page_of<T>(items: Vec<T>, pagination: Pagination) -> Page<T> {
    let items = items
        .into_iter()
        .skip(pagination.start_index())
        .take(pagination.end_index() - pagination.start_index())
        .collect();
    Page { items, pagination }
}
