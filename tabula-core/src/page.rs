use crate::RowLabeled;

/// Page to fetch, filled with the total count and the rows once executed.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest<T = RowLabeled> {
    /// 1-based page number.
    pub page: u64,
    pub size: u64,
    /// Explicit offset, wins over `page` when present.
    pub offset: Option<u64>,
    pub total: Option<u64>,
    pub rows: Vec<T>,
}

impl<T> PageRequest<T> {
    pub fn new(page: u64, size: u64) -> Self {
        Self {
            page,
            size,
            offset: None,
            total: None,
            rows: Vec::new(),
        }
    }

    pub fn with_offset(offset: u64, size: u64) -> Self {
        Self {
            offset: Some(offset),
            ..Self::new(1, size)
        }
    }

    pub fn window(&self) -> PageWindow {
        PageWindow {
            offset: self
                .offset
                .unwrap_or_else(|| self.page.saturating_sub(1).saturating_mul(self.size)),
            size: self.size,
        }
    }

    pub fn fill(&mut self, total: u64, rows: Vec<T>) {
        self.total = Some(total);
        self.rows = rows;
    }

    /// Number of pages, known once the total was filled.
    pub fn pages(&self) -> Option<u64> {
        match (self.total, self.size) {
            (Some(_), 0) => Some(0),
            (Some(total), size) => Some(total.div_ceil(size)),
            _ => None,
        }
    }
}

/// Rows `offset + 1 ..= offset + size` of the result.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub size: u64,
}

impl PageWindow {
    pub fn new(offset: u64, size: u64) -> Self {
        Self { offset, size }
    }

    /// Last row of the window.
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.size)
    }
}

/// Paging decision of a compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Unpaged,
    Ordered(PageWindow),
    Unordered(PageWindow),
}

impl PageState {
    pub fn new(window: Option<PageWindow>, ordered: bool) -> Self {
        match (window, ordered) {
            (None, _) => PageState::Unpaged,
            (Some(window), true) => PageState::Ordered(window),
            (Some(window), false) => PageState::Unordered(window),
        }
    }

    pub fn window(&self) -> Option<PageWindow> {
        match self {
            PageState::Unpaged => None,
            PageState::Ordered(window) | PageState::Unordered(window) => Some(*window),
        }
    }
}
