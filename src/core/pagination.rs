//! Page-range math for the user list pager.
//!
//! The pager shows the first and last page, the current page with
//! `sibling_count` neighbours on each side, and collapses the rest into
//! ellipsis tokens. When only one side collapses, the other side shows a fixed
//! block of `3 + 2 * sibling_count` pages so the control keeps the same width.

use crate::domain::model::PageToken;
use crate::utils::error::{AdminError, Result};
use std::fmt;
use std::ops::Range;

pub const DEFAULT_SIBLING_COUNT: usize = 1;

/// First page, last page, current page and two ellipsis slots.
const FIXED_SLOTS: usize = 5;

/// Number of pages needed for `total_count` items.
pub fn total_pages(total_count: usize, page_size: usize) -> Result<usize> {
    if page_size == 0 {
        return Err(AdminError::InvalidArgument {
            field: "page_size".to_string(),
            reason: "page size must be greater than zero".to_string(),
        });
    }
    Ok(total_count.div_ceil(page_size))
}

/// Tokens a pager should render for the given state.
///
/// `current_page` is not clamped; an out-of-range page still yields a
/// well-formed sequence around the nearest edge.
pub fn compute_range(
    total_count: usize,
    page_size: usize,
    current_page: usize,
    sibling_count: usize,
) -> Result<Vec<PageToken>> {
    let total_pages = total_pages(total_count, page_size)?;
    Ok(tokens_for(total_pages, current_page, sibling_count))
}

fn tokens_for(total_pages: usize, current_page: usize, sibling_count: usize) -> Vec<PageToken> {
    if total_pages == 0 {
        return Vec::new();
    }

    let window = sibling_count.saturating_add(FIXED_SLOTS);
    if window >= total_pages {
        return pages(1, total_pages).collect();
    }

    let left_sibling = current_page.saturating_sub(sibling_count).max(1);
    let right_sibling = current_page
        .saturating_add(sibling_count)
        .min(total_pages);

    let show_left_ellipsis = left_sibling > 2;
    let show_right_ellipsis = right_sibling < total_pages - 2;

    let edge_block = 3 + 2 * sibling_count;
    // A one-sided block covering every page would repeat the far edge.
    let edge_block_covers_all = edge_block >= total_pages;

    match (show_left_ellipsis, show_right_ellipsis) {
        (false, true) if !edge_block_covers_all => pages(1, edge_block)
            .chain([PageToken::Ellipsis, PageToken::PageNumber(total_pages)])
            .collect(),
        (true, false) if !edge_block_covers_all => [PageToken::PageNumber(1), PageToken::Ellipsis]
            .into_iter()
            .chain(pages(total_pages - edge_block + 1, total_pages))
            .collect(),
        (true, true) => [PageToken::PageNumber(1), PageToken::Ellipsis]
            .into_iter()
            .chain(pages(left_sibling, right_sibling))
            .chain([PageToken::Ellipsis, PageToken::PageNumber(total_pages)])
            .collect(),
        _ => pages(1, total_pages).collect(),
    }
}

fn pages(start: usize, end: usize) -> impl Iterator<Item = PageToken> {
    (start..=end).map(PageToken::PageNumber)
}

/// Index range of `page` (one-based) inside a collection of `total_items`.
pub fn page_window(total_items: usize, page_size: usize, page: usize) -> Range<usize> {
    let start = page
        .saturating_sub(1)
        .saturating_mul(page_size)
        .min(total_items);
    let end = start.saturating_add(page_size).min(total_items);
    start..end
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageToken::PageNumber(n) => write!(f, "{}", n),
            PageToken::Ellipsis => f.write_str("\u{2026}"),
        }
    }
}

/// State behind one pager control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerState {
    total_count: usize,
    page_size: usize,
    sibling_count: usize,
    current_page: usize,
}

impl PagerState {
    pub fn new(total_count: usize, page_size: usize, sibling_count: usize) -> Result<Self> {
        total_pages(total_count, page_size)?;
        Ok(Self {
            total_count,
            page_size,
            sibling_count,
            current_page: 1,
        })
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.current_page = page;
        self
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        self.total_count.div_ceil(self.page_size)
    }

    pub fn range(&self) -> Vec<PageToken> {
        tokens_for(self.total_pages(), self.current_page, self.sibling_count)
    }

    /// The pager is hidden with fewer than two tokens to show.
    pub fn is_visible(&self) -> bool {
        self.current_page != 0 && self.range().len() >= 2
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// Moves one page forward. Returns false when already on the last page.
    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.current_page += 1;
        true
    }

    pub fn previous(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.current_page -= 1;
        true
    }

    pub fn go_to(&mut self, page: usize) {
        self.current_page = page;
    }

    /// Items of the current page, out of a collection the caller owns.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[page_window(items.len(), self.page_size, self.current_page)]
    }
}
