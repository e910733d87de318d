//! Pagination: fixed-size slices of an ordered history.

use std::num::NonZeroUsize;

/// One page of an ordered sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// `ceil(len / page_size)`; zero for an empty sequence.
    pub total_pages: usize,
}

/// Slice `[(page - 1) * page_size, page * page_size)` clipped to the bounds.
///
/// `page` is 1-based and is not validated: callers clamp it with
/// [`clamp_page`]. A page past the end yields an empty slice, and page `0`
/// reads the same slice as page `1`.
pub fn paginate<T>(items: &[T], page_size: NonZeroUsize, page: usize) -> Page<'_, T> {
    let size = page_size.get();
    let total_pages = items.len().div_ceil(size);

    let start = page.saturating_sub(1).saturating_mul(size).min(items.len());
    let end = start.saturating_add(size).min(items.len());

    Page {
        items: &items[start..end],
        total_pages,
    }
}

/// Clamp a requested page into `[1, max(total_pages, 1)]`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}
