//! Search and pagination over a snapshot of token records. Pure, no I/O.

use crate::models::TokenRecord;

/// Rows per page in the token table.
pub const PAGE_SIZE: usize = 5;

/// Records whose owner, token name or funding source contains `search_term`,
/// compared case-insensitively. An empty term keeps everything.
pub fn filter<'a>(records: &'a [TokenRecord], search_term: &str) -> Vec<&'a TokenRecord> {
    let needle = search_term.to_lowercase();
    records
        .iter()
        .filter(|r| {
            r.owner.to_lowercase().contains(&needle)
                || r.token_name.to_lowercase().contains(&needle)
                || r.funding_source.to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn total_pages(filtered_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    filtered_count.div_ceil(page_size)
}

/// Clamp a 1-based page number into `[1, total_pages]`. Returns 1 when there
/// are no pages at all.
pub fn clamp_page(page_number: usize, total_pages: usize) -> usize {
    page_number.clamp(1, total_pages.max(1))
}

/// The `page_number`th page (1-based) of `records`, clamped to the valid range.
pub fn paginate<T>(records: &[T], page_size: usize, page_number: usize) -> &[T] {
    let pages = total_pages(records.len(), page_size);
    if pages == 0 {
        return &[];
    }

    let page = clamp_page(page_number, pages);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(records.len());
    &records[start..end]
}

/// Everything the token table needs to draw one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a> {
    pub items: Vec<&'a TokenRecord>,
    /// Effective page after clamping.
    pub page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
    /// 1-based position of the first row shown, 0 when nothing is shown.
    pub first_index: usize,
    pub last_index: usize,
}

pub fn view<'a>(records: &'a [TokenRecord], search_term: &str, page_number: usize) -> PageView<'a> {
    let matches = filter(records, search_term);
    let pages = total_pages(matches.len(), PAGE_SIZE);
    let page = clamp_page(page_number, pages);
    let items = paginate(&matches, PAGE_SIZE, page).to_vec();

    let (first_index, last_index) = if items.is_empty() {
        (0, 0)
    } else {
        let first = (page - 1) * PAGE_SIZE + 1;
        (first, first + items.len() - 1)
    };

    PageView {
        items,
        page,
        total_pages: pages,
        total_matches: matches.len(),
        first_index,
        last_index,
    }
}
