//! Page arithmetic shared by list views
//!
//! Pages are 1-based. Views translate between the page they display and the
//! `skip` offset the store's queries use.

use crate::constants::query::PAGE_SIZE_OPTIONS;

/// Offset of the first item on `page` (1-based); page 0 is treated as page 1
pub fn skip_for_page(page: u32, page_size: u32) -> u32 {
    page.saturating_sub(1).saturating_mul(page_size)
}

/// Page (1-based) that starts at `skip`
pub fn page_for_skip(skip: u32, page_size: u32) -> u32 {
    if page_size == 0 {
        return 1;
    }
    skip / page_size + 1
}

/// Number of pages needed for `total` items; never less than one
pub fn page_count(total: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(u64::from(page_size)).max(1)
}

/// Page sizes offered by list views
pub fn page_size_options() -> &'static [u32] {
    &PAGE_SIZE_OPTIONS
}
