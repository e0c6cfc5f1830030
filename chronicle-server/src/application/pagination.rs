use crate::data::post_repository::PageSlice;

/// Paging metadata for a rendered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Page {
    pub(crate) number: u32,
    pub(crate) total_pages: u32,
    pub(crate) has_next: bool,
    pub(crate) has_previous: bool,
}

/// Lenient page-parameter parsing: anything missing, unparseable or
/// below 1 falls back to the first page.
pub(crate) fn parse_page_param(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|&page| page >= 1)
        .unwrap_or(1)
}

/// Computes the window for a 1-based page request. Out-of-range pages
/// clamp to the last valid page; an empty result set still counts as
/// one page.
pub(crate) fn paginate(total_items: i64, page_size: u32, requested_page: u32) -> (Page, PageSlice) {
    let page_size = page_size.max(1);
    let total_items = total_items.max(0) as u64;
    let total_pages = (total_items.div_ceil(page_size as u64)).max(1) as u32;
    let number = requested_page.clamp(1, total_pages);

    let page = Page {
        number,
        total_pages,
        has_next: number < total_pages,
        has_previous: number > 1,
    };
    let slice = PageSlice {
        limit: page_size as i64,
        offset: (number as i64 - 1) * page_size as i64,
    };
    (page, slice)
}

#[cfg(test)]
mod tests {
    use super::{paginate, parse_page_param};

    #[test]
    fn page_param_defaults_to_one() {
        assert_eq!(parse_page_param(None), 1);
        assert_eq!(parse_page_param(Some("")), 1);
        assert_eq!(parse_page_param(Some("abc")), 1);
        assert_eq!(parse_page_param(Some("0")), 1);
        assert_eq!(parse_page_param(Some("-3")), 1);
    }

    #[test]
    fn page_param_accepts_valid_numbers() {
        assert_eq!(parse_page_param(Some("7")), 7);
        assert_eq!(parse_page_param(Some(" 2 ")), 2);
    }

    #[test]
    fn out_of_range_page_clamps_to_last() {
        let (page, slice) = paginate(8, 10, 10);
        assert_eq!(page.number, 1);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next);
        assert!(!page.has_previous);
        assert_eq!(slice.offset, 0);
    }

    #[test]
    fn middle_page_reports_both_neighbours() {
        let (page, slice) = paginate(25, 10, 2);
        assert_eq!(page.number, 2);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next);
        assert!(page.has_previous);
        assert_eq!(slice.limit, 10);
        assert_eq!(slice.offset, 10);
    }

    #[test]
    fn exact_multiple_of_page_size_has_no_phantom_page() {
        let (page, _) = paginate(20, 10, 5);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.number, 2);
    }

    #[test]
    fn empty_listing_is_a_single_page() {
        let (page, slice) = paginate(0, 10, 3);
        assert_eq!(page.number, 1);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next);
        assert_eq!(slice.offset, 0);
    }
}
