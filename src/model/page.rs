use crate::model::Record;

/// Records shown per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Number of pages needed to show `total_count` records, `page_size` at a time.
///
/// A zero page size has no pages.
pub fn total_pages(total_count: u64, page_size: usize) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_count.div_ceil(page_size as u64);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Everything the console needs to draw the current page.
///
/// The controller replaces this wholesale on every resolution and publishes each
/// version as one render frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    /// Authoritative records of the displayed page, at most `page_size` of them.
    pub records: Vec<Record>,
    pub current_page: u32,
    pub total_pages: u32,
    pub loading: bool,
    pub error: Option<String>,
    /// Optimistic record from a create, shown until the follow-up fetch resolves.
    pub overlay: Option<Record>,
    pub page_size: usize,
}

impl PageState {
    pub fn new(page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            current_page: 1,
            total_pages: 0,
            loading: false,
            error: None,
            overlay: None,
            page_size,
        }
    }

    /// Records to draw: the authoritative page with the overlay applied.
    ///
    /// The overlay joins the page when there is room; a full page means the new
    /// record starts the next page, so it is shown on its own.
    pub fn visible_records(&self) -> Vec<Record> {
        let Some(overlay) = &self.overlay else {
            return self.records.clone();
        };
        if self.records.len() < self.page_size {
            let mut records = self.records.clone();
            records.push(overlay.clone());
            records
        } else {
            vec![overlay.clone()]
        }
    }

    /// Highest page `current_page` may point at.
    pub fn last_page(&self) -> u32 {
        self.total_pages.max(1)
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(10, 5), 2);
        assert_eq!(total_pages(11, 5), 3);
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(1, 5), 1);
        assert_eq!(total_pages(4, 1), 4);
    }

    #[test]
    fn total_pages_with_zero_page_size_is_zero() {
        assert_eq!(total_pages(10, 0), 0);
    }

    #[test]
    fn initial_state_starts_on_first_page() {
        let state = PageState::default();
        assert_eq!(state.current_page, 1);
        assert_eq!(state.total_pages, 0);
        assert_eq!(state.last_page(), 1);
        assert!(state.records.is_empty());
        assert!(!state.loading);
    }

    #[test]
    fn overlay_joins_page_with_room() {
        let mut state = PageState::new(5);
        state.records = vec![Record::new("A", "a@x.io", "D").with_id(1)];
        state.overlay = Some(Record::new("B", "b@x.io", "D").with_id(11));

        let visible = state.visible_records();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[1].name, "B");
    }

    #[test]
    fn overlay_on_full_page_starts_a_new_one() {
        let mut state = PageState::new(2);
        state.records = vec![
            Record::new("A", "a@x.io", "D").with_id(1),
            Record::new("B", "b@x.io", "D").with_id(2),
        ];
        state.overlay = Some(Record::new("C", "c@x.io", "D").with_id(11));

        let visible = state.visible_records();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "C");
    }
}
