//! Pager: one indicator per page, the active one bracketed.

/// Page indicators for a known page count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    current_page: u32,
    total_pages: u32,
}

impl Pager {
    pub fn new(current_page: u32, total_pages: u32) -> Self {
        Self {
            current_page,
            total_pages,
        }
    }

    /// `(page, active)` for every page from 1 to `total_pages` inclusive.
    pub fn indicators(&self) -> impl Iterator<Item = (u32, bool)> + '_ {
        (1..=self.total_pages).map(move |page| (page, page == self.current_page))
    }

    /// `1 [2] 3`; empty when there are no pages.
    pub fn render(&self) -> String {
        self.indicators()
            .map(|(page, active)| {
                if active {
                    format!("[{page}]")
                } else {
                    page.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Page change for a clicked indicator; `None` if no such indicator exists.
    pub fn select(&self, page: u32) -> Option<u32> {
        (1..=self.total_pages).contains(&page).then_some(page)
    }

    pub fn next(&self) -> Option<u32> {
        self.select(self.current_page.saturating_add(1))
    }

    pub fn previous(&self) -> Option<u32> {
        self.select(self.current_page.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_current_page_active() {
        assert_eq!(Pager::new(2, 3).render(), "1 [2] 3");
        assert_eq!(Pager::new(1, 1).render(), "[1]");
    }

    #[test]
    fn no_pages_renders_nothing() {
        assert_eq!(Pager::new(1, 0).render(), "");
        assert_eq!(Pager::new(1, 0).indicators().count(), 0);
    }

    #[test]
    fn selection_is_limited_to_existing_pages() {
        let pager = Pager::new(1, 2);
        assert_eq!(pager.select(2), Some(2));
        assert_eq!(pager.select(3), None);
        assert_eq!(pager.select(0), None);
    }

    #[test]
    fn next_and_previous_stop_at_the_ends() {
        assert_eq!(Pager::new(1, 2).next(), Some(2));
        assert_eq!(Pager::new(2, 2).next(), None);
        assert_eq!(Pager::new(1, 2).previous(), None);
        assert_eq!(Pager::new(2, 2).previous(), Some(1));
    }
}
