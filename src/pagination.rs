use crate::constants::FIRST_PAGE;

/// Page cursor for one listing. Two independent instances exist (categories
/// and activities); they never share state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    page: u32,
    per_page: u32,
    total_page: Option<u32>,
}

impl PageCursor {
    /// A fresh cursor on the first page. `total_page` stays unknown until
    /// the first successful fetch reports the server's last page.
    pub fn new(per_page: u32) -> Self {
        PageCursor {
            page: FIRST_PAGE,
            per_page,
            total_page: None,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn total_page(&self) -> Option<u32> {
        self.total_page
    }

    /// Advances one page. A no-op on the last page, or before the first
    /// fetch has established the page count. Returns whether it moved.
    pub fn next(&mut self) -> bool {
        match self.total_page {
            Some(total) if self.page < total => {
                self.page += 1;
                true
            }
            _ => false,
        }
    }

    /// Retreats one page. A no-op on the first page. Returns whether it
    /// moved.
    pub fn prev(&mut self) -> bool {
        if self.page > FIRST_PAGE {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Sole writer of `total_page`, called with the server-reported last
    /// page after every successful listing fetch. Pulls `page` back inside
    /// the valid range when the listing shrank underneath the cursor.
    pub fn set_total_page(&mut self, last_page: u32) {
        let total = last_page.max(FIRST_PAGE);
        self.total_page = Some(total);
        if self.page > total {
            self.page = total;
        }
    }
}
