/// One page of a listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number
    pub page: i64,
    pub total_pages: i64,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Clamp a requested page number and compute its offset.
pub(crate) fn page_window(requested: Option<i64>, per_page: i64, total: i64) -> (i64, i64, i64) {
    let per_page = per_page.max(1);
    let total_pages = ((total + per_page - 1) / per_page).max(1);
    let page = requested.unwrap_or(1).clamp(1, total_pages);
    (page, total_pages, (page - 1) * per_page)
}
