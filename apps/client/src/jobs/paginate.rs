//! Page windowing over a filtered job list.
//!
//! Pages are 1-indexed. Page `p` is the half-open slice
//! `[(p-1)*page_size, p*page_size)`. Replacing the list resets the current
//! page to 1; selecting a page outside `[1, total_pages]` is a no-op.

use crate::jobs::models::Job;

#[derive(Debug, Clone)]
pub struct Pager {
    jobs: Vec<Job>,
    page_size: usize,
    current_page: usize,
}

impl Pager {
    /// A pager over an empty list. `page_size` is clamped to at least 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            jobs: Vec::new(),
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    /// Replaces the backing list and returns to page 1. Callers re-run their
    /// filter and hand the result here, so a filter change also lands on
    /// page 1.
    pub fn set_jobs(&mut self, jobs: Vec<Job>) {
        self.jobs = jobs;
        self.current_page = 1;
    }

    pub fn total_jobs(&self) -> usize {
        self.jobs.len()
    }

    pub fn total_pages(&self) -> usize {
        self.jobs.len().div_ceil(self.page_size)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Moves to `page` when it is within `[1, total_pages]`; otherwise leaves
    /// the current page unchanged.
    pub fn set_page(&mut self, page: usize) {
        if page >= 1 && page <= self.total_pages() {
            self.current_page = page;
        }
    }

    /// The jobs visible on the current page. Empty when the list is empty.
    pub fn page(&self) -> &[Job] {
        let start = (self.current_page - 1) * self.page_size;
        if start >= self.jobs.len() {
            return &[];
        }
        let end = (start + self.page_size).min(self.jobs.len());
        &self.jobs[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_job(id: i64) -> Job {
        Job {
            id,
            title: format!("Job {id}"),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            description: String::new(),
            salary: None,
            salary_min: None,
            salary_max: None,
            salary_currency: None,
            job_type: None,
            experience_level: None,
            category: None,
            contract_time: None,
            contract_type: None,
            date_posted: None,
            link: None,
            url: None,
            source: None,
            created_at: None,
        }
    }

    fn make_pager(count: i64, page_size: usize) -> Pager {
        let mut pager = Pager::new(page_size);
        pager.set_jobs((1..=count).map(make_job).collect());
        pager
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(make_pager(11, 5).total_pages(), 3);
        assert_eq!(make_pager(10, 5).total_pages(), 2);
        assert_eq!(make_pager(1, 5).total_pages(), 1);
        assert_eq!(make_pager(0, 5).total_pages(), 0);
    }

    #[test]
    fn test_page_slices_are_half_open_windows() {
        let mut pager = make_pager(11, 5);
        assert_eq!(pager.page().iter().map(|j| j.id).collect::<Vec<_>>(), vec![
            1, 2, 3, 4, 5
        ]);

        pager.set_page(3);
        assert_eq!(pager.page().iter().map(|j| j.id).collect::<Vec<_>>(), vec![
            11
        ]);
    }

    #[test]
    fn test_empty_list_yields_empty_first_page() {
        let pager = make_pager(0, 5);
        assert_eq!(pager.current_page(), 1);
        assert!(pager.page().is_empty());
    }

    #[test]
    fn test_out_of_range_page_selection_is_a_no_op() {
        let mut pager = make_pager(11, 5);
        pager.set_page(2);

        pager.set_page(0);
        assert_eq!(pager.current_page(), 2);

        pager.set_page(4);
        assert_eq!(pager.current_page(), 2);
    }

    #[test]
    fn test_replacing_jobs_resets_to_page_one() {
        let mut pager = make_pager(11, 5);
        pager.set_page(3);
        pager.set_jobs((1..=4).map(make_job).collect());
        assert_eq!(pager.current_page(), 1);
        assert_eq!(pager.total_pages(), 1);
        assert_eq!(pager.page().len(), 4);
    }

    #[test]
    fn test_zero_page_size_is_clamped() {
        let pager = Pager::new(0);
        assert_eq!(pager.total_pages(), 0);
    }
}
