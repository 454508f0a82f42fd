//! Client-side narrowing of a loaded job list.
//!
//! Match policy: every text predicate is case-insensitive substring
//! containment. An empty value or an `"All …"` sentinel (`"All Categories"`,
//! `"All Types"`) is a wildcard that always matches. Predicates compose as a
//! conjunction. Salary bounds match on range overlap; a job without salary
//! data fails any salary-bounded filter.

use crate::jobs::models::Job;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalFilter {
    /// Matched against title, description and company.
    pub keywords: String,
    pub location: String,
    pub category: String,
    pub contract_type: String,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
}

impl LocalFilter {
    pub fn matches(&self, job: &Job) -> bool {
        let matches_keywords = is_wildcard(&self.keywords)
            || contains_ci(&job.title, &self.keywords)
            || contains_ci(&job.description, &self.keywords)
            || contains_ci(&job.company, &self.keywords);

        let matches_location =
            is_wildcard(&self.location) || contains_ci(&job.location, &self.location);

        let matches_category = is_wildcard(&self.category)
            || job
                .category
                .as_deref()
                .is_some_and(|c| contains_ci(c, &self.category));

        let matches_contract = is_wildcard(&self.contract_type)
            || job
                .contract_type
                .as_deref()
                .is_some_and(|c| contains_ci(c, &self.contract_type));

        let matches_salary = self
            .salary_min
            .map_or(true, |min| job.salary_max.is_some_and(|max| max >= min))
            && self
                .salary_max
                .map_or(true, |max| job.salary_min.is_some_and(|min| min <= max));

        matches_keywords && matches_location && matches_category && matches_contract && matches_salary
    }

    pub fn apply(&self, jobs: &[Job]) -> Vec<Job> {
        jobs.iter().filter(|job| self.matches(job)).cloned().collect()
    }
}

fn is_wildcard(value: &str) -> bool {
    value.is_empty() || value.starts_with("All ")
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_job(id: i64, title: &str, category: &str, contract: &str) -> Job {
        Job {
            id,
            title: title.to_string(),
            company: "Acme".to_string(),
            location: "Cape Town".to_string(),
            description: "Build things".to_string(),
            salary: None,
            salary_min: Some(80_000.0),
            salary_max: Some(120_000.0),
            salary_currency: Some("USD".to_string()),
            job_type: None,
            experience_level: None,
            category: Some(category.to_string()),
            contract_time: None,
            contract_type: Some(contract.to_string()),
            date_posted: None,
            link: None,
            url: None,
            source: None,
            created_at: None,
        }
    }

    fn make_list() -> Vec<Job> {
        vec![
            make_job(1, "Senior Software Engineer", "IT & Telecoms", "permanent"),
            make_job(2, "Full Stack Developer", "IT & Telecoms", "permanent"),
            make_job(3, "DevOps Engineer", "IT & Telecoms", "contract"),
            make_job(4, "UI/UX Designer", "Creative & Design", "permanent"),
            make_job(5, "Data Scientist", "Science & Research", "contract"),
        ]
    }

    #[test]
    fn test_all_types_sentinel_returns_everything() {
        let filter = LocalFilter {
            contract_type: "All Types".to_string(),
            ..Default::default()
        };
        assert_eq!(filter.apply(&make_list()).len(), 5);
    }

    #[test]
    fn test_all_categories_sentinel_returns_everything() {
        let filter = LocalFilter {
            category: "All Categories".to_string(),
            ..Default::default()
        };
        assert_eq!(filter.apply(&make_list()).len(), 5);
    }

    #[test]
    fn test_default_filter_is_all_pass() {
        assert_eq!(LocalFilter::default().apply(&make_list()).len(), 5);
    }

    #[test]
    fn test_category_matches_by_substring() {
        let filter = LocalFilter {
            category: "design".to_string(),
            ..Default::default()
        };
        let hits = filter.apply(&make_list());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 4);
    }

    #[test]
    fn test_contract_type_narrows() {
        let filter = LocalFilter {
            contract_type: "contract".to_string(),
            ..Default::default()
        };
        let hits = filter.apply(&make_list());
        assert_eq!(hits.iter().map(|j| j.id).collect::<Vec<_>>(), vec![3, 5]);
    }

    #[test]
    fn test_keywords_search_title_description_and_company() {
        let mut jobs = make_list();
        jobs[0].description = "Kubernetes platform work".to_string();

        let by_title = LocalFilter {
            keywords: "designer".to_string(),
            ..Default::default()
        };
        assert_eq!(by_title.apply(&jobs).len(), 1);

        let by_description = LocalFilter {
            keywords: "KUBERNETES".to_string(),
            ..Default::default()
        };
        assert_eq!(by_description.apply(&jobs)[0].id, 1);

        let by_company = LocalFilter {
            keywords: "acme".to_string(),
            ..Default::default()
        };
        assert_eq!(by_company.apply(&jobs).len(), 5);
    }

    #[test]
    fn test_predicates_compose_as_conjunction() {
        let filter = LocalFilter {
            keywords: "engineer".to_string(),
            contract_type: "permanent".to_string(),
            ..Default::default()
        };
        let hits = filter.apply(&make_list());
        assert_eq!(hits.iter().map(|j| j.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_salary_bounds_match_on_overlap() {
        let filter = LocalFilter {
            salary_min: Some(125_000.0),
            ..Default::default()
        };
        assert!(filter.apply(&make_list()).is_empty());

        let filter = LocalFilter {
            salary_min: Some(100_000.0),
            salary_max: Some(130_000.0),
            ..Default::default()
        };
        assert_eq!(filter.apply(&make_list()).len(), 5);
    }

    #[test]
    fn test_salary_bound_excludes_jobs_without_salary_data() {
        let mut job = make_job(9, "Mystery Role", "IT & Telecoms", "permanent");
        job.salary_min = None;
        job.salary_max = None;

        let filter = LocalFilter {
            salary_min: Some(1.0),
            ..Default::default()
        };
        assert!(!filter.matches(&job));
        assert!(LocalFilter::default().matches(&job));
    }
}
