//! Wire types for the jobs API.

use serde::{Deserialize, Serialize};

use crate::jobs::state::Operation;

/// A job posting. Superset of the shapes the two backend revisions return;
/// everything beyond the identity core is optional because the revisions
/// populated different subsets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(default)]
    pub description: String,
    pub salary: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub salary_currency: Option<String>,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    pub category: Option<String>,
    pub contract_time: Option<String>,
    pub contract_type: Option<String>,
    pub date_posted: Option<String>,
    pub link: Option<String>,
    pub url: Option<String>,
    pub source: Option<String>,
    pub created_at: Option<String>,
}

impl Job {
    /// The posting URL under either revision's field name.
    pub fn posting_url(&self) -> Option<&str> {
        self.link.as_deref().or(self.url.as_deref())
    }

    /// Human-readable salary: the free-text field when present, the numeric
    /// range otherwise.
    pub fn salary_display(&self) -> String {
        if let Some(salary) = self.salary.as_deref().filter(|s| !s.is_empty()) {
            return salary.to_string();
        }
        let currency = self.salary_currency.as_deref().unwrap_or("");
        let display = match (self.salary_min, self.salary_max) {
            (Some(min), Some(max)) => format!("{min:.0} - {max:.0} {currency}"),
            (Some(min), None) => format!("{min:.0}+ {currency}"),
            (None, Some(max)) => format!("Up to {max:.0} {currency}"),
            (None, None) => return "Salary not specified".to_string(),
        };
        display.trim_end().to_string()
    }
}

/// Server-side search parameters for `GET /jobs`. Also the source of the
/// operation cache key, so field order here is load-bearing: equal filters
/// must always serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSearchFilters {
    pub search: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub source: Option<String>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl JobSearchFilters {
    /// HTTP query pairs in declaration order. `None` and empty strings are
    /// skipped, so "no filter" and "empty filter" hit the same backend URL.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        for (name, value) in [
            ("search", &self.search),
            ("company", &self.company),
            ("location", &self.location),
            ("source", &self.source),
        ] {
            if let Some(v) = value {
                if !v.is_empty() {
                    params.push((name, v.clone()));
                }
            }
        }
        if let Some(skip) = self.skip {
            params.push(("skip", skip.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }

    /// Deterministic cache key: operation name plus the present parameters in
    /// fixed order. Not JSON; it only has to be stable and collision-free.
    pub fn cache_key(&self) -> String {
        let mut key = format!("{}_{{", Operation::GetJobs.name());
        for (i, (name, value)) in self.query_params().iter().enumerate() {
            if i > 0 {
                key.push(',');
            }
            key.push_str(&format!("\"{name}\":\"{value}\""));
        }
        key.push('}');
        key
    }
}

/// Response of both scrape endpoints. `keywords` and `sites_used` are only
/// present on the efficient variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScrapeReport {
    pub message: String,
    pub scraped_count: u64,
    pub saved_count: u64,
    pub query: String,
    pub location: String,
    pub keywords: Option<Vec<String>>,
    pub sites_used: Option<Vec<String>>,
}

/// One query/location pair for a batch scrape.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeQuery {
    pub query: String,
    pub location: String,
}

/// Response of `DELETE /jobs/mock`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClearReport {
    pub message: String,
    pub deleted_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobStats {
    pub total_jobs: u64,
    pub jobs_today: u64,
    pub jobs_per_company: Vec<CompanyCount>,
    pub jobs_per_source: Vec<SourceCount>,
    pub jobs_per_level: Vec<LevelCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyCount {
    pub company: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceCount {
    pub source: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LevelCount {
    pub level: String,
    pub count: u64,
}
