//! Client-local tracking of job applications.
//!
//! Records live only on this client; nothing here talks to the backend.
//! Each record gets its own id so the same posting can be applied to again
//! after a withdrawal, and so records survive job-list refreshes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::jobs::models::Job;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    Interviewing,
    Offered,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Interviewing => "Interviewing",
            ApplicationStatus::Offered => "Offered",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Withdrawn => "Withdrawn",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppliedJob {
    pub id: Uuid,
    pub job: Job,
    pub applied_at: DateTime<Utc>,
    pub status: ApplicationStatus,
    pub notes: Option<String>,
    pub follow_up: Option<NaiveDate>,
}

/// Per-status counts over all tracked applications. The response rate is the
/// share that got any employer reaction (interviewing, offered or rejected),
/// as a rounded percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSummary {
    pub total: usize,
    pub applied: usize,
    pub interviewing: usize,
    pub offered: usize,
    pub rejected: usize,
    pub withdrawn: usize,
    pub response_rate: u32,
}

#[derive(Debug, Default)]
pub struct ApplicationTracker {
    records: Vec<AppliedJob>,
}

impl ApplicationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an application for `job` and returns the new record's id.
    pub fn apply(&mut self, job: Job) -> Uuid {
        let id = Uuid::new_v4();
        self.records.push(AppliedJob {
            id,
            job,
            applied_at: Utc::now(),
            status: ApplicationStatus::Applied,
            notes: None,
            follow_up: None,
        });
        id
    }

    pub fn update_status(
        &mut self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Option<&AppliedJob> {
        let record = self.records.iter_mut().find(|r| r.id == id)?;
        record.status = status;
        Some(record)
    }

    /// Attaches a note. A note that trims to nothing leaves the record
    /// unchanged.
    pub fn add_note(&mut self, id: Uuid, note: &str) -> Option<&AppliedJob> {
        let record = self.records.iter_mut().find(|r| r.id == id)?;
        if !note.trim().is_empty() {
            record.notes = Some(note.to_string());
        }
        Some(record)
    }

    pub fn set_follow_up(&mut self, id: Uuid, date: NaiveDate) -> Option<&AppliedJob> {
        let record = self.records.iter_mut().find(|r| r.id == id)?;
        record.follow_up = Some(date);
        Some(record)
    }

    pub fn withdraw(&mut self, id: Uuid) -> Option<&AppliedJob> {
        self.update_status(id, ApplicationStatus::Withdrawn)
    }

    /// Removes the record entirely and returns it.
    pub fn remove(&mut self, id: Uuid) -> Option<AppliedJob> {
        let idx = self.records.iter().position(|r| r.id == id)?;
        Some(self.records.remove(idx))
    }

    pub fn records(&self) -> &[AppliedJob] {
        &self.records
    }

    /// Records matching a status (`None` means all) and a case-insensitive
    /// substring search over title, company and location.
    pub fn filtered(
        &self,
        status: Option<ApplicationStatus>,
        search: &str,
    ) -> Vec<&AppliedJob> {
        let needle = search.to_lowercase();
        self.records
            .iter()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .filter(|r| {
                needle.is_empty()
                    || r.job.title.to_lowercase().contains(&needle)
                    || r.job.company.to_lowercase().contains(&needle)
                    || r.job.location.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn summary(&self) -> ApplicationSummary {
        let count = |status: ApplicationStatus| {
            self.records.iter().filter(|r| r.status == status).count()
        };
        let interviewing = count(ApplicationStatus::Interviewing);
        let offered = count(ApplicationStatus::Offered);
        let rejected = count(ApplicationStatus::Rejected);

        let total = self.records.len();
        let responded = interviewing + offered + rejected;
        let response_rate = if total > 0 {
            (responded as f64 / total as f64 * 100.0).round() as u32
        } else {
            0
        };

        ApplicationSummary {
            total,
            applied: count(ApplicationStatus::Applied),
            interviewing,
            offered,
            rejected,
            withdrawn: count(ApplicationStatus::Withdrawn),
            response_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_job(id: i64, title: &str, company: &str, location: &str) -> Job {
        Job {
            id,
            title: title.to_string(),
            company: company.to_string(),
            location: location.to_string(),
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

    fn make_tracker() -> (ApplicationTracker, Vec<Uuid>) {
        let mut tracker = ApplicationTracker::new();
        let ids = vec![
            tracker.apply(make_job(1, "Backend Engineer", "Acme", "Cape Town")),
            tracker.apply(make_job(2, "Frontend Developer", "Globex", "Remote")),
            tracker.apply(make_job(3, "Data Scientist", "Initech", "Johannesburg")),
        ];
        (tracker, ids)
    }

    #[test]
    fn test_apply_starts_in_applied_status() {
        let (tracker, ids) = make_tracker();
        assert_eq!(tracker.records().len(), 3);
        let record = tracker.records().iter().find(|r| r.id == ids[0]).unwrap();
        assert_eq!(record.status, ApplicationStatus::Applied);
        assert_eq!(record.notes, None);
    }

    #[test]
    fn test_status_updates_and_withdraw() {
        let (mut tracker, ids) = make_tracker();
        tracker
            .update_status(ids[0], ApplicationStatus::Interviewing)
            .unwrap();
        tracker.withdraw(ids[1]).unwrap();

        let summary = tracker.summary();
        assert_eq!(summary.interviewing, 1);
        assert_eq!(summary.withdrawn, 1);
        assert_eq!(summary.applied, 1);
    }

    #[test]
    fn test_unknown_id_is_none() {
        let (mut tracker, _) = make_tracker();
        assert!(tracker
            .update_status(Uuid::new_v4(), ApplicationStatus::Offered)
            .is_none());
        assert!(tracker.remove(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_add_note_ignores_blank_notes() {
        let (mut tracker, ids) = make_tracker();
        tracker.add_note(ids[0], "Recruiter call on Friday").unwrap();
        tracker.add_note(ids[0], "   ").unwrap();

        let record = tracker.records().iter().find(|r| r.id == ids[0]).unwrap();
        assert_eq!(record.notes.as_deref(), Some("Recruiter call on Friday"));
    }

    #[test]
    fn test_follow_up_date() {
        let (mut tracker, ids) = make_tracker();
        let date = NaiveDate::from_ymd_opt(2024, 1, 27).unwrap();
        tracker.set_follow_up(ids[0], date).unwrap();
        assert_eq!(tracker.records()[0].follow_up, Some(date));
    }

    #[test]
    fn test_filtered_by_status_and_search() {
        let (mut tracker, ids) = make_tracker();
        tracker
            .update_status(ids[2], ApplicationStatus::Interviewing)
            .unwrap();

        let interviewing = tracker.filtered(Some(ApplicationStatus::Interviewing), "");
        assert_eq!(interviewing.len(), 1);
        assert_eq!(interviewing[0].job.title, "Data Scientist");

        let by_search = tracker.filtered(None, "globex");
        assert_eq!(by_search.len(), 1);
        assert_eq!(by_search[0].job.company, "Globex");

        let both = tracker.filtered(Some(ApplicationStatus::Applied), "remote");
        assert_eq!(both.len(), 1);

        assert_eq!(tracker.filtered(None, "").len(), 3);
    }

    #[test]
    fn test_response_rate_rounds_to_whole_percent() {
        let (mut tracker, ids) = make_tracker();
        tracker
            .update_status(ids[0], ApplicationStatus::Interviewing)
            .unwrap();
        // 1 of 3 responded
        assert_eq!(tracker.summary().response_rate, 33);

        tracker
            .update_status(ids[1], ApplicationStatus::Rejected)
            .unwrap();
        // 2 of 3 responded
        assert_eq!(tracker.summary().response_rate, 67);
    }

    #[test]
    fn test_response_rate_of_empty_tracker_is_zero() {
        let tracker = ApplicationTracker::new();
        assert_eq!(tracker.summary().response_rate, 0);
        assert_eq!(tracker.summary().total, 0);
    }

    #[test]
    fn test_remove_drops_the_record() {
        let (mut tracker, ids) = make_tracker();
        let removed = tracker.remove(ids[1]).unwrap();
        assert_eq!(removed.job.company, "Globex");
        assert_eq!(tracker.records().len(), 2);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&ApplicationStatus::Interviewing).unwrap();
        assert_eq!(json, "\"interviewing\"");
        assert_eq!(ApplicationStatus::Offered.label(), "Offered");
    }
}
