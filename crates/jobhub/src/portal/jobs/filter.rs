use serde::Deserialize;

use super::domain::{Job, JobType};

/// Filters evaluated as a pure predicate over the in-memory list of open
/// postings, re-run on every change. Volumes are assumed small; there is no
/// pagination or server-side narrowing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobFilter {
    /// Case-insensitive substring over title or company name.
    #[serde(default)]
    pub search: Option<String>,
    /// Exact employment type.
    #[serde(default)]
    pub job_type: Option<JobType>,
    /// Case-insensitive substring over the location field.
    #[serde(default)]
    pub location: Option<String>,
}

impl JobFilter {
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(term) = normalized(&self.search) {
            let hit = job.title.to_lowercase().contains(&term)
                || job.company_name.to_lowercase().contains(&term);
            if !hit {
                return false;
            }
        }

        if let Some(job_type) = self.job_type {
            if job.job_type != job_type {
                return false;
            }
        }

        if let Some(needle) = normalized(&self.location) {
            if !job.location.to_lowercase().contains(&needle) {
                return false;
            }
        }

        true
    }

    pub fn apply(&self, jobs: Vec<Job>) -> Vec<Job> {
        jobs.into_iter().filter(|job| self.matches(job)).collect()
    }
}

// Blank parameters arrive as empty strings from query strings; treat them as absent.
fn normalized(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portal::jobs::domain::{JobId, JobStatus};
    use crate::portal::profiles::ProfileId;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn job(id: &str, title: &str, company: &str, location: &str, job_type: JobType) -> Job {
        Job {
            id: JobId(id.to_string()),
            created_by: ProfileId("usr-000001".to_string()),
            title: title.to_string(),
            company_name: company.to_string(),
            description: "role description".to_string(),
            qualifications: String::new(),
            location: location.to_string(),
            job_type,
            salary_min: None,
            salary_max: None,
            deadline: NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
            status: JobStatus::Open,
            created_at: Utc.with_ymd_and_hms(2024, 11, 1, 9, 0, 0).unwrap(),
        }
    }

    fn board() -> Vec<Job> {
        vec![
            job(
                "job-000001",
                "Backend Engineer",
                "Acme Labs",
                "Berlin, Germany",
                JobType::FullTime,
            ),
            job(
                "job-000002",
                "Data Analyst Intern",
                "Borealis",
                "Munich, Germany",
                JobType::Internship,
            ),
            job(
                "job-000003",
                "Frontend Engineer",
                "acme labs",
                "Lisbon, Portugal",
                JobType::Contract,
            ),
        ]
    }

    #[test]
    fn search_matches_title_or_company_case_insensitively() {
        let filter = JobFilter {
            search: Some("ACME".to_string()),
            ..JobFilter::default()
        };
        let matched = filter.apply(board());
        let ids: Vec<_> = matched.iter().map(|job| job.id.0.as_str()).collect();
        assert_eq!(ids, vec!["job-000001", "job-000003"]);

        let filter = JobFilter {
            search: Some("engineer".to_string()),
            ..JobFilter::default()
        };
        assert_eq!(filter.apply(board()).len(), 2);
    }

    #[test]
    fn job_type_filter_is_exact() {
        let filter = JobFilter {
            job_type: Some(JobType::Internship),
            ..JobFilter::default()
        };
        let matched = filter.apply(board());
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id.0, "job-000002");
    }

    #[test]
    fn location_filter_is_substring_and_case_insensitive() {
        let filter = JobFilter {
            location: Some("germany".to_string()),
            ..JobFilter::default()
        };
        assert_eq!(filter.apply(board()).len(), 2);
    }

    #[test]
    fn filters_combine_conjunctively() {
        let filter = JobFilter {
            search: Some("acme".to_string()),
            job_type: Some(JobType::FullTime),
            location: Some("berlin".to_string()),
        };
        let matched = filter.apply(board());
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id.0, "job-000001");
    }

    #[test]
    fn blank_parameters_match_everything() {
        let filter = JobFilter {
            search: Some("   ".to_string()),
            job_type: None,
            location: Some(String::new()),
        };
        assert_eq!(filter.apply(board()).len(), 3);
        assert_eq!(JobFilter::default().apply(board()).len(), 3);
    }

    #[test]
    fn search_returns_exactly_the_containing_subset() {
        let filter = JobFilter {
            search: Some("borealis".to_string()),
            ..JobFilter::default()
        };
        for job in board() {
            let expected = job.title.to_lowercase().contains("borealis")
                || job.company_name.to_lowercase().contains("borealis");
            assert_eq!(filter.matches(&job), expected);
        }
    }
}
