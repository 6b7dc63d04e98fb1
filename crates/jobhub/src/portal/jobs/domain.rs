use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::portal::profiles::ProfileId;

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    Internship,
    Contract,
}

impl JobType {
    pub const fn label(self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Internship => "internship",
            JobType::Contract => "contract",
        }
    }
}

/// Lifecycle of a posting. Only `open` postings accept applications; nothing
/// in the portal currently closes a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Open,
    Closed,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            JobStatus::Open => "open",
            JobStatus::Closed => "closed",
        }
    }

    pub const fn is_open(self) -> bool {
        matches!(self, JobStatus::Open)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub created_by: ProfileId,
    pub title: String,
    pub company_name: String,
    pub description: String,
    pub qualifications: String,
    pub location: String,
    pub job_type: JobType,
    pub salary_min: Option<u32>,
    pub salary_max: Option<u32>,
    pub deadline: NaiveDate,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields an HR user supplies when posting a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDraft {
    pub title: String,
    pub company_name: String,
    pub description: String,
    #[serde(default)]
    pub qualifications: String,
    pub location: String,
    pub job_type: JobType,
    #[serde(default)]
    pub salary_min: Option<u32>,
    #[serde(default)]
    pub salary_max: Option<u32>,
    pub deadline: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum JobDraftError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("company name must not be empty")]
    EmptyCompany,
    #[error("location must not be empty")]
    EmptyLocation,
    #[error("salary_min ({min}) exceeds salary_max ({max})")]
    SalaryRange { min: u32, max: u32 },
}

impl JobDraft {
    pub fn validate(&self) -> Result<(), JobDraftError> {
        if self.title.trim().is_empty() {
            return Err(JobDraftError::EmptyTitle);
        }
        if self.company_name.trim().is_empty() {
            return Err(JobDraftError::EmptyCompany);
        }
        if self.location.trim().is_empty() {
            return Err(JobDraftError::EmptyLocation);
        }
        if let (Some(min), Some(max)) = (self.salary_min, self.salary_max) {
            if min > max {
                return Err(JobDraftError::SalaryRange { min, max });
            }
        }
        Ok(())
    }
}
