use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::portal::jobs::JobId;
use crate::portal::profiles::ProfileId;

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Resume upload does not exist yet; every application carries this marker
/// until the upload pipeline lands.
pub const RESUME_URL_PLACEHOLDER: &str = "pending-upload";

/// Review lifecycle of an application.
///
/// `pending` is the only initial state. HR may shortlist or reject a pending
/// application and accept or reject a shortlisted one; `accepted` and
/// `rejected` are terminal and never regress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Shortlisted,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Accepted | ApplicationStatus::Rejected
        )
    }

    /// Exhaustive transition function for the review workflow.
    pub fn transition(self, target: ApplicationStatus) -> Result<ApplicationStatus, TransitionError> {
        use ApplicationStatus::*;

        match (self, target) {
            (Pending, Shortlisted) | (Pending, Rejected) => Ok(target),
            (Shortlisted, Accepted) | (Shortlisted, Rejected) => Ok(target),
            (Accepted, _) | (Rejected, _) => Err(TransitionError::Terminal { from: self }),
            (from, to) => Err(TransitionError::Invalid { from, to }),
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("application is already {from}; no further review actions are possible")]
    Terminal { from: ApplicationStatus },
    #[error("an application cannot move from {from} to {to}")]
    Invalid {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub student_id: ProfileId,
    pub cover_letter: String,
    pub resume_url: String,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
