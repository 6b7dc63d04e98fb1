//! Job portal domain: profiles, postings, applications, and the review workflow.
//!
//! Storage and session management sit behind traits so the hosted backend the
//! portal originally delegated to can be swapped in without touching the
//! domain logic. The in-memory adapters used by the API service and the test
//! suite live with their consumers.

pub mod applications;
pub mod auth;
pub mod jobs;
pub mod profiles;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

/// Error enumeration for storage adapter failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

pub use router::{portal_router, PortalState};
pub use service::{
    ApplicationStats, HrApplication, HrDashboard, JobListing, PortalError, PortalService,
    StudentApplication, StudentTracker,
};
