use super::domain::{Job, JobId};
use crate::portal::profiles::ProfileId;
use crate::portal::RepositoryError;

/// Storage abstraction over job postings.
pub trait JobRepository: Send + Sync {
    fn insert(&self, job: Job) -> Result<Job, RepositoryError>;
    fn fetch(&self, id: &JobId) -> Result<Option<Job>, RepositoryError>;
    /// Open postings, newest first.
    fn list_open(&self) -> Result<Vec<Job>, RepositoryError>;
    /// Every posting owned by the given HR profile, newest first.
    fn list_by_creator(&self, created_by: &ProfileId) -> Result<Vec<Job>, RepositoryError>;
}
