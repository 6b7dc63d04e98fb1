use super::domain::{Application, ApplicationId};
use crate::portal::jobs::JobId;
use crate::portal::profiles::ProfileId;
use crate::portal::RepositoryError;

/// Storage abstraction over submitted applications.
pub trait ApplicationRepository: Send + Sync {
    /// Insert a new application. Implementations must enforce the unique
    /// (job_id, student_id) constraint atomically and answer `Conflict` for
    /// a second application to the same job, racing double-submits included.
    fn insert(&self, application: Application) -> Result<Application, RepositoryError>;
    fn update(&self, application: Application) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn find_by_job_and_student(
        &self,
        job_id: &JobId,
        student_id: &ProfileId,
    ) -> Result<Option<Application>, RepositoryError>;
    /// Applications submitted by the student, newest first.
    fn list_by_student(&self, student_id: &ProfileId)
        -> Result<Vec<Application>, RepositoryError>;
    /// Applications received for one posting, newest first.
    fn list_by_job(&self, job_id: &JobId) -> Result<Vec<Application>, RepositoryError>;
    /// Applications received across a set of postings, newest first.
    fn list_by_jobs(&self, job_ids: &[JobId]) -> Result<Vec<Application>, RepositoryError>;
}
