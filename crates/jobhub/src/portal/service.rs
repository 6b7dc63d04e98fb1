use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::applications::{
    Application, ApplicationId, ApplicationRepository, ApplicationStatus, TransitionError,
    RESUME_URL_PLACEHOLDER,
};
use super::jobs::{Job, JobDraft, JobFilter, JobId, JobRepository, JobStatus};
use super::profiles::{Profile, ProfileId, ProfileRepository, Role, SignupRequest};
use super::RepositoryError;

/// Service composing the profile, posting, and application stores behind the
/// portal's two role-scoped surfaces. Ownership checks that the original
/// delegated to the store's row-level policies are enforced here.
pub struct PortalService<P, J, A> {
    profiles: Arc<P>,
    jobs: Arc<J>,
    applications: Arc<A>,
    profile_sequence: AtomicU64,
    job_sequence: AtomicU64,
    application_sequence: AtomicU64,
}

impl<P, J, A> PortalService<P, J, A>
where
    P: ProfileRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
{
    pub fn new(profiles: Arc<P>, jobs: Arc<J>, applications: Arc<A>) -> Self {
        Self {
            profiles,
            jobs,
            applications,
            profile_sequence: AtomicU64::new(1),
            job_sequence: AtomicU64::new(1),
            application_sequence: AtomicU64::new(1),
        }
    }

    fn next_profile_id(&self) -> ProfileId {
        let id = self.profile_sequence.fetch_add(1, Ordering::Relaxed);
        ProfileId(format!("usr-{id:06}"))
    }

    fn next_job_id(&self) -> JobId {
        let id = self.job_sequence.fetch_add(1, Ordering::Relaxed);
        JobId(format!("job-{id:06}"))
    }

    fn next_application_id(&self) -> ApplicationId {
        let id = self.application_sequence.fetch_add(1, Ordering::Relaxed);
        ApplicationId(format!("app-{id:06}"))
    }

    /// Register a new profile. The external identity provider owns the
    /// credentials; the portal records name, email, and the immutable role.
    pub fn signup(&self, request: SignupRequest) -> Result<Profile, PortalError> {
        let full_name = request.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(PortalError::Validation("full name must not be empty".into()));
        }
        let email = request.email.trim().to_string();
        if !email.contains('@') {
            return Err(PortalError::Validation(format!(
                "'{email}' is not a valid email address"
            )));
        }

        let profile = Profile {
            id: self.next_profile_id(),
            full_name,
            email,
            role: request.role,
        };

        match self.profiles.insert(profile) {
            Ok(stored) => Ok(stored),
            Err(RepositoryError::Conflict) => Err(PortalError::DuplicateEmail),
            Err(other) => Err(PortalError::Repository(other)),
        }
    }

    pub fn profile(&self, id: &ProfileId) -> Result<Profile, PortalError> {
        self.profiles
            .fetch(id)?
            .ok_or(PortalError::NotFound("profile"))
    }

    /// Create an open posting owned by the calling HR profile.
    pub fn post_job(&self, hr_id: &ProfileId, draft: JobDraft) -> Result<Job, PortalError> {
        let hr = self.require_role(hr_id, Role::Hr)?;
        draft
            .validate()
            .map_err(|err| PortalError::Validation(err.to_string()))?;

        let job = Job {
            id: self.next_job_id(),
            created_by: hr.id,
            title: draft.title,
            company_name: draft.company_name,
            description: draft.description,
            qualifications: draft.qualifications,
            location: draft.location,
            job_type: draft.job_type,
            salary_min: draft.salary_min,
            salary_max: draft.salary_max,
            deadline: draft.deadline,
            status: JobStatus::Open,
            created_at: Utc::now(),
        };

        Ok(self.jobs.insert(job)?)
    }

    /// All open postings, newest first, narrowed by the in-memory filter.
    pub fn list_open_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>, PortalError> {
        Ok(filter.apply(self.jobs.list_open()?))
    }

    /// Detail view of one open posting, with the caller's applied flag.
    pub fn job_listing(
        &self,
        student_id: &ProfileId,
        job_id: &JobId,
    ) -> Result<JobListing, PortalError> {
        let job = self
            .jobs
            .fetch(job_id)?
            .filter(|job| job.status.is_open())
            .ok_or(PortalError::NotFound("job"))?;
        let has_applied = self
            .applications
            .find_by_job_and_student(job_id, student_id)?
            .is_some();
        Ok(JobListing { job, has_applied })
    }

    /// Submit an application to an open posting. The repository's unique
    /// (job, student) insert closes the duplicate and double-submit races.
    pub fn apply(
        &self,
        student_id: &ProfileId,
        job_id: &JobId,
        cover_letter: String,
    ) -> Result<Application, PortalError> {
        let student = self.require_role(student_id, Role::Student)?;
        let job = self
            .jobs
            .fetch(job_id)?
            .ok_or(PortalError::NotFound("job"))?;
        if !job.status.is_open() {
            return Err(PortalError::JobNotOpen);
        }

        let now = Utc::now();
        let application = Application {
            id: self.next_application_id(),
            job_id: job.id,
            student_id: student.id,
            cover_letter,
            resume_url: RESUME_URL_PLACEHOLDER.to_string(),
            status: ApplicationStatus::Pending,
            applied_at: now,
            updated_at: now,
        };

        match self.applications.insert(application) {
            Ok(stored) => Ok(stored),
            Err(RepositoryError::Conflict) => Err(PortalError::DuplicateApplication),
            Err(other) => Err(PortalError::Repository(other)),
        }
    }

    /// Move an application through the review workflow. Only the HR profile
    /// owning the referenced posting may transition it.
    pub fn transition(
        &self,
        hr_id: &ProfileId,
        application_id: &ApplicationId,
        target: ApplicationStatus,
    ) -> Result<Application, PortalError> {
        let hr = self.require_role(hr_id, Role::Hr)?;
        let mut application = self
            .applications
            .fetch(application_id)?
            .ok_or(PortalError::NotFound("application"))?;
        let job = self
            .jobs
            .fetch(&application.job_id)?
            .ok_or(PortalError::NotFound("job"))?;
        if job.created_by != hr.id {
            return Err(PortalError::NotJobOwner);
        }

        application.status = application.status.transition(target)?;
        application.updated_at = Utc::now();
        self.applications.update(application.clone())?;

        tracing::info!(
            application = %application.id.0,
            status = application.status.label(),
            "application transitioned"
        );
        Ok(application)
    }

    /// Triage view for one posting, ownership-checked.
    pub fn applications_for_job(
        &self,
        hr_id: &ProfileId,
        job_id: &JobId,
    ) -> Result<Vec<HrApplication>, PortalError> {
        let hr = self.require_role(hr_id, Role::Hr)?;
        let job = self
            .jobs
            .fetch(job_id)?
            .ok_or(PortalError::NotFound("job"))?;
        if job.created_by != hr.id {
            return Err(PortalError::NotJobOwner);
        }

        let applications = self.applications.list_by_job(job_id)?;
        applications
            .into_iter()
            .map(|application| self.hr_view(&job, application))
            .collect()
    }

    /// Every application received across the caller's postings, newest first.
    pub fn applications_for_hr(
        &self,
        hr_id: &ProfileId,
    ) -> Result<Vec<HrApplication>, PortalError> {
        let hr = self.require_role(hr_id, Role::Hr)?;
        let jobs = self.jobs.list_by_creator(&hr.id)?;
        let job_ids: Vec<JobId> = jobs.iter().map(|job| job.id.clone()).collect();
        let applications = self.applications.list_by_jobs(&job_ids)?;

        applications
            .into_iter()
            .map(|application| {
                let job = jobs
                    .iter()
                    .find(|job| job.id == application.job_id)
                    .ok_or(PortalError::NotFound("job"))?;
                self.hr_view(job, application)
            })
            .collect()
    }

    /// The student's tracker: per-status tally plus the joined rows.
    pub fn student_applications(
        &self,
        student_id: &ProfileId,
    ) -> Result<StudentTracker, PortalError> {
        let student = self.require_role(student_id, Role::Student)?;
        let applications = self.applications.list_by_student(&student.id)?;
        let stats = ApplicationStats::tally(&applications);

        let applications = applications
            .into_iter()
            .map(|application| {
                let job = self
                    .jobs
                    .fetch(&application.job_id)?
                    .ok_or(PortalError::NotFound("job"))?;
                Ok(StudentApplication {
                    id: application.id,
                    job_id: job.id,
                    job_title: job.title,
                    company_name: job.company_name,
                    location: job.location,
                    status: application.status,
                    applied_at: application.applied_at,
                    updated_at: application.updated_at,
                })
            })
            .collect::<Result<Vec<_>, PortalError>>()?;

        Ok(StudentTracker {
            stats,
            applications,
        })
    }

    /// Counters and posting table backing the HR landing page.
    pub fn hr_dashboard(&self, hr_id: &ProfileId) -> Result<HrDashboard, PortalError> {
        let hr = self.require_role(hr_id, Role::Hr)?;
        let jobs = self.jobs.list_by_creator(&hr.id)?;
        let job_ids: Vec<JobId> = jobs.iter().map(|job| job.id.clone()).collect();
        let applications = self.applications.list_by_jobs(&job_ids)?;

        Ok(HrDashboard {
            active_jobs: jobs.iter().filter(|job| job.status.is_open()).count(),
            total_applications: applications.len(),
            pending_review: applications
                .iter()
                .filter(|application| application.status == ApplicationStatus::Pending)
                .count(),
            jobs,
        })
    }

    fn require_role(&self, id: &ProfileId, role: Role) -> Result<Profile, PortalError> {
        let profile = self.profile(id)?;
        if profile.role != role {
            return Err(PortalError::RoleRequired(role));
        }
        Ok(profile)
    }

    fn hr_view(&self, job: &Job, application: Application) -> Result<HrApplication, PortalError> {
        let student = self.profile(&application.student_id)?;
        Ok(HrApplication {
            id: application.id,
            job_id: job.id.clone(),
            job_title: job.title.clone(),
            company_name: job.company_name.clone(),
            student_name: student.full_name,
            student_email: student.email,
            status: application.status,
            applied_at: application.applied_at,
            updated_at: application.updated_at,
        })
    }
}

/// Error raised by the portal service.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("this action requires the {} role", .0.label())]
    RoleRequired(Role),
    #[error("job is not accepting applications")]
    JobNotOpen,
    #[error("an application for this job already exists")]
    DuplicateApplication,
    #[error("email is already registered")]
    DuplicateEmail,
    #[error("only the posting owner may review its applications")]
    NotJobOwner,
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Detail view of a posting for the student section.
#[derive(Debug, Clone, Serialize)]
pub struct JobListing {
    pub job: Job,
    pub has_applied: bool,
}

/// Row in the HR triage tables, joined with posting and candidate data.
#[derive(Debug, Clone, Serialize)]
pub struct HrApplication {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub job_title: String,
    pub company_name: String,
    pub student_name: String,
    pub student_email: String,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row in the student tracker, joined with posting data.
#[derive(Debug, Clone, Serialize)]
pub struct StudentApplication {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub job_title: String,
    pub company_name: String,
    pub location: String,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-status tally shown at the top of the student tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplicationStats {
    pub total: usize,
    pub pending: usize,
    pub shortlisted: usize,
    pub accepted: usize,
    pub rejected: usize,
}

impl ApplicationStats {
    pub fn tally(applications: &[Application]) -> Self {
        let mut stats = Self::default();
        for application in applications {
            stats.total += 1;
            match application.status {
                ApplicationStatus::Pending => stats.pending += 1,
                ApplicationStatus::Shortlisted => stats.shortlisted += 1,
                ApplicationStatus::Accepted => stats.accepted += 1,
                ApplicationStatus::Rejected => stats.rejected += 1,
            }
        }
        stats
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentTracker {
    pub stats: ApplicationStats,
    pub applications: Vec<StudentApplication>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HrDashboard {
    pub active_jobs: usize,
    pub total_applications: usize,
    pub pending_review: usize,
    pub jobs: Vec<Job>,
}
