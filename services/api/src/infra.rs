use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use jobhub::portal::applications::{Application, ApplicationId, ApplicationRepository};
use jobhub::portal::auth::{AuthError, Session, SessionStore};
use jobhub::portal::jobs::{Job, JobId, JobRepository};
use jobhub::portal::profiles::{Profile, ProfileId, ProfileRepository};
use jobhub::portal::RepositoryError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileRepository {
    records: Arc<Mutex<HashMap<ProfileId, Profile>>>,
}

impl ProfileRepository for InMemoryProfileRepository {
    fn insert(&self, profile: Profile) -> Result<Profile, RepositoryError> {
        let mut guard = self.records.lock().expect("profile mutex poisoned");
        if guard.values().any(|existing| existing.email == profile.email) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    fn fetch(&self, id: &ProfileId) -> Result<Option<Profile>, RepositoryError> {
        let guard = self.records.lock().expect("profile mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryJobRepository {
    records: Arc<Mutex<HashMap<JobId, Job>>>,
}

fn jobs_newest_first(mut jobs: Vec<Job>) -> Vec<Job> {
    jobs.sort_by(|a, b| (b.created_at, &b.id.0).cmp(&(a.created_at, &a.id.0)));
    jobs
}

impl JobRepository for InMemoryJobRepository {
    fn insert(&self, job: Job) -> Result<Job, RepositoryError> {
        let mut guard = self.records.lock().expect("job mutex poisoned");
        guard.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn fetch(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        let guard = self.records.lock().expect("job mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_open(&self) -> Result<Vec<Job>, RepositoryError> {
        let guard = self.records.lock().expect("job mutex poisoned");
        Ok(jobs_newest_first(
            guard
                .values()
                .filter(|job| job.status.is_open())
                .cloned()
                .collect(),
        ))
    }

    fn list_by_creator(&self, creator: &ProfileId) -> Result<Vec<Job>, RepositoryError> {
        let guard = self.records.lock().expect("job mutex poisoned");
        Ok(jobs_newest_first(
            guard
                .values()
                .filter(|job| &job.created_by == creator)
                .cloned()
                .collect(),
        ))
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    records: Arc<Mutex<HashMap<ApplicationId, Application>>>,
}

fn applications_newest_first(mut applications: Vec<Application>) -> Vec<Application> {
    applications.sort_by(|a, b| (b.applied_at, &b.id.0).cmp(&(a.applied_at, &a.id.0)));
    applications
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        // The duplicate scan and the insert share one lock, which is what
        // makes racing double-submits collapse into a single stored row.
        let mut guard = self.records.lock().expect("application mutex poisoned");
        if guard.values().any(|existing| {
            existing.job_id == application.job_id && existing.student_id == application.student_id
        }) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn update(&self, application: Application) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("application mutex poisoned");
        if guard.contains_key(&application.id) {
            guard.insert(application.id.clone(), application);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_by_job_and_student(
        &self,
        job_id: &JobId,
        student_id: &ProfileId,
    ) -> Result<Option<Application>, RepositoryError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        Ok(guard
            .values()
            .find(|application| {
                &application.job_id == job_id && &application.student_id == student_id
            })
            .cloned())
    }

    fn list_by_student(
        &self,
        student_id: &ProfileId,
    ) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        Ok(applications_newest_first(
            guard
                .values()
                .filter(|application| &application.student_id == student_id)
                .cloned()
                .collect(),
        ))
    }

    fn list_by_job(&self, job_id: &JobId) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        Ok(applications_newest_first(
            guard
                .values()
                .filter(|application| &application.job_id == job_id)
                .cloned()
                .collect(),
        ))
    }

    fn list_by_jobs(&self, job_ids: &[JobId]) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        Ok(applications_newest_first(
            guard
                .values()
                .filter(|application| job_ids.contains(&application.job_id))
                .cloned()
                .collect(),
        ))
    }
}

/// Token-keyed session map standing in for the hosted auth backend.
#[derive(Default, Clone)]
pub(crate) struct InMemorySessionStore {
    tokens: Arc<Mutex<HashMap<String, Session>>>,
    sequence: Arc<AtomicU64>,
}

impl SessionStore for InMemorySessionStore {
    fn issue(&self, profile: &Profile) -> Result<String, AuthError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let token = format!("tok-{id:06}");
        self.tokens.lock().expect("session mutex poisoned").insert(
            token.clone(),
            Session {
                profile_id: profile.id.clone(),
                role: profile.role,
            },
        );
        Ok(token)
    }

    fn resolve(&self, token: &str) -> Result<Session, AuthError> {
        self.tokens
            .lock()
            .expect("session mutex poisoned")
            .get(token)
            .cloned()
            .ok_or(AuthError::Unauthenticated)
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
