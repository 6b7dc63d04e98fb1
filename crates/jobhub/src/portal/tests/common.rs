use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::portal::applications::{Application, ApplicationId, ApplicationRepository};
use crate::portal::auth::{AuthError, Session, SessionStore, SESSION_HEADER};
use crate::portal::jobs::{Job, JobDraft, JobId, JobRepository, JobType};
use crate::portal::profiles::{Profile, ProfileId, ProfileRepository, Role, SignupRequest};
use crate::portal::router::{portal_router, PortalState};
use crate::portal::service::PortalService;
use crate::portal::RepositoryError;

pub(super) type MemoryService = PortalService<MemoryProfiles, MemoryJobs, MemoryApplications>;

pub(super) fn draft() -> JobDraft {
    JobDraft {
        title: "Backend Engineer".to_string(),
        company_name: "Crater Labs".to_string(),
        description: "Own the placement APIs end to end.".to_string(),
        qualifications: "Rust and SQL experience".to_string(),
        location: "Berlin".to_string(),
        job_type: JobType::FullTime,
        salary_min: Some(60_000),
        salary_max: Some(80_000),
        deadline: NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
    }
}

pub(super) fn build_service() -> (
    Arc<MemoryService>,
    Arc<MemoryProfiles>,
    Arc<MemoryJobs>,
    Arc<MemoryApplications>,
) {
    let profiles = Arc::new(MemoryProfiles::default());
    let jobs = Arc::new(MemoryJobs::default());
    let applications = Arc::new(MemoryApplications::default());
    let service = Arc::new(PortalService::new(
        profiles.clone(),
        jobs.clone(),
        applications.clone(),
    ));
    (service, profiles, jobs, applications)
}

pub(super) fn build_router() -> (axum::Router, Arc<MemoryService>, Arc<MemoryJobs>) {
    let (service, _, jobs, _) = build_service();
    let sessions = Arc::new(MemorySessions::default());
    let router = portal_router(PortalState {
        service: service.clone(),
        sessions,
    });
    (router, service, jobs)
}

pub(super) fn signup_hr(service: &MemoryService) -> Profile {
    service
        .signup(SignupRequest {
            full_name: "Priya Nair".to_string(),
            email: "priya@crater.example".to_string(),
            role: Role::Hr,
        })
        .expect("hr signup succeeds")
}

pub(super) fn signup_student(service: &MemoryService) -> Profile {
    service
        .signup(SignupRequest {
            full_name: "Jonas Weber".to_string(),
            email: "jonas@uni.example".to_string(),
            role: Role::Student,
        })
        .expect("student signup succeeds")
}

#[derive(Default)]
pub(super) struct MemoryProfiles {
    pub(super) records: Mutex<HashMap<ProfileId, Profile>>,
}

impl ProfileRepository for MemoryProfiles {
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

#[derive(Default)]
pub(super) struct MemoryJobs {
    pub(super) records: Mutex<HashMap<JobId, Job>>,
}

fn jobs_newest_first(mut jobs: Vec<Job>) -> Vec<Job> {
    jobs.sort_by(|a, b| (b.created_at, &b.id.0).cmp(&(a.created_at, &a.id.0)));
    jobs
}

impl JobRepository for MemoryJobs {
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

#[derive(Default)]
pub(super) struct MemoryApplications {
    pub(super) records: Mutex<HashMap<ApplicationId, Application>>,
}

fn applications_newest_first(mut applications: Vec<Application>) -> Vec<Application> {
    applications.sort_by(|a, b| (b.applied_at, &b.id.0).cmp(&(a.applied_at, &a.id.0)));
    applications
}

impl ApplicationRepository for MemoryApplications {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        // Duplicate scan and insert happen under one lock, the in-memory
        // stand-in for the store's unique (job_id, student_id) index.
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
        guard.insert(application.id.clone(), application);
        Ok(())
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

pub(super) struct UnavailableJobs;

impl JobRepository for UnavailableJobs {
    fn insert(&self, _job: Job) -> Result<Job, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &JobId) -> Result<Option<Job>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_open(&self) -> Result<Vec<Job>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_by_creator(&self, _creator: &ProfileId) -> Result<Vec<Job>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemorySessions {
    tokens: Mutex<HashMap<String, Session>>,
    sequence: AtomicU64,
}

impl SessionStore for MemorySessions {
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

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn post_json(
    router: &axum::Router,
    path: &str,
    token: Option<&str>,
    body: Value,
) -> Response {
    let mut request = Request::post(path).header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        request = request.header(SESSION_HEADER, token);
    }
    router
        .clone()
        .oneshot(
            request
                .body(Body::from(serde_json::to_vec(&body).expect("serialize")))
                .expect("build request"),
        )
        .await
        .expect("route executes")
}

pub(super) async fn get_path(router: &axum::Router, path: &str, token: Option<&str>) -> Response {
    let mut request = Request::get(path);
    if let Some(token) = token {
        request = request.header(SESSION_HEADER, token);
    }
    router
        .clone()
        .oneshot(request.body(Body::empty()).expect("build request"))
        .await
        .expect("route executes")
}

pub(super) async fn signup_via_http(
    router: &axum::Router,
    full_name: &str,
    email: &str,
    role: &str,
) -> String {
    let response = post_json(
        router,
        "/api/v1/signup",
        None,
        json!({ "full_name": full_name, "email": email, "role": role }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    payload["session_token"]
        .as_str()
        .expect("session token")
        .to_string()
}
