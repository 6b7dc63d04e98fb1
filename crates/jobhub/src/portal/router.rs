use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::applications::{ApplicationId, ApplicationRepository, ApplicationStatus};
use super::auth::{require_role, SessionStore};
use super::jobs::{JobDraft, JobFilter, JobId, JobRepository};
use super::profiles::{ProfileRepository, Role, SignupRequest};
use super::service::{PortalError, PortalService};

/// Shared handler state: the portal service plus the session seam.
pub struct PortalState<P, J, A, S> {
    pub service: Arc<PortalService<P, J, A>>,
    pub sessions: Arc<S>,
}

impl<P, J, A, S> Clone for PortalState<P, J, A, S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            sessions: Arc::clone(&self.sessions),
        }
    }
}

/// Versioned API surface. The student and HR subtrees mirror the portal's
/// protected sections; signup is the only anonymous route.
pub fn portal_router<P, J, A, S>(state: PortalState<P, J, A, S>) -> Router
where
    P: ProfileRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    S: SessionStore + 'static,
{
    Router::new()
        .route("/api/v1/signup", post(signup::<P, J, A, S>))
        .route("/api/v1/student/jobs", get(list_jobs::<P, J, A, S>))
        .route(
            "/api/v1/student/jobs/:job_id",
            get(job_listing::<P, J, A, S>),
        )
        .route(
            "/api/v1/student/applications",
            post(apply::<P, J, A, S>).get(tracker::<P, J, A, S>),
        )
        .route("/api/v1/hr/jobs", post(post_job::<P, J, A, S>))
        .route("/api/v1/hr/dashboard", get(dashboard::<P, J, A, S>))
        .route(
            "/api/v1/hr/applications",
            get(hr_applications::<P, J, A, S>),
        )
        .route(
            "/api/v1/hr/jobs/:job_id/applications",
            get(job_applications::<P, J, A, S>),
        )
        .route(
            "/api/v1/hr/applications/:application_id/status",
            post(transition::<P, J, A, S>),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ApplyRequest {
    job_id: String,
    #[serde(default)]
    cover_letter: String,
}

#[derive(Debug, Deserialize)]
struct TransitionRequest {
    status: ApplicationStatus,
}

async fn signup<P, J, A, S>(
    State(state): State<PortalState<P, J, A, S>>,
    Json(request): Json<SignupRequest>,
) -> Response
where
    P: ProfileRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    S: SessionStore + 'static,
{
    let profile = match state.service.signup(request) {
        Ok(profile) => profile,
        Err(err) => return err.into_response(),
    };
    let token = match state.sessions.issue(&profile) {
        Ok(token) => token,
        Err(err) => return err.into_response(),
    };
    let payload = json!({ "profile": profile, "session_token": token });
    (StatusCode::CREATED, Json(payload)).into_response()
}

async fn list_jobs<P, J, A, S>(
    State(state): State<PortalState<P, J, A, S>>,
    headers: HeaderMap,
    Query(filter): Query<JobFilter>,
) -> Response
where
    P: ProfileRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    S: SessionStore + 'static,
{
    if let Err(err) = require_role(state.sessions.as_ref(), &headers, Role::Student) {
        return err.into_response();
    }
    match state.service.list_open_jobs(&filter) {
        Ok(jobs) => Json(json!({ "jobs": jobs })).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn job_listing<P, J, A, S>(
    State(state): State<PortalState<P, J, A, S>>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Response
where
    P: ProfileRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    S: SessionStore + 'static,
{
    let session = match require_role(state.sessions.as_ref(), &headers, Role::Student) {
        Ok(session) => session,
        Err(err) => return err.into_response(),
    };
    match state
        .service
        .job_listing(&session.profile_id, &JobId(job_id))
    {
        Ok(listing) => Json(listing).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn apply<P, J, A, S>(
    State(state): State<PortalState<P, J, A, S>>,
    headers: HeaderMap,
    Json(request): Json<ApplyRequest>,
) -> Response
where
    P: ProfileRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    S: SessionStore + 'static,
{
    let session = match require_role(state.sessions.as_ref(), &headers, Role::Student) {
        Ok(session) => session,
        Err(err) => return err.into_response(),
    };
    match state.service.apply(
        &session.profile_id,
        &JobId(request.job_id),
        request.cover_letter,
    ) {
        Ok(application) => (StatusCode::CREATED, Json(application)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn tracker<P, J, A, S>(
    State(state): State<PortalState<P, J, A, S>>,
    headers: HeaderMap,
) -> Response
where
    P: ProfileRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    S: SessionStore + 'static,
{
    let session = match require_role(state.sessions.as_ref(), &headers, Role::Student) {
        Ok(session) => session,
        Err(err) => return err.into_response(),
    };
    match state.service.student_applications(&session.profile_id) {
        Ok(tracker) => Json(tracker).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn post_job<P, J, A, S>(
    State(state): State<PortalState<P, J, A, S>>,
    headers: HeaderMap,
    Json(draft): Json<JobDraft>,
) -> Response
where
    P: ProfileRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    S: SessionStore + 'static,
{
    let session = match require_role(state.sessions.as_ref(), &headers, Role::Hr) {
        Ok(session) => session,
        Err(err) => return err.into_response(),
    };
    match state.service.post_job(&session.profile_id, draft) {
        Ok(job) => (StatusCode::CREATED, Json(job)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn dashboard<P, J, A, S>(
    State(state): State<PortalState<P, J, A, S>>,
    headers: HeaderMap,
) -> Response
where
    P: ProfileRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    S: SessionStore + 'static,
{
    let session = match require_role(state.sessions.as_ref(), &headers, Role::Hr) {
        Ok(session) => session,
        Err(err) => return err.into_response(),
    };
    match state.service.hr_dashboard(&session.profile_id) {
        Ok(dashboard) => Json(dashboard).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn hr_applications<P, J, A, S>(
    State(state): State<PortalState<P, J, A, S>>,
    headers: HeaderMap,
) -> Response
where
    P: ProfileRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    S: SessionStore + 'static,
{
    let session = match require_role(state.sessions.as_ref(), &headers, Role::Hr) {
        Ok(session) => session,
        Err(err) => return err.into_response(),
    };
    match state.service.applications_for_hr(&session.profile_id) {
        Ok(applications) => Json(json!({ "applications": applications })).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn job_applications<P, J, A, S>(
    State(state): State<PortalState<P, J, A, S>>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Response
where
    P: ProfileRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    S: SessionStore + 'static,
{
    let session = match require_role(state.sessions.as_ref(), &headers, Role::Hr) {
        Ok(session) => session,
        Err(err) => return err.into_response(),
    };
    match state
        .service
        .applications_for_job(&session.profile_id, &JobId(job_id))
    {
        Ok(applications) => Json(json!({ "applications": applications })).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn transition<P, J, A, S>(
    State(state): State<PortalState<P, J, A, S>>,
    headers: HeaderMap,
    Path(application_id): Path<String>,
    Json(request): Json<TransitionRequest>,
) -> Response
where
    P: ProfileRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
    S: SessionStore + 'static,
{
    let session = match require_role(state.sessions.as_ref(), &headers, Role::Hr) {
        Ok(session) => session,
        Err(err) => return err.into_response(),
    };
    match state.service.transition(
        &session.profile_id,
        &ApplicationId(application_id),
        request.status,
    ) {
        Ok(application) => Json(application).into_response(),
        Err(err) => err.into_response(),
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = match &self {
            PortalError::Validation(_) | PortalError::JobNotOpen => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            PortalError::Transition(_)
            | PortalError::DuplicateApplication
            | PortalError::DuplicateEmail => StatusCode::CONFLICT,
            PortalError::NotFound(_) => StatusCode::NOT_FOUND,
            PortalError::RoleRequired(_) | PortalError::NotJobOwner => StatusCode::FORBIDDEN,
            PortalError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "portal request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
