use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use super::profiles::{Profile, ProfileId, Role};

/// Header carrying the externally issued session token.
pub const SESSION_HEADER: &str = "x-session-token";

/// Resolved identity attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub profile_id: ProfileId,
    pub role: Role,
}

/// Seam over the hosted auth service: issues a token when a profile signs up
/// and resolves tokens on each request. Adapters own storage and expiry.
pub trait SessionStore: Send + Sync {
    fn issue(&self, profile: &Profile) -> Result<String, AuthError>;
    fn resolve(&self, token: &str) -> Result<Session, AuthError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("not authenticated")]
    Unauthenticated,
    #[error("this section requires the {} role", required.label())]
    WrongSection { required: Role, actual: Role },
    #[error("session backend unavailable: {0}")]
    Unavailable(String),
}

/// Gate a request on a role, mirroring the portal's protected sections:
/// anonymous callers are pointed at the login page, mis-scoped callers at
/// their own section's landing page.
pub fn require_role<S: SessionStore>(
    sessions: &S,
    headers: &HeaderMap,
    required: Role,
) -> Result<Session, AuthError> {
    let token = headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .ok_or(AuthError::Unauthenticated)?;

    let session = sessions.resolve(token)?;
    if session.role != required {
        return Err(AuthError::WrongSection {
            required,
            actual: session.role,
        });
    }
    Ok(session)
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            AuthError::Unauthenticated => {
                let payload = json!({ "error": message, "redirect": "/auth/login" });
                (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
            }
            AuthError::WrongSection { actual, .. } => {
                let payload = json!({ "error": message, "redirect": actual.section_home() });
                (StatusCode::FORBIDDEN, Json(payload)).into_response()
            }
            AuthError::Unavailable(_) => {
                let payload = json!({ "error": message });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
            }
        }
    }
}
