use serde::{Deserialize, Serialize};

use super::RepositoryError;

/// Identifier wrapper for signed-up profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileId(pub String);

/// The two sides of the portal. Picked at signup and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Hr,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Hr => "hr",
        }
    }

    /// Landing page of the role's section, used when redirecting mis-scoped callers.
    pub const fn section_home(self) -> &'static str {
        match self {
            Role::Student => "/student/jobs",
            Role::Hr => "/hr/dashboard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub full_name: String,
    pub email: String,
    pub role: Role,
}

/// Signup payload. Credentials stay with the external identity provider;
/// the portal only records the directory entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub full_name: String,
    pub email: String,
    pub role: Role,
}

/// Storage abstraction over the profile directory.
pub trait ProfileRepository: Send + Sync {
    /// Insert a new profile. `Conflict` when the email is already registered.
    fn insert(&self, profile: Profile) -> Result<Profile, RepositoryError>;
    fn fetch(&self, id: &ProfileId) -> Result<Option<Profile>, RepositoryError>;
}
