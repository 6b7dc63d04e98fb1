pub mod domain;
pub mod repository;

pub use domain::{
    Application, ApplicationId, ApplicationStatus, TransitionError, RESUME_URL_PLACEHOLDER,
};
pub use repository::ApplicationRepository;
