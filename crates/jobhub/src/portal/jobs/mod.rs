pub mod domain;
pub mod filter;
pub mod repository;

pub use domain::{Job, JobDraft, JobDraftError, JobId, JobStatus, JobType};
pub use filter::JobFilter;
pub use repository::JobRepository;
