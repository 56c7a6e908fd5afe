use crate::identity::UserId;

use super::domain::{Application, ApplicationForm, ApplicationId, ApplicationStatus};

/// Row content handed to the store; id and timestamps are store-assigned.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub student_user_id: UserId,
    pub status: ApplicationStatus,
    pub form: ApplicationForm,
}

/// Storage seam over the `applications` table so the service can be
/// exercised against in-memory doubles.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, row: NewApplication) -> Result<Application, RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    /// At most one row is expected per student; the store does not enforce it.
    fn find_by_student(&self, student: &UserId) -> Result<Option<Application>, RepositoryError>;
    /// Every application, newest submission first. The admin queue shows all
    /// of them without pagination.
    fn list_newest_first(&self) -> Result<Vec<Application>, RepositoryError>;
    /// Patch the decision columns in place, bumping `updated_at`. No other
    /// column changes.
    fn set_decision(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
        rejection_reason: Option<String>,
    ) -> Result<Application, RepositoryError>;
}

/// Failures surfaced by the record store, reported once and never retried.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("row already exists")]
    Conflict,
    #[error("row not found")]
    NotFound,
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}
