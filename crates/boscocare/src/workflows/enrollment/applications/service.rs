use std::sync::Arc;

use tracing::warn;

use crate::identity::{AccessDenied, AuthContext};
use crate::workflows::enrollment::domain::ValidationError;
use crate::workflows::enrollment::records::domain::{NewStudentRecord, StudentRecord};
use crate::workflows::enrollment::records::repository::StudentRecordRepository;

use super::domain::{Application, ApplicationForm, ApplicationId, ApplicationStatus};
use super::repository::{ApplicationRepository, NewApplication, RepositoryError};

/// Facade over the application lifecycle: intake, the student status view,
/// resubmission, and the admin review queue with its decisions.
///
/// The duplicate-submission check is a best-effort read; the record store
/// offers no uniqueness constraint, so two interleaved submissions can both
/// land. Decisions are instead guarded on the current status, which keeps a
/// double approval from minting two student records.
pub struct AdmissionsService<A, S> {
    applications: Arc<A>,
    students: Arc<S>,
}

impl<A, S> AdmissionsService<A, S>
where
    A: ApplicationRepository + 'static,
    S: StudentRecordRepository + 'static,
{
    pub fn new(applications: Arc<A>, students: Arc<S>) -> Self {
        Self {
            applications,
            students,
        }
    }

    /// File a new application for the calling student.
    pub fn submit(
        &self,
        ctx: &AuthContext,
        form: ApplicationForm,
    ) -> Result<Application, AdmissionsError> {
        form.validate()?;

        if self.applications.find_by_student(&ctx.user_id)?.is_some() {
            return Err(AdmissionsError::AlreadyApplied);
        }

        let stored = self.applications.insert(NewApplication {
            student_user_id: ctx.user_id.clone(),
            status: ApplicationStatus::Pending,
            form,
        })?;
        Ok(stored)
    }

    /// The caller's own application, if any. Pure read.
    pub fn view_status(&self, ctx: &AuthContext) -> Result<Option<Application>, AdmissionsError> {
        Ok(self.applications.find_by_student(&ctx.user_id)?)
    }

    /// Put a rejected application back into the review queue, clearing the
    /// stored reason. Every other field keeps its originally submitted value.
    pub fn resubmit(
        &self,
        ctx: &AuthContext,
        id: &ApplicationId,
    ) -> Result<Application, AdmissionsError> {
        let application = self.fetch(id)?;
        if application.student_user_id != ctx.user_id {
            return Err(AdmissionsError::NotOwner);
        }
        require_status(&application, ApplicationStatus::Rejected, "resubmitted")?;

        Ok(self
            .applications
            .set_decision(id, ApplicationStatus::Pending, None)?)
    }

    /// Every application, newest first, for the admin review screen.
    pub fn review_queue(&self, ctx: &AuthContext) -> Result<Vec<Application>, AdmissionsError> {
        ctx.require_admin()?;
        Ok(self.applications.list_newest_first()?)
    }

    /// Approve a pending application: copy its details into a new student
    /// record, then flip the application status. The store cannot do both in
    /// one transaction, so when the status flip fails the derived record is
    /// deleted again rather than leaving a half-approved pair behind.
    pub fn approve(
        &self,
        ctx: &AuthContext,
        id: &ApplicationId,
    ) -> Result<StudentRecord, AdmissionsError> {
        ctx.require_admin()?;
        let application = self.fetch(id)?;
        require_status(&application, ApplicationStatus::Pending, "approved")?;

        let record = self
            .students
            .insert(NewStudentRecord::from_application(&application))?;

        if let Err(err) = self
            .applications
            .set_decision(id, ApplicationStatus::Approved, None)
        {
            if let Err(cleanup) = self.students.delete(&record.id) {
                warn!(
                    application = %id.0,
                    student_record = %record.id.0,
                    %cleanup,
                    "could not roll back student record after status update failure"
                );
            }
            return Err(err.into());
        }

        Ok(record)
    }

    /// Reject a pending application with a reason the student will see on
    /// their status page. Blank reasons are refused before any write.
    pub fn reject(
        &self,
        ctx: &AuthContext,
        id: &ApplicationId,
        reason: &str,
    ) -> Result<Application, AdmissionsError> {
        ctx.require_admin()?;
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ValidationError::BlankRejectionReason.into());
        }
        let application = self.fetch(id)?;
        require_status(&application, ApplicationStatus::Pending, "rejected")?;

        Ok(self.applications.set_decision(
            id,
            ApplicationStatus::Rejected,
            Some(reason.to_string()),
        )?)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Application, AdmissionsError> {
        self.applications
            .fetch(id)?
            .ok_or(AdmissionsError::NotFound)
    }
}

fn require_status(
    application: &Application,
    expected: ApplicationStatus,
    attempted: &'static str,
) -> Result<(), AdmissionsError> {
    if application.status == expected {
        Ok(())
    } else {
        Err(AdmissionsError::InvalidTransition {
            current: application.status,
            attempted,
        })
    }
}

/// Error raised by the admissions service.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionsError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("an application is already on file for this student")]
    AlreadyApplied,
    #[error("application not found")]
    NotFound,
    #[error("application belongs to a different student")]
    NotOwner,
    #[error("a {} application cannot be {attempted}", .current.label())]
    InvalidTransition {
        current: ApplicationStatus,
        attempted: &'static str,
    },
    #[error(transparent)]
    Forbidden(#[from] AccessDenied),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
