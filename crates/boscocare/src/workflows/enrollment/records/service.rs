use std::sync::Arc;

use crate::identity::{AccessDenied, AuthContext};
use crate::workflows::enrollment::domain::ValidationError;

use super::domain::{NewStudentRecord, StudentRecord, StudentRecordId};
use super::repository::{RepositoryError, StudentRecordRepository};

/// Admin-only management of the authoritative student records.
pub struct RecordsService<S> {
    records: Arc<S>,
}

impl<S> RecordsService<S>
where
    S: StudentRecordRepository + 'static,
{
    pub fn new(records: Arc<S>) -> Self {
        Self { records }
    }

    pub fn list(&self, ctx: &AuthContext) -> Result<Vec<StudentRecord>, RecordsError> {
        ctx.require_admin()?;
        Ok(self.records.list()?)
    }

    pub fn get(
        &self,
        ctx: &AuthContext,
        id: &StudentRecordId,
    ) -> Result<StudentRecord, RecordsError> {
        ctx.require_admin()?;
        self.records
            .fetch(id)?
            .ok_or(RecordsError::Repository(RepositoryError::NotFound))
    }

    pub fn create(
        &self,
        ctx: &AuthContext,
        row: NewStudentRecord,
    ) -> Result<StudentRecord, RecordsError> {
        ctx.require_admin()?;
        row.validate()?;
        Ok(self.records.insert(row)?)
    }

    pub fn update(
        &self,
        ctx: &AuthContext,
        id: &StudentRecordId,
        row: NewStudentRecord,
    ) -> Result<StudentRecord, RecordsError> {
        ctx.require_admin()?;
        row.validate()?;
        Ok(self.records.update(id, row)?)
    }

    pub fn remove(&self, ctx: &AuthContext, id: &StudentRecordId) -> Result<(), RecordsError> {
        ctx.require_admin()?;
        Ok(self.records.delete(id)?)
    }
}

/// Error raised by the records service.
#[derive(Debug, thiserror::Error)]
pub enum RecordsError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Forbidden(#[from] AccessDenied),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
