pub use crate::workflows::enrollment::applications::repository::RepositoryError;

use super::domain::{NewStudentRecord, StudentRecord, StudentRecordId};

/// Storage seam over the `student_records` table.
pub trait StudentRecordRepository: Send + Sync {
    fn insert(&self, row: NewStudentRecord) -> Result<StudentRecord, RepositoryError>;
    fn fetch(&self, id: &StudentRecordId) -> Result<Option<StudentRecord>, RepositoryError>;
    fn list(&self) -> Result<Vec<StudentRecord>, RepositoryError>;
    /// Full-row replacement; partial patches are not part of this seam.
    fn update(
        &self,
        id: &StudentRecordId,
        row: NewStudentRecord,
    ) -> Result<StudentRecord, RepositoryError>;
    fn delete(&self, id: &StudentRecordId) -> Result<(), RepositoryError>;
}
