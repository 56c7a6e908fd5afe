//! Enrollment workflows: student application intake, admin review, and the
//! authoritative student records derived from approvals.
//!
//! The record store behind these modules is a remote table-oriented backend
//! reached one request at a time; no transactions span calls. Invariants the
//! store cannot enforce (one open application per student, decisions only on
//! pending applications) are enforced by the service facades here.

pub mod applications;
pub mod domain;
pub mod records;

pub use applications::{
    admissions_router, AdmissionsError, AdmissionsService, Application, ApplicationForm,
    ApplicationId, ApplicationRepository, ApplicationStatus, ApplicationStatusView,
    NewApplication,
};
pub use domain::{
    AcademicDetails, EducationLevel, GuardianDetails, PersonalDetails, ValidationError,
};
pub use records::{
    records_router, NewStudentRecord, RecordsError, RecordsService, RepositoryError,
    StudentRecord, StudentRecordId, StudentRecordRepository,
};
