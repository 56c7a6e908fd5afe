//! Student application intake and admin review.
//!
//! An application moves from pending to approved or rejected under an admin
//! decision. A rejected application can be resubmitted by its owner, which
//! resets it to pending and clears the stored reason while keeping every
//! submitted field. Approval copies the applicant's details into a new
//! authoritative student record; the application row itself is never linked
//! to or updated from that record afterwards.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationForm, ApplicationId, ApplicationStatus, ApplicationStatusView,
};
pub use repository::{ApplicationRepository, NewApplication, RepositoryError};
pub use router::admissions_router;
pub use service::{AdmissionsError, AdmissionsService};
