//! Authoritative student records owned by school admins.
//!
//! A record comes into existence either through an application approval
//! (the derived write in the admissions service) or directly through the
//! admin management endpoints here. It carries no reference back to any
//! application.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{NewStudentRecord, StudentRecord, StudentRecordId};
pub use repository::{RepositoryError, StudentRecordRepository};
pub use router::records_router;
pub use service::{RecordsError, RecordsService};
