use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::UserId;
use crate::workflows::enrollment::domain::{
    AcademicDetails, GuardianDetails, PersonalDetails, ValidationError,
};

/// Identifier wrapper for application rows; assigned by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Decision state tracked per application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

/// What a student keys in when applying; validated before any write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationForm {
    pub personal: PersonalDetails,
    pub academic: AcademicDetails,
    #[serde(default)]
    pub guardian: GuardianDetails,
}

impl ApplicationForm {
    /// Presence check for the required subset. `education_level` needs no
    /// check here: the closed enum refuses unknown values at the edge.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        self.personal.collect_missing(&mut missing);
        self.academic.collect_missing(&mut missing);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields(missing))
        }
    }
}

/// A persisted application row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub student_user_id: UserId,
    pub status: ApplicationStatus,
    /// Present exactly while the status is rejected.
    pub rejection_reason: Option<String>,
    pub personal: PersonalDetails,
    pub academic: AcademicDetails,
    pub guardian: GuardianDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    /// Payload the status page renders for the owning student.
    pub fn status_view(&self) -> ApplicationStatusView {
        ApplicationStatusView {
            application_id: self.id.clone(),
            status: self.status.label(),
            rejection_reason: self.rejection_reason.clone(),
            submitted_at: self.created_at,
        }
    }
}

/// Sanitized representation of an application's decision state.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    pub submitted_at: DateTime<Utc>,
}
