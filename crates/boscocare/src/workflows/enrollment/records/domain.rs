use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::enrollment::applications::domain::Application;
use crate::workflows::enrollment::domain::{
    AcademicDetails, GuardianDetails, PersonalDetails, ValidationError,
};

/// Identifier wrapper for student record rows; assigned by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudentRecordId(pub String);

/// Enrollment status written when an approval derives a record. The column
/// itself stays free text so admins can mark e.g. "Transferred" later.
pub const ENROLLED_STATUS: &str = "Active";

/// The authoritative record a school admin manages after enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: StudentRecordId,
    pub personal: PersonalDetails,
    pub academic: AcademicDetails,
    pub guardian: GuardianDetails,
    pub current_status: String,
    pub average_grade: Option<String>,
    pub subjects_courses: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row content for inserts and full-row updates; id and timestamps stay
/// with the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudentRecord {
    pub personal: PersonalDetails,
    pub academic: AcademicDetails,
    #[serde(default)]
    pub guardian: GuardianDetails,
    pub current_status: String,
    #[serde(default)]
    pub average_grade: Option<String>,
    #[serde(default)]
    pub subjects_courses: Option<String>,
}

impl NewStudentRecord {
    /// The derived write performed by an approval: a 1:1 copy of the
    /// application's detail blocks with a fresh enrollment status.
    pub fn from_application(application: &Application) -> Self {
        Self {
            personal: application.personal.clone(),
            academic: application.academic.clone(),
            guardian: application.guardian.clone(),
            current_status: ENROLLED_STATUS.to_string(),
            average_grade: None,
            subjects_courses: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        self.personal.collect_missing(&mut missing);
        self.academic.collect_missing(&mut missing);
        if self.current_status.trim().is_empty() {
            missing.push("current_status");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields(missing))
        }
    }
}
