use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identity and contact block shared by applications and student records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalDetails {
    pub full_name: String,
    /// School-issued student number, distinct from the auth user id.
    pub student_id: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub email_address: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

/// Placement block: where the student sits in the school's program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicDetails {
    pub education_level: EducationLevel,
    /// Free text, e.g. "Grade 7" or "Year 1".
    pub grade_year_level: String,
    pub section_program: Option<String>,
}

/// Parent or guardian contact block; entirely optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardianDetails {
    pub parent_guardian_name: Option<String>,
    pub guardian_contact: Option<String>,
    pub guardian_relationship: Option<String>,
}

/// Levels the school enrolls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    Elementary,
    JuniorHigh,
    SeniorHigh,
    College,
}

impl EducationLevel {
    pub const fn label(self) -> &'static str {
        match self {
            EducationLevel::Elementary => "elementary",
            EducationLevel::JuniorHigh => "junior_high",
            EducationLevel::SeniorHigh => "senior_high",
            EducationLevel::College => "college",
        }
    }
}

/// Raised before any write when submitted data is unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("required fields missing: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("rejection reason must not be blank")]
    BlankRejectionReason,
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl PersonalDetails {
    pub(crate) fn collect_missing(&self, missing: &mut Vec<&'static str>) {
        if blank(&self.full_name) {
            missing.push("full_name");
        }
        if blank(&self.student_id) {
            missing.push("student_id");
        }
        if blank(&self.email_address) {
            missing.push("email_address");
        }
    }
}

impl AcademicDetails {
    pub(crate) fn collect_missing(&self, missing: &mut Vec<&'static str>) {
        if blank(&self.grade_year_level) {
            missing.push("grade_year_level");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn education_level_serializes_snake_case() {
        let level = serde_json::to_value(EducationLevel::SeniorHigh).expect("serializes");
        assert_eq!(level, serde_json::json!("senior_high"));
        let parsed: EducationLevel =
            serde_json::from_value(serde_json::json!("junior_high")).expect("parses");
        assert_eq!(parsed, EducationLevel::JuniorHigh);
    }

    #[test]
    fn blank_fields_are_reported_by_name() {
        let personal = PersonalDetails {
            full_name: "   ".to_string(),
            student_id: "2024-00123".to_string(),
            date_of_birth: None,
            gender: None,
            email_address: String::new(),
            phone_number: None,
            address: None,
        };
        let mut missing = Vec::new();
        personal.collect_missing(&mut missing);
        assert_eq!(missing, vec!["full_name", "email_address"]);
    }
}
