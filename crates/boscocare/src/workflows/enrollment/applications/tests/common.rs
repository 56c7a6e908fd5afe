use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::identity::{AuthContext, IdentityError, IdentityProvider, Role, UserId};
use crate::workflows::enrollment::applications::domain::{
    Application, ApplicationForm, ApplicationId, ApplicationStatus,
};
use crate::workflows::enrollment::applications::repository::{
    ApplicationRepository, NewApplication, RepositoryError,
};
use crate::workflows::enrollment::applications::router::admissions_router;
use crate::workflows::enrollment::applications::service::AdmissionsService;
use crate::workflows::enrollment::domain::{
    AcademicDetails, EducationLevel, GuardianDetails, PersonalDetails,
};
use crate::workflows::enrollment::records::domain::{NewStudentRecord, StudentRecord, StudentRecordId};
use crate::workflows::enrollment::records::repository::StudentRecordRepository;

pub(super) fn admin_ctx() -> AuthContext {
    AuthContext {
        user_id: UserId("adm-1".to_string()),
        email: "registrar@boscocare.edu".to_string(),
        role: Role::Admin,
    }
}

pub(super) fn student_ctx() -> AuthContext {
    AuthContext {
        user_id: UserId("stu-jane".to_string()),
        email: "jane@example.com".to_string(),
        role: Role::Student,
    }
}

pub(super) fn other_student_ctx() -> AuthContext {
    AuthContext {
        user_id: UserId("stu-marco".to_string()),
        email: "marco@example.com".to_string(),
        role: Role::Student,
    }
}

pub(super) fn jane_form() -> ApplicationForm {
    ApplicationForm {
        personal: PersonalDetails {
            full_name: "Jane Doe".to_string(),
            student_id: "2024-00123".to_string(),
            date_of_birth: None,
            gender: None,
            email_address: "jane@example.com".to_string(),
            phone_number: Some("0917-555-0123".to_string()),
            address: None,
        },
        academic: AcademicDetails {
            education_level: EducationLevel::SeniorHigh,
            grade_year_level: "Grade 11".to_string(),
            section_program: Some("STEM".to_string()),
        },
        guardian: GuardianDetails {
            parent_guardian_name: Some("John Doe".to_string()),
            guardian_contact: Some("0917-555-0456".to_string()),
            guardian_relationship: Some("Father".to_string()),
        },
    }
}

pub(super) fn incomplete_form() -> ApplicationForm {
    let mut form = jane_form();
    form.personal.full_name = String::new();
    form.academic.grade_year_level = "  ".to_string();
    form
}

#[derive(Default)]
pub(super) struct MemoryApplications {
    rows: Mutex<Vec<Application>>,
    sequence: AtomicU64,
}

impl ApplicationRepository for MemoryApplications {
    fn insert(&self, row: NewApplication) -> Result<Application, RepositoryError> {
        let id = ApplicationId(format!(
            "app-{:06}",
            self.sequence.fetch_add(1, Ordering::Relaxed) + 1
        ));
        let now = Utc::now();
        let application = Application {
            id,
            student_user_id: row.student_user_id,
            status: row.status,
            rejection_reason: None,
            personal: row.form.personal,
            academic: row.form.academic,
            guardian: row.form.guardian,
            created_at: now,
            updated_at: now,
        };
        self.rows
            .lock()
            .expect("applications mutex poisoned")
            .push(application.clone());
        Ok(application)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let rows = self.rows.lock().expect("applications mutex poisoned");
        Ok(rows.iter().find(|row| &row.id == id).cloned())
    }

    fn find_by_student(&self, student: &UserId) -> Result<Option<Application>, RepositoryError> {
        let rows = self.rows.lock().expect("applications mutex poisoned");
        Ok(rows
            .iter()
            .find(|row| &row.student_user_id == student)
            .cloned())
    }

    fn list_newest_first(&self) -> Result<Vec<Application>, RepositoryError> {
        let rows = self.rows.lock().expect("applications mutex poisoned");
        Ok(rows.iter().rev().cloned().collect())
    }

    fn set_decision(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
        rejection_reason: Option<String>,
    ) -> Result<Application, RepositoryError> {
        let mut rows = self.rows.lock().expect("applications mutex poisoned");
        let row = rows
            .iter_mut()
            .find(|row| &row.id == id)
            .ok_or(RepositoryError::NotFound)?;
        row.status = status;
        row.rejection_reason = rejection_reason;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }
}

#[derive(Default)]
pub(super) struct MemoryStudents {
    rows: Mutex<HashMap<StudentRecordId, StudentRecord>>,
    sequence: AtomicU64,
}

impl MemoryStudents {
    pub(super) fn all(&self) -> Vec<StudentRecord> {
        self.rows
            .lock()
            .expect("students mutex poisoned")
            .values()
            .cloned()
            .collect()
    }
}

impl StudentRecordRepository for MemoryStudents {
    fn insert(&self, row: NewStudentRecord) -> Result<StudentRecord, RepositoryError> {
        let id = StudentRecordId(format!(
            "rec-{:06}",
            self.sequence.fetch_add(1, Ordering::Relaxed) + 1
        ));
        let now = Utc::now();
        let record = StudentRecord {
            id: id.clone(),
            personal: row.personal,
            academic: row.academic,
            guardian: row.guardian,
            current_status: row.current_status,
            average_grade: row.average_grade,
            subjects_courses: row.subjects_courses,
            created_at: now,
            updated_at: now,
        };
        self.rows
            .lock()
            .expect("students mutex poisoned")
            .insert(id, record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &StudentRecordId) -> Result<Option<StudentRecord>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .expect("students mutex poisoned")
            .get(id)
            .cloned())
    }

    fn list(&self) -> Result<Vec<StudentRecord>, RepositoryError> {
        Ok(self.all())
    }

    fn update(
        &self,
        id: &StudentRecordId,
        row: NewStudentRecord,
    ) -> Result<StudentRecord, RepositoryError> {
        let mut rows = self.rows.lock().expect("students mutex poisoned");
        let existing = rows.get_mut(id).ok_or(RepositoryError::NotFound)?;
        existing.personal = row.personal;
        existing.academic = row.academic;
        existing.guardian = row.guardian;
        existing.current_status = row.current_status;
        existing.average_grade = row.average_grade;
        existing.subjects_courses = row.subjects_courses;
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }

    fn delete(&self, id: &StudentRecordId) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().expect("students mutex poisoned");
        rows.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

/// Refuses every student record insert, for exercising the first approval step failing.
pub(super) struct UnavailableStudents;

impl StudentRecordRepository for UnavailableStudents {
    fn insert(&self, _row: NewStudentRecord) -> Result<StudentRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &StudentRecordId) -> Result<Option<StudentRecord>, RepositoryError> {
        Ok(None)
    }

    fn list(&self) -> Result<Vec<StudentRecord>, RepositoryError> {
        Ok(Vec::new())
    }

    fn update(
        &self,
        _id: &StudentRecordId,
        _row: NewStudentRecord,
    ) -> Result<StudentRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &StudentRecordId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Accepts inserts and reads but fails every decision write, for exercising
/// the second approval step failing after the record insert succeeded.
#[derive(Default)]
pub(super) struct DecisionFailsApplications {
    inner: MemoryApplications,
}

impl ApplicationRepository for DecisionFailsApplications {
    fn insert(&self, row: NewApplication) -> Result<Application, RepositoryError> {
        self.inner.insert(row)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn find_by_student(&self, student: &UserId) -> Result<Option<Application>, RepositoryError> {
        self.inner.find_by_student(student)
    }

    fn list_newest_first(&self) -> Result<Vec<Application>, RepositoryError> {
        self.inner.list_newest_first()
    }

    fn set_decision(
        &self,
        _id: &ApplicationId,
        _status: ApplicationStatus,
        _rejection_reason: Option<String>,
    ) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable(
            "status write refused".to_string(),
        ))
    }
}

#[derive(Default)]
pub(super) struct DirectoryIdentity {
    accounts: HashMap<String, AuthContext>,
}

impl DirectoryIdentity {
    pub(super) fn with_default_accounts() -> Self {
        let mut directory = Self::default();
        for ctx in [admin_ctx(), student_ctx(), other_student_ctx()] {
            directory.accounts.insert(ctx.user_id.0.clone(), ctx);
        }
        directory
    }
}

impl IdentityProvider for DirectoryIdentity {
    fn resolve(&self, user_id: &UserId) -> Result<Option<AuthContext>, IdentityError> {
        Ok(self.accounts.get(&user_id.0).cloned())
    }
}

pub(super) fn build_service() -> (
    AdmissionsService<MemoryApplications, MemoryStudents>,
    Arc<MemoryApplications>,
    Arc<MemoryStudents>,
) {
    let applications = Arc::new(MemoryApplications::default());
    let students = Arc::new(MemoryStudents::default());
    let service = AdmissionsService::new(applications.clone(), students.clone());
    (service, applications, students)
}

pub(super) fn build_router() -> axum::Router {
    let (service, _, _) = build_service();
    admissions_router(
        Arc::new(service),
        Arc::new(DirectoryIdentity::with_default_accounts()),
    )
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
