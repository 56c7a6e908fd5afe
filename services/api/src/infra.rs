use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;

use boscocare::identity::{AuthContext, IdentityError, IdentityProvider, Role, UserId};
use boscocare::workflows::enrollment::{
    Application, ApplicationId, ApplicationRepository, ApplicationStatus, NewApplication,
    NewStudentRecord, RepositoryError, StudentRecord, StudentRecordId, StudentRecordRepository,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Application store backing the service until a database lands.
#[derive(Default)]
pub(crate) struct InMemoryApplicationRepository {
    rows: Mutex<Vec<Application>>,
    sequence: AtomicU64,
}

impl ApplicationRepository for InMemoryApplicationRepository {
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
            .map_err(|_| RepositoryError::Unavailable("application store poisoned".to_string()))?
            .push(application.clone());
        Ok(application)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let rows = self
            .rows
            .lock()
            .map_err(|_| RepositoryError::Unavailable("application store poisoned".to_string()))?;
        Ok(rows.iter().find(|row| &row.id == id).cloned())
    }

    fn find_by_student(&self, student: &UserId) -> Result<Option<Application>, RepositoryError> {
        let rows = self
            .rows
            .lock()
            .map_err(|_| RepositoryError::Unavailable("application store poisoned".to_string()))?;
        Ok(rows
            .iter()
            .find(|row| &row.student_user_id == student)
            .cloned())
    }

    fn list_newest_first(&self) -> Result<Vec<Application>, RepositoryError> {
        let rows = self
            .rows
            .lock()
            .map_err(|_| RepositoryError::Unavailable("application store poisoned".to_string()))?;
        Ok(rows.iter().rev().cloned().collect())
    }

    fn set_decision(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
        rejection_reason: Option<String>,
    ) -> Result<Application, RepositoryError> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| RepositoryError::Unavailable("application store poisoned".to_string()))?;
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

/// Student-record store backing the service until a database lands.
#[derive(Default)]
pub(crate) struct InMemoryStudentRecordRepository {
    rows: Mutex<HashMap<StudentRecordId, StudentRecord>>,
    sequence: AtomicU64,
}

impl StudentRecordRepository for InMemoryStudentRecordRepository {
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
            .map_err(|_| RepositoryError::Unavailable("record store poisoned".to_string()))?
            .insert(id, record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &StudentRecordId) -> Result<Option<StudentRecord>, RepositoryError> {
        let rows = self
            .rows
            .lock()
            .map_err(|_| RepositoryError::Unavailable("record store poisoned".to_string()))?;
        Ok(rows.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<StudentRecord>, RepositoryError> {
        let rows = self
            .rows
            .lock()
            .map_err(|_| RepositoryError::Unavailable("record store poisoned".to_string()))?;
        let mut records: Vec<StudentRecord> = rows.values().cloned().collect();
        records.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(records)
    }

    fn update(
        &self,
        id: &StudentRecordId,
        row: NewStudentRecord,
    ) -> Result<StudentRecord, RepositoryError> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| RepositoryError::Unavailable("record store poisoned".to_string()))?;
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
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| RepositoryError::Unavailable("record store poisoned".to_string()))?;
        rows.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

/// Stand-in identity directory until the external auth collaborator is wired
/// up: ids named in `BOSCOCARE_ADMIN_IDS` (comma separated, default `admin`)
/// resolve as admins, every other id resolves as a student account.
pub(crate) struct EnvIdentityDirectory {
    admin_ids: HashSet<String>,
}

impl EnvIdentityDirectory {
    pub(crate) fn from_env() -> Self {
        let raw = std::env::var("BOSCOCARE_ADMIN_IDS").unwrap_or_else(|_| "admin".to_string());
        Self::from_admin_list(&raw)
    }

    pub(crate) fn from_admin_list(raw: &str) -> Self {
        let admin_ids = raw
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();
        Self { admin_ids }
    }
}

impl IdentityProvider for EnvIdentityDirectory {
    fn resolve(&self, user_id: &UserId) -> Result<Option<AuthContext>, IdentityError> {
        if user_id.0.trim().is_empty() {
            return Ok(None);
        }

        let role = if self.admin_ids.contains(&user_id.0) {
            Role::Admin
        } else {
            Role::Student
        };

        Ok(Some(AuthContext {
            user_id: user_id.clone(),
            email: format!("{}@boscocare.local", user_id.0),
            role,
        }))
    }
}
