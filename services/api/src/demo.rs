use crate::infra::{
    EnvIdentityDirectory, InMemoryApplicationRepository, InMemoryStudentRecordRepository,
};
use boscocare::error::AppError;
use boscocare::identity::{IdentityProvider, UserId};
use boscocare::workflows::enrollment::{
    AcademicDetails, AdmissionsService, ApplicationForm, EducationLevel, GuardianDetails,
    PersonalDetails, RecordsService,
};
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the admin review queue after each decision
    #[arg(long)]
    pub(crate) show_queue: bool,
}

/// Scripted review cycle against the in-memory stores: submit, reject,
/// resubmit, approve, then list the derived student record.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let applications = Arc::new(InMemoryApplicationRepository::default());
    let students = Arc::new(InMemoryStudentRecordRepository::default());
    let identity = EnvIdentityDirectory::from_admin_list("registrar");
    let admissions = AdmissionsService::new(applications, students.clone());
    let records = RecordsService::new(students);

    let registrar = resolve(&identity, "registrar")?;
    let jane = resolve(&identity, "stu-jane")?;

    println!("Enrollment review-cycle demo");

    let form = demo_form();
    let application = admissions.submit(&jane, form).map_err(AppError::from)?;
    println!(
        "- {} submitted application {} -> status {}",
        application.personal.full_name,
        application.id.0,
        application.status.label()
    );

    if args.show_queue {
        print_queue(&admissions, &registrar)?;
    }

    let rejected = admissions
        .reject(&registrar, &application.id, "Incomplete guardian info")
        .map_err(AppError::from)?;
    println!(
        "- Registrar rejected {}: {}",
        rejected.id.0,
        rejected.rejection_reason.as_deref().unwrap_or("(no reason)")
    );

    match admissions.view_status(&jane).map_err(AppError::from)? {
        Some(current) => match serde_json::to_string_pretty(&current.status_view()) {
            Ok(json) => println!("- Status payload seen by the student:\n{json}"),
            Err(err) => println!("- Status payload unavailable: {err}"),
        },
        None => println!("- Status lookup returned no application"),
    }

    let resubmitted = admissions
        .resubmit(&jane, &application.id)
        .map_err(AppError::from)?;
    println!(
        "- {} resubmitted {} -> status {}",
        resubmitted.personal.full_name,
        resubmitted.id.0,
        resubmitted.status.label()
    );

    if args.show_queue {
        print_queue(&admissions, &registrar)?;
    }

    let record = admissions
        .approve(&registrar, &application.id)
        .map_err(AppError::from)?;
    println!(
        "- Registrar approved {} -> student record {} ({})",
        application.id.0, record.id.0, record.current_status
    );

    println!("\nStudent records after approval");
    for row in records.list(&registrar).map_err(AppError::from)? {
        println!(
            "- {} | {} | {} {} | status {}",
            row.id.0,
            row.personal.full_name,
            row.academic.education_level.label(),
            row.academic.grade_year_level,
            row.current_status
        );
    }

    Ok(())
}

fn resolve(
    identity: &EnvIdentityDirectory,
    user_id: &str,
) -> Result<boscocare::identity::AuthContext, AppError> {
    identity
        .resolve(&UserId(user_id.to_string()))
        .map_err(|err| AppError::Io(std::io::Error::other(err)))?
        .ok_or_else(|| {
            AppError::Io(std::io::Error::other(format!(
                "demo account '{user_id}' did not resolve"
            )))
        })
}

fn print_queue(
    admissions: &AdmissionsService<InMemoryApplicationRepository, InMemoryStudentRecordRepository>,
    registrar: &boscocare::identity::AuthContext,
) -> Result<(), AppError> {
    let queue = admissions.review_queue(registrar).map_err(AppError::from)?;
    println!("  Review queue ({} entries)", queue.len());
    for entry in queue {
        println!(
            "    - {} | {} | status {}",
            entry.id.0,
            entry.personal.full_name,
            entry.status.label()
        );
    }
    Ok(())
}

fn demo_form() -> ApplicationForm {
    ApplicationForm {
        personal: PersonalDetails {
            full_name: "Jane Doe".to_string(),
            student_id: "2024-00123".to_string(),
            date_of_birth: None,
            gender: Some("Female".to_string()),
            email_address: "jane@example.com".to_string(),
            phone_number: Some("0917 555 0123".to_string()),
            address: Some("14 Mabini St, Makati".to_string()),
        },
        academic: AcademicDetails {
            education_level: EducationLevel::SeniorHigh,
            grade_year_level: "Grade 11".to_string(),
            section_program: Some("STEM".to_string()),
        },
        guardian: GuardianDetails {
            parent_guardian_name: Some("John Doe".to_string()),
            guardian_contact: Some("0917 555 0124".to_string()),
            guardian_relationship: Some("Father".to_string()),
        },
    }
}
