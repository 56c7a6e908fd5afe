use crate::cli::ServeArgs;
use crate::infra::{
    AppState, EnvIdentityDirectory, InMemoryApplicationRepository, InMemoryStudentRecordRepository,
};
use crate::routes::with_enrollment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use boscocare::config::AppConfig;
use boscocare::error::AppError;
use boscocare::telemetry;
use boscocare::workflows::enrollment::{AdmissionsService, RecordsService};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let applications = Arc::new(InMemoryApplicationRepository::default());
    let students = Arc::new(InMemoryStudentRecordRepository::default());
    let identity = Arc::new(EnvIdentityDirectory::from_env());
    let admissions = Arc::new(AdmissionsService::new(applications, students.clone()));
    let records = Arc::new(RecordsService::new(students));

    let app = with_enrollment_routes(admissions, records, identity)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "enrollment service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
