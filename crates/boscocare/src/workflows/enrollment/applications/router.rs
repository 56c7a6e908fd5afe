use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::identity::{AuthContext, IdentityProvider, UserId};
use crate::workflows::enrollment::records::repository::StudentRecordRepository;

use super::domain::{ApplicationForm, ApplicationId};
use super::repository::{ApplicationRepository, RepositoryError};
use super::service::{AdmissionsError, AdmissionsService};

/// Header carrying the caller's user id. The session layer that issues and
/// validates it is an external collaborator; this service only resolves the
/// id to a role through the [`IdentityProvider`].
pub const USER_ID_HEADER: &str = "x-user-id";

pub struct AdmissionsRouterState<A, S, I> {
    pub service: Arc<AdmissionsService<A, S>>,
    pub identity: Arc<I>,
}

impl<A, S, I> Clone for AdmissionsRouterState<A, S, I> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            identity: self.identity.clone(),
        }
    }
}

/// Router builder exposing the student intake/status endpoints and the
/// admin review queue with its approve/reject decisions.
pub fn admissions_router<A, S, I>(
    service: Arc<AdmissionsService<A, S>>,
    identity: Arc<I>,
) -> Router
where
    A: ApplicationRepository + 'static,
    S: StudentRecordRepository + 'static,
    I: IdentityProvider + 'static,
{
    let state = AdmissionsRouterState { service, identity };
    Router::new()
        .route(
            "/api/v1/enrollment/applications",
            post(submit_handler::<A, S, I>).get(queue_handler::<A, S, I>),
        )
        .route(
            "/api/v1/enrollment/applications/status",
            get(status_handler::<A, S, I>),
        )
        .route(
            "/api/v1/enrollment/applications/:application_id/resubmit",
            post(resubmit_handler::<A, S, I>),
        )
        .route(
            "/api/v1/enrollment/applications/:application_id/approve",
            post(approve_handler::<A, S, I>),
        )
        .route(
            "/api/v1/enrollment/applications/:application_id/reject",
            post(reject_handler::<A, S, I>),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub(crate) struct RejectRequest {
    pub(crate) reason: String,
}

pub(crate) fn authenticate<I>(identity: &I, headers: &HeaderMap) -> Result<AuthContext, Response>
where
    I: IdentityProvider,
{
    let raw = headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let Some(raw) = raw else {
        let payload = json!({ "error": "missing x-user-id header" });
        return Err((StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response());
    };

    match identity.resolve(&UserId(raw.to_string())) {
        Ok(Some(ctx)) => Ok(ctx),
        Ok(None) => {
            let payload = json!({ "error": "unknown user" });
            Err((StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response())
        }
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            Err((StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response())
        }
    }
}

fn error_response(err: AdmissionsError) -> Response {
    let status = match &err {
        AdmissionsError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AdmissionsError::AlreadyApplied | AdmissionsError::InvalidTransition { .. } => {
            StatusCode::CONFLICT
        }
        AdmissionsError::NotFound => StatusCode::NOT_FOUND,
        AdmissionsError::NotOwner | AdmissionsError::Forbidden(_) => StatusCode::FORBIDDEN,
        AdmissionsError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AdmissionsError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AdmissionsError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn submit_handler<A, S, I>(
    State(state): State<AdmissionsRouterState<A, S, I>>,
    headers: HeaderMap,
    axum::Json(form): axum::Json<ApplicationForm>,
) -> Response
where
    A: ApplicationRepository + 'static,
    S: StudentRecordRepository + 'static,
    I: IdentityProvider + 'static,
{
    let ctx = match authenticate(state.identity.as_ref(), &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    match state.service.submit(&ctx, form) {
        Ok(application) => {
            (StatusCode::CREATED, axum::Json(application.status_view())).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn status_handler<A, S, I>(
    State(state): State<AdmissionsRouterState<A, S, I>>,
    headers: HeaderMap,
) -> Response
where
    A: ApplicationRepository + 'static,
    S: StudentRecordRepository + 'static,
    I: IdentityProvider + 'static,
{
    let ctx = match authenticate(state.identity.as_ref(), &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    match state.service.view_status(&ctx) {
        Ok(Some(application)) => {
            (StatusCode::OK, axum::Json(application.status_view())).into_response()
        }
        Ok(None) => {
            let payload = json!({ "error": "no application on file" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn resubmit_handler<A, S, I>(
    State(state): State<AdmissionsRouterState<A, S, I>>,
    Path(application_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    A: ApplicationRepository + 'static,
    S: StudentRecordRepository + 'static,
    I: IdentityProvider + 'static,
{
    let ctx = match authenticate(state.identity.as_ref(), &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    let id = ApplicationId(application_id);
    match state.service.resubmit(&ctx, &id) {
        Ok(application) => (StatusCode::OK, axum::Json(application.status_view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn queue_handler<A, S, I>(
    State(state): State<AdmissionsRouterState<A, S, I>>,
    headers: HeaderMap,
) -> Response
where
    A: ApplicationRepository + 'static,
    S: StudentRecordRepository + 'static,
    I: IdentityProvider + 'static,
{
    let ctx = match authenticate(state.identity.as_ref(), &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    match state.service.review_queue(&ctx) {
        Ok(applications) => (StatusCode::OK, axum::Json(applications)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn approve_handler<A, S, I>(
    State(state): State<AdmissionsRouterState<A, S, I>>,
    Path(application_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    A: ApplicationRepository + 'static,
    S: StudentRecordRepository + 'static,
    I: IdentityProvider + 'static,
{
    let ctx = match authenticate(state.identity.as_ref(), &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    let id = ApplicationId(application_id);
    match state.service.approve(&ctx, &id) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn reject_handler<A, S, I>(
    State(state): State<AdmissionsRouterState<A, S, I>>,
    Path(application_id): Path<String>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<RejectRequest>,
) -> Response
where
    A: ApplicationRepository + 'static,
    S: StudentRecordRepository + 'static,
    I: IdentityProvider + 'static,
{
    let ctx = match authenticate(state.identity.as_ref(), &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    let id = ApplicationId(application_id);
    match state.service.reject(&ctx, &id, &request.reason) {
        Ok(application) => (StatusCode::OK, axum::Json(application.status_view())).into_response(),
        Err(err) => error_response(err),
    }
}
