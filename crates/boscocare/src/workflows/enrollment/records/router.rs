use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use crate::identity::IdentityProvider;
use crate::workflows::enrollment::applications::router::authenticate;

use super::domain::{NewStudentRecord, StudentRecordId};
use super::repository::{RepositoryError, StudentRecordRepository};
use super::service::{RecordsError, RecordsService};

pub struct RecordsRouterState<S, I> {
    pub service: Arc<RecordsService<S>>,
    pub identity: Arc<I>,
}

impl<S, I> Clone for RecordsRouterState<S, I> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            identity: self.identity.clone(),
        }
    }
}

/// Router builder for the admin record-management endpoints.
pub fn records_router<S, I>(service: Arc<RecordsService<S>>, identity: Arc<I>) -> Router
where
    S: StudentRecordRepository + 'static,
    I: IdentityProvider + 'static,
{
    let state = RecordsRouterState { service, identity };
    Router::new()
        .route(
            "/api/v1/enrollment/records",
            get(list_handler::<S, I>).post(create_handler::<S, I>),
        )
        .route(
            "/api/v1/enrollment/records/:record_id",
            get(fetch_handler::<S, I>)
                .put(update_handler::<S, I>)
                .delete(delete_handler::<S, I>),
        )
        .with_state(state)
}

fn error_response(err: RecordsError) -> Response {
    let status = match &err {
        RecordsError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RecordsError::Forbidden(_) => StatusCode::FORBIDDEN,
        RecordsError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        RecordsError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        RecordsError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn list_handler<S, I>(
    State(state): State<RecordsRouterState<S, I>>,
    headers: HeaderMap,
) -> Response
where
    S: StudentRecordRepository + 'static,
    I: IdentityProvider + 'static,
{
    let ctx = match authenticate(state.identity.as_ref(), &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    match state.service.list(&ctx) {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_handler<S, I>(
    State(state): State<RecordsRouterState<S, I>>,
    headers: HeaderMap,
    axum::Json(row): axum::Json<NewStudentRecord>,
) -> Response
where
    S: StudentRecordRepository + 'static,
    I: IdentityProvider + 'static,
{
    let ctx = match authenticate(state.identity.as_ref(), &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    match state.service.create(&ctx, row) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn fetch_handler<S, I>(
    State(state): State<RecordsRouterState<S, I>>,
    Path(record_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    S: StudentRecordRepository + 'static,
    I: IdentityProvider + 'static,
{
    let ctx = match authenticate(state.identity.as_ref(), &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    let id = StudentRecordId(record_id);
    match state.service.get(&ctx, &id) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_handler<S, I>(
    State(state): State<RecordsRouterState<S, I>>,
    Path(record_id): Path<String>,
    headers: HeaderMap,
    axum::Json(row): axum::Json<NewStudentRecord>,
) -> Response
where
    S: StudentRecordRepository + 'static,
    I: IdentityProvider + 'static,
{
    let ctx = match authenticate(state.identity.as_ref(), &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    let id = StudentRecordId(record_id);
    match state.service.update(&ctx, &id, row) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_handler<S, I>(
    State(state): State<RecordsRouterState<S, I>>,
    Path(record_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    S: StudentRecordRepository + 'static,
    I: IdentityProvider + 'static,
{
    let ctx = match authenticate(state.identity.as_ref(), &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    let id = StudentRecordId(record_id);
    match state.service.remove(&ctx, &id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}
