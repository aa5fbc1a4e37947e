//! Project management handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use super::clients::{Written, stored_id, written};
use crate::api::AppState;
use crate::api::error::{ErrorResponse, HandlerError, error_response, parse_entity, storage_error};
use crate::db::{Id, Project, StorageAdapter};

/// List all projects
#[utoipa::path(
    get,
    path = "/projects",
    tag = "projects",
    responses(
        (status = 200, description = "List of projects", body = Vec<Project>),
        (status = 404, description = "No projects stored", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_projects<A: StorageAdapter>(
    State(state): State<AppState<A>>,
) -> Result<Json<Vec<Project>>, HandlerError> {
    let projects = state
        .storage()
        .select_projects()
        .await
        .map_err(|e| storage_error("projects", e))?;

    Ok(Json(projects))
}

/// Get a project by ID
#[utoipa::path(
    get,
    path = "/projects/{id}",
    tag = "projects",
    params(("id" = i64, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project found", body = Project),
        (status = 404, description = "Project not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_project<A: StorageAdapter>(
    State(state): State<AppState<A>>,
    Path(id): Path<Id>,
) -> Result<Json<Project>, HandlerError> {
    let project = state
        .storage()
        .get_project(id)
        .await
        .map_err(|e| storage_error(&format!("project {id}"), e))?;

    Ok(Json(project))
}

/// Create a project
#[utoipa::path(
    post,
    path = "/projects",
    tag = "projects",
    request_body = Project,
    responses(
        (status = 201, description = "Project created", body = Project),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, body))]
pub async fn create_project<A: StorageAdapter>(
    State(state): State<AppState<A>>,
    body: Bytes,
) -> Result<Written<Project>, HandlerError> {
    let project: Option<Project> = parse_entity(&body)?;

    let created = state
        .storage()
        .upsert_project(project)
        .await
        .map_err(|e| storage_error("project", e))?;

    let id = stored_id("project", created.id)?;
    Ok(written("projects", id, created))
}

/// Replace a project
///
/// The body id must match the path id.
#[utoipa::path(
    put,
    path = "/projects/{id}",
    tag = "projects",
    params(("id" = i64, Path, description = "Project ID")),
    request_body = Project,
    responses(
        (status = 201, description = "Project stored", body = Project),
        (status = 422, description = "Path and body ids differ", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, body))]
pub async fn update_project<A: StorageAdapter>(
    State(state): State<AppState<A>>,
    Path(id): Path<Id>,
    body: Bytes,
) -> Result<Written<Project>, HandlerError> {
    let project: Option<Project> = parse_entity(&body)?;
    if let Some(project) = &project
        && project.id != Some(id)
    {
        return Err(error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "validation error: path and entity ids must be equal",
        ));
    }

    let updated = state
        .storage()
        .upsert_project(project)
        .await
        .map_err(|e| storage_error(&format!("project {id}"), e))?;

    Ok(written("projects", id, updated))
}

/// Delete a project
#[utoipa::path(
    delete,
    path = "/projects/{id}",
    tag = "projects",
    params(("id" = i64, Path, description = "Project ID")),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 404, description = "Project not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_project<A: StorageAdapter>(
    State(state): State<AppState<A>>,
    Path(id): Path<Id>,
) -> Result<StatusCode, HandlerError> {
    state
        .storage()
        .delete_project(id)
        .await
        .map_err(|e| storage_error(&format!("project {id}"), e))?;

    Ok(StatusCode::NO_CONTENT)
}
