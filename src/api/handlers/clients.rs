//! Client management handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderName, StatusCode, header},
};
use tracing::instrument;

use crate::api::AppState;
use crate::api::error::{ErrorResponse, HandlerError, error_response, parse_entity, storage_error};
use crate::db::{Client, Id, Project, StorageAdapter};

/// Created/replaced response: status, `Location` header and the stored record.
pub type Written<T> = (StatusCode, [(HeaderName, String); 1], Json<T>);

pub(crate) fn written<T>(collection: &str, id: Id, entity: T) -> Written<T> {
    (
        StatusCode::CREATED,
        [(header::LOCATION, format!("/{collection}/{id}"))],
        Json(entity),
    )
}

/// Id of a record the adapter just stored. Adapters always return one.
pub(crate) fn stored_id(entity: &str, id: Option<Id>) -> Result<Id, HandlerError> {
    id.ok_or_else(|| {
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("server error: stored {entity} has no id"),
        )
    })
}

/// List all clients
///
/// An empty collection answers 404, like any other lookup that matched nothing.
#[utoipa::path(
    get,
    path = "/clients",
    tag = "clients",
    responses(
        (status = 200, description = "List of clients", body = Vec<Client>),
        (status = 404, description = "No clients stored", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_clients<A: StorageAdapter>(
    State(state): State<AppState<A>>,
) -> Result<Json<Vec<Client>>, HandlerError> {
    let clients = state
        .storage()
        .select_clients()
        .await
        .map_err(|e| storage_error("clients", e))?;

    Ok(Json(clients))
}

/// Get a client by ID
#[utoipa::path(
    get,
    path = "/clients/{id}",
    tag = "clients",
    params(("id" = i64, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client found", body = Client),
        (status = 404, description = "Client not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_client<A: StorageAdapter>(
    State(state): State<AppState<A>>,
    Path(id): Path<Id>,
) -> Result<Json<Client>, HandlerError> {
    let client = state
        .storage()
        .get_client(id)
        .await
        .map_err(|e| storage_error(&format!("client {id}"), e))?;

    Ok(Json(client))
}

/// Create a client
///
/// The server assigns the id unless the body carries one.
#[utoipa::path(
    post,
    path = "/clients",
    tag = "clients",
    request_body = Client,
    responses(
        (status = 201, description = "Client created", body = Client),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, body))]
pub async fn create_client<A: StorageAdapter>(
    State(state): State<AppState<A>>,
    body: Bytes,
) -> Result<Written<Client>, HandlerError> {
    let client: Option<Client> = parse_entity(&body)?;

    let created = state
        .storage()
        .upsert_client(client)
        .await
        .map_err(|e| storage_error("client", e))?;

    let id = stored_id("client", created.id)?;
    Ok(written("clients", id, created))
}

/// Replace a client
///
/// The body id must match the path id.
#[utoipa::path(
    put,
    path = "/clients/{id}",
    tag = "clients",
    params(("id" = i64, Path, description = "Client ID")),
    request_body = Client,
    responses(
        (status = 201, description = "Client stored", body = Client),
        (status = 422, description = "Path and body ids differ", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, body))]
pub async fn update_client<A: StorageAdapter>(
    State(state): State<AppState<A>>,
    Path(id): Path<Id>,
    body: Bytes,
) -> Result<Written<Client>, HandlerError> {
    let client: Option<Client> = parse_entity(&body)?;
    if let Some(client) = &client
        && client.id != Some(id)
    {
        return Err(error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "validation error: path and entity ids must be equal",
        ));
    }

    let updated = state
        .storage()
        .upsert_client(client)
        .await
        .map_err(|e| storage_error(&format!("client {id}"), e))?;

    Ok(written("clients", id, updated))
}

/// Delete a client
#[utoipa::path(
    delete,
    path = "/clients/{id}",
    tag = "clients",
    params(("id" = i64, Path, description = "Client ID")),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 404, description = "Client not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_client<A: StorageAdapter>(
    State(state): State<AppState<A>>,
    Path(id): Path<Id>,
) -> Result<StatusCode, HandlerError> {
    state
        .storage()
        .delete_client(id)
        .await
        .map_err(|e| storage_error(&format!("client {id}"), e))?;

    Ok(StatusCode::NO_CONTENT)
}

/// List the projects of a client
#[utoipa::path(
    get,
    path = "/clients/{id}/projects",
    tag = "clients",
    params(("id" = i64, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Projects referencing the client", body = Vec<Project>),
        (status = 404, description = "No projects reference the client", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_client_projects<A: StorageAdapter>(
    State(state): State<AppState<A>>,
    Path(id): Path<Id>,
) -> Result<Json<Vec<Project>>, HandlerError> {
    let projects = state
        .storage()
        .select_projects_of_client(id)
        .await
        .map_err(|e| storage_error(&format!("projects of client {id}"), e))?;

    Ok(Json(projects))
}
