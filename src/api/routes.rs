//! API route configuration.

use axum::Router;
use axum::routing::{delete, get, post, put};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use super::error::ErrorResponse;
use super::handlers::{self, HealthResponse};
use super::state::AppState;
use crate::db::{Client, ClientSettings, Project, StorageAdapter};

/// Build routes with generic storage type.
///
/// This macro reduces boilerplate when registering handlers that are generic
/// over the StorageAdapter trait. It applies the turbofish operator automatically.
macro_rules! routes {
    ($A:ty => {
        $($method:ident $path:literal => $($handler:ident)::+),* $(,)?
    }) => {{
        let router = Router::new();
        $(
            let router = router.route($path, $method($($handler)::+::<$A>));
        )*
        router
    }};
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "mend API",
        version = "0.1.0",
        description = "Clients and projects over an interchangeable storage backend",
        license(name = "GPL-2.0")
    ),
    paths(
        handlers::root,
        handlers::health,
        handlers::list_clients,
        handlers::get_client,
        handlers::create_client,
        handlers::update_client,
        handlers::delete_client,
        handlers::list_client_projects,
        handlers::list_projects,
        handlers::get_project,
        handlers::create_project,
        handlers::update_project,
        handlers::delete_project,
    ),
    components(schemas(HealthResponse, Client, ClientSettings, Project, ErrorResponse)),
    tags(
        (name = "system", description = "System health and status endpoints"),
        (name = "clients", description = "Client management endpoints"),
        (name = "projects", description = "Project management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the API router with OpenAPI documentation
pub fn create_router<A: StorageAdapter + 'static>(state: AppState<A>) -> Router {
    let api = ApiDoc::openapi();

    // System routes (non-generic)
    let system_routes = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health));

    let client_routes = routes!(A => {
        get "/clients" => handlers::list_clients,
        get "/clients/{id}" => handlers::get_client,
        post "/clients" => handlers::create_client,
        put "/clients/{id}" => handlers::update_client,
        delete "/clients/{id}" => handlers::delete_client,
        get "/clients/{id}/projects" => handlers::list_client_projects,
    });

    let project_routes = routes!(A => {
        get "/projects" => handlers::list_projects,
        get "/projects/{id}" => handlers::get_project,
        post "/projects" => handlers::create_project,
        put "/projects/{id}" => handlers::update_project,
        delete "/projects/{id}" => handlers::delete_project,
    });

    system_routes
        .merge(client_routes)
        .merge(project_routes)
        .merge(Scalar::with_url("/docs", api))
        .with_state(state)
}
