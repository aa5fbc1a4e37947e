mod error;
mod handlers;
mod routes;
mod state;


pub use error::{ApiError, ErrorResponse};
pub use routes::{ApiDoc, create_router};
pub use state::AppState;

use std::future::IntoFuture;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::StorageAdapter;

/// Initialize tracing subscriber with env filter
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Run the API server until Ctrl-C or SIGTERM
pub async fn run<A: StorageAdapter + 'static>(config: Config, storage: A) -> Result<(), ApiError> {
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ApiError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!("API server listening on http://{}", addr);

    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_signal(shutdown.clone()));

    serve(listener, AppState::new(storage), shutdown, config.timeout).await
}

/// Serve the router on an already bound listener until `shutdown` is cancelled.
///
/// In-flight requests get up to `grace` to finish once shutdown starts; the
/// server stops waiting for them after that.
pub async fn serve<A: StorageAdapter + 'static>(
    listener: TcpListener,
    state: AppState<A>,
    shutdown: CancellationToken,
    grace: Duration,
) -> Result<(), ApiError> {
    let app = create_router(state).layer(TraceLayer::new_for_http());

    let token = shutdown.clone();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move { token.cancelled().await })
        .into_future();
    let mut server = std::pin::pin!(server);

    tokio::select! {
        result = &mut server => {
            result?;
            info!("API server stopped");
            return Ok(());
        }
        _ = shutdown.cancelled() => {}
    }

    match tokio::time::timeout(grace, server).await {
        Ok(result) => result?,
        Err(_) => warn!(?grace, "in-flight requests still running, stopping anyway"),
    }

    info!("API server stopped");
    Ok(())
}

async fn cancel_on_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl-C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
    token.cancel();
}
