//! Cart Store JSON API Server

use std::{process, time::Duration};

use salvo::{
    affix_state::inject,
    oapi::{OpenApi, swagger_ui::SwaggerUi},
    prelude::*,
    trailing_slash::remove_slash,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use cartstore_app::context::AppContext;

use crate::{config::ServerConfig, observability::Observability, state::State};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod admin;
mod carts;
mod config;
mod extensions;
mod healthcheck;
mod observability;
mod router;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;

/// How long the cleanup scheduler may take to finish its current pass on shutdown.
const SCHEDULER_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Cart Store JSON API Server entry point
#[tokio::main]
pub async fn main() {
    // Load configuration from .env and CLI arguments
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    let observability = match Observability::init(&config) {
        Ok(observability) => observability,
        Err(init_error) => {
            #[expect(
                clippy::print_stderr,
                reason = "logging failed to initialize, must use eprintln"
            )]
            {
                eprintln!("Observability error: {init_error}");
            }

            process::exit(1);
        }
    };

    let settings = match config.carts.settings() {
        Ok(settings) => settings,
        Err(invalid) => {
            error!("invalid cart settings: {invalid}");

            process::exit(1);
        }
    };

    let app = match AppContext::from_redis_url(
        &config.store.redis_url,
        settings,
        config.carts.catalog(),
    )
    .await
    {
        Ok(app) => app,
        Err(init_error) => {
            error!("failed to initialize app context: {init_error}");

            process::exit(1);
        }
    };

    let state = State::from_app_context(&app, config.carts.cleanup_interval());

    // Expired cart sweeps run for the lifetime of the server
    let cleanup_cancel = CancellationToken::new();
    let cleanup_handle = tokio::spawn({
        let scheduler = state.cleanup.clone();
        let cancel = cleanup_cancel.clone();

        async move { scheduler.run(cancel).await }
    });

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    // Bind server
    let listener = TcpListener::new(addr).bind().await;

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(observability::request_logging)
        .hoop(remove_slash())
        .hoop(inject(state))
        .push(router::app_router());

    let doc = OpenApi::new("Cart Store API", env!("CARGO_PKG_VERSION")).merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let server = Server::new(listener);

    let handle = server.handle();

    // Listen for shutdown signal
    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    // Start serving requests
    server.serve(router).await;

    cleanup_cancel.cancel();

    match tokio::time::timeout(SCHEDULER_SHUTDOWN_GRACE, cleanup_handle).await {
        Ok(Ok(())) => info!("cart cleanup scheduler stopped"),
        Ok(Err(join_error)) => error!("cart cleanup scheduler failed: {join_error}"),
        Err(_elapsed) => warn!("cart cleanup scheduler did not stop in time"),
    }

    observability.shutdown();
}
