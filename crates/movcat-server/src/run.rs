use crate::config::ServerConfig;
use crate::error::Result;
use axum::{Router, response::IntoResponse, routing::get};
use futures::FutureExt;
use movcat_app::rest_api;
use movcat_app::state::AppState;
use tracing::debug;

pub async fn run(args: ServerConfig) -> Result<()> {
    let state = crate::build_state(&args).await?;
    run_with_state(args, state).await
}

pub async fn run_with_state(args: ServerConfig, state: AppState) -> Result<()> {
    let shutdown = tokio::signal::ctrl_c().map(|_| ());
    run_graceful_with_state(args, state, shutdown).await
}

pub async fn run_graceful_with_state<S>(
    args: ServerConfig,
    state: AppState,
    shutdown_signal: S,
) -> Result<()>
where
    S: std::future::Future<Output = ()> + Send + 'static,
{
    let mut app = main_router(state);

    if !args.no_cors {
        app = app.layer(tower_http::cors::CorsLayer::very_permissive());
    }

    let ip: std::net::IpAddr = args.listen_address.parse()?;
    let addr = std::net::SocketAddr::from((ip, args.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    debug!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    Ok(())
}

fn main_router(state: AppState) -> Router<()> {
    Router::new()
        .route("/health", get(health))
        .nest("/movies", rest_api::movie::router())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    "OK"
}
