use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::Result;
use axum::routing::{get, patch};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, decompression::DecompressionLayer, trace::TraceLayer,
};

use state::AppState;

use crate::controllers::series;

pub mod controllers;
pub mod datasource;
pub mod errors;
pub mod models;
pub mod state;

fn series_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(series::get_collection).post(series::create))
        .route(
            "/:id",
            get(series::get_single)
                .put(series::replace)
                .delete(series::delete),
        )
        .route("/:id/status", patch(series::set_status))
        .route("/:id/episode", patch(series::increment_episode))
        .route("/:id/upvote", patch(series::upvote))
        .route("/:id/downvote", patch(series::downvote))
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .nest("/series", series_routes())
        .nest("/api/series", series_routes())
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(DecompressionLayer::new()),
        )
}

pub async fn serve_axum(app_state: AppState, port: u16) -> Result<()> {
    let address = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port);
    let listener = tokio::net::TcpListener::bind(address).await?;
    tracing::info!("listening on {}", address);
    axum::serve(listener, router(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutting down");
}
