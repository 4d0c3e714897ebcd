//! The HTTP listener Prometheus scrapes.
//!
//! Each request to the metrics path runs one full collection cycle against a
//! fresh registry snapshot, so overlapping scrapes never observe each other's
//! partially written gauges. A failed scrape still answers `200` with
//! `artifactory_up 0` and the failure counters so that operators can alert on
//! the condition instead of seeing scrape errors.

use crate::Result;
use crate::collector::StorageCollector;
use crate::metrics::ScrapeMetrics;
use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use core::net::SocketAddr;
use prometheus::IntCounter;
use std::sync::Arc;

const LOG_TARGET: &str = "    server";

#[derive(Debug)]
struct AppState {
    collector: StorageCollector,
    failures: IntCounter,
    metrics_path: String,
}

/// Serve the landing page and the metrics endpoint until the process is
/// terminated.
pub async fn serve(listen: SocketAddr, metrics_path: &str, collector: StorageCollector, failures: IntCounter) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(listen).await?;
    serve_on(listener, metrics_path, collector, failures).await
}

/// Serve on an already-bound listener.
///
/// Split out of [`serve`] so callers can bind an ephemeral port themselves
/// and learn the address before the first request arrives.
pub async fn serve_on(
    listener: tokio::net::TcpListener,
    metrics_path: &str,
    collector: StorageCollector,
    failures: IntCounter,
) -> Result<()> {
    let state = Arc::new(AppState {
        collector,
        failures,
        metrics_path: metrics_path.to_string(),
    });

    let app = Router::new()
        .route("/", get(index))
        .route(metrics_path, get(metrics))
        .with_state(state);

    let addr = listener.local_addr()?;
    log::info!(target: LOG_TARGET, "Listening on http://{addr}{metrics_path}");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(format!(
        "<html>\
         <head><title>Artifactory Exporter</title></head>\
         <body><h1>Artifactory Exporter</h1><p><a href=\"{}\">Metrics</a></p></body>\
         </html>",
        state.metrics_path
    ))
}

async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match scrape(&state).await {
        Ok(body) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response(),
        Err(e) => {
            log::error!(target: LOG_TARGET, "Could not produce a scrape snapshot: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Run one collection cycle and render the resulting snapshot.
///
/// Collection failures are reported through `artifactory_up` rather than as
/// HTTP errors; only a failure to build or encode the registry itself turns
/// into an error response.
async fn scrape(state: &AppState) -> Result<String> {
    let mut snapshot = ScrapeMetrics::new(&state.failures)?;

    match state.collector.collect(&mut snapshot).await {
        Ok(()) => snapshot.set_up(true),
        Err(e) => {
            log::warn!(target: LOG_TARGET, "Scrape failed: {e}");
            snapshot.set_up(false);
        }
    }

    snapshot.encode()
}
