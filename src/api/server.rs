//! Router construction and the serve loop.

use crate::DocStore;
use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::{docs, handlers};

/// Build the application router with all routes and middleware, backed by
/// `store`.
pub fn create_app(store: DocStore) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/api/users", post(handlers::create_user))
        .route("/api-docs", get(docs::openapi))
        .route("/health", get(handlers::health))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(store)
}

/// Bind `addr` and serve the application until the process exits.
pub async fn start_server(addr: SocketAddr, store: DocStore) -> std::io::Result<()> {
    let app = create_app(store);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    tracing::info!("API documentation served at /api-docs");
    axum::serve(listener, app).await
}
