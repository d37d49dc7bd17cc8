//! `api` crate — HTTP REST surface over the workflow engine.
//!
//! Exposes the engine's trigger points plus workflow CRUD:
//!   GET    /api/v1/workflows
//!   POST   /api/v1/workflows
//!   GET    /api/v1/workflows/{id}
//!   DELETE /api/v1/workflows/{id}
//!   POST   /api/v1/workflows/{id}/test
//!   POST   /api/v1/candidates/{id}/stage
//!   GET    /api/v1/candidates/{id}/executions
//!
//! Authentication happens upstream; the acting user's id arrives in the
//! `x-user-id` header.

pub mod handlers;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use handlers::AppState;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/v1/workflows",
            get(handlers::workflows::list).post(handlers::workflows::create),
        )
        .route(
            "/api/v1/workflows/:id",
            get(handlers::workflows::get_one).delete(handlers::workflows::delete),
        )
        .route(
            "/api/v1/workflows/:id/test",
            post(handlers::workflows::test_send),
        )
        .route(
            "/api/v1/candidates/:id/stage",
            post(handlers::candidates::change_stage),
        )
        .route(
            "/api/v1/candidates/:id/executions",
            get(handlers::executions::list_for_candidate),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(bind: &str, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("API listening on {bind}");
    axum::serve(listener, router(state)).await
}
