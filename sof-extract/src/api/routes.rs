use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use super::{frontend, handlers, AppState};

pub fn create_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.server.max_upload_bytes;

    Router::new()
        .route(
            "/",
            get(handlers::show_form).post(handlers::process_upload),
        )
        .route("/download/{filetype}", get(handlers::download))
        .route("/static/{*path}", get(frontend::serve_static))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
