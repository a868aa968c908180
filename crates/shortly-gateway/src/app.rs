use std::path::PathBuf;

use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    health_handler, new_url_form_handler, short_link_handler, submit_url_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    /// Builds the router. Files under `static_dir` are served at `/_static`.
    ///
    /// Fixed routes start with `_`, which is outside the token alphabet, so
    /// every minted token stays reachable at `/{token}`.
    pub fn router(state: AppState, static_dir: Option<PathBuf>) -> Router {
        let router = Router::new()
            .route("/", get(new_url_form_handler).post(submit_url_handler))
            .route("/_health", get(health_handler))
            .route("/{token}", get(short_link_handler));

        let router = match static_dir {
            Some(dir) => router.nest_service("/_static", ServeDir::new(dir)),
            None => router,
        };

        router.layer(TraceLayer::new_for_http()).with_state(state)
    }
}
