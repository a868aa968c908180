//! HTTP front end for the Shortly URL shortener.
//!
//! Serves the submission form, the redirect route and the details page on
//! top of any [`shortly_core::LinkStore`].

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;
pub mod telemetry;
pub mod templates;
pub mod validate;

pub use app::App;
pub use state::AppState;
