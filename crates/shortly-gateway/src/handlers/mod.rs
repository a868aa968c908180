mod health;
mod links;

pub use health::health_handler;
pub use links::{new_url_form_handler, short_link_handler, submit_url_handler};
