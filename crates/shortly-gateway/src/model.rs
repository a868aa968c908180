use serde::{Deserialize, Serialize};

/// Body of `POST /`.
#[derive(Debug, Deserialize)]
pub struct NewUrlForm {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
