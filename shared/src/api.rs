use serde::{Deserialize, Serialize};

use crate::i18n::Language;

/// Field name of the image in classification uploads.
pub const UPLOAD_FIELD: &str = "file";

/// Prefix under which the gateway mirrors the upstream endpoints.
pub const API_PREFIX: &str = "/api/";

pub const SPECIES_PATH: &str = "/api/predict_flower";
pub const DISEASE_PATH: &str = "/api/predict_disease";
pub const RECOMMENDATIONS_PATH: &str = "/api/recommendations";
pub const HEALTH_PATH: &str = "/api/health";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RecommendationRequest {
    pub labels: Vec<String>,
    #[serde(default)]
    pub language: Language,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RecommendationResponse {
    pub recommendation: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HealthResponse {
    pub message: String,
}

/// Human-readable message from an error body. Gateway errors arrive as
/// `{"error": ...}`; anything else is used verbatim.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => parsed.error,
        Err(_) => body.trim().to_string(),
    }
}
