use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use shared::api::ErrorResponse;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("No image was provided in the upload")]
    MissingImage,
    #[error("Unsupported file type: {0}")]
    UnsupportedMedia(String),
    #[error("Image exceeds the upload limit of {limit} bytes")]
    TooLarge { limit: usize },
    #[error("{0}")]
    BadRequest(String),
    #[error("{body}")]
    Upstream { status: u16, body: String },
    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Unexpected upstream response: {0}")]
    Malformed(String),
    #[error("AI recommendations are not configured")]
    AssistantUnavailable,
}

impl GatewayError {
    /// Relays a non-2xx upstream reply, keeping its body as the message.
    pub fn upstream(status: u16, body: String) -> Self {
        let body = body.trim().to_string();
        let body = if body.is_empty() {
            format!("Upstream service returned status {}", status)
        } else {
            body
        };
        GatewayError::Upstream { status, body }
    }
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::MissingImage | GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::UnsupportedMedia(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            GatewayError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            GatewayError::Transport(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::Transport(_) | GatewayError::Malformed(_) => StatusCode::BAD_GATEWAY,
            GatewayError::AssistantUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
