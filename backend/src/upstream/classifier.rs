use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use shared::api::UPLOAD_FIELD;
use shared::{DetectionReport, Mode, SpeciesPrediction};
use std::time::Duration;

use crate::error::GatewayError;
use crate::upload::UploadedImage;

/// Forwards uploads to the external classification service.
#[derive(Clone)]
pub struct ClassifierClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    max_upload_bytes: usize,
}

impl ClassifierClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        timeout: Duration,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            timeout,
            max_upload_bytes,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    pub fn endpoint(&self, mode: Mode) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), mode.endpoint())
    }

    pub async fn predict_species(&self, image: UploadedImage) -> Result<SpeciesPrediction, GatewayError> {
        let body = self.forward(Mode::Species, image).await?;
        parse_body(&body)
    }

    pub async fn predict_disease(&self, image: UploadedImage) -> Result<DetectionReport, GatewayError> {
        let body = self.forward(Mode::Disease, image).await?;
        parse_body(&body)
    }

    async fn forward(&self, mode: Mode, image: UploadedImage) -> Result<String, GatewayError> {
        let url = self.endpoint(mode);
        let part = Part::bytes(image.data)
            .file_name(image.file_name)
            .mime_str(image.content_type)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        log::debug!("Forwarding {} request to {}", mode, url);
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            log::warn!("Upstream {} answered {}: {}", url, status, body);
            return Err(GatewayError::upstream(status.as_u16(), body));
        }
        Ok(body)
    }
}

/// Missing fields degrade to defaults; only non-JSON bodies are rejected.
pub fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, GatewayError> {
    serde_json::from_str(body).map_err(|e| GatewayError::Malformed(e.to_string()))
}
