use shared::api::RecommendationRequest;
use shared::assistant::{ChatCompletionRequest, ChatCompletionResponse, build_prompt};
use shared::Label;

use crate::config::AssistantConfig;
use crate::error::GatewayError;

/// Talks to the chat-completion service on behalf of the browser, so the API
/// key never leaves the server.
#[derive(Clone)]
pub struct RecommendationService {
    http: reqwest::Client,
    config: AssistantConfig,
}

impl RecommendationService {
    pub fn new(http: reqwest::Client, config: AssistantConfig) -> Self {
        Self { http, config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    pub fn completion_request(&self, request: &RecommendationRequest) -> ChatCompletionRequest {
        ChatCompletionRequest::single_prompt(
            self.config.model.clone(),
            build_prompt(&request.labels, request.language),
            self.config.temperature,
            self.config.max_tokens,
        )
    }

    pub async fn recommend(&self, request: &RecommendationRequest) -> Result<String, GatewayError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(GatewayError::AssistantUnavailable);
        };
        if request.labels.iter().all(|l| l.trim().is_empty()) {
            return Err(GatewayError::BadRequest("At least one label is required".into()));
        }

        let mut builder = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .header("X-Title", &self.config.app_title)
            .timeout(self.config.timeout())
            .json(&self.completion_request(request));
        if let Some(referer) = &self.config.referer {
            builder = builder.header("HTTP-Referer", referer);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("Assistant API error {}: {}", status, body);
            return Err(GatewayError::upstream(status.as_u16(), body));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Malformed(e.to_string()))?;

        Ok(completion
            .first_content()
            .map(str::to_string)
            .unwrap_or_else(|| Label::AssistantUnavailable.text(request.language).to_string()))
    }
}
