use futures::future::{Either, select};
use gloo_net::http::{Request, Response};
use gloo_timers::future::TimeoutFuture;
use shared::api::{
    RECOMMENDATIONS_PATH, RecommendationRequest, RecommendationResponse, UPLOAD_FIELD,
    error_message,
};
use shared::{DemoError, DetectionReport, Language, Mode, Payload, SpeciesPrediction};
use std::future::Future;
use wasm_bindgen::JsValue;

/// Client-side cap on a single classification request.
pub const CLASSIFY_TIMEOUT_MS: u32 = 30_000;
const RECOMMEND_TIMEOUT_MS: u32 = 45_000;

fn js_error(context: &str, err: JsValue) -> DemoError {
    DemoError::NetworkOrServer(format!("{}: {:?}", context, err))
}

async fn with_timeout<F: Future>(future: F, ms: u32) -> Result<F::Output, DemoError> {
    match select(Box::pin(future), Box::pin(TimeoutFuture::new(ms))).await {
        Either::Left((output, _)) => Ok(output),
        Either::Right(_) => Err(DemoError::NetworkOrServer(
            "The request timed out. Please try again.".into(),
        )),
    }
}

async fn send(request: Request, timeout_ms: u32) -> Result<Response, DemoError> {
    let response = with_timeout(request.send(), timeout_ms)
        .await?
        .map_err(|e| DemoError::NetworkOrServer(format!("Network error: {}", e)))?;

    if response.ok() {
        Ok(response)
    } else {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(DemoError::from_status(status, &error_message(&body)))
    }
}

/// Uploads one image to the classification endpoint for `mode`.
pub async fn classify(mode: Mode, image: &web_sys::Blob, file_name: &str) -> Result<Payload, DemoError> {
    let form_data = web_sys::FormData::new().map_err(|e| js_error("Failed to build upload", e))?;
    form_data
        .append_with_blob_and_filename(UPLOAD_FIELD, image, file_name)
        .map_err(|e| js_error("Failed to attach image", e))?;

    let request = Request::post(mode.path())
        .body(form_data)
        .map_err(|e| DemoError::NetworkOrServer(format!("Failed to build request: {}", e)))?;

    let response = send(request, CLASSIFY_TIMEOUT_MS).await?;
    match mode {
        Mode::Species => response
            .json::<SpeciesPrediction>()
            .await
            .map(Payload::Species)
            .map_err(|e| DemoError::MalformedResult(e.to_string())),
        Mode::Disease => response
            .json::<DetectionReport>()
            .await
            .map(Payload::Detections)
            .map_err(|e| DemoError::MalformedResult(e.to_string())),
    }
}

pub async fn recommend(labels: Vec<String>, language: Language) -> Result<String, DemoError> {
    let request = Request::post(RECOMMENDATIONS_PATH)
        .json(&RecommendationRequest { labels, language })
        .map_err(|e| DemoError::NetworkOrServer(format!("Failed to build request: {}", e)))?;

    let response = send(request, RECOMMEND_TIMEOUT_MS).await?;
    response
        .json::<RecommendationResponse>()
        .await
        .map(|r| r.recommendation)
        .map_err(|e| DemoError::MalformedResult(e.to_string()))
}
