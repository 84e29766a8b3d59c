use actix_files::Files;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use log::{error, info};
use shared::api::{
    DISEASE_PATH, HEALTH_PATH, HealthResponse, RECOMMENDATIONS_PATH, RecommendationRequest,
    RecommendationResponse, SPECIES_PATH,
};
use uuid::Uuid;

use crate::error::GatewayError;
use crate::upload::read_image;
use crate::upstream::assistant::RecommendationService;
use crate::upstream::classifier::ClassifierClient;

pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource(HEALTH_PATH).route(web::get().to(health)))
        .service(web::resource(SPECIES_PATH).route(web::post().to(predict_species)))
        .service(web::resource(DISEASE_PATH).route(web::post().to(predict_disease)))
        .service(web::resource(RECOMMENDATIONS_PATH).route(web::post().to(recommendations)));
}

/// API routes plus the built frontend mounted at `/`.
pub fn configure_routes(cfg: &mut web::ServiceConfig, frontend_dir: String) {
    configure_api(cfg);
    cfg.service(Files::new("/", frontend_dir).index_file("index.html"));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        message: "SmartBloom gateway is running".into(),
    })
}

async fn predict_species(
    classifier: web::Data<ClassifierClient>,
    payload: Multipart,
) -> Result<HttpResponse, GatewayError> {
    let request_id = Uuid::new_v4();
    let image = read_image(payload, classifier.max_upload_bytes()).await?;
    info!(
        "[{}] species request for {} ({} bytes)",
        request_id,
        image.file_name,
        image.data.len()
    );

    match classifier.predict_species(image).await {
        Ok(prediction) => {
            info!(
                "[{}] predicted {} ({:.3})",
                request_id, prediction.prediction, prediction.confidence
            );
            Ok(HttpResponse::Ok().json(prediction))
        }
        Err(e) => {
            error!("[{}] species request failed: {}", request_id, e);
            Err(e)
        }
    }
}

async fn predict_disease(
    classifier: web::Data<ClassifierClient>,
    payload: Multipart,
) -> Result<HttpResponse, GatewayError> {
    let request_id = Uuid::new_v4();
    let image = read_image(payload, classifier.max_upload_bytes()).await?;
    info!(
        "[{}] disease request for {} ({} bytes)",
        request_id,
        image.file_name,
        image.data.len()
    );

    match classifier.predict_disease(image).await {
        Ok(report) => {
            info!("[{}] {} detections", request_id, report.detections.len());
            Ok(HttpResponse::Ok().json(report))
        }
        Err(e) => {
            error!("[{}] disease request failed: {}", request_id, e);
            Err(e)
        }
    }
}

async fn recommendations(
    service: web::Data<RecommendationService>,
    request: web::Json<RecommendationRequest>,
) -> Result<HttpResponse, GatewayError> {
    let request = request.into_inner();
    let recommendation = service.recommend(&request).await.inspect_err(|e| {
        if !matches!(e, GatewayError::AssistantUnavailable) {
            error!("Recommendation request failed: {}", e);
        }
    })?;
    Ok(HttpResponse::Ok().json(RecommendationResponse { recommendation }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AssistantConfig;
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use shared::Language;
    use shared::api::ErrorResponse;
    use std::time::Duration;

    const BOUNDARY: &str = "smartbloom-boundary";
    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn multipart_body(field: &str, file_name: &str, data: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn upload(path: &str, body: Vec<u8>) -> test::TestRequest {
        test::TestRequest::post()
            .uri(path)
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(body)
    }

    // Port 9 (discard) is closed on test hosts, so forwarding fails fast.
    fn classifier(limit: usize) -> ClassifierClient {
        ClassifierClient::new(
            reqwest::Client::new(),
            "http://127.0.0.1:9",
            Duration::from_secs(2),
            limit,
        )
    }

    fn services(limit: usize) -> (web::Data<ClassifierClient>, web::Data<RecommendationService>) {
        (
            web::Data::new(classifier(limit)),
            web::Data::new(RecommendationService::new(
                reqwest::Client::new(),
                AssistantConfig::default(),
            )),
        )
    }

    #[actix_web::test]
    async fn health_reports_running() {
        let app = test::init_service(App::new().configure(configure_api)).await;
        let req = test::TestRequest::get().uri(HEALTH_PATH).to_request();
        let body: HealthResponse = test::call_and_read_body_json(&app, req).await;
        assert!(body.message.contains("running"));
    }

    #[actix_web::test]
    async fn non_image_upload_is_rejected_before_forwarding() {
        let (classifier, assistant) = services(1024);
        let app = test::init_service(
            App::new()
                .app_data(classifier)
                .app_data(assistant)
                .configure(configure_api),
        )
        .await;

        let req = upload(SPECIES_PATH, multipart_body("file", "notes.txt", b"just some text")).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(body.error.starts_with("Unsupported file type"));
    }

    #[actix_web::test]
    async fn empty_upload_is_a_bad_request() {
        let (classifier, assistant) = services(1024);
        let app = test::init_service(
            App::new()
                .app_data(classifier)
                .app_data(assistant)
                .configure(configure_api),
        )
        .await;

        let req = upload(DISEASE_PATH, multipart_body("file", "leaf.png", b"")).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn malformed_multipart_is_reported_as_invalid_upload() {
        let (classifier, assistant) = services(1024);
        let app = test::init_service(
            App::new()
                .app_data(classifier)
                .app_data(assistant)
                .configure(configure_api),
        )
        .await;

        let req = upload(SPECIES_PATH, b"this is not a multipart body".to_vec()).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(body.error.starts_with("Invalid upload"), "{}", body.error);
    }

    #[actix_web::test]
    async fn oversized_upload_is_rejected() {
        let (classifier, assistant) = services(8);
        let app = test::init_service(
            App::new()
                .app_data(classifier)
                .app_data(assistant)
                .configure(configure_api),
        )
        .await;

        let req = upload(DISEASE_PATH, multipart_body("file", "leaf.png", PNG_MAGIC)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[actix_web::test]
    async fn unreachable_upstream_is_a_bad_gateway() {
        let (classifier, assistant) = services(1024);
        let app = test::init_service(
            App::new()
                .app_data(classifier)
                .app_data(assistant)
                .configure(configure_api),
        )
        .await;

        let req = upload(DISEASE_PATH, multipart_body("file", "leaf.png", PNG_MAGIC)).to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status() == StatusCode::BAD_GATEWAY || resp.status() == StatusCode::GATEWAY_TIMEOUT);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(body.error.starts_with("Upstream request failed"));
    }

    #[actix_web::test]
    async fn recommendations_without_key_are_unavailable() {
        let (classifier, assistant) = services(1024);
        let app = test::init_service(
            App::new()
                .app_data(classifier)
                .app_data(assistant)
                .configure(configure_api),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(RECOMMENDATIONS_PATH)
            .set_json(RecommendationRequest {
                labels: vec!["leaf rust".into()],
                language: Language::En,
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
