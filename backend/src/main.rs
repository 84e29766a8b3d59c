mod config;
mod error;
mod routes;
mod upload;
mod upstream;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use config::GatewayConfig;
use routes::configure_routes;
use upstream::assistant::RecommendationService;
use upstream::classifier::ClassifierClient;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = GatewayConfig::load().map_err(|e| {
        log::error!("Failed to load gateway configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    let http = reqwest::Client::builder()
        .user_agent(concat!("smartbloom-gateway/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| std::io::Error::other(format!("HTTP client error: {}", e)))?;

    let classifier = ClassifierClient::new(
        http.clone(),
        config.upstream.base_url.clone(),
        config.upstream.timeout(),
        config.upstream.max_upload_bytes,
    );
    let assistant = RecommendationService::new(http, config.assistant.clone());

    log::info!("Forwarding classification requests to {}", config.upstream.base_url);
    if assistant.is_configured() {
        log::info!("Assistant recommendations enabled ({})", config.assistant.model);
    } else {
        log::warn!("ASSISTANT_API_KEY is not set; the assistant will show its static care guide.");
    }

    let frontend_dir = config.frontend_dir();
    log::info!("Serving frontend from {}", frontend_dir);

    let bind_address = config.bind_address();
    log::info!("Starting server on {}", bind_address);

    let classifier = web::Data::new(classifier);
    let assistant = web::Data::new(assistant);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(classifier.clone())
            .app_data(assistant.clone())
            .configure(|cfg| configure_routes(cfg, frontend_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
