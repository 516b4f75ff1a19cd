//! HTTP surface: `POST /translate` and `GET /health`.
//!
//! The translator (and the completion client inside it) is built once at
//! startup and shared by every worker through `web::Data`.

use std::fmt;
use actix_cors::Cors;
use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, HttpServer, ResponseError, web};
use serde::Serialize;
use serde_json::json;
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use crate::config::Config;
use crate::error::GlossaError;
use crate::translate::{ChunkedTranslator, TranslationRequest};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Static facts about the running service, reported by `/health`
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub model: String,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    detail: String,
}

/// Request-level failure, rendered as `500 {"detail": ...}`
#[derive(Debug)]
pub struct ApiError(GlossaError);

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<GlossaError> for ApiError {
    fn from(err: GlossaError) -> Self {
        Self(err)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorDetail {
            detail: self.0.to_string(),
        })
    }
}

async fn translate(
    translator: web::Data<ChunkedTranslator>,
    body: web::Json<TranslationRequest>,
) -> Result<HttpResponse, ApiError> {
    let request_id = Uuid::new_v4().to_string();
    let request = body.into_inner();
    let span = info_span!("translate", request_id = %request_id, target_lang = %request.target_lang);

    async move {
        info!(text_chars = request.text.chars().count(), "Translation request received");

        match translator.translate(&request).await {
            Ok(result) => {
                info!(word_mappings = result.word_mapping.len(), "Translation request completed");
                Ok(HttpResponse::Ok()
                    .insert_header((REQUEST_ID_HEADER, request_id.as_str()))
                    .json(result))
            }
            Err(e) => {
                error!("Translation request failed: {}", e);
                Err(ApiError::from(e))
            }
        }
    }
    .instrument(span)
    .await
}

async fn health(info: web::Data<ServiceInfo>) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok", "model": info.model }))
}

/// Bodies that fail to deserialize are rejected before reaching the translator
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::UnprocessableEntity().json(ErrorDetail {
            detail: err.to_string(),
        });
        InternalError::from_response(err, response).into()
    })
}

/// Any origin, any method, any header
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}

/// Register routes; `ChunkedTranslator` and `ServiceInfo` must be provided as app data
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/translate", web::post().to(translate))
        .route("/health", web::get().to(health));
}

/// Bind and run the HTTP server until shutdown
pub async fn run_server(config: &Config, translator: ChunkedTranslator) -> std::io::Result<()> {
    let translator = web::Data::new(translator);
    let service_info = web::Data::new(ServiceInfo {
        model: config.translate.model.clone(),
    });
    let bind_addr = config.bind_addr();

    info!("Starting HTTP server on http://{}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(translator.clone())
            .app_data(service_info.clone())
            .wrap(cors())
            .configure(configure)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
