pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::Config;
use crate::middleware::{
    cors::api_cors,
    rate_limit::{rps_middleware, RateLimiter},
    session::session_middleware,
};
use crate::services::{
    email_service::EmailService, question_bank::QuestionBank, quiz_service::QuizService,
    session_store::SessionStore, upload_service::UploadService,
};

/// Headroom for multipart framing on top of the file size limit.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: QuizService,
    pub sessions: SessionStore,
    pub upload_service: UploadService,
    pub email_service: EmailService,
}

impl AppState {
    pub fn new(config: &Config, bank: QuestionBank) -> Self {
        Self::with_email_service(config, bank, EmailService::from_config(config))
    }

    pub fn with_email_service(
        config: &Config,
        bank: QuestionBank,
        email_service: EmailService,
    ) -> Self {
        Self {
            quiz_service: QuizService::new(Arc::new(bank)),
            sessions: SessionStore::new(Duration::from_secs(config.session_ttl_secs)),
            upload_service: UploadService::new(&config.uploads_dir, config.max_upload_bytes),
            email_service,
        }
    }
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let assessment_api = Router::new()
        .route("/api/languages", get(routes::quiz::list_languages))
        .route("/api/start", post(routes::quiz::start_quiz))
        .route("/api/state", get(routes::quiz::get_state))
        .route("/api/answer", post(routes::quiz::answer_question))
        .route("/api/navigate", post(routes::quiz::navigate))
        .route("/api/submit", post(routes::quiz::submit_quiz))
        .route("/api/result", get(routes::quiz::get_result))
        .route("/api/review", get(routes::quiz::get_review))
        .route("/api/upload", post(routes::upload::upload_resume))
        .route(
            "/api/upload-resume-for-questions",
            post(routes::upload::detect_languages),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.sessions.clone(),
            session_middleware,
        ));

    let hr_api = Router::new()
        .route("/api/health", get(routes::health::health))
        .route("/api/send-email", post(routes::email::send_email));

    let mut app = assessment_api
        .merge(hr_api)
        .layer(axum::middleware::from_fn_with_state(
            RateLimiter::new(config.public_rps),
            rps_middleware,
        ))
        .with_state(state);

    if Path::new(&config.static_dir).is_dir() {
        tracing::info!("Serving static files from: {}", config.static_dir);
        app = app.fallback_service(ServeDir::new(&config.static_dir));
    }

    app.layer(api_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(
            config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES,
        ))
}
