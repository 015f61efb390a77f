use tower_http::cors::{Any, CorsLayer};

/// The assessment pages and the HR form may be served from a different origin.
pub fn api_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(Any)
}
