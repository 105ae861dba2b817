// Skin Analysis - API Server
//
// REST wrapper around the image classification service plus rule-based
// symptom matching, severity assessment and recommendations.

pub mod analysis;
pub mod config;
pub mod error;
pub mod handlers;
pub mod image_check;
pub mod state;

use std::future::Future;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{HeaderValue, CONTENT_TYPE},
        Method, StatusCode,
    },
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

pub use config::ServerConfig;
pub use error::AppError;
pub use state::{AppState, Classifier};

/// Room for multipart boundaries and the symptoms field on top of the image
const MULTIPART_OVERHEAD: usize = 64 * 1024;

fn cors_layer(origins: &config::CorsOrigins) -> CorsLayer {
    let allow_origin = match origins {
        config::CorsOrigins::Any => AllowOrigin::from(Any),
        config::CorsOrigins::List(list) => AllowOrigin::list(
            list.iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        ),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// tower-http refuses oversized bodies with a plain-text 413; rewrite it
/// into the JSON error body
async fn json_payload_too_large<B>(response: Response<B>) -> Response
where
    Response<B>: IntoResponse,
{
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if response.status() == StatusCode::PAYLOAD_TOO_LARGE && !is_json {
        return AppError::PayloadTooLarge.into_response();
    }
    response.into_response()
}

/// Build the application router with all `/api` routes and middleware
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_content_length + MULTIPART_OVERHEAD;
    let cors = cors_layer(&state.config.cors_origins);

    let api = Router::new()
        .route("/health", get(handlers::health))
        .route("/diseases", get(handlers::diseases))
        .route("/symptoms", get(handlers::symptoms))
        .route("/predict", post(handlers::predict));

    Router::new()
        .nest("/api", api)
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(middleware::map_response(json_payload_too_large))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `app` until `shutdown` resolves, letting in-flight requests finish
pub async fn serve<F>(
    listener: tokio::net::TcpListener,
    app: Router,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    tracing::info!("Server shutdown complete");
    Ok(())
}
