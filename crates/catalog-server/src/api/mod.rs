mod products;
mod upload;

use std::{path::PathBuf, sync::Arc};

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use catalog_core::{AppConfig, ImageLocation};
use catalog_store::{ProductStore, StoreError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

/// Shared per-process state: one store client and the image URL base.
pub struct AppState<S> {
    pub store: Arc<S>,
    pub images: ImageLocation,
}

// Manual impl: `S` itself need not be `Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            images: self.images.clone(),
        }
    }
}

/// Router settings that come from configuration rather than state.
#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub max_upload_bytes: usize,
    pub static_dir: PathBuf,
}

impl ServeOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_upload_bytes: config.max_upload_bytes,
            static_dir: config.static_dir.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    store: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        // Only store failures are reported through this envelope.
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

const STORE_ERROR_CODE: &str = "store_error";

pub(super) fn map_store_error(request_id: String, error: &StoreError) -> ApiError {
    tracing::error!(request_id = %request_id, error = %error, "store call failed");
    ApiError::new(request_id, STORE_ERROR_CODE, error.to_string())
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
}

fn api_router<S: ProductStore>(max_upload_bytes: usize) -> Router<AppState<S>> {
    Router::new()
        .route(
            "/api/upload",
            post(upload::upload::<S>).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/api/products", get(products::list_products::<S>))
        .route("/api/health", get(health::<S>))
}

/// Assembles the full application: API routes, static fallback, shared layers.
pub fn build_app<S: ProductStore>(state: AppState<S>, options: &ServeOptions) -> Router {
    Router::new()
        .merge(api_router::<S>(options.max_upload_bytes))
        .fallback_service(ServeDir::new(&options.static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health<S: ProductStore>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    store: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: store unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        store: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}
