use crate::core::restock::RestockBoard;
use crate::domain::model::{ActiveSummary, ShapedStock};
use crate::server::error::ApiError;
use crate::server::AppState;
use crate::utils::error::StockError;
use crate::utils::validation::parse_http_url;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub const ACTIVE_STOCK_ERROR: &str = "Gagal memuat stok aktif";
pub const ACTIVE_SUMMARY_ERROR: &str = "Gagal memuat ringkasan stok aktif";
pub const MISSING_URL_ERROR: &str = "Parameter url wajib diisi";
pub const INVALID_URL_ERROR: &str = "Parameter url tidak valid";
pub const IMAGE_FETCH_ERROR: &str = "Gagal memuat gambar";

const DEFAULT_IMAGE_CONTENT_TYPE: &str = "image/png";

#[derive(Debug, Serialize)]
pub struct Health {
    ok: bool,
    service: &'static str,
}

pub async fn health() -> Json<Health> {
    Json(Health {
        ok: true,
        service: env!("CARGO_PKG_NAME"),
    })
}

/// GET /api/stock/aktif
#[instrument(skip(state))]
pub async fn active_stock(State(state): State<AppState>) -> Result<Json<ShapedStock>, ApiError> {
    let shaped = state
        .service
        .active_stock()
        .await
        .map_err(|e| ApiError::from_error(e, ACTIVE_STOCK_ERROR))?;
    Ok(Json(shaped))
}

/// GET /api/stock/active-summary
#[instrument(skip(state))]
pub async fn active_summary(
    State(state): State<AppState>,
) -> Result<Json<ActiveSummary>, ApiError> {
    let summary = state
        .service
        .active_summary()
        .await
        .map_err(|e| ApiError::from_error(e, ACTIVE_SUMMARY_ERROR))?;
    Ok(Json(summary))
}

/// GET /api/stock/restock-time
pub async fn restock_time(State(state): State<AppState>) -> Json<RestockBoard> {
    Json(state.service.restock_board())
}

#[derive(Debug, Deserialize)]
pub struct ImageProxyQuery {
    pub url: Option<String>,
}

/// GET {proxy_path}?url=<absolute-url>
///
/// Streams the remote body back with the upstream status and content type.
#[instrument(skip(state))]
pub async fn image_proxy(
    State(state): State<AppState>,
    Query(query): Query<ImageProxyQuery>,
) -> Result<Response, ApiError> {
    // Validate the target before any outbound call
    let raw_url = query
        .url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| {
            ApiError::from_error(
                StockError::MissingParameter {
                    name: "url".to_string(),
                },
                MISSING_URL_ERROR,
            )
        })?;

    let target = parse_http_url(&raw_url).map_err(|reason| {
        ApiError::from_error(
            StockError::InvalidProxyUrl {
                value: raw_url.clone(),
                reason,
            },
            INVALID_URL_ERROR,
        )
    })?;

    debug!("Proxying image from: {}", target);
    let upstream = state
        .http
        .get(target)
        .send()
        .await
        .map_err(|e| ApiError::from_error(StockError::from(e), IMAGE_FETCH_ERROR))?;

    // Forward status and content type, stream the body unmodified
    let status = upstream.status();
    let content_type = upstream
        .headers()
        .get(CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_IMAGE_CONTENT_TYPE));

    let body = Body::from_stream(upstream.bytes_stream());
    Ok((status, [(CONTENT_TYPE, content_type)], body).into_response())
}
