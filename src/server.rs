//! HTTP boundary – a single conversion endpoint with permissive CORS.
//!
//! Every path answers the same way, so the service can sit behind any route
//! prefix. `OPTIONS` short-circuits with an empty 200, `POST` expects
//! `{ "html": "..." }` and answers with a [`ConvertResponse`]. Conversion runs
//! on tokio's blocking pool.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::error::Category;

use crate::error::ConvertError;
use crate::pipeline::{convert_with, PipelineConfig};
use crate::response::{ConvertRequest, ConvertResponse};

/// Environment variable consulted for the listen address.
pub const ADDR_ENV: &str = "CONTRACT_PDF_ADDR";
pub const DEFAULT_ADDR: &str = "0.0.0.0:8000";
/// Request bodies above this size are refused; the whole PDF is built in
/// memory, so this bounds per-request memory.
pub const DEFAULT_MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";
pub const ALLOW_METHODS: &str = "POST, OPTIONS";

/// Server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: String,
    pub max_body_bytes: usize,
    pub pipeline: PipelineConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            pipeline: PipelineConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Defaults, with the address taken from `CONTRACT_PDF_ADDR` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(addr) = std::env::var(ADDR_ENV) {
            if !addr.trim().is_empty() {
                config.addr = addr.trim().to_string();
            }
        }
        config
    }
}

/// Build the router.
pub fn router(config: &ServerConfig) -> Router {
    let pipeline = config.pipeline.clone();
    let limit = config.max_body_bytes;
    Router::new()
        .fallback(move |method: Method, body: Result<Bytes, BytesRejection>| {
            handle(method, body, limit, pipeline.clone())
        })
        .layer(DefaultBodyLimit::max(limit))
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: ServerConfig) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    log::info!("contract-pdf listening on {}", config.addr);
    axum::serve(listener, router(&config)).await
}

async fn handle(
    method: Method,
    body: Result<Bytes, BytesRejection>,
    limit: usize,
    pipeline: PipelineConfig,
) -> Response {
    if method == Method::OPTIONS {
        return with_cors(StatusCode::OK.into_response());
    }
    if method != Method::POST {
        log::debug!("{method} not allowed");
        let resp = (StatusCode::METHOD_NOT_ALLOWED, [(header::ALLOW, ALLOW_METHODS)]).into_response();
        return with_cors(resp);
    }

    let html = match body
        .map_err(|rejection| body_error(&rejection, limit))
        .and_then(|body| request_html(&body))
    {
        Ok(html) => html,
        Err(err) => {
            log::warn!("bad request: {err}");
            return json_response(ConvertResponse::failure(&err));
        }
    };

    let result = tokio::task::spawn_blocking(move || convert_with(&html, &pipeline)).await;
    let response = match result {
        Ok(resp) => resp,
        Err(join_err) => {
            log::error!("conversion task failed: {join_err}");
            ConvertError::render(join_err.to_string()).into()
        }
    };
    json_response(response)
}

/// Pull the `html` string out of a JSON request body.
fn request_html(body: &[u8]) -> Result<String, ConvertError> {
    match serde_json::from_slice::<ConvertRequest>(body) {
        Ok(request) => Ok(request.html),
        // Well-formed JSON without a string `html` field.
        Err(e) if e.classify() == Category::Data => Err(ConvertError::MissingHtml),
        Err(e) => Err(ConvertError::InvalidJson {
            message: e.to_string(),
        }),
    }
}

/// Map a body that could not be buffered to a JSON-reportable error.
fn body_error(rejection: &BytesRejection, limit: usize) -> ConvertError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ConvertError::PayloadTooLarge { limit }
    } else {
        ConvertError::InvalidJson {
            message: rejection.body_text(),
        }
    }
}

fn json_response(resp: ConvertResponse) -> Response {
    let status =
        StatusCode::from_u16(resp.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = resp.to_json();
    with_cors((status, [(header::CONTENT_TYPE, "application/json")], body).into_response())
}

fn with_cors(mut resp: Response) -> Response {
    let headers = resp.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    resp
}
