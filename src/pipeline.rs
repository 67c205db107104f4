//! Pipeline – ties together extraction, composition and rendering into a
//! single function call, and converts every outcome into a structured
//! [`ConvertResponse`].

use std::backtrace::Backtrace;
use std::panic::{self, AssertUnwindSafe};

use base64::{engine::general_purpose::STANDARD as BASE64_STD, Engine as _};
use chrono::NaiveDateTime;

use crate::error::ConvertError;
use crate::extract::{extract_with, TRAILING_CONTENT_CHARS};
use crate::fonts::TextMeasure;
use crate::layout_config::{DocumentLayout, A4_HEIGHT_PT, A4_WIDTH_PT};
use crate::pagination::{compose, PageGeometry, PAGE_MARGIN_PT};
use crate::render::render_pdf;
use crate::response::ConvertResponse;

/// Configuration for the PDF generation pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Page width in points (default: A4 = 595).
    pub page_width: f32,
    /// Page height in points (default: A4 = 842).
    pub page_height: f32,
    /// Page margin in points (default: 50).
    pub page_margin: f32,
    /// Width model used for wrapping (default: the 0.6 heuristic).
    pub measure: TextMeasure,
    /// Characters after the last heading taken as its content (default: 1000).
    pub trailing_content_chars: usize,
    /// Footer timestamp; `None` means "now" in local time.
    pub generated_at: Option<NaiveDateTime>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            page_width: A4_WIDTH_PT,
            page_height: A4_HEIGHT_PT,
            page_margin: PAGE_MARGIN_PT,
            measure: TextMeasure::Heuristic,
            trailing_content_chars: TRAILING_CONTENT_CHARS,
            generated_at: None,
        }
    }
}

impl PipelineConfig {
    fn geometry(&self) -> PageGeometry {
        PageGeometry {
            page_width: self.page_width,
            page_height: self.page_height,
            margin: self.page_margin,
        }
    }

    fn timestamp(&self) -> NaiveDateTime {
        self.generated_at
            .unwrap_or_else(|| chrono::Local::now().naive_local())
    }
}

/// Full pipeline: HTML string → PDF bytes.
///
/// Returns `(pdf_bytes, layout)`.
pub fn generate_pdf(
    html: &str,
    config: &PipelineConfig,
) -> Result<(Vec<u8>, DocumentLayout), ConvertError> {
    if html.trim().is_empty() {
        return Err(ConvertError::EmptyHtml { length: html.len() });
    }

    let layout = compute_layout(html, config);
    let pdf_bytes = render_pdf(&layout)?;

    Ok((pdf_bytes, layout))
}

/// Generate only the layout (no PDF rendering) – useful for testing.
pub fn compute_layout(html: &str, config: &PipelineConfig) -> DocumentLayout {
    // 1. Extract title and sections
    let parsed = extract_with(html, config.trailing_content_chars);

    // 2. Compose pages and stamp footers
    compose(&parsed, config.geometry(), config.measure, config.timestamp())
}

/// Convert with default A4 settings. Never panics.
pub fn convert(html: &str) -> ConvertResponse {
    convert_with(html, &PipelineConfig::default())
}

/// Convert `html` and report the outcome as a structured result. Errors and
/// panics raised while composing or encoding are caught here.
pub fn convert_with(html: &str, config: &PipelineConfig) -> ConvertResponse {
    log::info!("converting {} bytes of HTML", html.len());
    guarded(|| generate_pdf(html, config))
}

/// Run `job` and fold its result, error or panic into a [`ConvertResponse`].
fn guarded<F>(job: F) -> ConvertResponse
where
    F: FnOnce() -> Result<(Vec<u8>, DocumentLayout), ConvertError>,
{
    match panic::catch_unwind(AssertUnwindSafe(job)) {
        Ok(Ok((bytes, layout))) => {
            log::info!(
                "generated {} page(s), {} bytes for {:?}",
                layout.pages.len(),
                bytes.len(),
                layout.title
            );
            ConvertResponse::ok(BASE64_STD.encode(bytes))
        }
        Ok(Err(err)) => {
            if err.is_client_error() {
                log::warn!("rejected input: {err}");
            } else {
                log::error!("conversion failed: {err}");
            }
            err.into()
        }
        Err(payload) => {
            let err = ConvertError::Panic {
                message: panic_message(payload.as_ref()),
                stack: Backtrace::force_capture().to_string(),
            };
            log::error!("conversion panicked: {err}");
            err.into()
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
