//! Error taxonomy for the conversion pipeline.
//!
//! Malformed HTML is never an error: extraction degrades silently. What is
//! left are request problems (reported before any work is done) and critical
//! failures while composing or serialising the PDF.

use std::backtrace::Backtrace;

use serde_json::{json, Value};
use thiserror::Error;

/// Step name reported in `detail.step` for input validation failures.
pub const STEP_VALIDATION: &str = "validation";
/// Step name reported in `detail.step` for anything caught at the boundary.
pub const STEP_CRITICAL: &str = "critical_error";

#[derive(Debug, Error)]
pub enum ConvertError {
    /// The HTML string was empty or contained only whitespace.
    #[error("Conteúdo HTML vazio: nada para converter")]
    EmptyHtml { length: usize },

    /// The request body had no string `html` field.
    #[error("Campo 'html' é obrigatório e deve ser uma string")]
    MissingHtml,

    /// The request body was not valid JSON.
    #[error("Corpo da requisição inválido: {message}")]
    InvalidJson { message: String },

    /// The request body exceeded the configured size limit.
    #[error("Corpo da requisição excede o limite de {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// The composed layout could not be serialised.
    #[error("Erro interno: {message}")]
    Render { message: String, stack: String },

    /// A panic was caught while composing or encoding.
    #[error("Erro interno: {message}")]
    Panic { message: String, stack: String },
}

impl ConvertError {
    pub fn render(message: impl Into<String>) -> Self {
        ConvertError::Render {
            message: message.into(),
            stack: Backtrace::force_capture().to_string(),
        }
    }

    /// Short machine-readable name of the variant.
    pub fn name(&self) -> &'static str {
        match self {
            ConvertError::EmptyHtml { .. } => "EmptyHtml",
            ConvertError::MissingHtml => "MissingHtml",
            ConvertError::InvalidJson { .. } => "InvalidJson",
            ConvertError::PayloadTooLarge { .. } => "PayloadTooLarge",
            ConvertError::Render { .. } => "RenderError",
            ConvertError::Panic { .. } => "Panic",
        }
    }

    pub fn step(&self) -> &'static str {
        if self.is_client_error() {
            STEP_VALIDATION
        } else {
            STEP_CRITICAL
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ConvertError::EmptyHtml { .. }
                | ConvertError::MissingHtml
                | ConvertError::InvalidJson { .. }
                | ConvertError::PayloadTooLarge { .. }
        )
    }

    /// HTTP status the server answers with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ConvertError::PayloadTooLarge { .. } => 413,
            _ if self.is_client_error() => 400,
            _ => 500,
        }
    }

    /// Diagnostic object placed in the `detail` field of a failed response.
    pub fn detail(&self) -> Value {
        match self {
            ConvertError::EmptyHtml { length } => json!({
                "step": STEP_VALIDATION,
                "htmlLength": length,
            }),
            ConvertError::MissingHtml => json!({
                "step": STEP_VALIDATION,
                "field": "html",
            }),
            ConvertError::InvalidJson { message } => json!({
                "step": STEP_VALIDATION,
                "message": message,
            }),
            ConvertError::PayloadTooLarge { limit } => json!({
                "step": STEP_VALIDATION,
                "limitBytes": limit,
            }),
            ConvertError::Render { message, stack } | ConvertError::Panic { message, stack } => json!({
                "name": self.name(),
                "message": message,
                "stack": stack,
                "step": STEP_CRITICAL,
            }),
        }
    }
}
