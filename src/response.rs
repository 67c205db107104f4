//! Wire shape of a conversion result, shared by the HTTP server, the C ABI
//! and the CLI.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConvertError;

/// Request body accepted by the HTTP boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertRequest {
    pub html: String,
}

/// `{ success: true, pdfBase64 }` or `{ success: false, error, detail }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_base64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
    /// HTTP status of the error this was built from. Not part of the body.
    #[serde(skip)]
    pub status: Option<u16>,
}

impl ConvertResponse {
    pub fn ok(pdf_base64: String) -> Self {
        Self {
            success: true,
            pdf_base64: Some(pdf_base64),
            error: None,
            detail: None,
            status: None,
        }
    }

    pub fn failure(err: &ConvertError) -> Self {
        Self {
            success: false,
            pdf_base64: None,
            error: Some(err.to_string()),
            detail: Some(err.detail()),
            status: Some(err.status_code()),
        }
    }

    /// HTTP status matching this result: 200, or the error's status. A
    /// deserialised failure falls back to 400/500 by `detail.step`.
    pub fn status_code(&self) -> u16 {
        if self.success {
            return 200;
        }
        if let Some(status) = self.status {
            return status;
        }
        let step = self
            .detail
            .as_ref()
            .and_then(|d| d.get("step"))
            .and_then(Value::as_str);
        match step {
            Some(crate::error::STEP_VALIDATION) => 400,
            _ => 500,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"success":false,"error":"Erro interno: {e}"}}"#)
        })
    }
}

impl From<ConvertError> for ConvertResponse {
    fn from(err: ConvertError) -> Self {
        Self::failure(&err)
    }
}
