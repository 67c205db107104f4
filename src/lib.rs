//! # contract-pdf – contract HTML → paginated A4 PDF
//!
//! This crate turns contract bodies authored as HTML into PDF documents. The
//! pipeline stages are:
//!
//! 1. **Extract** – title and heading/content sections via regex ([`extract`])
//! 2. **Wrap** – greedy word wrap with a width model ([`fonts`])
//! 3. **Compose** – cursor-driven placement on A4 pages, footers ([`pagination`])
//! 4. **Render** – emit PDF bytes via printpdf ([`render`])
//!
//! [`pipeline::convert`] wraps the stages into a structured result that never
//! panics. The result is served over HTTP by [`server`] and exposed to C
//! callers by [`ffi`].

pub mod error;
pub mod extract;
pub mod ffi;
pub mod fonts;
pub mod layout_config;
pub mod pagination;
pub mod pipeline;
pub mod render;
pub mod response;
pub mod server;
pub mod templates;

// Re-exports for convenience
pub use error::ConvertError;
pub use pipeline::{convert, convert_with, generate_pdf, PipelineConfig};
pub use response::ConvertResponse;
