//! Layout config – the frozen intermediate representation between page
//! composition and PDF rendering. It encodes exactly which text goes where on
//! each page, so it can be dumped as JSON, inspected in tests, or rendered
//! later without re-reading the HTML.

use serde::{Deserialize, Serialize};

use crate::fonts::FontVariant;

/// A4 width in PDF points.
pub const A4_WIDTH_PT: f32 = 595.0;
/// A4 height in PDF points.
pub const A4_HEIGHT_PT: f32 = 842.0;

/// A complete document layout ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentLayout {
    /// Document title embedded in the PDF metadata.
    #[serde(default = "DocumentLayout::default_title")]
    pub title: String,
    /// Width of each page in PDF points (1 pt = 1/72 inch).
    pub page_width_pt: f32,
    /// Height of each page in PDF points.
    pub page_height_pt: f32,
    /// Margin applied on all four sides.
    pub margin_pt: f32,
    /// Ordered list of pages.
    pub pages: Vec<PageLayout>,
}

/// One page of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_index: usize,
    /// Title, heading and body lines.
    pub runs: Vec<TextRun>,
    /// Generation stamp and page numbering, drawn below the bottom margin.
    #[serde(default)]
    pub footer: Vec<TextRun>,
}

/// A single line of text at an absolute position.
///
/// Coordinates follow PDF conventions: origin at the bottom-left corner of
/// the page, `y` is the text baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font: FontVariant,
    pub font_size: f32,
    /// RGB, each channel 0.0..=1.0.
    pub color: [f32; 3],
}

impl DocumentLayout {
    /// Create an empty A4 layout.
    pub fn a4(margin_pt: f32) -> Self {
        Self {
            title: Self::default_title(),
            page_width_pt: A4_WIDTH_PT,
            page_height_pt: A4_HEIGHT_PT,
            margin_pt,
            pages: Vec::new(),
        }
    }

    fn default_title() -> String {
        crate::extract::DEFAULT_TITLE.to_string()
    }

    /// Width available to text between the left and right margins.
    pub fn content_width(&self) -> f32 {
        self.page_width_pt - 2.0 * self.margin_pt
    }

    /// All content runs in page order.
    pub fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.pages.iter().flat_map(|p| p.runs.iter())
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| e.to_string())
    }
}

impl PageLayout {
    pub fn new(page_index: usize) -> Self {
        Self {
            page_index,
            runs: Vec::new(),
            footer: Vec::new(),
        }
    }

    /// Text of every run on the page, content first, then footer.
    pub fn text(&self) -> impl Iterator<Item = &str> {
        self.runs
            .iter()
            .chain(self.footer.iter())
            .map(|r| r.text.as_str())
    }
}
