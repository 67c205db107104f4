//! Text measurement and word wrapping for the two standard fonts the PDF
//! references (Helvetica and Helvetica-Bold).
//!
//! Two measurement models are available. The default is the historical
//! average-glyph heuristic (`chars × size × 0.6`), which keeps page breaks
//! identical to previously generated contracts. The Helvetica model uses the
//! AFM advance widths of the standard 14 fonts and is used for right-aligned
//! footer text regardless of the wrapping model.

use serde::{Deserialize, Serialize};

/// Average glyph width as a fraction of the font size.
pub const AVG_CHAR_WIDTH: f32 = 0.6;

/// Advance used for glyphs outside the AFM tables, in 1/1000 em.
const FALLBACK_ADVANCE: u16 = 556;

/// Which of the two embedded standard fonts a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontVariant {
    #[default]
    Regular,
    Bold,
}

/// How text width is estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMeasure {
    /// `chars × font_size × 0.6`, independent of the font.
    #[default]
    Heuristic,
    /// Helvetica / Helvetica-Bold glyph advances.
    Helvetica,
}

impl TextMeasure {
    /// Estimated rendered width of `text` in points.
    pub fn width(self, text: &str, font_size: f32, font: FontVariant) -> f32 {
        match self {
            TextMeasure::Heuristic => text.chars().count() as f32 * font_size * AVG_CHAR_WIDTH,
            TextMeasure::Helvetica => helvetica_width(text, font_size, font),
        }
    }
}

impl std::str::FromStr for TextMeasure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "heuristic" => Ok(TextMeasure::Heuristic),
            "helvetica" | "afm" => Ok(TextMeasure::Helvetica),
            other => Err(format!("unknown text measure '{other}'")),
        }
    }
}

/// Width of `text` set in Helvetica (or Helvetica-Bold) at `font_size`.
pub fn helvetica_width(text: &str, font_size: f32, font: FontVariant) -> f32 {
    let table = match font {
        FontVariant::Regular => &HELVETICA,
        FontVariant::Bold => &HELVETICA_BOLD,
    };
    let units: u32 = text.chars().map(|c| advance(table, c) as u32).sum();
    units as f32 * font_size / 1000.0
}

fn advance(table: &[u16; 95], c: char) -> u16 {
    let c = fold_accent(c);
    match c as u32 {
        code @ 32..=126 => table[(code - 32) as usize],
        0xA0 => table[0],
        _ => FALLBACK_ADVANCE,
    }
}

/// Accented Latin letters share the advance of their base letter in the
/// standard fonts.
fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        other => other,
    }
}

/// Helvetica advances for U+0020..=U+007E.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

/// Helvetica-Bold advances for U+0020..=U+007E.
#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

/// Greedy word wrap. Returns one string per line; blank input gives no lines.
///
/// A word wider than `max_width` on its own is emitted as a line by itself,
/// unbroken.
pub fn wrap_text(
    text: &str,
    max_width: f32,
    font_size: f32,
    font: FontVariant,
    measure: TextMeasure,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        let candidate = if current_line.is_empty() {
            word.to_string()
        } else {
            format!("{current_line} {word}")
        };
        if measure.width(&candidate, font_size, font) <= max_width || current_line.is_empty() {
            current_line = candidate;
        } else {
            lines.push(std::mem::replace(&mut current_line, word.to_string()));
        }
    }
    if !current_line.is_empty() {
        lines.push(current_line);
    }
    lines
}
