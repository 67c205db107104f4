//! PDF renderer – takes a [`DocumentLayout`] and produces PDF bytes using
//! `printpdf` (v0.8 ops-based API).
//!
//! Only the builtin Helvetica and Helvetica-Bold fonts are referenced, so the
//! output carries no font programs, images, links or encryption.

use printpdf::*;

use crate::error::ConvertError;
use crate::fonts::FontVariant;
use crate::layout_config::*;

const PT_TO_MM: f32 = 0.352778;

/// Render a DocumentLayout into PDF bytes.
///
/// A layout without pages still yields a single blank page.
pub fn render_pdf(layout: &DocumentLayout) -> Result<Vec<u8>, ConvertError> {
    validate(layout)?;

    let page_w = Mm(layout.page_width_pt * PT_TO_MM);
    let page_h = Mm(layout.page_height_pt * PT_TO_MM);

    let mut doc = PdfDocument::new(&layout.title);

    let mut pages = Vec::with_capacity(layout.pages.len().max(1));
    for page_layout in &layout.pages {
        let mut ops = Vec::new();
        for run in page_layout.runs.iter().chain(page_layout.footer.iter()) {
            render_run(&mut ops, run);
        }
        pages.push(PdfPage::new(page_w, page_h, ops));
    }

    if pages.is_empty() {
        pages.push(PdfPage::new(page_w, page_h, Vec::new()));
    }

    let page_count = pages.len();
    doc.with_pages(pages);
    let mut warnings = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        log::warn!("printpdf reported {} warning(s) while saving", warnings.len());
    }

    log::debug!("rendered {} page(s), {} bytes", page_count, bytes.len());
    Ok(bytes)
}

/// Reject layouts printpdf would silently turn into a broken file.
fn validate(layout: &DocumentLayout) -> Result<(), ConvertError> {
    let (w, h) = (layout.page_width_pt, layout.page_height_pt);
    if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
        return Err(ConvertError::render(format!("invalid page size {w}x{h}")));
    }
    for page in &layout.pages {
        for run in page.runs.iter().chain(page.footer.iter()) {
            if !(run.x.is_finite() && run.y.is_finite() && run.font_size.is_finite()) {
                return Err(ConvertError::render(format!(
                    "non-finite position for text {:?} on page {}",
                    run.text,
                    page.page_index + 1
                )));
            }
            if run.font_size <= 0.0 {
                return Err(ConvertError::render(format!(
                    "font size {} on page {}",
                    run.font_size,
                    page.page_index + 1
                )));
            }
        }
    }
    Ok(())
}

fn builtin(font: FontVariant) -> BuiltinFont {
    match font {
        FontVariant::Regular => BuiltinFont::Helvetica,
        FontVariant::Bold => BuiltinFont::HelveticaBold,
    }
}

/// Re-encode `s` as WinAnsi bytes carried in a `String`. Builtin fonts use
/// WinAnsiEncoding and printpdf copies the string bytes into the content
/// stream unchanged. Characters with no WinAnsi slot become `?`.
fn to_winlatin(s: &str) -> String {
    let bytes: Vec<u8> = s.chars().map(winansi_byte).collect();
    // Only ever handed to printpdf's builtin-font writer, never read as UTF-8.
    #[allow(unsafe_code)]
    unsafe {
        String::from_utf8_unchecked(bytes)
    }
}

/// cp1252 differs from Latin-1 only in the 0x80..0x9F block.
fn winansi_byte(c: char) -> u8 {
    const CP1252_HIGH: [(char, u8); 12] = [
        ('\u{20AC}', 0x80),
        ('\u{201A}', 0x82),
        ('\u{201E}', 0x84),
        ('\u{2026}', 0x85),
        ('\u{2018}', 0x91),
        ('\u{2019}', 0x92),
        ('\u{201C}', 0x93),
        ('\u{201D}', 0x94),
        ('\u{2022}', 0x95),
        ('\u{2013}', 0x96),
        ('\u{2014}', 0x97),
        ('\u{2122}', 0x99),
    ];
    match c {
        '\u{00A0}' => b' ',
        c => CP1252_HIGH
            .iter()
            .find(|(ch, _)| *ch == c)
            .map(|(_, b)| *b)
            .or_else(|| u8::try_from(u32::from(c)).ok())
            .unwrap_or(b'?'),
    }
}

fn render_run(ops: &mut Vec<Op>, run: &TextRun) {
    if run.text.is_empty() {
        return;
    }
    let font = builtin(run.font);

    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextCursor {
        pos: Point {
            x: Pt(run.x),
            y: Pt(run.y),
        },
    });
    ops.push(Op::SetFontSizeBuiltinFont {
        size: Pt(run.font_size),
        font,
    });
    ops.push(Op::SetFillColor {
        col: Color::Rgb(Rgb {
            r: run.color[0],
            g: run.color[1],
            b: run.color[2],
            icc_profile: None,
        }),
    });
    ops.push(Op::WriteTextBuiltinFont {
        items: vec![TextItem::Text(to_winlatin(&run.text))],
        font,
    });
    ops.push(Op::EndTextSection);
}
