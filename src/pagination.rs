//! Page composer – places the title and sections line by line on fixed-size
//! pages and stamps every page with a footer once the page count is known.
//!
//! Vertical position is tracked by a [`Cursor`] in PDF coordinates (baseline,
//! origin bottom-left). Before each line the composer checks that the line
//! fits above the bottom margin; if not, a new page is started and the cursor
//! jumps back to the top margin. Headings and their content are paginated
//! independently, so a heading can end one page and its content start the
//! next.

use chrono::NaiveDateTime;

use crate::extract::{ParsedContent, Section};
use crate::fonts::{helvetica_width, wrap_text, FontVariant, TextMeasure};
use crate::layout_config::{DocumentLayout, PageLayout, TextRun};

/// Default page margin in points, all four sides.
pub const PAGE_MARGIN_PT: f32 = 50.0;

pub const TITLE_FONT_SIZE: f32 = 20.0;
pub const TITLE_LINE_GAP: f32 = 5.0;
pub const TITLE_BLOCK_GAP: f32 = 20.0;

pub const HEADING_LINE_GAP: f32 = 3.0;
pub const HEADING_BLOCK_GAP: f32 = 10.0;

pub const BODY_FONT_SIZE: f32 = 11.0;
pub const BODY_LINE_GAP: f32 = 4.0;
pub const SECTION_GAP: f32 = 15.0;

pub const FOOTER_FONT_SIZE: f32 = 8.0;
/// Baseline of the footer line, independent of the content cursor.
pub const FOOTER_Y: f32 = 30.0;

pub const HEADING_COLOR: [f32; 3] = [0.1, 0.1, 0.1];
pub const BODY_COLOR: [f32; 3] = [0.3, 0.3, 0.3];
pub const FOOTER_COLOR: [f32; 3] = [0.6, 0.6, 0.6];

/// Heading size for a given level: 14 pt for `<h1>`, never below 12 pt.
pub fn heading_font_size(level: u8) -> f32 {
    (16.0 - 2.0 * level as f32).max(12.0)
}

/// Vertical write position on the current page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    /// Current baseline.
    pub y: f32,
    /// Where a fresh page starts (`page_height - margin`).
    pub top: f32,
    /// Nothing may be drawn below this (`margin`).
    pub bottom: f32,
}

impl Cursor {
    pub fn new(page_height: f32, margin: f32) -> Self {
        Self {
            y: page_height - margin,
            top: page_height - margin,
            bottom: margin,
        }
    }

    /// Whether `height` more points fit above the bottom margin.
    pub fn fits(&self, height: f32) -> bool {
        self.y - height >= self.bottom
    }

    pub fn advance(&mut self, height: f32) {
        self.y -= height;
    }

    pub fn reset(&mut self) {
        self.y = self.top;
    }
}

/// Pre-wrapped lines sharing one font, size and colour.
#[derive(Debug, Clone)]
pub struct Block {
    pub lines: Vec<String>,
    pub font: FontVariant,
    pub font_size: f32,
    pub color: [f32; 3],
    /// Vertical advance per line.
    pub line_height: f32,
}

impl Block {
    /// Total vertical space the block's lines consume.
    pub fn height(&self) -> f32 {
        self.lines.len() as f32 * self.line_height
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Settings the composer needs from the pipeline configuration.
#[derive(Debug, Clone)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            page_width: crate::layout_config::A4_WIDTH_PT,
            page_height: crate::layout_config::A4_HEIGHT_PT,
            margin: PAGE_MARGIN_PT,
        }
    }
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }
}

/// Lays blocks out onto pages.
pub struct Composer {
    geometry: PageGeometry,
    measure: TextMeasure,
    pages: Vec<PageLayout>,
    cursor: Cursor,
}

impl Composer {
    /// Start a document with one blank page.
    pub fn new(geometry: PageGeometry, measure: TextMeasure) -> Self {
        let cursor = Cursor::new(geometry.page_height, geometry.margin);
        Self {
            geometry,
            measure,
            pages: vec![PageLayout::new(0)],
            cursor,
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Wrap `text` to the content width.
    pub fn measure_block(
        &self,
        text: &str,
        font: FontVariant,
        font_size: f32,
        color: [f32; 3],
        line_height: f32,
    ) -> Block {
        Block {
            lines: wrap_text(text, self.geometry.content_width(), font_size, font, self.measure),
            font,
            font_size,
            color,
            line_height,
        }
    }

    /// Start a new page if `height` does not fit above the bottom margin.
    pub fn ensure_space(&mut self, height: f32) {
        if !self.cursor.fits(height) {
            let index = self.pages.len();
            self.pages.push(PageLayout::new(index));
            self.cursor.reset();
            log::trace!("page break, now on page {}", index + 1);
        }
    }

    /// Draw each line of `block` at the cursor, breaking pages as needed.
    pub fn place_block(&mut self, block: &Block) {
        if block.is_empty() {
            return;
        }
        if !self.cursor.fits(block.height()) {
            log::trace!(
                "{:.1}pt block does not fit on page {}, splitting by line",
                block.height(),
                self.pages.len()
            );
        }
        for line in &block.lines {
            self.ensure_space(block.line_height);
            let run = TextRun {
                text: line.clone(),
                x: self.geometry.margin,
                y: self.cursor.y,
                font: block.font,
                font_size: block.font_size,
                color: block.color,
            };
            if let Some(page) = self.pages.last_mut() {
                page.runs.push(run);
            }
            self.cursor.advance(block.line_height);
        }
    }

    /// Blank vertical space. May leave the cursor below the margin; the next
    /// line then opens a new page.
    pub fn gap(&mut self, height: f32) {
        self.cursor.advance(height);
    }

    pub fn place_title(&mut self, title: &str) {
        let block = self.measure_block(
            title,
            FontVariant::Bold,
            TITLE_FONT_SIZE,
            HEADING_COLOR,
            TITLE_FONT_SIZE + TITLE_LINE_GAP,
        );
        self.place_block(&block);
        self.gap(TITLE_BLOCK_GAP);
    }

    pub fn place_section(&mut self, section: &Section) {
        let size = heading_font_size(section.level);
        let heading = self.measure_block(
            &section.heading,
            FontVariant::Bold,
            size,
            HEADING_COLOR,
            size + HEADING_LINE_GAP,
        );
        self.place_block(&heading);
        self.gap(HEADING_BLOCK_GAP);

        let content = self.measure_block(
            &section.content,
            FontVariant::Regular,
            BODY_FONT_SIZE,
            BODY_COLOR,
            BODY_FONT_SIZE + BODY_LINE_GAP,
        );
        self.place_block(&content);
        self.gap(SECTION_GAP);
    }

    /// Finish composition, stamping footers on every page.
    pub fn finish(mut self, title: &str, generated_at: NaiveDateTime) -> DocumentLayout {
        stamp_footers(&mut self.pages, &self.geometry, generated_at);
        DocumentLayout {
            title: title.to_string(),
            page_width_pt: self.geometry.page_width,
            page_height_pt: self.geometry.page_height,
            margin_pt: self.geometry.margin,
            pages: self.pages,
        }
    }
}

/// Lay out `parsed` onto pages: title first, then every section in order.
pub fn compose(
    parsed: &ParsedContent,
    geometry: PageGeometry,
    measure: TextMeasure,
    generated_at: NaiveDateTime,
) -> DocumentLayout {
    let mut composer = Composer::new(geometry, measure);
    composer.place_title(&parsed.title);
    for section in &parsed.sections {
        composer.place_section(section);
    }
    log::debug!(
        "composed {} section(s) onto {} page(s)",
        parsed.sections.len(),
        composer.page_count()
    );
    composer.finish(&parsed.title, generated_at)
}

/// Left footer text, formatted the way pt-BR readers expect.
pub fn generated_label(generated_at: NaiveDateTime) -> String {
    format!(
        "Gerado em {} às {}",
        generated_at.format("%d/%m/%Y"),
        generated_at.format("%H:%M:%S")
    )
}

pub fn page_label(index: usize, total: usize) -> String {
    format!("Página {} de {}", index + 1, total)
}

fn stamp_footers(pages: &mut [PageLayout], geometry: &PageGeometry, generated_at: NaiveDateTime) {
    let total = pages.len();
    let stamp = generated_label(generated_at);
    for (i, page) in pages.iter_mut().enumerate() {
        let numbering = page_label(i, total);
        let width = helvetica_width(&numbering, FOOTER_FONT_SIZE, FontVariant::Regular);
        page.footer = vec![
            TextRun {
                text: stamp.clone(),
                x: geometry.margin,
                y: FOOTER_Y,
                font: FontVariant::Regular,
                font_size: FOOTER_FONT_SIZE,
                color: FOOTER_COLOR,
            },
            TextRun {
                text: numbering,
                x: geometry.page_width - geometry.margin - width,
                y: FOOTER_Y,
                font: FontVariant::Regular,
                font_size: FOOTER_FONT_SIZE,
                color: FOOTER_COLOR,
            },
        ];
    }
}
