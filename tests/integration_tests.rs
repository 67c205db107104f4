//! Integration tests for the contract-pdf pipeline.
//!
//! These tests validate:
//! - Extraction of titles and sections from realistic contract markup
//! - Page composition and footer numbering
//! - PDF output exists, has a valid structure and carries the expected text
//! - The structured `convert` result for good and bad input

use base64::{engine::general_purpose::STANDARD as BASE64_STD, Engine as _};
use chrono::{NaiveDate, NaiveDateTime};
use lopdf::{content::Content, Document, Object};
use sha2::{Digest, Sha256};

use contract_pdf::extract::{extract, DEFAULT_TITLE};
use contract_pdf::fonts::TextMeasure;
use contract_pdf::layout_config::DocumentLayout;
use contract_pdf::pagination::PAGE_MARGIN_PT;
use contract_pdf::pipeline::{compute_layout, convert, convert_with, generate_pdf, PipelineConfig};
use contract_pdf::render::render_pdf;
use contract_pdf::templates;

// =====================================================================
// Helpers
// =====================================================================

fn fixed_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 11, 28)
        .unwrap()
        .and_hms_opt(16, 45, 12)
        .unwrap()
}

fn fixed_config() -> PipelineConfig {
    PipelineConfig {
        generated_at: Some(fixed_time()),
        ..PipelineConfig::default()
    }
}

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.len() > 100, "PDF too small: {} bytes", bytes.len());
    assert_eq!(&bytes[0..5], b"%PDF-", "Missing PDF header");
}

/// Text shown on each page, in drawing order. Bytes are read as Latin-1,
/// which matches WinAnsi for every character these tests look for.
fn page_texts(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).expect("generated PDF should parse");
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let data = doc.get_page_content(page_id).expect("page content");
            let content = Content::decode(&data).expect("content stream");
            let mut text = String::new();
            for op in &content.operations {
                match op.operator.as_str() {
                    "Tj" | "'" | "\"" => op.operands.iter().for_each(|o| push_string(o, &mut text)),
                    "TJ" => {
                        for operand in &op.operands {
                            if let Object::Array(items) = operand {
                                items.iter().for_each(|o| push_string(o, &mut text));
                            }
                        }
                    }
                    _ => {}
                }
            }
            text
        })
        .collect()
}

fn push_string(obj: &Object, out: &mut String) {
    if let Object::String(bytes, _) = obj {
        out.extend(bytes.iter().map(|&b| b as char));
        out.push('\n');
    }
}

fn layout_digest(layout: &DocumentLayout) -> Vec<u8> {
    Sha256::digest(layout.to_json().as_bytes()).to_vec()
}

// =====================================================================
// Extraction tests
// =====================================================================

#[test]
fn minimal_contract_extraction() {
    let parsed = extract(templates::minimal_contract());
    assert_eq!(parsed.title, "Contrato #123");
    assert_eq!(parsed.sections.len(), 2);

    assert_eq!(parsed.sections[0].level, 1);
    assert_eq!(parsed.sections[0].heading, "OBJETO");
    assert_eq!(parsed.sections[0].content, "Texto do objeto.");

    assert_eq!(parsed.sections[1].level, 2);
    assert_eq!(parsed.sections[1].heading, "VALOR");
    assert_eq!(parsed.sections[1].content, "R$ 100,00");
}

#[test]
fn service_agreement_extraction() {
    let parsed = extract(templates::service_agreement());
    assert_eq!(parsed.title, "Contrato de Prestação de Serviços");

    let levels: Vec<u8> = parsed.sections.iter().map(|s| s.level).collect();
    assert_eq!(levels, vec![1, 2, 3, 2, 4]);
    assert_eq!(parsed.sections[0].heading, "CLÁUSULA PRIMEIRA \u{2013} DO OBJETO");
    assert!(parsed.sections[1].content.contains("R$ 12.500,00"));
    assert!(parsed.sections[1].content.contains("Parcela Vencimento 1ª 10/01"));
    assert_eq!(parsed.sections[4].content, "Fica eleito o foro da comarca de São Paulo/SP.");

    // Script, style and comment content never leaks into the text.
    assert!(!parsed.plain_text.contains("não é título"));
    assert!(!parsed.plain_text.contains("Rascunho"));
    assert!(!parsed.plain_text.contains("font-size"));
}

#[test]
fn unheaded_terms_get_one_section() {
    let parsed = extract(templates::unheaded_terms());
    assert_eq!(parsed.sections.len(), 1);
    assert_eq!(parsed.sections[0].heading, "Termo de Aceite");
    assert_eq!(
        parsed.sections[0].content,
        "Declaro que li e aceito os termos de uso. Assinatura: ______________________"
    );
}

#[test]
fn heading_count_and_levels_are_preserved() {
    for k in 1..=12usize {
        let mut html = String::from("<body>");
        let mut expected = Vec::new();
        for i in 0..k {
            let level = (i % 6) + 1;
            html.push_str(&format!("<h{level}>Seção {i}</h{level}><p>conteúdo {i}</p>"));
            expected.push((level as u8, format!("Seção {i}")));
        }
        html.push_str("</body>");

        let parsed = extract(&html);
        let got: Vec<(u8, String)> = parsed
            .sections
            .iter()
            .map(|s| (s.level, s.heading.clone()))
            .collect();
        assert_eq!(got, expected, "k = {k}");
    }
}

#[test]
fn document_without_title_uses_placeholder() {
    let layout = compute_layout("<h1>Cláusula</h1><p>texto</p>", &fixed_config());
    assert_eq!(layout.title, DEFAULT_TITLE);
    assert_eq!(layout.pages[0].runs[0].text, DEFAULT_TITLE);
}

// =====================================================================
// Composition tests
// =====================================================================

#[test]
fn minimal_contract_fits_one_page() {
    let layout = compute_layout(templates::minimal_contract(), &fixed_config());
    assert_eq!(layout.pages.len(), 1);
    let texts: Vec<&str> = layout.pages[0].text().collect();
    assert!(texts.contains(&"Contrato #123"));
    assert!(texts.contains(&"OBJETO"));
    assert!(texts.contains(&"VALOR"));
    assert!(texts.contains(&"Página 1 de 1"));
    assert!(texts.contains(&"Gerado em 28/11/2025 às 16:45:12"));
}

#[test]
fn long_clause_spans_pages_without_crossing_the_margin() {
    let layout = compute_layout(&templates::long_clause(200), &fixed_config());
    let n = layout.pages.len();
    assert!(n >= 2, "Expected multiple pages, got {n}");

    for (i, page) in layout.pages.iter().enumerate() {
        for run in &page.runs {
            assert!(
                run.y >= PAGE_MARGIN_PT,
                "page {} run {:?} at y={}",
                i + 1,
                run.text,
                run.y
            );
            assert!(run.y <= layout.page_height_pt - PAGE_MARGIN_PT);
        }
        let numbering = &page.footer[1].text;
        assert_eq!(numbering, &format!("Página {} de {}", i + 1, n));
    }
}

#[test]
fn last_heading_content_is_capped_unless_configured() {
    let mut html = String::from("<h1>ÚNICA</h1>");
    for i in 0..200 {
        html.push_str(&format!("<p>Parágrafo {i}: cláusula acessória.</p>"));
    }

    let capped = compute_layout(&html, &fixed_config());
    assert_eq!(capped.pages.len(), 1);

    let config = PipelineConfig {
        trailing_content_chars: usize::MAX,
        ..fixed_config()
    };
    let layout = compute_layout(&html, &config);
    assert!(layout.pages.len() >= 2, "got {} page(s)", layout.pages.len());
    assert!(layout.runs().all(|r| r.y >= PAGE_MARGIN_PT));
}

#[test]
fn multi_word_lines_stay_within_content_width() {
    let layout = compute_layout(&templates::long_clause(60), &fixed_config());
    let content_width = layout.content_width();
    for run in layout.runs() {
        let w = TextMeasure::Heuristic.width(&run.text, run.font_size, run.font);
        assert!(
            w <= content_width || !run.text.contains(' '),
            "{:?} is {w} wide",
            run.text
        );
    }
}

#[test]
fn helvetica_metrics_pack_more_words_per_line() {
    let html = templates::long_clause(120);
    let heuristic = compute_layout(&html, &fixed_config());
    let afm = compute_layout(
        &html,
        &PipelineConfig {
            measure: TextMeasure::Helvetica,
            ..fixed_config()
        },
    );
    assert!(afm.runs().count() < heuristic.runs().count());
}

#[test]
fn layout_is_deterministic_for_a_fixed_timestamp() {
    let html = templates::service_agreement();
    let a = compute_layout(html, &fixed_config());
    let b = compute_layout(html, &fixed_config());
    assert_eq!(a, b);
    assert_eq!(layout_digest(&a), layout_digest(&b));
}

#[test]
fn only_the_footer_depends_on_the_timestamp() {
    let html = templates::service_agreement();
    let a = compute_layout(html, &fixed_config());
    let later = PipelineConfig {
        generated_at: Some(fixed_time() + chrono::Duration::hours(3)),
        ..PipelineConfig::default()
    };
    let b = compute_layout(html, &later);
    assert_ne!(layout_digest(&a), layout_digest(&b));
    for (pa, pb) in a.pages.iter().zip(&b.pages) {
        assert_eq!(pa.runs, pb.runs);
        assert_ne!(pa.footer[0].text, pb.footer[0].text);
        assert_eq!(pa.footer[1], pb.footer[1]);
    }
}

// =====================================================================
// PDF generation tests
// =====================================================================

#[test]
fn minimal_contract_pdf_contains_sections_and_footer() {
    let (bytes, layout) = generate_pdf(templates::minimal_contract(), &fixed_config()).unwrap();
    assert_valid_pdf(&bytes);
    assert_eq!(layout.pages.len(), 1);

    let pages = page_texts(&bytes);
    assert_eq!(pages.len(), 1);
    assert!(pages[0].contains("OBJETO"));
    assert!(pages[0].contains("VALOR"));
    assert!(pages[0].contains("Gerado em 28/11/2025"));
    assert!(pages[0].contains(" 1 de 1"));
}

#[test]
fn pdf_page_count_matches_layout() {
    let (bytes, layout) = generate_pdf(&templates::long_clause(200), &fixed_config()).unwrap();
    assert_valid_pdf(&bytes);
    let pages = page_texts(&bytes);
    assert_eq!(pages.len(), layout.pages.len());
    let last = pages.len();
    assert!(pages[last - 1].contains(&format!(" {last} de {last}")));
}

#[test]
fn render_from_layout_json() {
    let layout = compute_layout(templates::service_agreement(), &fixed_config());
    let json = layout.to_json();
    let parsed = DocumentLayout::from_json(&json).unwrap();
    let bytes = render_pdf(&parsed).unwrap();
    assert_valid_pdf(&bytes);
}

#[test]
fn all_templates_render_successfully() {
    let long = templates::long_clause(80);
    let templates: Vec<(&str, &str)> = vec![
        ("minimal", templates::minimal_contract()),
        ("service_agreement", templates::service_agreement()),
        ("unheaded", templates::unheaded_terms()),
        ("long_clause", long.as_str()),
    ];

    for (name, html) in templates {
        let result = generate_pdf(html, &fixed_config());
        assert!(result.is_ok(), "Template '{}' failed: {:?}", name, result.err());
        let (bytes, _) = result.unwrap();
        assert_valid_pdf(&bytes);
    }
}

// =====================================================================
// convert() result shape
// =====================================================================

#[test]
fn convert_success_decodes_to_pdf() {
    let resp = convert(templates::minimal_contract());
    assert!(resp.success);
    assert!(resp.error.is_none());
    let bytes = BASE64_STD.decode(resp.pdf_base64.unwrap()).unwrap();
    assert_valid_pdf(&bytes);
}

#[test]
fn convert_rejects_empty_and_blank_html() {
    for html in ["", "   ", "\n\t  \r\n"] {
        let resp = convert(html);
        assert!(!resp.success);
        assert!(resp.pdf_base64.is_none());
        assert!(!resp.error.as_deref().unwrap_or_default().is_empty());
        let detail = resp.detail.unwrap();
        assert_eq!(detail["step"], "validation");
        assert_eq!(detail["htmlLength"], html.len());
    }
}

#[test]
fn convert_never_fails_on_malformed_html() {
    let inputs = [
        "<h1>",
        "<<<>>>",
        "</h2>texto solto",
        "<title>sem fim",
        "<h7>não é título</h7>",
        "<h1>A</h3><h2>B",
        "<script>",
        "&amp;&#xZZ;&;",
    ];
    for html in inputs {
        let resp = convert(html);
        assert!(resp.success, "{html:?} -> {:?}", resp.error);
    }
}

#[test]
fn convert_twice_gives_the_same_text() {
    let html = templates::service_agreement();
    let a = convert_with(html, &fixed_config());
    let b = convert_with(html, &fixed_config());
    let a = BASE64_STD.decode(a.pdf_base64.unwrap()).unwrap();
    let b = BASE64_STD.decode(b.pdf_base64.unwrap()).unwrap();
    assert_eq!(page_texts(&a), page_texts(&b));
}
