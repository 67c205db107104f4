//! HTML content extractor – pulls a title and heading/content sections out of
//! contract markup with regular expressions.
//!
//! This is deliberately not a DOM parser. Section boundaries are "from the end
//! of one heading tag to the start of the next", which is what callers rely on
//! for nested or table-heavy contract bodies. Malformed input never fails; the
//! worst case is an empty title or empty sections.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Title used when the document has no (non-blank) `<title>`.
pub const DEFAULT_TITLE: &str = "Documento";

/// How many characters after the last heading are taken as its content.
pub const TRAILING_CONTENT_CHARS: usize = 1000;

static RE_SCRIPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());
static RE_STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").unwrap());
static RE_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static RE_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title\b[^>]*>(.*?)</title\s*>").unwrap());
static RE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h([1-6])\b[^>]*>(.*?)</h[1-6]\s*>").unwrap());
static RE_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<head\b[^>]*>.*?</head\s*>").unwrap());
static RE_BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<body\b[^>]*>(.*?)(?:</body\s*>|\z)").unwrap());
static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static RE_DANGLING_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*$").unwrap());
static RE_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[xX][0-9a-fA-F]{1,6}|#[0-9]{1,7}|[a-zA-Z]{2,8});").unwrap());
static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// One heading and the text that follows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    pub content: String,
    /// Heading numeral, 1..=6.
    pub level: u8,
}

/// Everything the page composer needs from the HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedContent {
    pub title: String,
    pub sections: Vec<Section>,
    /// Whole document as collapsed plain text; diagnostic only.
    pub plain_text: String,
}

/// Extract title, sections and plain text from `html`.
pub fn extract(html: &str) -> ParsedContent {
    extract_with(html, TRAILING_CONTENT_CHARS)
}

/// Like [`extract`], with a custom cap on the last heading's content.
pub fn extract_with(html: &str, trailing_chars: usize) -> ParsedContent {
    let cleaned = remove_non_content(html);

    let title = RE_TITLE
        .captures(&cleaned)
        .map(|c| html_to_text(&c[1]))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let headings: Vec<_> = RE_HEADING.captures_iter(&cleaned).collect();
    let mut sections = Vec::with_capacity(headings.len().max(1));

    for (i, caps) in headings.iter().enumerate() {
        let Some(whole) = caps.get(0) else { continue };
        // The pattern only admits 1-6, so the parse cannot fail.
        let level = caps[1].parse::<u8>().unwrap_or(1);
        let heading = html_to_text(&caps[2]);

        let start = whole.end();
        let end = match headings.get(i + 1) {
            Some(next) => next.get(0).map_or(cleaned.len(), |m| m.start()),
            None => char_cap(&cleaned, start, trailing_chars),
        };
        let content = html_to_text(&cleaned[start..end]);

        sections.push(Section {
            heading,
            content,
            level,
        });
    }

    if sections.is_empty() {
        log::debug!("no heading tags found, synthesising a single section");
        sections.push(Section {
            heading: title.clone(),
            content: html_to_text(body_markup(&cleaned).as_ref()),
            level: 1,
        });
    }

    let plain_text = html_to_text(&cleaned);

    log::debug!(
        "extracted title {:?} with {} section(s), {} chars of text",
        title,
        sections.len(),
        plain_text.len()
    );

    ParsedContent {
        title,
        sections,
        plain_text,
    }
}

/// Strip markup from a fragment: tags become spaces, entities are decoded and
/// whitespace runs collapse to a single space.
pub fn html_to_text(fragment: &str) -> String {
    let no_tags = RE_TAG.replace_all(fragment, " ");
    let no_tags = RE_DANGLING_TAG.replace(&no_tags, " ");
    let decoded = decode_entities(&no_tags);
    RE_WHITESPACE.replace_all(&decoded, " ").trim().to_string()
}

fn remove_non_content(html: &str) -> String {
    let s = RE_SCRIPT.replace_all(html, "");
    let s = RE_STYLE.replace_all(&s, "");
    RE_COMMENT.replace_all(&s, "").into_owned()
}

/// Inner markup of `<body>`, or the document minus `<head>` when there is no
/// body tag.
fn body_markup(cleaned: &str) -> std::borrow::Cow<'_, str> {
    match RE_BODY.captures(cleaned).and_then(|c| c.get(1)) {
        Some(m) => std::borrow::Cow::Borrowed(m.as_str()),
        None => RE_HEAD.replace_all(cleaned, ""),
    }
}

/// Byte index `max_chars` characters after `start`, clamped to the end.
fn char_cap(s: &str, start: usize, max_chars: usize) -> usize {
    s[start..]
        .char_indices()
        .nth(max_chars)
        .map_or(s.len(), |(i, _)| start + i)
}

/// Decode the named entities contract bodies actually use plus numeric
/// references. Unknown entities are left untouched.
pub fn decode_entities(s: &str) -> String {
    RE_ENTITY
        .replace_all(s, |caps: &Captures| {
            let name = &caps[1];
            let decoded = if let Some(hex) = name.strip_prefix("#x").or(name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                named_entity(name)
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{00A0}',
        "ordm" => 'º',
        "ordf" => 'ª',
        "sect" => '§',
        "deg" => '°',
        "copy" => '©',
        "reg" => '®',
        "euro" => '€',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "hellip" => '\u{2026}',
        "laquo" => '«',
        "raquo" => '»',
        "ccedil" => 'ç',
        "Ccedil" => 'Ç',
        "atilde" => 'ã',
        "Atilde" => 'Ã',
        "otilde" => 'õ',
        "Otilde" => 'Õ',
        "aacute" => 'á',
        "Aacute" => 'Á',
        "eacute" => 'é',
        "Eacute" => 'É',
        "iacute" => 'í',
        "Iacute" => 'Í',
        "oacute" => 'ó',
        "Oacute" => 'Ó',
        "uacute" => 'ú',
        "Uacute" => 'Ú',
        "acirc" => 'â',
        "Acirc" => 'Â',
        "ecirc" => 'ê',
        "Ecirc" => 'Ê',
        "ocirc" => 'ô',
        "Ocirc" => 'Ô',
        "agrave" => 'à',
        "Agrave" => 'À',
        "uuml" => 'ü',
        "Uuml" => 'Ü',
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_defaults_when_missing_or_blank() {
        assert_eq!(extract("<p>texto</p>").title, DEFAULT_TITLE);
        assert_eq!(extract("<title>   </title><p>x</p>").title, DEFAULT_TITLE);
    }

    #[test]
    fn scripts_and_styles_are_removed() {
        let html = "<SCRIPT>var a = '<h1>fake</h1>';</SCRIPT><style>h1{color:red}</style>\
                    <h1>Real</h1><p>body</p>";
        let parsed = extract(html);
        assert_eq!(parsed.sections.len(), 1);
        assert_eq!(parsed.sections[0].heading, "Real");
        assert!(!parsed.plain_text.contains("color"));
    }

    #[test]
    fn nested_tags_inside_heading_are_stripped() {
        let parsed = extract("<h2 class=\"x\">Cl&aacute;usula <b>1</b></h2><p>a</p>");
        assert_eq!(parsed.sections[0].heading, "Cláusula 1");
        assert_eq!(parsed.sections[0].level, 2);
    }

    #[test]
    fn trailing_content_is_capped() {
        let long = "a".repeat(3000);
        let parsed = extract(&format!("<h1>Fim</h1><p>{long}</p>"));
        // "<p>" eats three of the capped characters.
        assert_eq!(parsed.sections[0].content.len(), TRAILING_CONTENT_CHARS - 3);
    }

    #[test]
    fn trailing_cap_can_be_lifted() {
        let long = "a ".repeat(2000);
        let parsed = extract_with(&format!("<h1>Fim</h1>{long}"), usize::MAX);
        assert_eq!(parsed.sections[0].content.len(), 3999);
    }

    #[test]
    fn content_stops_at_next_heading() {
        let parsed = extract("<h1>A</h1><p>um</p><p>dois</p><h3>B</h3>tres");
        assert_eq!(parsed.sections[0].content, "um dois");
        assert_eq!(parsed.sections[1].content, "tres");
        assert_eq!(parsed.sections[1].level, 3);
    }

    #[test]
    fn no_headings_synthesises_one_section() {
        let html = "<html><head><title>Termo</title></head><body><p>Linha  1</p>\n<p>Linha 2</p></body></html>";
        let parsed = extract(html);
        assert_eq!(parsed.sections.len(), 1);
        assert_eq!(parsed.sections[0].heading, "Termo");
        assert_eq!(parsed.sections[0].content, "Linha 1 Linha 2");
        assert_eq!(parsed.sections[0].level, 1);
    }

    #[test]
    fn dangling_tag_fragment_is_dropped() {
        assert_eq!(html_to_text("texto <p class=\"abc"), "texto");
    }

    #[test]
    fn entities_decode_once() {
        assert_eq!(decode_entities("&amp;lt; &#65;&#x42; &ccedil; &bogus;"), "&lt; AB ç &bogus;");
    }

    #[test]
    fn malformed_html_degrades_silently() {
        let parsed = extract("<h1>Sem fechamento <p>texto <<<>>");
        assert_eq!(parsed.title, DEFAULT_TITLE);
        assert_eq!(parsed.sections.len(), 1);
    }
}
