//! Helpers for the HTML-like rich text markup carried by text elements.
//!
//! Parsers emit paragraphs as `<p style="...">` with inline `<span style="...">`
//! runs. Only the handful of inline styles needed for conversion and
//! classification are interpreted.

use regex::{Captures, Regex};
use scraper::{ElementRef, Html};
use std::sync::LazyLock;

/// Matches a point font size inside an inline style.
static PT_FONT_SIZE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"font-size:\s*([\d.]+)\s*pt").unwrap());

/// Convert every point font size to pixels scaled by `ratio`.
pub fn rescale_font_sizes(content: &str, ratio: f64) -> String {
    PT_FONT_SIZE_REGEX
        .replace_all(content, |caps: &Captures| {
            let size: f64 = caps[1].parse().unwrap_or(0.0);
            format!("font-size: {:.1}px", size * ratio)
        })
        .into_owned()
}

/// Every element of the fragment in document order.
fn elements(fragment: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    fragment.root_element().descendants().filter_map(ElementRef::wrap)
}

/// Extract visible text, one line per paragraph or break.
pub fn plain_text(content: &str) -> String {
    let fragment = Html::parse_fragment(content);
    let mut text = String::new();
    collect_text(fragment.root_element(), &mut text);

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            let name = child_element.value().name();
            if name == "br" {
                out.push('\n');
                continue;
            }
            collect_text(child_element, out);
            if matches!(name, "p" | "li" | "div") {
                out.push('\n');
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
}

/// Largest inline font size in the markup, in its own unit.
pub fn max_font_size(content: &str) -> Option<f64> {
    let fragment = Html::parse_fragment(content);
    elements(&fragment)
        .filter_map(|el| style_property(el, "font-size"))
        .filter_map(|size| leading_number(&size))
        .fold(None, |max, size| match max {
            Some(current) if current >= size => Some(current),
            _ => Some(size),
        })
}

/// Text alignment of the first paragraph.
pub fn first_paragraph_align(content: &str) -> Option<String> {
    let fragment = Html::parse_fragment(content);
    let paragraph = elements(&fragment).find(|el| el.value().name() == "p")?;
    style_property(paragraph, "text-align")
}

/// Inline style of the first text run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStyle {
    /// Font size as written, without unit.
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub color: Option<String>,
}

/// Style of the first `<span>` run, if any.
pub fn first_run_style(content: &str) -> RunStyle {
    let fragment = Html::parse_fragment(content);
    let Some(span) = elements(&fragment).find(|el| el.value().name() == "span") else {
        return RunStyle::default();
    };

    RunStyle {
        font_size: style_property(span, "font-size").and_then(|size| leading_number(&size)),
        font_family: style_property(span, "font-family")
            .map(|family| family.trim_matches(['"', '\'']).to_string())
            .filter(|family| !family.is_empty()),
        color: style_property(span, "color"),
    }
}

/// Look up a property in an element's inline `style` attribute.
fn style_property(element: ElementRef, name: &str) -> Option<String> {
    element
        .value()
        .attr("style")?
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case(name))
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parse the numeric prefix of a CSS length such as `24pt`.
fn leading_number(value: &str) -> Option<f64> {
    let end = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(value.len());
    value[..end].parse().ok()
}

/// Build single-paragraph markup for a synthesized text slot.
pub fn paragraph(text: &str, font_size_px: f64) -> String {
    format!(
        "<p style=\"\"><span style=\"font-size: {:.1}px\">{}</span></p>",
        font_size_px, text
    )
}
