//! Plain-text rendering of laid-out pages.
//!
//! Each page becomes a block of lines; pages are separated by a form feed.
//! Element positions are mapped onto a character grid so columns line up
//! the same way they do in the PDF.

use super::document::{Document, Element, PageGeometry, Rgb, Span, TextSize};
use super::escape::sanitize_terminal;

const RESET: &str = "\x1b[0m";

/// Render every page. With `color`, spans carry 24-bit ANSI colors.
#[must_use]
pub fn write_text(document: &Document, color: bool) -> String {
    let geometry = document.geometry;
    let mut out = String::new();
    for (index, page) in document.pages.iter().enumerate() {
        if index > 0 {
            out.push('\x0c');
            out.push('\n');
        }
        let mut last_y: Option<f32> = None;
        for element in &page.elements {
            if let (Some(prev), Some(y)) = (last_y, element_y(element)) {
                if y - prev > TextSize::Body.leading() * 1.6 {
                    out.push('\n');
                }
            }
            if let Some(y) = element_y(element) {
                last_y = Some(y);
            }
            render_element(&mut out, element, geometry, color);
        }
    }
    out
}

fn element_y(element: &Element) -> Option<f32> {
    match element {
        Element::Text { y, .. } | Element::Gauge { y, .. } | Element::Rule { y, .. } => Some(*y),
        Element::Band { .. } => None,
    }
}

fn column(x: f32, geometry: PageGeometry) -> usize {
    ((x - geometry.margin) / TextSize::Body.cell_width()).round().max(0.0) as usize
}

fn render_element(out: &mut String, element: &Element, geometry: PageGeometry, color: bool) {
    let width = geometry.columns(TextSize::Body);
    match element {
        Element::Band { color: band, .. } => {
            out.push_str(&paint(&"=".repeat(width), *band, color));
            out.push('\n');
        }
        Element::Rule { .. } => {
            out.push_str(&"-".repeat(width));
            out.push('\n');
        }
        Element::Gauge {
            x,
            width: bar_width,
            score,
            color: bar,
            ..
        } => {
            let cells = (bar_width / TextSize::Body.cell_width()).round() as usize;
            let inner = cells.saturating_sub(2);
            let filled = inner * usize::from(*score) / 100;
            out.push_str(&" ".repeat(column(*x, geometry)));
            out.push('[');
            out.push_str(&paint(&"#".repeat(filled), *bar, color));
            out.push_str(&".".repeat(inner - filled));
            out.push(']');
            out.push('\n');
        }
        Element::Text { x, spans, .. } => {
            out.push_str(&" ".repeat(column(*x, geometry)));
            for span in spans {
                out.push_str(&span_text(span, color));
            }
            let trimmed = out.trim_end_matches(' ').len();
            out.truncate(trimmed);
            out.push('\n');
        }
    }
}

fn span_text(span: &Span, color: bool) -> String {
    let text = sanitize_terminal(&span.text);
    if !color || span.color == Rgb::TEXT {
        return text;
    }
    let bold = if span.bold { "\x1b[1m" } else { "" };
    format!("{bold}{}", paint(&text, span.color, true))
}

fn paint(text: &str, rgb: Rgb, color: bool) -> String {
    if !color || text.is_empty() {
        return text.to_string();
    }
    format!("\x1b[38;2;{};{};{}m{text}{RESET}", rgb.0, rgb.1, rgb.2)
}
