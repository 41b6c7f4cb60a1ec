//! Two-pass pagination.
//!
//! Pass one flows every section onto pages, starting each section on a
//! fresh page. Pass two stamps the footer on every page once the total page
//! count is known.

use super::document::{
    Block, Element, LaidOutPage, Line, PageGeometry, Rgb, Section, Span, TextSize, GAUGE_HEIGHT,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// What is drawn on every page regardless of content.
#[derive(Debug, Clone, PartialEq)]
pub struct PageChrome {
    pub accent: Rgb,
    /// Small line above the flow area (brand name)
    pub header: Option<String>,
    /// Left side of the footer; the right side is the page counter
    pub footer: String,
}

/// Lay out sections and stamp footers.
#[must_use]
pub fn paginate(sections: &[Section], geometry: PageGeometry, chrome: &PageChrome) -> Vec<LaidOutPage> {
    let mut pages = flow(sections, geometry, chrome);
    stamp_footers(&mut pages, geometry, chrome);
    pages
}

/// Pass one: place every block. Footers are not drawn yet.
#[must_use]
pub fn flow(sections: &[Section], geometry: PageGeometry, chrome: &PageChrome) -> Vec<LaidOutPage> {
    let mut cursor = Cursor::new(geometry, chrome);
    for section in sections {
        cursor.new_page();
        for block in &section.blocks {
            cursor.place(block);
        }
    }
    if cursor.pages.is_empty() {
        cursor.new_page();
    }
    cursor.pages
}

/// Pass two: footer with the brand and `n / total` on every page.
pub fn stamp_footers(pages: &mut [LaidOutPage], geometry: PageGeometry, chrome: &PageChrome) {
    let total = pages.len();
    let baseline = geometry.footer_baseline();
    let cell = TextSize::Small.cell_width();
    for (index, page) in pages.iter_mut().enumerate() {
        let counter = format!("{} / {}", index + 1, total);
        let counter_x = geometry.width - geometry.margin - counter.width() as f32 * cell;
        page.elements.push(Element::Rule {
            x: geometry.margin,
            y: baseline - 12.0,
            width: geometry.content_width(),
        });
        page.elements.push(Element::Text {
            x: geometry.margin,
            y: baseline,
            size: TextSize::Small,
            spans: vec![Span::muted(chrome.footer.clone())],
        });
        page.elements.push(Element::Text {
            x: counter_x,
            y: baseline,
            size: TextSize::Small,
            spans: vec![Span::muted(counter)],
        });
    }
}

struct Cursor<'a> {
    geometry: PageGeometry,
    chrome: &'a PageChrome,
    pages: Vec<LaidOutPage>,
    y: f32,
    fresh: bool,
}

impl<'a> Cursor<'a> {
    fn new(geometry: PageGeometry, chrome: &'a PageChrome) -> Self {
        Self {
            geometry,
            chrome,
            pages: Vec::new(),
            y: geometry.content_top(),
            fresh: true,
        }
    }

    fn new_page(&mut self) {
        let mut page = LaidOutPage::default();
        page.elements.push(Element::Band {
            height: self.geometry.band,
            color: self.chrome.accent,
        });
        if let Some(header) = &self.chrome.header {
            page.elements.push(Element::Text {
                x: self.geometry.margin,
                y: self.geometry.margin - 14.0,
                size: TextSize::Small,
                spans: vec![Span::colored(header.clone(), self.chrome.accent)],
            });
        }
        self.pages.push(page);
        self.y = self.geometry.content_top();
        self.fresh = true;
    }

    /// Claim `height` points, breaking the page first when it does not fit.
    fn reserve(&mut self, height: f32) -> f32 {
        if self.pages.is_empty() || (!self.fresh && self.y + height > self.geometry.content_bottom())
        {
            self.new_page();
        }
        let top = self.y;
        self.y += height;
        self.fresh = false;
        top
    }

    fn push(&mut self, element: Element) {
        if let Some(page) = self.pages.last_mut() {
            page.elements.push(element);
        }
    }

    fn place(&mut self, block: &Block) {
        match block {
            Block::Line(line) => self.place_line(line),
            Block::Paragraph {
                text,
                color,
                size,
                indent,
            } => {
                let width = self.geometry.columns(*size).saturating_sub(*indent);
                for row in wrap(text, width) {
                    self.place_line(
                        &Line::new(vec![Span {
                            text: row,
                            color: *color,
                            bold: false,
                        }])
                        .sized(*size)
                        .indented(*indent),
                    );
                }
            }
            Block::Gauge { score, color, cells } => {
                let top = self.reserve(GAUGE_HEIGHT + 5.0);
                let max = self.geometry.columns(TextSize::Body);
                self.push(Element::Gauge {
                    x: self.geometry.margin,
                    y: top + 2.0,
                    width: (*cells).min(max) as f32 * TextSize::Body.cell_width(),
                    score: (*score).min(100),
                    color: *color,
                });
            }
            Block::Rule => {
                let top = self.reserve(10.0);
                self.push(Element::Rule {
                    x: self.geometry.margin,
                    y: top + 5.0,
                    width: self.geometry.content_width(),
                });
            }
            Block::Spacer(points) => {
                // Space at the top of a page is dropped
                if !self.fresh {
                    self.y = (self.y + points).min(self.geometry.content_bottom());
                }
            }
        }
    }

    fn place_line(&mut self, line: &Line) {
        let top = self.reserve(line.size.leading());
        let max = self.geometry.columns(line.size).saturating_sub(line.indent);
        self.push(Element::Text {
            x: self.geometry.margin + line.indent as f32 * line.size.cell_width(),
            y: top + line.size.points(),
            size: line.size,
            spans: truncate_spans(&line.spans, max),
        });
    }
}

/// Word-wrap `text` to `width` display columns.
///
/// Explicit newlines start a new row; words longer than a row are split.
///
/// ```
/// use perfally::reports::layout::wrap;
///
/// assert_eq!(wrap("one two three", 7), vec!["one two", "three"]);
/// assert_eq!(wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
/// ```
#[must_use]
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        let mut used = 0usize;
        for word in paragraph.split_whitespace() {
            for piece in split_to_width(word, width) {
                let piece_width = piece.width();
                if used > 0 && used + 1 + piece_width > width {
                    rows.push(std::mem::take(&mut current));
                    used = 0;
                }
                if used > 0 {
                    current.push(' ');
                    used += 1;
                }
                current.push_str(&piece);
                used += piece_width;
            }
        }
        rows.push(current);
    }
    rows
}

fn split_to_width(word: &str, width: usize) -> Vec<String> {
    if word.width() <= width {
        return vec![word.to_string()];
    }
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut used = 0usize;
    for c in word.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width && !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
            used = 0;
        }
        current.push(c);
        used += w;
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Cut spans so their combined display width fits in `max` columns.
/// A cut line ends in `...`.
fn truncate_spans(spans: &[Span], max: usize) -> Vec<Span> {
    let total: usize = spans.iter().map(|s| s.text.width()).sum();
    if total <= max {
        return spans.to_vec();
    }
    let budget = max.saturating_sub(3);
    let mut used = 0usize;
    let mut out: Vec<Span> = Vec::new();
    for span in spans {
        if used >= budget {
            break;
        }
        let mut text = String::new();
        for c in span.text.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > budget {
                break;
            }
            text.push(c);
            used += w;
        }
        out.push(Span {
            text,
            color: span.color,
            bold: span.bold,
        });
    }
    match out.last_mut() {
        Some(last) => last.text.push_str("..."),
        None => out.push(Span::muted("...")),
    }
    out
}
