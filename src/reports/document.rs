//! Page-independent document model.
//!
//! Section builders produce [`Section`]s made of [`Block`]s. The paginator
//! turns them into positioned [`Element`]s on fixed-size pages, which the
//! PDF and text renderers draw.

use serde::Serialize;
use std::fmt;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Self = Self(0x11, 0x18, 0x27);
    pub const TEXT: Self = Self(0x37, 0x41, 0x51);
    pub const MUTED: Self = Self(0x6b, 0x72, 0x80);
    pub const RULE: Self = Self(0xe5, 0xe7, 0xeb);
    pub const TRACK: Self = Self(0xf3, 0xf4, 0xf6);

    /// Parse `#rrggbb` (the leading `#` is optional).
    ///
    /// ```
    /// use perfally::reports::Rgb;
    ///
    /// assert_eq!(Rgb::from_hex("#2563eb"), Some(Rgb(0x25, 0x63, 0xeb)));
    /// assert_eq!(Rgb::from_hex("blue"), None);
    /// ```
    #[must_use]
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#').unwrap_or_else(|| s.trim());
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Channel values in the 0..=1 range, as used by PDF color operators.
    #[must_use]
    pub fn unit(self) -> [f32; 3] {
        [
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
        ]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Gauge bar thickness in points.
pub const GAUGE_HEIGHT: f32 = 7.0;

/// Text size classes. All text is set in the same fixed-width face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextSize {
    Small,
    Body,
    Heading,
    Title,
    Display,
}

impl TextSize {
    /// Font size in points.
    #[must_use]
    pub const fn points(self) -> f32 {
        match self {
            Self::Small => 7.5,
            Self::Body => 9.0,
            Self::Heading => 12.0,
            Self::Title => 16.0,
            Self::Display => 28.0,
        }
    }

    /// Baseline-to-baseline distance in points.
    #[must_use]
    pub fn leading(self) -> f32 {
        self.points() * 1.35
    }

    /// Advance width of one character cell (Courier is 600/1000 em).
    #[must_use]
    pub fn cell_width(self) -> f32 {
        self.points() * 0.6
    }
}

/// A run of text with one style.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub color: Rgb,
    pub bold: bool,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: Rgb::TEXT,
            bold: false,
        }
    }

    pub fn muted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: Rgb::MUTED,
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: Rgb::BLACK,
            bold: true,
        }
    }

    pub fn colored(text: impl Into<String>, color: Rgb) -> Self {
        Self {
            text: text.into(),
            color,
            bold: true,
        }
    }
}

/// A single physical line. Not wrapped; text past the right margin is cut.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub spans: Vec<Span>,
    pub size: TextSize,
    /// Left indent in character cells
    pub indent: usize,
}

impl Line {
    pub fn new(spans: Vec<Span>) -> Self {
        Self {
            spans,
            size: TextSize::Body,
            indent: 0,
        }
    }

    #[must_use]
    pub fn sized(mut self, size: TextSize) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn indented(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Concatenated text of all spans.
    #[must_use]
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Flowable content of a section.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Line(Line),
    /// Word-wrapped text in one style
    Paragraph {
        text: String,
        color: Rgb,
        size: TextSize,
        indent: usize,
    },
    /// Horizontal score bar, filled proportionally to `score`/100
    Gauge { score: u8, color: Rgb, cells: usize },
    Rule,
    /// Vertical space in points
    Spacer(f32),
}

impl Block {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph {
            text: text.into(),
            color: Rgb::TEXT,
            size: TextSize::Body,
            indent: 0,
        }
    }

    pub fn indented_paragraph(text: impl Into<String>, indent: usize, color: Rgb) -> Self {
        Self::Paragraph {
            text: text.into(),
            color,
            size: TextSize::Body,
            indent,
        }
    }
}

impl From<Line> for Block {
    fn from(line: Line) -> Self {
        Self::Line(line)
    }
}

/// Content that starts on a fresh page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: impl Into<Block>) {
        self.blocks.push(block.into());
    }

    pub fn spacer(&mut self, points: f32) {
        self.blocks.push(Block::Spacer(points));
    }
}

/// Positioned content on a laid-out page. `y` is the distance from the top
/// edge of the page to the text baseline (or to the top of a shape).
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text {
        x: f32,
        y: f32,
        size: TextSize,
        spans: Vec<Span>,
    },
    Gauge {
        x: f32,
        y: f32,
        width: f32,
        score: u8,
        color: Rgb,
    },
    Rule { x: f32, y: f32, width: f32 },
    /// Full-width color band at the top of the page
    Band { height: f32, color: Rgb },
}

/// A page after layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaidOutPage {
    pub elements: Vec<Element>,
}

/// A fully paginated report.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub geometry: PageGeometry,
    pub pages: Vec<LaidOutPage>,
}

/// Fixed page grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    /// Height of the accent band at the top edge
    pub band: f32,
    /// Space reserved above the bottom margin for the footer
    pub footer: f32,
}

impl PageGeometry {
    /// A4 portrait with 48pt margins.
    pub const A4: Self = Self {
        width: 595.0,
        height: 842.0,
        margin: 48.0,
        band: 6.0,
        footer: 24.0,
    };

    #[must_use]
    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    /// Top of the flow area.
    #[must_use]
    pub fn content_top(&self) -> f32 {
        self.margin
    }

    /// Bottom of the flow area, above the footer.
    #[must_use]
    pub fn content_bottom(&self) -> f32 {
        self.height - self.margin - self.footer
    }

    /// Character cells that fit on one line at `size`.
    #[must_use]
    pub fn columns(&self, size: TextSize) -> usize {
        (self.content_width() / size.cell_width()).floor() as usize
    }

    /// Baseline of the footer line.
    #[must_use]
    pub fn footer_baseline(&self) -> f32 {
        self.height - self.margin + TextSize::Small.points()
    }
}
