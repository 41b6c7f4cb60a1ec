//! Minimal PDF 1.4 writer for laid-out documents.
//!
//! Uses the base-14 Courier faces with WinAnsi encoding, so no fonts are
//! embedded. Streams are left uncompressed and objects are written in a
//! fixed order: the same document always produces the same bytes.

use super::document::{Document, Element, PageGeometry, Rgb, Span, GAUGE_HEIGHT};
use super::escape::{escape_pdf_string, to_win_ansi, win_ansi_bytes};
use crate::utils::document_id;
use chrono::{DateTime, Utc};
use std::fmt::Write as _;

const CATALOG: usize = 1;
const PAGES: usize = 2;
const FONT_REGULAR: usize = 3;
const FONT_BOLD: usize = 4;
const INFO: usize = 5;
/// First page object; each page is followed by its content stream.
const FIRST_PAGE: usize = 6;

/// Serialize a document to PDF bytes.
#[must_use]
pub fn write_pdf(document: &Document, created: DateTime<Utc>) -> Vec<u8> {
    let streams: Vec<Vec<u8>> = document
        .pages
        .iter()
        .map(|page| content_stream(&page.elements, document.geometry))
        .collect();

    let mut writer = PdfWriter::new();
    writer.object(
        CATALOG,
        format!("<< /Type /Catalog /Pages {PAGES} 0 R >>").as_bytes(),
    );

    let kids: Vec<String> = (0..streams.len())
        .map(|i| format!("{} 0 R", FIRST_PAGE + 2 * i))
        .collect();
    writer.object(
        PAGES,
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            streams.len()
        )
        .as_bytes(),
    );
    writer.object(FONT_REGULAR, font_dict("Courier").as_bytes());
    writer.object(FONT_BOLD, font_dict("Courier-Bold").as_bytes());

    let mut info = Vec::new();
    info.extend_from_slice(b"<< /Title ");
    info.extend(pdf_text(&document.title));
    info.extend_from_slice(b" /Author ");
    info.extend(pdf_text(&document.author));
    info.extend_from_slice(b" /Subject ");
    info.extend(pdf_text(&document.subject));
    info.extend_from_slice(b" /Producer ");
    info.extend(pdf_text(concat!("perfally ", env!("CARGO_PKG_VERSION"))));
    let date = created.format("D:%Y%m%d%H%M%SZ").to_string();
    info.extend_from_slice(format!(" /CreationDate ({date}) /ModDate ({date}) >>").as_bytes());
    writer.object(INFO, &info);

    let geometry = document.geometry;
    for (index, stream) in streams.iter().enumerate() {
        let page_id = FIRST_PAGE + 2 * index;
        let content_id = page_id + 1;
        writer.object(
            page_id,
            format!(
                "<< /Type /Page /Parent {PAGES} 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 {FONT_REGULAR} 0 R /F2 {FONT_BOLD} 0 R >> >> \
                 /Contents {content_id} 0 R >>",
                num(geometry.width),
                num(geometry.height)
            )
            .as_bytes(),
        );
        let mut body = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
        body.extend_from_slice(stream);
        body.extend_from_slice(b"\nendstream");
        writer.object(content_id, &body);
    }

    let mut id_parts: Vec<&[u8]> = streams.iter().map(Vec::as_slice).collect();
    id_parts.push(&info);
    let id = document_id(&id_parts);
    writer.finish(INFO, &id)
}

fn font_dict(base: &str) -> String {
    format!("<< /Type /Font /Subtype /Type1 /BaseFont /{base} /Encoding /WinAnsiEncoding >>")
}

/// A literal string in WinAnsi bytes.
fn pdf_text(s: &str) -> Vec<u8> {
    let mut out = vec![b'('];
    out.extend(win_ansi_bytes(&escape_pdf_string(&to_win_ansi(s))));
    out.push(b')');
    out
}

/// Shortest decimal form with at most two fractional digits.
fn num(value: f32) -> String {
    let s = format!("{value:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn color_op(color: Rgb, op: &str) -> String {
    let [r, g, b] = color.unit();
    format!("{} {} {} {op}", num(r), num(g), num(b))
}

fn content_stream(elements: &[Element], geometry: PageGeometry) -> Vec<u8> {
    let mut out = Vec::new();
    let flip = |y: f32| geometry.height - y;
    for element in elements {
        match element {
            Element::Band { height, color } => {
                out.extend(
                    format!(
                        "{}\n0 {} {} {} re f\n",
                        color_op(*color, "rg"),
                        num(flip(*height)),
                        num(geometry.width),
                        num(*height)
                    )
                    .into_bytes(),
                );
            }
            Element::Rule { x, y, width } => {
                out.extend(
                    format!(
                        "{}\n0.5 w {} {} m {} {} l S\n",
                        color_op(Rgb::RULE, "RG"),
                        num(*x),
                        num(flip(*y)),
                        num(x + width),
                        num(flip(*y))
                    )
                    .into_bytes(),
                );
            }
            Element::Gauge {
                x,
                y,
                width,
                score,
                color,
            } => {
                let bottom = flip(y + GAUGE_HEIGHT);
                let filled = width * f32::from(*score) / 100.0;
                let mut ops = format!(
                    "{}\n{} {} {} {} re f\n",
                    color_op(Rgb::TRACK, "rg"),
                    num(*x),
                    num(bottom),
                    num(*width),
                    num(GAUGE_HEIGHT)
                );
                if filled > 0.0 {
                    let _ = write!(
                        ops,
                        "{}\n{} {} {} {} re f\n",
                        color_op(*color, "rg"),
                        num(*x),
                        num(bottom),
                        num(filled),
                        num(GAUGE_HEIGHT)
                    );
                }
                out.extend(ops.into_bytes());
            }
            Element::Text { x, y, size, spans } => {
                out.extend(format!("BT\n{} {} Td\n", num(*x), num(flip(*y))).into_bytes());
                for span in spans {
                    out.extend(span_ops(span, size.points()));
                }
                out.extend_from_slice(b"ET\n");
            }
        }
    }
    out
}

fn span_ops(span: &Span, points: f32) -> Vec<u8> {
    let font = if span.bold { "F2" } else { "F1" };
    let mut ops = format!("/{font} {} Tf {}\n", num(points), color_op(span.color, "rg")).into_bytes();
    ops.extend(pdf_text(&span.text));
    ops.extend_from_slice(b" Tj\n");
    ops
}

/// Tracks object offsets for the cross-reference table.
struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<(usize, usize)>,
}

impl PdfWriter {
    fn new() -> Self {
        // Binary marker comment so transfer tools treat the file as binary
        let mut buf = b"%PDF-1.4\n%".to_vec();
        buf.extend_from_slice(&[0xe2, 0xe3, 0xcf, 0xd3]);
        buf.push(b'\n');
        Self {
            buf,
            offsets: Vec::new(),
        }
    }

    fn object(&mut self, id: usize, body: &[u8]) {
        self.offsets.push((id, self.buf.len()));
        self.buf.extend(format!("{id} 0 obj\n").into_bytes());
        self.buf.extend_from_slice(body);
        self.buf.extend_from_slice(b"\nendobj\n");
    }

    fn finish(mut self, info: usize, id: &str) -> Vec<u8> {
        self.offsets.sort_unstable();
        let size = self.offsets.len() + 1;
        let xref_at = self.buf.len();
        let mut xref = format!("xref\n0 {size}\n0000000000 65535 f \n");
        for (_, offset) in &self.offsets {
            let _ = writeln!(xref, "{offset:010} 00000 n ");
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {size} /Root {CATALOG} 0 R /Info {info} 0 R /ID [<{id}> <{id}>] >>\nstartxref\n{xref_at}\n%%EOF\n"
        );
        self.buf.extend(xref.into_bytes());
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::document::{LaidOutPage, TextSize};
    use chrono::TimeZone;

    fn sample() -> Document {
        Document {
            title: "Acme (staging)".to_string(),
            author: "PerfAlly".to_string(),
            subject: "https://acme.example".to_string(),
            geometry: PageGeometry::A4,
            pages: vec![LaidOutPage {
                elements: vec![
                    Element::Band {
                        height: 6.0,
                        color: Rgb(0x25, 0x63, 0xeb),
                    },
                    Element::Text {
                        x: 48.0,
                        y: 60.0,
                        size: TextSize::Body,
                        spans: vec![Span::bold("Score"), Span::plain(" 73 (ok)")],
                    },
                ],
            }],
        }
    }

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 8, 30, 0).unwrap()
    }

    #[test]
    fn test_structure() {
        let bytes = write_pdf(&sample(), created());
        let text = String::from_utf8_lossy(&bytes);
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(text.ends_with("%%EOF\n"));
        assert!(text.contains("/Count 1"));
        assert!(text.contains("/BaseFont /Courier-Bold"));
        assert!(text.contains("(Acme \\(staging\\))"));
        assert!(text.contains("( 73 \\(ok\\)) Tj"));
        assert!(text.contains("/CreationDate (D:20260302083000Z)"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let bytes = write_pdf(&sample(), created());
        let xref = bytes
            .windows(5)
            .rposition(|w| w == b"xref\n")
            .unwrap();
        let table = std::str::from_utf8(&bytes[xref..]).unwrap();
        let entries: Vec<&str> = table.lines().skip(3).take(7).collect();
        assert_eq!(entries.len(), 7);
        for (i, entry) in entries.iter().enumerate() {
            let offset: usize = entry[..10].parse().unwrap();
            assert!(bytes[offset..].starts_with(format!("{} 0 obj", i + 1).as_bytes()));
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(write_pdf(&sample(), created()), write_pdf(&sample(), created()));
    }

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(595.0), "595");
        assert_eq!(num(0.5), "0.5");
        assert_eq!(num(12.345), "12.35");
        assert_eq!(num(-0.001), "0");
    }
}
