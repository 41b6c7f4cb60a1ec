//! Escaping utilities for the PDF writer.
//!
//! Page text comes from the audited site (page titles, URLs, check titles)
//! and from model output, so it may contain anything. The PDF uses the
//! base-14 Courier font with WinAnsi encoding; text is folded into that
//! character set before it is placed in a string literal.

/// Escape a string for inclusion in a PDF literal string `( ... )`.
///
/// Escapes backslashes and parentheses, and replaces line breaks and
/// other control characters with a space.
///
/// # Examples
///
/// ```
/// use perfally::reports::escape::escape_pdf_string;
///
/// assert_eq!(escape_pdf_string("f(x) = a\\b"), "f\\(x\\) = a\\\\b");
/// assert_eq!(escape_pdf_string("two\nlines"), "two lines");
/// ```
#[must_use]
pub fn escape_pdf_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '(' => result.push_str("\\("),
            ')' => result.push_str("\\)"),
            c if c.is_control() => result.push(' '),
            _ => result.push(c),
        }
    }
    result
}

/// Fold text into the WinAnsi (Latin-1 range) character set.
///
/// Common typographic characters get an ASCII stand-in; anything else
/// outside Latin-1 becomes `?`.
///
/// # Examples
///
/// ```
/// use perfally::reports::escape::to_win_ansi;
///
/// assert_eq!(to_win_ansi("Médio"), "Médio");
/// assert_eq!(to_win_ansi("“quoted” … — ok"), "\"quoted\" ... - ok");
/// assert_eq!(to_win_ansi("日本"), "??");
/// ```
#[must_use]
pub fn to_win_ansi(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201a}' => result.push('\''),
            '\u{201c}' | '\u{201d}' | '\u{201e}' => result.push('"'),
            '\u{2013}' | '\u{2014}' | '\u{2212}' => result.push('-'),
            '\u{2026}' => result.push_str("..."),
            '\u{2022}' | '\u{00b7}' => result.push('*'),
            '\u{00a0}' | '\u{2009}' | '\u{202f}' => result.push(' '),
            c if (c as u32) < 0x100 => result.push(c),
            _ => result.push('?'),
        }
    }
    result
}

/// Encode already-folded text as WinAnsi bytes.
///
/// Every char of [`to_win_ansi`] output is below U+0100 and maps to the
/// byte with the same value.
#[must_use]
pub fn win_ansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

/// Strip characters that would corrupt a terminal when printed.
///
/// Keeps printable text and drops ANSI escape introducers and other
/// control characters coming from untrusted data.
///
/// # Examples
///
/// ```
/// use perfally::reports::escape::sanitize_terminal;
///
/// assert_eq!(sanitize_terminal("ok\u{1b}[31mred"), "ok[31mred");
/// ```
#[must_use]
pub fn sanitize_terminal(s: &str) -> String {
    s.chars().filter(|c| !c.is_control()).collect()
}
