//! Text encoding, measurement and line fitting for the base-14 fonts

use crate::constants::FIT_STEP;
use crate::types::*;

/// Lines of text set at one size
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TextBlock {
    pub lines: Vec<String>,
    pub size: f32,
}

/// Encode `text` for a base-14 font with WinAnsiEncoding.
///
/// Latin-1 maps directly; the common typographic punctuation outside
/// Latin-1 maps to its WinAnsi slot.
pub fn encode_win_ansi(field: &'static str, text: &str) -> Result<Vec<u8>> {
    text.chars()
        .map(|ch| match ch {
            ' '..='~' | '\u{A0}'..='\u{FF}' => Ok(ch as u8),
            '\u{20AC}' => Ok(0x80),
            '\u{2026}' => Ok(0x85),
            '\u{2018}' => Ok(0x91),
            '\u{2019}' => Ok(0x92),
            '\u{201C}' => Ok(0x93),
            '\u{201D}' => Ok(0x94),
            '\u{2013}' => Ok(0x96),
            '\u{2014}' => Ok(0x97),
            _ => Err(CoverError::Unencodable { field, ch }),
        })
        .collect()
}

/// Approximate advance width of a character in em units.
///
/// Helvetica has no metrics available without a font file, so this
/// errs on the wide side to keep text inside the panel.
fn char_width_em(ch: char, bold: bool) -> f32 {
    let base = if ch == ' ' {
        0.28
    } else if ch.is_uppercase() || ch.is_ascii_digit() {
        0.7
    } else if matches!(ch, 'i' | 'j' | 'l' | '.' | ',' | '\'' | '!' | ':' | ';') {
        0.28
    } else if matches!(ch, 'm' | 'w') {
        0.85
    } else {
        0.56
    };
    if bold { base * 1.08 } else { base }
}

/// Estimated width of `text` in points
pub(crate) fn text_width(text: &str, size: f32, bold: bool) -> f32 {
    text.chars().map(|ch| char_width_em(ch, bold)).sum::<f32>() * size
}

/// Greedy word wrap. `None` when a single word is wider than `max_width`.
fn wrap(text: &str, size: f32, bold: bool, max_width: f32) -> Option<Vec<String>> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if text_width(word, size, bold) > max_width {
            return None;
        }
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if text_width(&candidate, size, bold) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    Some(lines)
}

/// Tabs, newlines and runs of spaces become single spaces
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Set `text` at the largest size in `fit` that wraps into the allowed lines.
pub(crate) fn fit_block(
    field: &'static str,
    text: &str,
    fit: (f32, f32, usize),
    bold: bool,
    max_width: f32,
) -> Result<TextBlock> {
    let (largest, smallest, max_lines) = fit;

    let text = collapse_whitespace(text);
    if text.is_empty() {
        return Err(CoverError::EmptyText { field });
    }
    encode_win_ansi(field, &text)?;

    let mut size = largest;
    while size >= smallest {
        if let Some(lines) = wrap(&text, size, bold, max_width) {
            if lines.len() <= max_lines {
                return Ok(TextBlock { lines, size });
            }
        }
        size -= FIT_STEP;
    }

    Err(CoverError::TextTooLong { field })
}
