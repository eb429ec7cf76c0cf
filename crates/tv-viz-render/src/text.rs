//! Approximate text metrics.
//!
//! No font files are embedded; widths come from per-character advance
//! factors of a generic sans-serif face, which is close enough for margins
//! and legend boxes.

use crate::primitives::TextStyle;

#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub ascent: f64,
}

fn advance(ch: char) -> f64 {
    match ch {
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '|' | '!' | '\'' | 'I' => 0.28,
        'f' | 't' | 'r' | '(' | ')' | '[' | ']' | '-' | ' ' => 0.36,
        'm' | 'w' | 'M' | 'W' => 0.85,
        '_' | '0'..='9' => 0.55,
        c if c.is_ascii_uppercase() => 0.66,
        _ => 0.53,
    }
}

/// Measure `text` at `size_pt`, bold faces being slightly wider.
pub fn measure_text(text: &str, size_pt: f64, bold: bool) -> TextMetrics {
    let em: f64 = text.chars().map(advance).sum();
    let weight = if bold { 1.07 } else { 1.0 };
    TextMetrics { width: em * size_pt * weight, height: 1.2 * size_pt, ascent: 0.93 * size_pt }
}

pub fn measure_styled(text: &str, style: &TextStyle) -> TextMetrics {
    measure_text(text, style.size, style.bold)
}
