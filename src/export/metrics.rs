//! Text measurement for printable documents.
//!
//! PDF pages lay out text by absolute position, so line breaking needs the
//! rendered width of every candidate line. Widths come from the Helvetica
//! advance table (units per 1000 em), the standard font the PDF renderer uses.

use super::options::MM_PER_PT;

/// Number of spaces a tab expands to.
pub const TAB_WIDTH: usize = 4;

/// Advance used for characters outside the table.
const DEFAULT_ADVANCE: u16 = 556;

/// Helvetica advances for the printable ASCII range `' '..='~'`.
#[rustfmt::skip]
const HELVETICA_ADVANCES: [u16; 95] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    278, 278, 584, 584, 584, 556, 1015,
    // A-Z
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    278, 278, 278, 469, 556, 333,
    // a-z
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // { | } ~
    334, 260, 334, 584,
];

/// Advance width of a single character in 1/1000 em.
pub fn char_advance(c: char) -> u16 {
    match c {
        ' '..='~' => HELVETICA_ADVANCES[c as usize - ' ' as usize],
        '\u{a0}' => HELVETICA_ADVANCES[0],
        c if c.is_control() => 0,
        _ => DEFAULT_ADVANCE,
    }
}

/// Measures text in millimetres at a fixed font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMeasure {
    font_size_pt: f32,
}

impl TextMeasure {
    pub fn new(font_size_pt: f32) -> Self {
        Self { font_size_pt }
    }

    /// Rendered width of `text` in millimetres.
    pub fn width_mm(&self, text: &str) -> f32 {
        let units: u32 = text.chars().map(|c| u32::from(char_advance(c))).sum();
        units as f32 / 1000.0 * self.font_size_pt * MM_PER_PT
    }

    /// Width of a single space.
    pub fn space_mm(&self) -> f32 {
        self.width_mm(" ")
    }
}

/// Replace tabs with spaces so the measured width matches what is drawn.
pub fn expand_tabs(line: &str) -> std::borrow::Cow<'_, str> {
    if line.contains('\t') {
        line.replace('\t', &" ".repeat(TAB_WIDTH)).into()
    } else {
        line.into()
    }
}
