//! Line wrapping and pagination for printable documents.
//!
//! The layout is computed up front as plain data so the PDF writer only has to
//! draw each line at its assigned position.
//!
//! # Pipeline
//!
//! 1. [`wrap_document`] splits the body on newlines and greedily word-wraps
//!    every logical line that is wider than the usable page width.
//! 2. [`paginate`] assigns each wrapped line a page and a vertical offset,
//!    opening as many pages as the content needs.

use super::metrics::{expand_tabs, TextMeasure};
use super::options::PageSetup;

// ─────────────────────────────────────────────────────────────────────────────
// Wrapped Lines
// ─────────────────────────────────────────────────────────────────────────────

/// How a wrapped line ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineBreak {
    /// End of a logical line in the source
    Hard,
    /// Inserted by word-wrap
    Soft,
}

/// A render-ready line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLine {
    pub text: String,
    /// Measured width in millimetres
    pub width_mm: f32,
    pub break_after: LineBreak,
}

/// Break the document into render-ready lines no wider than the usable width.
///
/// Lines that already fit are kept verbatim (after tab expansion). Longer
/// lines are word-wrapped greedily; a word wider than the usable width is
/// placed alone on its own line.
pub fn wrap_document(document: &str, page: &PageSetup) -> Vec<WrappedLine> {
    let measure = TextMeasure::new(page.font_size_pt);
    let max_width = page.usable_width_mm();
    let mut lines = Vec::new();

    for raw in document.split('\n') {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let line = expand_tabs(raw);
        let width = measure.width_mm(&line);

        if width <= max_width {
            lines.push(WrappedLine {
                text: line.into_owned(),
                width_mm: width,
                break_after: LineBreak::Hard,
            });
            continue;
        }

        let start = lines.len();
        wrap_words(&line, &measure, max_width, &mut lines);
        if lines.len() == start {
            // Only whitespace, wider than the page
            lines.push(WrappedLine {
                text: String::new(),
                width_mm: 0.0,
                break_after: LineBreak::Hard,
            });
        }
        if let Some(last) = lines.last_mut() {
            last.break_after = LineBreak::Hard;
        }
    }

    lines
}

/// Greedy word-wrap of a single logical line, appending soft-broken lines.
fn wrap_words(line: &str, measure: &TextMeasure, max_width: f32, out: &mut Vec<WrappedLine>) {
    let space = measure.space_mm();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in line.split_whitespace() {
        let word_width = measure.width_mm(word);

        if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        let candidate = current_width + space + word_width;
        if candidate <= max_width {
            current.push(' ');
            current.push_str(word);
            current_width = candidate;
        } else {
            out.push(WrappedLine {
                text: std::mem::take(&mut current),
                width_mm: current_width,
                break_after: LineBreak::Soft,
            });
            current.push_str(word);
            current_width = word_width;
        }
    }

    if !current.is_empty() {
        out.push(WrappedLine {
            text: current,
            width_mm: current_width,
            break_after: LineBreak::Soft,
        });
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pagination
// ─────────────────────────────────────────────────────────────────────────────

/// A line placed on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    /// Left edge, from the page's left side
    pub x_mm: f32,
    /// Baseline, from the page's top edge
    pub y_mm: f32,
    pub break_after: LineBreak,
}

/// One page of laid-out text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

/// A fully paginated document, ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedDocument {
    pub setup: PageSetup,
    pub pages: Vec<Page>,
}

impl PaginatedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All placed lines in reading order.
    pub fn lines(&self) -> impl Iterator<Item = &PlacedLine> {
        self.pages.iter().flat_map(|page| page.lines.iter())
    }
}

/// Distribute wrapped lines over as many pages as needed.
///
/// Each page starts at `m + lineHeight` from the top. When the next baseline
/// would pass `H - m` a new page is opened. An empty input still produces one
/// blank page.
pub fn paginate(lines: Vec<WrappedLine>, page: &PageSetup) -> PaginatedDocument {
    let line_height = page.line_height_mm();
    let top = page.margin_mm + line_height;
    let per_page = page.lines_per_page();

    let mut pages = Vec::new();
    let mut current = Page::default();

    for line in lines {
        if current.lines.len() == per_page {
            pages.push(std::mem::take(&mut current));
        }
        let row = current.lines.len();
        current.lines.push(PlacedLine {
            text: line.text,
            x_mm: page.margin_mm,
            y_mm: top + row as f32 * line_height,
            break_after: line.break_after,
        });
    }
    pages.push(current);

    PaginatedDocument {
        setup: *page,
        pages,
    }
}

/// Wrap and paginate a document in one step.
pub fn layout_document(document: &str, page: &PageSetup) -> PaginatedDocument {
    paginate(wrap_document(document, page), page)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
