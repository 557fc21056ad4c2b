//! Export Options and Configuration
//!
//! This module defines the export format types and the page geometry used
//! when laying out printable documents.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ─────────────────────────────────────────────────────────────────────────────
// Export Format
// ─────────────────────────────────────────────────────────────────────────────

/// Supported export formats for documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Raw text, byte-for-byte
    PlainText,
    /// Markdown source, byte-for-byte
    #[default]
    Markdown,
    /// Paginated PDF
    PrintableDocument,
}

impl ExportFormat {
    /// Get the short display label for this format.
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::PlainText => ".TXT",
            ExportFormat::Markdown => ".MD",
            ExportFormat::PrintableDocument => ".PDF",
        }
    }

    /// Get the descriptive title for this format's download action.
    pub fn title(&self) -> &'static str {
        match self {
            ExportFormat::PlainText => "Download Text",
            ExportFormat::Markdown => "Download Markdown",
            ExportFormat::PrintableDocument => "Download PDF",
        }
    }

    /// Get the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::PlainText => "txt",
            ExportFormat::Markdown => "md",
            ExportFormat::PrintableDocument => "pdf",
        }
    }

    /// Get the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::PlainText => "text/plain",
            ExportFormat::Markdown => "text/markdown",
            ExportFormat::PrintableDocument => "application/pdf",
        }
    }

    /// Name of the file-type filter shown in save dialogs.
    pub fn filter_name(&self) -> &'static str {
        match self {
            ExportFormat::PlainText => "Text Files",
            ExportFormat::Markdown => "Markdown Files",
            ExportFormat::PrintableDocument => "PDF Documents",
        }
    }

    /// Get all available export formats.
    pub fn all() -> &'static [ExportFormat] {
        &[
            ExportFormat::PlainText,
            ExportFormat::Markdown,
            ExportFormat::PrintableDocument,
        ]
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" | "plain" | "plaintext" => Ok(ExportFormat::PlainText),
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            "pdf" | "printable" | "printabledocument" => Ok(ExportFormat::PrintableDocument),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Page Setup
// ─────────────────────────────────────────────────────────────────────────────

/// Millimetres per PostScript point.
pub const MM_PER_PT: f32 = 25.4 / 72.0;

/// Page geometry and typography for printable documents.
///
/// Lengths are in millimetres, the font size in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSetup {
    /// Page width
    pub width_mm: f32,
    /// Page height
    pub height_mm: f32,
    /// Uniform margin on all four sides
    pub margin_mm: f32,
    /// Body font size
    pub font_size_pt: f32,
    /// Baseline-to-baseline distance as a multiple of the font size
    pub line_height_factor: f32,
}

impl Default for PageSetup {
    /// A4 portrait with a 10 mm margin and 16 pt text.
    fn default() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm: 10.0,
            font_size_pt: 16.0,
            line_height_factor: 1.15,
        }
    }
}

impl PageSetup {
    /// Horizontal space available for text (`W - 2m`).
    pub fn usable_width_mm(&self) -> f32 {
        self.width_mm - 2.0 * self.margin_mm
    }

    /// Vertical space available for text (`H - 2m`).
    pub fn usable_height_mm(&self) -> f32 {
        self.height_mm - 2.0 * self.margin_mm
    }

    /// Distance between consecutive baselines.
    pub fn line_height_mm(&self) -> f32 {
        self.font_size_pt * self.line_height_factor * MM_PER_PT
    }

    /// Number of lines that fit on one page; never less than one.
    ///
    /// Line `k` (0-based) sits at `m + (k + 1) * lineHeight` from the top and
    /// must not pass `H - m`.
    pub fn lines_per_page(&self) -> usize {
        let fit = (self.usable_height_mm() / self.line_height_mm()).floor();
        if fit.is_finite() && fit >= 1.0 {
            fit as usize
        } else {
            1
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_extension_and_mime() {
        assert_eq!(ExportFormat::PlainText.extension(), "txt");
        assert_eq!(ExportFormat::PlainText.mime_type(), "text/plain");
        assert_eq!(ExportFormat::Markdown.extension(), "md");
        assert_eq!(ExportFormat::Markdown.mime_type(), "text/markdown");
        assert_eq!(ExportFormat::PrintableDocument.extension(), "pdf");
        assert_eq!(ExportFormat::PrintableDocument.mime_type(), "application/pdf");
    }

    #[test]
    fn test_export_format_label() {
        assert_eq!(ExportFormat::Markdown.label(), ".MD");
        assert_eq!(ExportFormat::PrintableDocument.title(), "Download PDF");
    }

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("txt".parse::<ExportFormat>().unwrap(), ExportFormat::PlainText);
        assert_eq!("Markdown".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!(
            " PDF ".parse::<ExportFormat>().unwrap(),
            ExportFormat::PrintableDocument
        );
    }

    #[test]
    fn test_export_format_from_str_rejects_unknown() {
        let err = "docx".parse::<ExportFormat>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(name) if name == "docx"));
    }

    #[test]
    fn test_export_format_display_parses_back() {
        for format in ExportFormat::all() {
            assert_eq!(format.to_string().parse::<ExportFormat>().unwrap(), *format);
        }
    }

    #[test]
    fn test_export_format_serialization() {
        let json = serde_json::to_string(&ExportFormat::PrintableDocument).unwrap();
        assert_eq!(json, "\"printabledocument\"");
    }

    #[test]
    fn test_page_setup_default_geometry() {
        let page = PageSetup::default();
        assert_eq!(page.usable_width_mm(), 190.0);
        assert_eq!(page.usable_height_mm(), 277.0);
        // 16pt * 1.15 is about 6.49mm, so 42 lines fit in 277mm
        assert_eq!(page.lines_per_page(), 42);
    }

    #[test]
    fn test_lines_per_page_never_zero() {
        let page = PageSetup {
            height_mm: 20.0,
            margin_mm: 10.0,
            ..PageSetup::default()
        };
        assert_eq!(page.lines_per_page(), 1);
    }
}
