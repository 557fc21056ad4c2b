//! Format encoding: document text in, encoded artifact out.

use super::layout::layout_document;
use super::options::{ExportFormat, PageSetup};
use super::pdf::render_pdf;
use crate::error::Result;
use log::debug;

/// The encoded representation of a document in one target format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedArtifact {
    pub format: ExportFormat,
    pub payload: Vec<u8>,
    /// Number of pages, for printable documents
    pub page_count: Option<usize>,
}

impl EncodedArtifact {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }

    /// The payload as text, for the text-based formats.
    pub fn as_text(&self) -> Option<&str> {
        match self.format {
            ExportFormat::PlainText | ExportFormat::Markdown => {
                std::str::from_utf8(&self.payload).ok()
            }
            ExportFormat::PrintableDocument => None,
        }
    }
}

/// Encode `document` in the given format.
///
/// Text formats carry the document unchanged. The printable format is
/// word-wrapped to the page width and paginated before rendering.
pub fn encode(document: &str, format: ExportFormat, page: &PageSetup) -> Result<EncodedArtifact> {
    let artifact = match format {
        ExportFormat::PlainText | ExportFormat::Markdown => EncodedArtifact {
            format,
            payload: document.as_bytes().to_vec(),
            page_count: None,
        },
        ExportFormat::PrintableDocument => {
            let layout = layout_document(document, page);
            EncodedArtifact {
                format,
                payload: render_pdf(&layout)?,
                page_count: Some(layout.page_count()),
            }
        }
    };

    debug!(
        "Encoded {} chars as {} ({} bytes)",
        document.chars().count(),
        artifact.mime_type(),
        artifact.payload.len()
    );
    Ok(artifact)
}
