//! Document Export Module
//!
//! This module copies documents to the clipboard and exports them as files.
//!
//! # Supported Export Formats
//!
//! - **Plain text** (`.txt`, `text/plain`): the document unchanged
//! - **Markdown** (`.md`, `text/markdown`): the document unchanged
//! - **PDF** (`.pdf`, `application/pdf`): word-wrapped and paginated
//!
//! # Architecture
//!
//! - `options.rs` - Export formats and page geometry
//! - `metrics.rs` - Text measurement
//! - `layout.rs` - Word-wrap and pagination
//! - `pdf.rs` - PDF rendering of a laid-out document
//! - `encode.rs` - Format encoding into artifacts
//! - `download.rs` - Download handles and save sinks
//! - `clipboard.rs` - Clipboard copy and acknowledgement state

pub mod clipboard;
pub mod download;
pub mod encode;
pub mod layout;
pub mod metrics;
pub mod options;
pub mod pdf;

pub use clipboard::{AckState, ClipboardBackend, Clock, CopyController, SystemClipboard, SystemClock};
pub use download::{DeliveryOutcome, DialogSink, DirectorySink, DownloadManager, SaveSink};
pub use encode::{encode, EncodedArtifact};
pub use options::{ExportFormat, PageSetup};

use crate::config::Settings;
use crate::error::Result;
use log::warn;

// ─────────────────────────────────────────────────────────────────────────────
// Exporter
// ─────────────────────────────────────────────────────────────────────────────

/// Caller-facing entry point: copy and export actions for one document view.
pub struct Exporter<S = DialogSink, B = SystemClipboard, C = SystemClock> {
    copier: CopyController<B, C>,
    downloads: DownloadManager<S>,
    page: PageSetup,
    open_after_export: bool,
}

impl<S: SaveSink> Exporter<S> {
    /// Exporter on the system clipboard, configured from user settings.
    pub fn from_settings(settings: &Settings, sink: S) -> Self {
        Self::new(
            CopyController::system(settings.ack_window()),
            DownloadManager::new(sink),
            settings.page,
        )
        .with_open_after_export(settings.open_after_export)
    }
}

impl<S: SaveSink, B: ClipboardBackend, C: Clock> Exporter<S, B, C> {
    pub fn new(copier: CopyController<B, C>, downloads: DownloadManager<S>, page: PageSetup) -> Self {
        Self {
            copier,
            downloads,
            page,
            open_after_export: false,
        }
    }

    /// Open saved files with the system's default application.
    pub fn with_open_after_export(mut self, open: bool) -> Self {
        self.open_after_export = open;
        self
    }

    /// Copy the document to the clipboard and start the acknowledgement window.
    pub fn copy_to_clipboard(&mut self, document: &str) -> Result<()> {
        self.copier.copy(document)
    }

    /// Whether "copied" feedback should currently be shown.
    pub fn is_acknowledged(&self) -> bool {
        self.copier.is_acknowledged()
    }

    /// Advance the acknowledgement timer; returns `true` if it just expired.
    pub fn tick(&mut self) -> bool {
        self.copier.tick()
    }

    pub fn copier(&self) -> &CopyController<B, C> {
        &self.copier
    }

    pub fn downloads(&self) -> &DownloadManager<S> {
        &self.downloads
    }

    pub fn downloads_mut(&mut self) -> &mut DownloadManager<S> {
        &mut self.downloads
    }

    /// Encode the document and deliver it as `{base_filename}.{extension}`.
    pub fn export_document(
        &self,
        document: &str,
        format: ExportFormat,
        base_filename: &str,
    ) -> Result<DeliveryOutcome> {
        let artifact = encode(document, format, &self.page)?;
        let outcome = self.downloads.deliver(artifact, base_filename)?;

        if let DeliveryOutcome::Saved(path) = &outcome {
            if self.open_after_export {
                if let Err(e) = open::that(path) {
                    warn!("Failed to open exported file: {}", e);
                }
            }
        }
        Ok(outcome)
    }

    /// Like [`export_document`](Self::export_document), with the format given by name.
    ///
    /// Unknown names fail with `UnsupportedFormat` before anything is encoded.
    pub fn export_document_as(
        &self,
        document: &str,
        format_name: &str,
        base_filename: &str,
    ) -> Result<DeliveryOutcome> {
        let format = format_name.parse::<ExportFormat>()?;
        self.export_document(document, format, base_filename)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::export::clipboard::ClipboardError;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    #[derive(Clone)]
    struct FixedClock(Rc<Cell<Instant>>);

    impl Clock for FixedClock {
        fn now(&self) -> Instant {
            self.0.get()
        }
    }

    struct NoClipboard;

    impl ClipboardBackend for NoClipboard {
        fn write_text(&mut self, _text: &str) -> std::result::Result<(), ClipboardError> {
            Err(ClipboardError::AccessError("unsupported environment".to_string()))
        }
    }

    struct MemoryClipboard;

    impl ClipboardBackend for MemoryClipboard {
        fn write_text(&mut self, _text: &str) -> std::result::Result<(), ClipboardError> {
            Ok(())
        }
    }

    fn exporter<B: ClipboardBackend>(
        backend: B,
        dir: &TempDir,
    ) -> (Exporter<DirectorySink, B, FixedClock>, Rc<Cell<Instant>>) {
        let now = Rc::new(Cell::new(Instant::now()));
        let copier = CopyController::new(backend, FixedClock(now.clone()), Duration::from_secs(2));
        let downloads = DownloadManager::new(DirectorySink::new(dir.path()));
        (Exporter::new(copier, downloads, PageSetup::default()), now)
    }

    #[test]
    fn test_export_each_format() {
        let dir = TempDir::new().unwrap();
        let (exporter, _) = exporter(MemoryClipboard, &dir);

        for format in ExportFormat::all() {
            let outcome = exporter.export_document("Hello\nWorld", *format, "document").unwrap();
            let expected = dir.path().join(format!("document.{}", format.extension()));
            assert_eq!(outcome, DeliveryOutcome::Saved(expected.clone()));
            assert!(expected.exists());
        }
        assert_eq!(exporter.downloads().live_handles(), 0);
    }

    #[test]
    fn test_export_unknown_format_name() {
        let dir = TempDir::new().unwrap();
        let (exporter, _) = exporter(MemoryClipboard, &dir);

        let err = exporter.export_document_as("x", "docx", "document").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_export_by_name() {
        let dir = TempDir::new().unwrap();
        let (exporter, _) = exporter(MemoryClipboard, &dir);

        let outcome = exporter.export_document_as("# Hi", "md", "notes").unwrap();
        assert_eq!(outcome, DeliveryOutcome::Saved(dir.path().join("notes.md")));
    }

    #[test]
    fn test_copy_failure_leaves_idle() {
        let dir = TempDir::new().unwrap();
        let (mut exporter, _) = exporter(NoClipboard, &dir);

        let err = exporter.copy_to_clipboard("text").unwrap_err();
        assert!(matches!(err, Error::ClipboardUnavailable(_)));
        assert!(!exporter.is_acknowledged());
    }

    #[test]
    fn test_export_does_not_touch_acknowledgement() {
        let dir = TempDir::new().unwrap();
        let (mut exporter, now) = exporter(MemoryClipboard, &dir);

        exporter.copy_to_clipboard("text").unwrap();
        exporter.export_document("text", ExportFormat::PlainText, "doc").unwrap();
        assert!(exporter.is_acknowledged());
        assert_eq!(exporter.copier().pending_timers(), 1);

        now.set(now.get() + Duration::from_secs(2));
        assert!(exporter.tick());
        assert!(!exporter.is_acknowledged());
    }
}
