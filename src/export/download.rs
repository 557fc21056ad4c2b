//! Artifact delivery through transient download handles.
//!
//! Every delivery stages the payload in a temporary file (the download
//! handle), hands it to a [`SaveSink`], and drops the handle before
//! returning. The handle deletes its staged file in `Drop`, so it is released
//! on success, cancellation, error, and panic unwinding alike.

use super::encode::EncodedArtifact;
use super::options::ExportFormat;
use crate::error::{Error, Result};
use crate::files::dialogs::{dialog_available, save_export_dialog};
use crate::files::filename::build_filename;
use log::{debug, info, warn};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::NamedTempFile;

// ─────────────────────────────────────────────────────────────────────────────
// Download Handle
// ─────────────────────────────────────────────────────────────────────────────

/// Counts a handle as live for as long as it exists.
#[derive(Debug)]
struct LiveGuard(Arc<AtomicUsize>);

impl LiveGuard {
    fn acquire(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A revocable reference to a staged payload.
///
/// Dropping the handle deletes the staged file.
#[derive(Debug)]
pub struct DownloadHandle {
    file: NamedTempFile,
    format: ExportFormat,
    len: u64,
    _live: LiveGuard,
}

impl DownloadHandle {
    fn stage(artifact: &EncodedArtifact, live: &Arc<AtomicUsize>) -> io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("docexport-")
            .suffix(&format!(".{}", artifact.extension()))
            .tempfile()?;
        file.write_all(&artifact.payload)?;
        file.flush()?;

        debug!(
            "Staged {} bytes of {} at {}",
            artifact.payload.len(),
            artifact.mime_type(),
            file.path().display()
        );

        Ok(Self {
            file,
            format: artifact.format,
            len: artifact.payload.len() as u64,
            _live: LiveGuard::acquire(live),
        })
    }

    /// Location of the staged payload.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Payload size in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Copy the staged payload to its final destination.
    pub fn write_to(&self, destination: &Path) -> Result<u64> {
        fs::copy(self.file.path(), destination).map_err(|e| persist_error(destination, e))
    }
}

impl Drop for DownloadHandle {
    fn drop(&mut self) {
        debug!("Releasing download handle {}", self.file.path().display());
    }
}

/// Permission problems mean the save mechanism is unavailable; anything else
/// is an ordinary write failure.
fn persist_error(path: &Path, err: io::Error) -> Error {
    if err.kind() == io::ErrorKind::PermissionDenied {
        Error::DeliveryUnavailable {
            reason: format!("cannot write to '{}'", path.display()),
            source: Some(err),
        }
    } else {
        Error::FileWrite {
            path: path.to_path_buf(),
            source: err,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Save Sinks
// ─────────────────────────────────────────────────────────────────────────────

/// Result of a delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The artifact was written to this path
    Saved(PathBuf),
    /// The user dismissed the save prompt
    Cancelled,
}

/// The platform save action.
pub trait SaveSink {
    /// Save the staged payload under `file_name`.
    fn save(&self, handle: &DownloadHandle, file_name: &str) -> Result<DeliveryOutcome>;
}

/// Asks the user where to save through the native save dialog.
#[derive(Debug, Clone, Default)]
pub struct DialogSink {
    pub initial_dir: Option<PathBuf>,
}

impl DialogSink {
    pub fn new(initial_dir: Option<PathBuf>) -> Self {
        Self { initial_dir }
    }
}

impl SaveSink for DialogSink {
    fn save(&self, handle: &DownloadHandle, file_name: &str) -> Result<DeliveryOutcome> {
        if !dialog_available() {
            return Err(Error::delivery_unavailable(
                "no display available for the save dialog",
            ));
        }

        match save_export_dialog(handle.format(), self.initial_dir.as_deref(), file_name) {
            Some(path) => {
                handle.write_to(&path)?;
                Ok(DeliveryOutcome::Saved(path))
            }
            None => Ok(DeliveryOutcome::Cancelled),
        }
    }
}

/// Saves straight into a fixed directory without prompting.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SaveSink for DirectorySink {
    fn save(&self, handle: &DownloadHandle, file_name: &str) -> Result<DeliveryOutcome> {
        if !self.dir.is_dir() {
            return Err(Error::delivery_unavailable(format!(
                "target directory '{}' does not exist",
                self.dir.display()
            )));
        }

        let path = self.dir.join(file_name);
        handle.write_to(&path)?;
        Ok(DeliveryOutcome::Saved(path))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Download Manager
// ─────────────────────────────────────────────────────────────────────────────

/// Turns encoded artifacts into saved files.
#[derive(Debug)]
pub struct DownloadManager<S> {
    sink: S,
    live: Arc<AtomicUsize>,
}

impl<S: SaveSink> DownloadManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Number of download handles currently alive.
    pub fn live_handles(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Deliver `artifact` as `{base_filename}.{extension}`.
    ///
    /// The download handle is acquired first and always released before this
    /// returns, whatever the outcome.
    pub fn deliver(&self, artifact: EncodedArtifact, base_filename: &str) -> Result<DeliveryOutcome> {
        let handle = DownloadHandle::stage(&artifact, &self.live).map_err(|e| {
            Error::DeliveryUnavailable {
                reason: "cannot stage the download".to_string(),
                source: Some(e),
            }
        })?;
        drop(artifact);

        let result = build_filename(base_filename, handle.format().extension())
            .and_then(|file_name| self.sink.save(&handle, &file_name));
        drop(handle);

        match &result {
            Ok(DeliveryOutcome::Saved(path)) => info!("Exported to {}", path.display()),
            Ok(DeliveryOutcome::Cancelled) => info!("Export cancelled"),
            Err(e) => warn!("Export failed: {}", e),
        }
        result
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::encode::encode;
    use crate::export::options::PageSetup;
    use std::cell::RefCell;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use tempfile::TempDir;

    fn text_artifact(body: &str) -> EncodedArtifact {
        encode(body, ExportFormat::PlainText, &PageSetup::default()).unwrap()
    }

    /// Records what it saw while the handle was alive.
    #[derive(Default)]
    struct InspectingSink {
        seen: RefCell<Vec<(String, &'static str, Vec<u8>, PathBuf)>>,
    }

    impl SaveSink for InspectingSink {
        fn save(&self, handle: &DownloadHandle, file_name: &str) -> Result<DeliveryOutcome> {
            let bytes = fs::read(handle.path())?;
            self.seen.borrow_mut().push((
                file_name.to_string(),
                handle.mime_type(),
                bytes,
                handle.path().to_path_buf(),
            ));
            Ok(DeliveryOutcome::Cancelled)
        }
    }

    struct FailingSink;

    impl SaveSink for FailingSink {
        fn save(&self, _handle: &DownloadHandle, _file_name: &str) -> Result<DeliveryOutcome> {
            Err(Error::delivery_unavailable("sandboxed"))
        }
    }

    struct PanickingSink;

    impl SaveSink for PanickingSink {
        fn save(&self, _handle: &DownloadHandle, _file_name: &str) -> Result<DeliveryOutcome> {
            panic!("save prompt crashed");
        }
    }

    #[test]
    fn test_directory_sink_saves_file() {
        let dir = TempDir::new().unwrap();
        let manager = DownloadManager::new(DirectorySink::new(dir.path()));

        let outcome = manager.deliver(text_artifact("Hello\nWorld"), "notes").unwrap();

        let expected = dir.path().join("notes.txt");
        assert_eq!(outcome, DeliveryOutcome::Saved(expected.clone()));
        assert_eq!(fs::read_to_string(expected).unwrap(), "Hello\nWorld");
        assert_eq!(manager.live_handles(), 0);
    }

    #[test]
    fn test_handle_exposes_payload_and_is_released() {
        let manager = DownloadManager::new(InspectingSink::default());
        let outcome = manager.deliver(text_artifact("payload"), "doc").unwrap();
        assert_eq!(outcome, DeliveryOutcome::Cancelled);

        let seen = manager.sink().seen.borrow();
        let (name, mime, bytes, staged) = &seen[0];
        assert_eq!(name, "doc.txt");
        assert_eq!(*mime, "text/plain");
        assert_eq!(bytes, b"payload");
        assert!(!staged.exists(), "staged file must be removed");
        assert_eq!(manager.live_handles(), 0);
    }

    #[test]
    fn test_invalid_filename_releases_handle() {
        let manager = DownloadManager::new(InspectingSink::default());
        let err = manager.deliver(text_artifact("x"), "..").unwrap_err();

        assert!(matches!(err, Error::InvalidFilename { .. }));
        assert!(manager.sink().seen.borrow().is_empty());
        assert_eq!(manager.live_handles(), 0);
    }

    #[test]
    fn test_unavailable_sink_surfaces_error_and_releases() {
        let manager = DownloadManager::new(FailingSink);
        let err = manager.deliver(text_artifact("x"), "doc").unwrap_err();

        assert!(matches!(err, Error::DeliveryUnavailable { .. }));
        assert_eq!(manager.live_handles(), 0);
    }

    #[test]
    fn test_missing_directory_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let manager = DownloadManager::new(DirectorySink::new(dir.path().join("missing")));
        let err = manager.deliver(text_artifact("x"), "doc").unwrap_err();

        assert!(matches!(err, Error::DeliveryUnavailable { .. }));
        assert_eq!(manager.live_handles(), 0);
    }

    #[test]
    fn test_panicking_sink_still_releases_handle() {
        let manager = DownloadManager::new(PanickingSink);
        let result = catch_unwind(AssertUnwindSafe(|| {
            manager.deliver(text_artifact("x"), "doc")
        }));

        assert!(result.is_err());
        assert_eq!(manager.live_handles(), 0);
    }

    #[test]
    fn test_no_handles_leak_across_mixed_sequence() {
        let dir = TempDir::new().unwrap();
        let ok = DownloadManager::new(DirectorySink::new(dir.path()));
        let failing = DownloadManager::new(FailingSink);

        for i in 0..10 {
            let base = if i % 3 == 0 { "." } else { "doc" };
            let _ = ok.deliver(text_artifact("body"), base);
            assert_eq!(ok.live_handles(), 0);
            let _ = failing.deliver(text_artifact("body"), base);
            assert_eq!(failing.live_handles(), 0);
        }
    }

    #[test]
    fn test_sanitized_name_used_for_saving() {
        let dir = TempDir::new().unwrap();
        let manager = DownloadManager::new(DirectorySink::new(dir.path()));

        let outcome = manager.deliver(text_artifact("x"), "../escape").unwrap();
        assert_eq!(outcome, DeliveryOutcome::Saved(dir.path().join("_escape.txt")));
    }
}
