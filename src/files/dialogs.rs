//! Native save dialog integration using the rfd crate

use crate::export::options::ExportFormat;
use rfd::FileDialog;
use std::path::{Path, PathBuf};

/// Whether a native dialog can be shown in this session.
///
/// On Linux and the BSDs the dialog needs an X11 or Wayland display.
pub fn dialog_available() -> bool {
    if cfg!(any(
        target_os = "linux",
        target_os = "freebsd",
        target_os = "openbsd",
        target_os = "netbsd"
    )) {
        std::env::var_os("DISPLAY").is_some() || std::env::var_os("WAYLAND_DISPLAY").is_some()
    } else {
        true
    }
}

/// Opens a native save dialog for an exported artifact.
///
/// The dialog filters on the format's extension and suggests `file_name`.
/// Returns `Some(PathBuf)` if a location was selected, `None` if cancelled.
pub fn save_export_dialog(
    format: ExportFormat,
    initial_dir: Option<&Path>,
    file_name: &str,
) -> Option<PathBuf> {
    let mut dialog = FileDialog::new()
        .set_title(format.title())
        .add_filter(format.filter_name(), &[format.extension()])
        .add_filter("All Files", &["*"])
        .set_file_name(file_name);

    if let Some(dir) = initial_dir {
        dialog = dialog.set_directory(dir);
    }

    dialog.save_file()
}
