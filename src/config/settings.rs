//! User settings and preferences for docexport
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! export options, with serde support for JSON persistence.

use crate::export::options::{ExportFormat, PageSetup};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Base filename used when the caller does not supply one.
pub const DEFAULT_FILENAME: &str = "document";

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User-configurable export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How long "copied" feedback stays visible, in milliseconds
    pub ack_window_ms: u64,

    /// Page geometry for PDF export
    pub page: PageSetup,

    /// Base filename suggested for exports
    pub default_filename: String,

    /// Last used export format
    pub last_format: ExportFormat,

    /// Last export directory (for remembering user preference)
    pub last_export_directory: Option<PathBuf>,

    /// Whether to open the exported file after export
    pub open_after_export: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ack_window_ms: 2000,
            page: PageSetup::default(),
            default_filename: DEFAULT_FILENAME.to_string(),
            last_format: ExportFormat::default(),
            last_export_directory: None,
            open_after_export: false,
        }
    }
}

impl Settings {
    /// Minimum acknowledgement window
    pub const MIN_ACK_WINDOW_MS: u64 = 100;
    /// Maximum acknowledgement window
    pub const MAX_ACK_WINDOW_MS: u64 = 60_000;
    /// Minimum font size
    pub const MIN_FONT_SIZE: f32 = 4.0;
    /// Maximum font size
    pub const MAX_FONT_SIZE: f32 = 72.0;
    /// Smallest page side in millimetres
    pub const MIN_PAGE_SIDE: f32 = 50.0;
    /// Largest page side in millimetres (A0 long edge)
    pub const MAX_PAGE_SIDE: f32 = 1189.0;

    /// The acknowledgement window as a duration.
    pub fn ack_window(&self) -> Duration {
        Duration::from_millis(self.ack_window_ms)
    }

    /// Record a successful export.
    pub fn remember_export(&mut self, format: ExportFormat, directory: Option<PathBuf>) {
        self.last_format = format;
        if directory.is_some() {
            self.last_export_directory = directory;
        }
    }

    /// Validate and sanitize settings after loading.
    ///
    /// This ensures all values are within acceptable ranges.
    pub fn sanitize(&mut self) {
        // Clamp acknowledgement window
        self.ack_window_ms = self
            .ack_window_ms
            .clamp(Self::MIN_ACK_WINDOW_MS, Self::MAX_ACK_WINDOW_MS);

        let defaults = PageSetup::default();
        let page = &mut self.page;

        // Non-finite values fall back to the defaults
        if !page.width_mm.is_finite() {
            page.width_mm = defaults.width_mm;
        }
        if !page.height_mm.is_finite() {
            page.height_mm = defaults.height_mm;
        }
        if !page.margin_mm.is_finite() {
            page.margin_mm = defaults.margin_mm;
        }
        if !page.font_size_pt.is_finite() {
            page.font_size_pt = defaults.font_size_pt;
        }
        if !page.line_height_factor.is_finite() {
            page.line_height_factor = defaults.line_height_factor;
        }

        // Clamp page geometry
        page.width_mm = page.width_mm.clamp(Self::MIN_PAGE_SIDE, Self::MAX_PAGE_SIDE);
        page.height_mm = page.height_mm.clamp(Self::MIN_PAGE_SIDE, Self::MAX_PAGE_SIDE);
        page.font_size_pt = page.font_size_pt.clamp(Self::MIN_FONT_SIZE, Self::MAX_FONT_SIZE);
        page.line_height_factor = page.line_height_factor.clamp(1.0, 3.0);

        // Margins must leave a usable area on both axes
        let max_margin = page.width_mm.min(page.height_mm) / 4.0;
        page.margin_mm = page.margin_mm.clamp(0.0, max_margin);

        // Ensure there is always a default filename
        if self.default_filename.trim().is_empty() {
            self.default_filename = DEFAULT_FILENAME.to_string();
        }
    }

    /// Parse settings from JSON and sanitize the result.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
