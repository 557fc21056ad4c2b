//! docexport - copy documents to the clipboard and export them as
//! plain text, Markdown, or paginated PDF.

pub mod config;
pub mod error;
pub mod export;
pub mod files;
pub mod string_utils;

pub use error::{Error, Result};
pub use export::{DeliveryOutcome, EncodedArtifact, ExportFormat, Exporter, PageSetup};
