//! CLI definitions for docexport

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docexport")]
#[command(about = "Copy documents to the clipboard or export them as text, Markdown, or PDF")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Copy a document to the clipboard
    Copy {
        /// Document to copy (reads stdin when omitted)
        file: Option<PathBuf>,
        /// Exit right after copying instead of waiting out the acknowledgement
        #[arg(long)]
        no_wait: bool,
    },

    /// Export a document as txt, md, or pdf
    Export {
        /// Document to export (reads stdin when omitted)
        file: Option<PathBuf>,
        /// Target format: txt, md, or pdf (defaults to the last used format)
        #[arg(long, short)]
        format: Option<String>,
        /// Base filename without extension
        #[arg(long, short)]
        name: Option<String>,
        /// Save into this directory instead of showing a save dialog
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Open the exported file afterwards
        #[arg(long)]
        open: bool,
    },

    /// List supported export formats
    Formats,
}
