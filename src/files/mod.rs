//! File operations module for docexport
//!
//! This module provides the native save dialog and the construction of
//! filesystem-safe download file names.

pub mod dialogs;
pub mod filename;
