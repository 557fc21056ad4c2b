//! docexport - Main Entry Point
//!
//! Command-line front end for the export engine.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use docexport::config::{load_config, save_config_silent, Settings};
use docexport::export::{DeliveryOutcome, DialogSink, DirectorySink, Exporter, SaveSink};
use docexport::{ExportFormat, Result};
use log::{debug, error, info};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Application name constant.
const APP_NAME: &str = "docexport";

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    debug!("Starting {}", APP_NAME);

    let cli = Cli::parse();
    let mut settings = load_config();

    let result = match cli.command {
        Commands::Copy { file, no_wait } => run_copy(&settings, file.as_deref(), no_wait),
        Commands::Export {
            file,
            format,
            name,
            out_dir,
            open,
        } => {
            let request = ExportRequest {
                file,
                format,
                name,
                out_dir,
                open,
            };
            run_export(&mut settings, request)
        }
        Commands::Formats => {
            print_formats();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Read the document from a file, or from stdin when no file is given.
fn read_document(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn run_copy(settings: &Settings, file: Option<&Path>, no_wait: bool) -> Result<()> {
    let document = read_document(file)?;
    let mut exporter = Exporter::from_settings(settings, DialogSink::default());

    exporter.copy_to_clipboard(&document)?;
    println!("Copied!");

    if !no_wait {
        while let Some(remaining) = exporter.copier().time_until_reset() {
            std::thread::sleep(remaining);
            exporter.tick();
        }
        debug!("Acknowledgement window elapsed");
    }
    Ok(())
}

struct ExportRequest {
    file: Option<PathBuf>,
    format: Option<String>,
    name: Option<String>,
    out_dir: Option<PathBuf>,
    open: bool,
}

fn run_export(settings: &mut Settings, request: ExportRequest) -> Result<()> {
    let format = match request.format.as_deref() {
        Some(name) => name.parse::<ExportFormat>()?,
        None => settings.last_format,
    };
    let document = read_document(request.file.as_deref())?;
    let base = request
        .name
        .or_else(|| {
            request
                .file
                .as_ref()
                .and_then(|p| p.file_stem())
                .and_then(|s| s.to_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| settings.default_filename.clone());

    let outcome = match request.out_dir {
        Some(dir) => export_with(settings, DirectorySink::new(dir), &document, format, &base, request.open)?,
        None => {
            let sink = DialogSink::new(settings.last_export_directory.clone());
            export_with(settings, sink, &document, format, &base, request.open)?
        }
    };

    match outcome {
        DeliveryOutcome::Saved(path) => {
            println!("Exported to {}", path.display());
            settings.remember_export(format, path.parent().map(Path::to_path_buf));
            save_config_silent(settings);
        }
        DeliveryOutcome::Cancelled => println!("Export cancelled"),
    }
    Ok(())
}

fn export_with<S: SaveSink>(
    settings: &Settings,
    sink: S,
    document: &str,
    format: ExportFormat,
    base: &str,
    open: bool,
) -> Result<DeliveryOutcome> {
    let exporter = Exporter::from_settings(settings, sink)
        .with_open_after_export(open || settings.open_after_export);
    info!("Exporting {} as {}", base, format.mime_type());
    exporter.export_document(document, format, base)
}

fn print_formats() {
    for format in ExportFormat::all() {
        println!(
            "{:<6} {:<5} {:<16} {}",
            format.label(),
            format.extension(),
            format.mime_type(),
            format.title()
        );
    }
}
