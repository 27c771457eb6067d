//! Resistor Label Generator
//!
//! Renders a label image for every value in the resistor catalog and
//! compiles them into a printable PDF sheet for a 3D printed storage drawer.
//!
//! ## Pipeline
//!
//! - **Layout**: label pixel size and sheet grid derived from the settings
//! - **Labels**: one PNG per value in `labels/`
//! - **Sheet**: `labels.pdf`, six labels per row, paginated
//!
//! ## Configuration
//!
//! Environment variables:
//! - `LABELS_FONT_PATH`: TrueType font (default: Arial.ttf)
//! - `LABELS_OUTPUT_DIR`: label folder (default: labels)
//! - `LABELS_PDF_PATH`: sheet output (default: labels.pdf)
//! - `RUST_LOG`: Log level (default: info)
//! - `LOG_FORMAT`: `json` for JSON logs

use anyhow::{Context, Result};
use resistor_labels::batch::generate_labels;
use resistor_labels::config::Settings;
use resistor_labels::label::LabelRenderer;
use resistor_labels::sheet::SheetAssembler;
use resistor_labels::telemetry;
use std::path::PathBuf;
use tracing::{info, warn};

fn main() -> Result<()> {
    telemetry::init_logging();

    let settings = Settings::from_env();
    settings.validate().context("Invalid label settings")?;

    info!(
        "Configuration: font={}, output_dir={}, pdf={}, values={}",
        settings.font_path.display(),
        settings.output_dir.display(),
        settings.pdf_path.display(),
        settings.resistor_values.len()
    );

    let renderer = LabelRenderer::new(&settings);
    let sheet = SheetAssembler::new(*renderer.layout());
    sheet.validate().context("Invalid sheet layout")?;

    let report = generate_labels(&renderer, &settings.resistor_values, &settings.output_dir)?;
    telemetry::record_batch_telemetry(&report);
    info!("Labels generated in '{}' folder.", settings.output_dir.display());

    let images: Vec<PathBuf> = report.written().map(|path| path.to_path_buf()).collect();
    if images.is_empty() {
        warn!("No labels to place, skipping PDF sheet");
        return Ok(());
    }

    let pages = sheet.assemble(&images, &settings.pdf_path)?;
    info!(
        "PDF sheet written: path={}, pages={}",
        settings.pdf_path.display(),
        pages
    );
    Ok(())
}
