//! Resistor Label Sheet Library
//!
//! Renders one PNG label per resistor value and assembles the labels into a
//! PDF sheet sized for a storage drawer.
//!
//! ## Module Overview
//!
//! - `config`: settings, value catalog and color table
//! - `units`: millimeter conversions and the derived layout
//! - `bands`: resistor color-code bands
//! - `label`: label rendering via resvg
//! - `batch`: batch driver and run report
//! - `sheet`: PDF sheet assembly via svg2pdf
//! - `telemetry`: structured logging
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use resistor_labels::{
//!     batch::generate_labels,
//!     config::Settings,
//!     label::LabelRenderer,
//!     sheet::SheetAssembler,
//! };
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = Settings {
//!         resistor_values: vec![10, 100],
//!         ..Settings::default()
//!     };
//!
//!     let renderer = LabelRenderer::new(&settings);
//!     let report = generate_labels(&renderer, &settings.resistor_values, &settings.output_dir)?;
//!
//!     let images: Vec<_> = report.written().map(|p| p.to_path_buf()).collect();
//!     if !images.is_empty() {
//!         SheetAssembler::new(*renderer.layout()).assemble(&images, &settings.pdf_path)?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod bands;
pub mod batch;
pub mod config;
pub mod error;
pub mod label;
pub mod sheet;
pub mod telemetry;
pub mod units;
