//! Label and sheet settings.
//!
//! Defaults describe a 15 x 15 mm label printed at 300 DPI and laid out six
//! across an A4 sheet for a 101.5 mm wide storage drawer.

use crate::error::LabelError;
use crate::units::Layout;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Points per millimeter.
pub const MM_TO_PT: f32 = 2.83465;

/// Millimeters per inch.
pub const MM_PER_INCH: f32 = 25.4;

/// Distance of the label grid from the left and top page edges, in points.
pub const SHEET_MARGIN_PT: f32 = 20.0;

/// Largest page edge a PDF viewer is required to support, in points.
pub const MAX_PAGE_EDGE_PT: f32 = 14_400.0;

/// Fraction of a grid cell covered by its label image.
pub const CELL_FILL: f32 = 0.9;

/// The stock resistor assortment, in ohms.
pub const RESISTOR_VALUES: [u32; 30] = [
    10, 22, 47, 100, 150, 200, 220, 270, 330, 470, 510, 680, 1000, 2200, 2700, 3300, 4700, 5100,
    6800, 10000, 20000, 47000, 51000, 68000, 100000, 220000, 300000, 470000, 680000, 1000000,
];

/// Resistor color-code palette as `(name, hex)` pairs.
pub const BAR_COLORS: [(&str, &str); 12] = [
    ("black", "#1D1616"),
    ("brown", "#A66E38"),
    ("red", "#F95454"),
    ("orange", "#FA812F"),
    ("yellow", "#FFEB00"),
    ("green", "#829460"),
    ("blue", "#1EAFED"),
    ("violet", "#B771E5"),
    ("gray", "#929AAB"),
    ("white", "#F6F1E9"),
    ("gold", "#D4AF37"),
    ("silver", "#C0C0C0"),
];

/// PDF page size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    A4,
    Letter,
    /// Width and height in points.
    Custom(f32, f32),
}

impl PageSize {
    /// Returns `(width, height)` in points.
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match *self {
            PageSize::A4 => (210.0 * 72.0 / MM_PER_INCH, 297.0 * 72.0 / MM_PER_INCH),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Custom(width, height) => (width, height),
        }
    }
}

/// Everything the pipeline needs, built once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub dpi: u32,
    pub label_width_mm: f32,
    pub label_height_mm: f32,
    pub page_size: PageSize,

    pub resistor_values: Vec<u32>,
    /// 4- or 5-band color coding.
    pub resistor_bands: u8,

    pub font_path: PathBuf,
    /// Font size as a percentage of the label height.
    pub font_size_percent: f32,

    /// Top share of the label reserved for the value text.
    pub text_area_height_percent: f32,
    pub gap_percent: f32,
    pub resistor_width_percent: f32,
    /// Share of the resistor body covered by the color bands.
    pub band_width_percent: f32,
    pub draw_resistor: bool,

    pub drawer_width_mm: f32,
    pub num_columns: u32,

    pub output_dir: PathBuf,
    pub pdf_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dpi: 300,
            label_width_mm: 15.0,
            label_height_mm: 15.0,
            page_size: PageSize::A4,
            resistor_values: RESISTOR_VALUES.to_vec(),
            resistor_bands: 5,
            font_path: PathBuf::from("Arial.ttf"),
            font_size_percent: 23.0,
            text_area_height_percent: 25.0,
            gap_percent: 3.0,
            resistor_width_percent: 80.0,
            band_width_percent: 70.0,
            draw_resistor: true,
            drawer_width_mm: 101.5,
            num_columns: 6,
            output_dir: PathBuf::from("labels"),
            pdf_path: PathBuf::from("labels.pdf"),
        }
    }
}

impl Settings {
    /// Default settings with path overrides from the environment.
    ///
    /// - `LABELS_FONT_PATH`: TrueType font file
    /// - `LABELS_OUTPUT_DIR`: folder for the PNG labels
    /// - `LABELS_PDF_PATH`: assembled sheet
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Ok(path) = std::env::var("LABELS_FONT_PATH") {
            settings.font_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("LABELS_OUTPUT_DIR") {
            settings.output_dir = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("LABELS_PDF_PATH") {
            settings.pdf_path = PathBuf::from(path);
        }
        settings
    }

    /// Rejects settings the layout math cannot work with.
    pub fn validate(&self) -> Result<(), LabelError> {
        if self.dpi == 0 {
            return Err(LabelError::InvalidConfig("dpi must be positive".into()));
        }
        if !(self.label_width_mm > 0.0 && self.label_width_mm.is_finite())
            || !(self.label_height_mm > 0.0 && self.label_height_mm.is_finite())
        {
            return Err(LabelError::InvalidConfig(format!(
                "label dimensions must be positive, got {}x{} mm",
                self.label_width_mm, self.label_height_mm
            )));
        }
        let (page_width, page_height) = self.page_size.dimensions_pt();
        let page_edge = 0.0..=MAX_PAGE_EDGE_PT;
        if page_width <= 0.0
            || page_height <= 0.0
            || !page_edge.contains(&page_width)
            || !page_edge.contains(&page_height)
        {
            return Err(LabelError::InvalidConfig(format!(
                "page dimensions must be within 0-{} pt, got {}x{} pt",
                MAX_PAGE_EDGE_PT, page_width, page_height
            )));
        }
        if !(self.drawer_width_mm > 0.0 && self.drawer_width_mm.is_finite()) {
            return Err(LabelError::InvalidConfig("drawer width must be positive".into()));
        }
        if self.num_columns == 0 {
            return Err(LabelError::InvalidConfig("column count must be positive".into()));
        }
        if !matches!(self.resistor_bands, 4 | 5) {
            return Err(LabelError::InvalidConfig(format!(
                "resistor bands must be 4 or 5, got {}",
                self.resistor_bands
            )));
        }

        let percents = [
            ("font_size_percent", self.font_size_percent),
            ("text_area_height_percent", self.text_area_height_percent),
            ("gap_percent", self.gap_percent),
            ("resistor_width_percent", self.resistor_width_percent),
            ("band_width_percent", self.band_width_percent),
        ];
        for (name, value) in percents {
            if !(0.0..=100.0).contains(&value) {
                return Err(LabelError::InvalidConfig(format!(
                    "{} must be within 0-100, got {}",
                    name, value
                )));
            }
        }
        if self.text_area_height_percent + self.gap_percent > 100.0 {
            return Err(LabelError::InvalidConfig(format!(
                "text area ({}%) and gap ({}%) exceed the label height",
                self.text_area_height_percent, self.gap_percent
            )));
        }

        let layout = Layout::from_settings(self);
        if layout.label_width_px == 0 || layout.label_height_px == 0 {
            return Err(LabelError::InvalidConfig(format!(
                "{}x{} mm at {} DPI is smaller than one pixel",
                self.label_width_mm, self.label_height_mm, self.dpi
            )));
        }
        if layout.font_size_px == 0 {
            return Err(LabelError::InvalidConfig(format!(
                "font size {}% of {}px rounds down to 0px",
                self.font_size_percent, layout.label_height_px
            )));
        }

        Ok(())
    }
}
