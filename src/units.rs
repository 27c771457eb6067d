//! Millimeter conversions and the layout derived from [`Settings`].

use crate::config::{Settings, CELL_FILL, MM_PER_INCH, MM_TO_PT, SHEET_MARGIN_PT};

/// Millimeters to whole pixels at `dpi`, truncating.
pub fn mm_to_px(mm: f32, dpi: u32) -> u32 {
    (mm * dpi as f32 / MM_PER_INCH) as u32
}

/// Millimeters to PDF points.
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * MM_TO_PT
}

/// Layout constants computed once per run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub label_width_px: u32,
    pub label_height_px: u32,
    pub font_size_px: u32,
    pub text_band_px: f32,
    pub gap_px: f32,

    pub page_width_pt: f32,
    pub page_height_pt: f32,
    pub cell_width_pt: f32,
    pub cell_height_pt: f32,
    pub image_width_pt: f32,
    pub image_height_pt: f32,
    pub margin_pt: f32,
    pub columns: u32,
}

impl Layout {
    pub fn from_settings(settings: &Settings) -> Self {
        let label_width_px = mm_to_px(settings.label_width_mm, settings.dpi);
        let label_height_px = mm_to_px(settings.label_height_mm, settings.dpi);
        let height = label_height_px as f32;

        let (page_width_pt, page_height_pt) = settings.page_size.dimensions_pt();
        let cell_width_pt = mm_to_pt(settings.drawer_width_mm) / settings.num_columns as f32;
        let cell_height_pt = mm_to_pt(settings.label_height_mm);

        Self {
            label_width_px,
            label_height_px,
            font_size_px: (height * settings.font_size_percent / 100.0) as u32,
            text_band_px: height * settings.text_area_height_percent / 100.0,
            gap_px: height * settings.gap_percent / 100.0,
            page_width_pt,
            page_height_pt,
            cell_width_pt,
            cell_height_pt,
            image_width_pt: cell_width_pt * CELL_FILL,
            image_height_pt: cell_height_pt * CELL_FILL,
            margin_pt: SHEET_MARGIN_PT,
            columns: settings.num_columns,
        }
    }

    /// Number of grid rows that fit between the top and bottom margins.
    pub fn rows_per_page(&self) -> u32 {
        let usable = self.page_height_pt - 2.0 * self.margin_pt;
        if usable <= 0.0 {
            0
        } else {
            (usable / self.cell_height_pt).floor() as u32
        }
    }

    pub fn labels_per_page(&self) -> u32 {
        self.rows_per_page().saturating_mul(self.columns)
    }

    /// Right edge of the grid, in points from the left page edge.
    pub fn grid_right_pt(&self) -> f32 {
        self.margin_pt + self.columns as f32 * self.cell_width_pt
    }
}
