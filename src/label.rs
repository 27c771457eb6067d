//! Label rendering: value text (and a color-banded resistor) rasterized via resvg.

use crate::bands::{color_bands, BandColor};
use crate::config::Settings;
use crate::error::LabelError;
use crate::units::Layout;
use anyhow::{anyhow, Context, Result};
use resvg::tiny_skia::{Color, Pixmap, Transform};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use usvg::fontdb;

/// Body height as a fraction of the space below the text band.
const BODY_HEIGHT_RATIO: f32 = 0.5;

const BODY_FILL: &str = "#E6D3A3";
const LEAD_COLOR: &str = "#929AAB";

/// Result of rendering a single label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LabelOutcome {
    Written { value: u32, path: PathBuf },
    Skipped { value: u32, reason: String },
}

impl LabelOutcome {
    pub fn value(&self) -> u32 {
        match self {
            LabelOutcome::Written { value, .. } | LabelOutcome::Skipped { value, .. } => *value,
        }
    }

    pub fn written_path(&self) -> Option<&Path> {
        match self {
            LabelOutcome::Written { path, .. } => Some(path),
            LabelOutcome::Skipped { .. } => None,
        }
    }
}

/// Text printed on the label for `value` ohms.
pub fn label_text(value: u32) -> String {
    format!("{}Ω", value)
}

/// File name of the label image for `value`.
pub fn label_file_name(value: u32) -> String {
    format!("{}.png", value)
}

/// Ink box of laid-out text, in the coordinates it was measured at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

struct LoadedFont {
    fontdb: Arc<fontdb::Database>,
    family: String,
}

/// Renders resistor labels as PNG files.
pub struct LabelRenderer {
    settings: Settings,
    layout: Layout,
}

impl LabelRenderer {
    pub fn new(settings: &Settings) -> Self {
        Self {
            settings: settings.clone(),
            layout: Layout::from_settings(settings),
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Renders the label for `value` into `output_dir/<value>.png`.
    ///
    /// The output directory is created if missing. A font that cannot be
    /// loaded is logged and yields [`LabelOutcome::Skipped`] without touching
    /// the filesystem further.
    ///
    /// # Errors
    ///
    /// - Output directory cannot be created
    /// - Label SVG cannot be parsed or the PNG cannot be written
    pub fn render(&self, value: u32, output_dir: &Path) -> Result<LabelOutcome> {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

        let text = label_text(value);
        let prepared = self.load_font().and_then(|font| {
            let text_box = measure_text(&text, &font, &self.layout, value)?;
            Ok((font, text_box))
        });
        let (font, text_box) = match prepared {
            Ok(prepared) => prepared,
            Err(e) if e.is_font_failure() => return Ok(skip(value, e)),
            Err(e) => return Err(e.into()),
        };

        let bands = self.resistor_bands(value);
        let svg = self.label_svg(&text, &font.family, text_box, bands.as_deref());
        let pixmap = rasterize(&svg, &font, &self.layout)?;

        let path = output_dir.join(label_file_name(value));
        pixmap
            .save_png(&path)
            .with_context(|| format!("Failed to write label to {}", path.display()))?;

        info!("Label written: value={}, path={}", value, path.display());
        Ok(LabelOutcome::Written { value, path })
    }

    fn load_font(&self) -> Result<LoadedFont, LabelError> {
        let path = &self.settings.font_path;
        let mut db = fontdb::Database::new();
        db.load_font_file(path).map_err(|source| LabelError::FontLoad {
            path: path.clone(),
            source,
        })?;

        let family = db
            .faces()
            .find_map(|face| face.families.first().map(|(name, _)| name.clone()))
            .ok_or_else(|| LabelError::FontEmpty { path: path.clone() })?;

        debug!("Loaded font: path={}, family={}", path.display(), family);
        Ok(LoadedFont {
            fontdb: Arc::new(db),
            family,
        })
    }

    fn resistor_bands(&self, value: u32) -> Option<Vec<BandColor>> {
        if !self.settings.draw_resistor {
            return None;
        }
        match color_bands(value, self.settings.resistor_bands) {
            Ok(bands) => Some(bands),
            Err(e) => {
                warn!("Omitting resistor drawing: {}", e);
                None
            }
        }
    }

    /// Builds the label SVG with `text` placed so that `text_box` is centered
    /// horizontally and within the text band vertically.
    pub fn label_svg(
        &self,
        text: &str,
        family: &str,
        text_box: TextBox,
        bands: Option<&[BandColor]>,
    ) -> String {
        let width = self.layout.label_width_px as f32;
        let height = self.layout.label_height_px as f32;
        let text_x = (width - text_box.width) / 2.0 - text_box.x;
        let text_y = (self.layout.text_band_px - text_box.height) / 2.0 - text_box.y;

        let mut svg = String::new();
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = width,
            h = height
        ));
        svg.push_str(&format!(r#"<rect width="{}" height="{}" fill="white"/>"#, width, height));

        if let Some(bands) = bands {
            self.write_resistor(&mut svg, bands);
        }

        svg.push_str(&format!(
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" fill="black">{}</text>"#,
            text_x,
            text_y,
            escape_xml(family),
            self.layout.font_size_px,
            escape_xml(text)
        ));
        svg.push_str("</svg>");
        svg
    }

    fn write_resistor(&self, svg: &mut String, bands: &[BandColor]) {
        let width = self.layout.label_width_px as f32;
        let height = self.layout.label_height_px as f32;
        let top = self.layout.text_band_px + self.layout.gap_px;
        let bottom = height - self.layout.gap_px;
        if bottom <= top || bands.is_empty() {
            return;
        }

        let center_y = (top + bottom) / 2.0;
        let body_height = (bottom - top) * BODY_HEIGHT_RATIO;
        let body_width = width * self.settings.resistor_width_percent / 100.0;
        let body_x = (width - body_width) / 2.0;
        let body_y = center_y - body_height / 2.0;

        svg.push_str(&format!(
            r#"<line x1="0" y1="{y}" x2="{w}" y2="{y}" stroke="{c}" stroke-width="{sw}"/>"#,
            y = center_y,
            w = width,
            c = LEAD_COLOR,
            sw = body_height * 0.12
        ));
        svg.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}"/>"#,
            body_x,
            body_y,
            body_width,
            body_height,
            body_height * 0.25,
            BODY_FILL
        ));

        let span = body_width * self.settings.band_width_percent / 100.0;
        let start = body_x + (body_width - span) / 2.0;
        let slot = span / (2 * bands.len() - 1) as f32;
        for (i, band) in bands.iter().enumerate() {
            svg.push_str(&format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                start + 2.0 * i as f32 * slot,
                body_y,
                slot,
                body_height,
                band.hex()
            ));
        }
    }
}

/// Operator hint for a label skipped because of its font.
fn skip_hint(e: &LabelError) -> &'static str {
    match e {
        LabelError::FontLoad { .. } => "Ensure the file exists or update the font path.",
        LabelError::FontEmpty { .. } => "Point the font path at a TrueType or OpenType font.",
        LabelError::TextLayout { .. } => "Check that the font covers digits and the Ω sign.",
        _ => "",
    }
}

fn skip(value: u32, e: LabelError) -> LabelOutcome {
    error!("Error: {}. {}", e, skip_hint(&e));
    LabelOutcome::Skipped {
        value,
        reason: e.to_string(),
    }
}

fn parse_svg(svg: &str, font: &LoadedFont) -> Result<usvg::Tree, usvg::Error> {
    let mut options = usvg::Options::default();
    options.font_family = font.family.clone();
    options.fontdb = font.fontdb.clone();
    usvg::Tree::from_str(svg, &options)
}

/// Lays `text` out at the origin and returns its bounding box.
fn measure_text(
    text: &str,
    font: &LoadedFont,
    layout: &Layout,
    value: u32,
) -> Result<TextBox, LabelError> {
    let svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><text x="0" y="0" font-family="{f}" font-size="{s}">{t}</text></svg>"#,
        w = layout.label_width_px,
        h = layout.label_height_px,
        f = escape_xml(&font.family),
        s = layout.font_size_px,
        t = escape_xml(text)
    );

    let tree = parse_svg(&svg, font).map_err(|e| {
        debug!("Text layout parse failed: value={}, error={}", value, e);
        LabelError::TextLayout { value }
    })?;
    let bbox = tree
        .root()
        .children()
        .iter()
        .find_map(|node| match node {
            usvg::Node::Text(laid_out) => Some(laid_out.bounding_box()),
            _ => None,
        })
        .ok_or(LabelError::TextLayout { value })?;

    if bbox.width() <= 0.0 || bbox.height() <= 0.0 {
        return Err(LabelError::TextLayout { value });
    }

    Ok(TextBox {
        x: bbox.x(),
        y: bbox.y(),
        width: bbox.width(),
        height: bbox.height(),
    })
}

fn rasterize(svg: &str, font: &LoadedFont, layout: &Layout) -> Result<Pixmap> {
    let tree = parse_svg(svg, font).context("Failed to parse label SVG")?;

    let mut pixmap = Pixmap::new(layout.label_width_px, layout.label_height_px).ok_or_else(|| {
        anyhow!(
            "Invalid label dimensions: {}x{}",
            layout.label_width_px,
            layout.label_height_px
        )
    })?;
    pixmap.fill(Color::WHITE);
    resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());

    Ok(pixmap)
}

pub(crate) fn escape_xml(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
