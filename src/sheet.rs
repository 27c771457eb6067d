//! Drawer-sized PDF sheet assembly with TRUE vector cut lines via svg2pdf.
//!
//! Each page is composed as an SVG in point units (labels embedded as raster
//! images), converted to a PDF XObject by svg2pdf and placed full-page into a
//! pdf-writer document.

use crate::error::LabelError;
use crate::label::escape_xml;
use crate::units::Layout;
use anyhow::{anyhow, Context, Result};
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CUT_LINE_COLOR: &str = "#808080";
const CUT_LINE_WIDTH_PT: f32 = 0.5;

/// Where one label lands on the sheet. Coordinates are in points from the
/// top-left page corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub index: usize,
    pub page: usize,
    pub row: u32,
    pub column: u32,
    pub cell_x: f32,
    pub cell_y: f32,
    pub image_x: f32,
    pub image_y: f32,
}

/// Lays label images out in a fixed-column grid and writes the PDF.
pub struct SheetAssembler {
    layout: Layout,
}

impl SheetAssembler {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// Rejects grids that cannot fit on the page.
    pub fn validate(&self) -> Result<(), LabelError> {
        if self.layout.rows_per_page() == 0 {
            return Err(LabelError::InvalidConfig(format!(
                "page height {:.1}pt fits no {:.1}pt label rows",
                self.layout.page_height_pt, self.layout.cell_height_pt
            )));
        }
        if self.layout.grid_right_pt() > self.layout.page_width_pt {
            return Err(LabelError::InvalidConfig(format!(
                "{} columns of {:.1}pt do not fit a {:.1}pt wide page",
                self.layout.columns, self.layout.cell_width_pt, self.layout.page_width_pt
            )));
        }
        Ok(())
    }

    /// Splits `count` labels into pages of row-major placements.
    pub fn paginate(&self, count: usize) -> Result<Vec<Vec<Placement>>, LabelError> {
        self.validate()?;

        let per_page = self.layout.labels_per_page() as usize;
        let columns = self.layout.columns as usize;
        let inset_x = (self.layout.cell_width_pt - self.layout.image_width_pt) / 2.0;
        let inset_y = (self.layout.cell_height_pt - self.layout.image_height_pt) / 2.0;

        let mut pages: Vec<Vec<Placement>> = Vec::new();
        for index in 0..count {
            let page = index / per_page;
            let slot = index % per_page;
            let row = (slot / columns) as u32;
            let column = (slot % columns) as u32;
            let cell_x = self.layout.margin_pt + column as f32 * self.layout.cell_width_pt;
            let cell_y = self.layout.margin_pt + row as f32 * self.layout.cell_height_pt;

            if slot == 0 {
                pages.push(Vec::new());
            }
            if let Some(current) = pages.last_mut() {
                current.push(Placement {
                    index,
                    page,
                    row,
                    column,
                    cell_x,
                    cell_y,
                    image_x: cell_x + inset_x,
                    image_y: cell_y + inset_y,
                });
            }
        }

        Ok(pages)
    }

    /// Builds the SVG for one page. `images` is indexed by [`Placement::index`].
    pub fn page_svg(&self, placements: &[Placement], images: &[PathBuf]) -> Result<String> {
        let width = self.layout.page_width_pt;
        let height = self.layout.page_height_pt;

        let mut svg = String::new();
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = width,
            h = height
        ));

        for placement in placements {
            let image = images
                .get(placement.index)
                .ok_or_else(|| anyhow!("No image for label slot {}", placement.index))?;

            svg.push_str(&format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
                placement.cell_x,
                placement.cell_y,
                self.layout.cell_width_pt,
                self.layout.cell_height_pt,
                CUT_LINE_COLOR,
                CUT_LINE_WIDTH_PT
            ));
            svg.push_str(&format!(
                r#"<image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="none" xlink:href="{}"/>"#,
                placement.image_x,
                placement.image_y,
                self.layout.image_width_pt,
                self.layout.image_height_pt,
                escape_xml(&image.to_string_lossy())
            ));
        }

        svg.push_str("</svg>");
        Ok(svg)
    }

    /// Lays out `images` in order and writes the sheet to `output_path`.
    ///
    /// Returns the number of pages written.
    ///
    /// # Errors
    ///
    /// - Grid does not fit the page, or `images` is empty
    /// - An image cannot be found or decoded
    /// - File I/O errors
    pub fn assemble(&self, images: &[PathBuf], output_path: &Path) -> Result<usize> {
        if images.is_empty() {
            anyhow::bail!("No label images to place on the sheet");
        }
        info!(
            "Assembling sheet: labels={}, output={}",
            images.len(),
            output_path.display()
        );

        let images = images
            .iter()
            .map(|path| {
                fs::canonicalize(path)
                    .with_context(|| format!("Label image not found: {}", path.display()))
            })
            .collect::<Result<Vec<_>>>()?;
        let pages = self.paginate(images.len())?;

        let width = self.layout.page_width_pt;
        let height = self.layout.page_height_pt;
        let svg_name = Name(b"S1");

        let mut alloc = Ref::new(1);
        let catalog_id = alloc.bump();
        let page_tree_id = alloc.bump();
        let mut pdf = Pdf::new();
        let mut page_ids = Vec::with_capacity(pages.len());

        for (page_index, placements) in pages.iter().enumerate() {
            let svg = self.page_svg(placements, &images)?;
            let tree = usvg::Tree::from_str(&svg, &usvg::Options::default())
                .with_context(|| format!("Failed to build sheet page {}", page_index + 1))?;

            let (chunk, svg_id) = svg2pdf::to_chunk(&tree, svg2pdf::ConversionOptions::default());
            let mut map = HashMap::new();
            let chunk = chunk.renumber(|old| *map.entry(old).or_insert_with(|| alloc.bump()));
            let svg_id = map
                .get(&svg_id)
                .copied()
                .ok_or_else(|| anyhow!("svg2pdf chunk is missing its XObject"))?;
            pdf.extend(&chunk);

            let page_id = alloc.bump();
            let content_id = alloc.bump();
            let mut page = pdf.page(page_id);
            page.media_box(Rect::new(0.0, 0.0, width, height));
            page.parent(page_tree_id);
            page.contents(content_id);
            page.resources().x_objects().pair(svg_name, svg_id);
            page.finish();

            let mut content = Content::new();
            content.save_state();
            content.transform([width, 0.0, 0.0, height, 0.0, 0.0]);
            content.x_object(svg_name);
            content.restore_state();
            pdf.stream(content_id, &content.finish());

            debug!(
                "Sheet page composed: page={}, labels={}",
                page_index + 1,
                placements.len()
            );
            page_ids.push(page_id);
        }

        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id)
            .kids(page_ids.iter().copied())
            .count(page_ids.len() as i32);

        let pdf_data = pdf.finish();
        fs::write(output_path, &pdf_data)
            .with_context(|| format!("Failed to write PDF to {}", output_path.display()))?;

        info!(
            "Sheet export complete: pages={}, bytes={}",
            page_ids.len(),
            pdf_data.len()
        );
        Ok(page_ids.len())
    }
}
