//! Error types for label rendering and sheet assembly.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabelError {
    #[error("Could not load font '{}': {source}", path.display())]
    FontLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Font file '{}' contains no usable font face", path.display())]
    FontEmpty { path: PathBuf },

    #[error("Font produced no glyphs for value {value}")]
    TextLayout { value: u32 },

    #[error("Value {value} cannot be expressed with {bands} color bands")]
    NotRepresentable { value: u32, bands: u8 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl LabelError {
    /// True for the failures that skip a single label instead of aborting the batch.
    pub fn is_font_failure(&self) -> bool {
        matches!(
            self,
            LabelError::FontLoad { .. } | LabelError::FontEmpty { .. } | LabelError::TextLayout { .. }
        )
    }
}
