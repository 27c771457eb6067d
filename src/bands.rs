//! Resistor color-code bands.

use crate::config::BAR_COLORS;
use crate::error::LabelError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandColor {
    Black,
    Brown,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Violet,
    Gray,
    White,
    Gold,
    Silver,
}

impl BandColor {
    const DIGITS: [BandColor; 10] = [
        BandColor::Black,
        BandColor::Brown,
        BandColor::Red,
        BandColor::Orange,
        BandColor::Yellow,
        BandColor::Green,
        BandColor::Blue,
        BandColor::Violet,
        BandColor::Gray,
        BandColor::White,
    ];

    pub fn from_digit(digit: u32) -> Option<Self> {
        Self::DIGITS.get(digit as usize).copied()
    }

    /// Multiplier band for `10^exponent`.
    pub fn from_exponent(exponent: i32) -> Option<Self> {
        match exponent {
            -2 => Some(BandColor::Silver),
            -1 => Some(BandColor::Gold),
            0..=9 => Self::from_digit(exponent as u32),
            _ => None,
        }
    }

    /// Position in [`BAR_COLORS`].
    fn table_index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        BAR_COLORS[self.table_index()].0
    }

    /// Fill color as `#RRGGBB`.
    pub fn hex(self) -> &'static str {
        BAR_COLORS[self.table_index()].1
    }
}

impl fmt::Display for BandColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Tolerance band: 1% brown on precision (5-band) parts, 5% gold otherwise.
fn tolerance_band(bands: u8) -> BandColor {
    if bands == 5 {
        BandColor::Brown
    } else {
        BandColor::Gold
    }
}

/// Computes the color bands for `value` ohms: significant digits, multiplier
/// and tolerance. A zero-ohm part is a single black band.
pub fn color_bands(value: u32, bands: u8) -> Result<Vec<BandColor>, LabelError> {
    if !matches!(bands, 4 | 5) {
        return Err(LabelError::InvalidConfig(format!(
            "resistor bands must be 4 or 5, got {}",
            bands
        )));
    }
    if value == 0 {
        return Ok(vec![BandColor::Black]);
    }

    let significant = (bands - 2) as usize;
    let text = value.to_string();
    let trimmed = text.trim_end_matches('0');
    if trimmed.len() > significant {
        return Err(LabelError::NotRepresentable { value, bands });
    }

    let exponent = text.len() as i32 - significant as i32;
    let multiplier =
        BandColor::from_exponent(exponent).ok_or(LabelError::NotRepresentable { value, bands })?;

    let mut colors: Vec<BandColor> = trimmed
        .chars()
        .chain(std::iter::repeat('0'))
        .take(significant)
        .filter_map(|c| c.to_digit(10).and_then(BandColor::from_digit))
        .collect();
    colors.push(multiplier);
    colors.push(tolerance_band(bands));

    Ok(colors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use BandColor::*;

    #[test]
    fn test_five_band_values() {
        assert_eq!(color_bands(10, 5).unwrap(), vec![Brown, Black, Black, Gold, Brown]);
        assert_eq!(color_bands(100, 5).unwrap(), vec![Brown, Black, Black, Black, Brown]);
        assert_eq!(color_bands(4700, 5).unwrap(), vec![Yellow, Violet, Black, Brown, Brown]);
        assert_eq!(color_bands(1_000_000, 5).unwrap(), vec![Brown, Black, Black, Yellow, Brown]);
    }

    #[test]
    fn test_four_band_values() {
        assert_eq!(color_bands(100, 4).unwrap(), vec![Brown, Black, Brown, Gold]);
        assert_eq!(color_bands(22, 4).unwrap(), vec![Red, Red, Black, Gold]);
        assert_eq!(color_bands(5100, 4).unwrap(), vec![Green, Brown, Red, Gold]);
    }

    #[test]
    fn test_sub_ten_ohm_multipliers() {
        assert_eq!(color_bands(1, 5).unwrap(), vec![Brown, Black, Black, Silver, Brown]);
        assert_eq!(color_bands(4, 4).unwrap(), vec![Yellow, Black, Gold, Gold]);
    }

    #[test]
    fn test_zero_ohm() {
        assert_eq!(color_bands(0, 5).unwrap(), vec![Black]);
    }

    #[test]
    fn test_too_many_significant_digits() {
        let err = color_bands(1234, 5).unwrap_err();
        assert!(matches!(err, LabelError::NotRepresentable { value: 1234, bands: 5 }));
        assert!(color_bands(470, 4).is_ok());
        assert!(color_bands(471, 4).is_err());
    }

    #[test]
    fn test_whole_catalog_is_representable() {
        for value in crate::config::RESISTOR_VALUES {
            assert!(color_bands(value, 5).is_ok(), "5-band {}", value);
        }
    }

    #[test]
    fn test_palette_lookup() {
        assert_eq!(Black.hex(), "#1D1616");
        assert_eq!(Gold.name(), "gold");
        assert_eq!(Silver.hex(), "#C0C0C0");
        assert_eq!(Violet.to_string(), "violet");
    }
}
