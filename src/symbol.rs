//! 2D barcode symbols rendered as bilevel rasters.

use datamatrix::{DataMatrix, SymbolList};
use image::{Rgb, RgbImage};
use log::debug;
use qrcode::{Color, EcLevel, QrCode};

use crate::{
    error::Error,
    field::{encode_graphics_field, GraphicsField},
    raster::FieldImage,
};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Largest symbol edge in pixels, the limit of ZPL label coordinates.
pub const MAX_SIDE: u32 = 32_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    QrCode,
    /// Square Data Matrix (ECC 200). The error correction level option
    /// does not apply.
    DataMatrix,
}

/// Rendering options of a symbol.
///
/// Defaults to 3 pixels per module and a one module quiet zone.
#[derive(Debug, Clone, Copy)]
pub struct SymbolOptions {
    scale: u32,
    margin: u32,
    ec_level: EcLevel,
}

impl Default for SymbolOptions {
    fn default() -> Self {
        SymbolOptions {
            scale: 3,
            margin: 1,
            ec_level: EcLevel::M,
        }
    }
}

impl SymbolOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pixels per module edge.
    pub fn scale(self, scale: u32) -> Self {
        SymbolOptions { scale, ..self }
    }

    /// Quiet zone width in modules.
    pub fn margin(self, margin: u32) -> Self {
        SymbolOptions { margin, ..self }
    }

    pub fn ec_level(self, ec_level: EcLevel) -> Self {
        SymbolOptions { ec_level, ..self }
    }
}

/// Render `data` as a symbol: black modules on a white background.
pub fn generate_symbol(kind: SymbolKind, data: &str, options: SymbolOptions) -> Result<RgbImage, Error> {
    if data.is_empty() {
        return Err(Error::InvalidInput("symbol data must not be empty".to_string()));
    }
    if options.scale == 0 {
        return Err(Error::InvalidInput("symbol scale must be positive".to_string()));
    }

    let (width, height, dark) = match kind {
        SymbolKind::QrCode => {
            let code = QrCode::with_error_correction_level(data.as_bytes(), options.ec_level)
                .map_err(|e| Error::SymbolError(e.to_string()))?;
            let modules = code.width();
            let dark: Vec<(usize, usize)> = code
                .to_colors()
                .iter()
                .enumerate()
                .filter(|(_, color)| **color == Color::Dark)
                .map(|(i, _)| (i % modules, i / modules))
                .collect();
            (modules, modules, dark)
        }
        SymbolKind::DataMatrix => {
            let code = DataMatrix::encode(data.as_bytes(), SymbolList::default().enforce_square())
                .map_err(|e| Error::SymbolError(format!("{:?}", e)))?;
            let bitmap = code.bitmap();
            let dark: Vec<(usize, usize)> = bitmap.pixels().collect();
            (bitmap.width(), bitmap.height(), dark)
        }
    };

    let img_width = scaled_side(width, options)?;
    let img_height = scaled_side(height, options)?;
    let mut img = RgbImage::from_pixel(img_width, img_height, WHITE);

    // Both sides are at most MAX_SIDE, so module offsets below fit in u32.
    for (x, y) in dark {
        let x0 = (x as u32 + options.margin) * options.scale;
        let y0 = (y as u32 + options.margin) * options.scale;
        for dy in 0..options.scale {
            for dx in 0..options.scale {
                img.put_pixel(x0 + dx, y0 + dy, BLACK);
            }
        }
    }

    debug!(
        "{:?} symbol: {}x{} modules, {}x{} pixels",
        kind, width, height, img_width, img_height
    );
    Ok(img)
}

/// Pixel length of `modules` plus both quiet zones, bounded by [`MAX_SIDE`].
fn scaled_side(modules: usize, options: SymbolOptions) -> Result<u32, Error> {
    let side = u32::try_from(modules)
        .ok()
        .and_then(|m| options.margin.checked_mul(2).and_then(|q| q.checked_add(m)))
        .and_then(|m| m.checked_mul(options.scale))
        .filter(|side| *side <= MAX_SIDE);
    side.ok_or_else(|| {
        Error::InvalidInput(format!(
            "symbol with scale {} and margin {} exceeds {} pixels",
            options.scale, options.margin, MAX_SIDE
        ))
    })
}

/// Generate a symbol and encode it as a graphics field.
pub fn symbol_field(kind: SymbolKind, data: &str, options: SymbolOptions) -> Result<GraphicsField, Error> {
    let raster = generate_symbol(kind, data, options)?;
    encode_graphics_field(&FieldImage::bilevel(raster)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE_SIZES: [u32; 24] = [
        10, 12, 14, 16, 18, 20, 22, 24, 26, 32, 36, 40, 44, 48, 52, 64, 72, 80, 88, 96, 104, 120,
        132, 144,
    ];

    #[test]
    fn symbol_size_follows_scale_and_margin() {
        // Version 1 QR codes are 21 modules wide.
        let img = generate_symbol(SymbolKind::QrCode, "A", SymbolOptions::new()).unwrap();
        assert_eq!(img.dimensions(), (69, 69));

        let opts = SymbolOptions::new().scale(2).margin(4);
        let img = generate_symbol(SymbolKind::QrCode, "A", opts).unwrap();
        assert_eq!(img.dimensions(), (58, 58));
    }

    #[test]
    fn quiet_zone_is_white_and_finder_is_black() {
        let img = generate_symbol(SymbolKind::QrCode, "hello", SymbolOptions::new()).unwrap();
        assert_eq!(*img.get_pixel(0, 0), WHITE);
        assert_eq!(*img.get_pixel(2, 2), WHITE);
        // Top-left finder pattern starts right after the quiet zone.
        assert_eq!(*img.get_pixel(3, 3), BLACK);
    }

    #[test]
    fn symbol_is_strictly_bilevel() {
        let img = generate_symbol(SymbolKind::QrCode, "12345-3", SymbolOptions::new()).unwrap();
        assert!(img.pixels().all(|p| *p == WHITE || *p == BLACK));
    }

    #[test]
    fn empty_data_is_rejected() {
        let err = generate_symbol(SymbolKind::QrCode, "", SymbolOptions::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn zero_scale_is_rejected() {
        let opts = SymbolOptions::new().scale(0);
        assert!(generate_symbol(SymbolKind::QrCode, "A", opts).is_err());
    }

    #[test]
    fn huge_margin_is_rejected() {
        let opts = SymbolOptions::new().margin(u32::MAX / 2);
        let err = generate_symbol(SymbolKind::QrCode, "A", opts).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn huge_scale_is_rejected() {
        let opts = SymbolOptions::new().scale(200_000_000);
        let err = generate_symbol(SymbolKind::QrCode, "A", opts).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn symbol_larger_than_label_limit_is_rejected() {
        // 12 and 23 module edges at 3000 px are past MAX_SIDE without overflowing.
        let opts = SymbolOptions::new().scale(3000);
        let err = generate_symbol(SymbolKind::DataMatrix, "A", opts).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        let err = generate_symbol(SymbolKind::QrCode, "A", opts).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn datamatrix_is_square_and_bilevel() {
        let img = generate_symbol(SymbolKind::DataMatrix, "12345-3", SymbolOptions::new()).unwrap();
        let (w, h) = img.dimensions();
        assert_eq!(w, h);
        assert_eq!(w % 3, 0);
        let modules = w / 3 - 2;
        assert!(SQUARE_SIZES.contains(&modules), "{} modules", modules);
        assert!(img.pixels().all(|p| *p == WHITE || *p == BLACK));
    }

    #[test]
    fn datamatrix_quiet_zone_and_finder() {
        let img = generate_symbol(SymbolKind::DataMatrix, "zebra", SymbolOptions::new()).unwrap();
        let (w, h) = img.dimensions();
        assert_eq!(*img.get_pixel(0, 0), WHITE);
        assert_eq!(*img.get_pixel(w - 1, h - 1), WHITE);
        // The solid "L" finder runs along the left edge and the bottom row.
        assert_eq!(*img.get_pixel(3, h - 4), BLACK);
        assert_eq!(*img.get_pixel(3, 3), BLACK);
    }

    #[test]
    fn datamatrix_grows_with_data() {
        let small = generate_symbol(SymbolKind::DataMatrix, "A", SymbolOptions::new()).unwrap();
        let large = generate_symbol(SymbolKind::DataMatrix, &"A".repeat(200), SymbolOptions::new()).unwrap();
        assert!(large.width() > small.width());
    }

    #[test]
    fn oversized_data_is_symbol_error() {
        let data = "x".repeat(8000);
        let err = generate_symbol(SymbolKind::QrCode, &data, SymbolOptions::new()).unwrap_err();
        assert!(matches!(err, Error::SymbolError(_)));
        let err = generate_symbol(SymbolKind::DataMatrix, &data, SymbolOptions::new()).unwrap_err();
        assert!(matches!(err, Error::SymbolError(_)));
    }

    #[test]
    fn symbol_field_geometry() {
        let field = symbol_field(SymbolKind::QrCode, "A", SymbolOptions::new()).unwrap();
        assert_eq!(field.row_bytes(), 9);
        assert_eq!(field.total_bytes(), 9 * 69);
    }
}
