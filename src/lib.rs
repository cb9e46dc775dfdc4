//! Zebra Label Utilities
//!
//! This crate turns raster images into ZPL graphics fields (`^GF`) and talks
//! to Zebra label printers through their built-in web interface.
//!
//! # Example
//!
//! ```rust,no_run
//! use zebra_label::{encode_graphics_field, FieldImage, ImageSource, PhotoOptions};
//!
//! let source = ImageSource::Path("logo.png".into());
//! let image = FieldImage::open(source, PhotoOptions::new().rotate(true)).unwrap();
//! let field = encode_graphics_field(&image).unwrap();
//! let zpl = format!("^XA^FO20,20{}^XZ", field.to_command());
//! ```

mod error;
mod field;
mod printer;
mod raster;
mod symbol;
mod template;

pub use crate::{
    error::Error,
    field::{encode_graphics_field, pack, pack_row, row_byte_count, GraphicsField},
    printer::{Config, LabelSource, Printer, DEFAULT_URL, URL_ENV},
    raster::{
        is_marked, quantize, FieldImage, ImageSource, Kind, PhotoOptions, Raster, Sample,
        PALETTE_LEVELS,
    },
    symbol::{generate_symbol, symbol_field, SymbolKind, SymbolOptions, MAX_SIDE},
    template::{render_template, zpl_from_template},
};

pub use qrcode::EcLevel;
