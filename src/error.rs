//! Error types for graphics field encoding and printer operations.
//!
//! This module defines all possible errors that can occur while loading
//! images, encoding graphics fields, rendering templates and talking to
//! the printer.

use thiserror::Error;

/// Main error type for the crate.
///
/// Every fallible function returns this enum, from pixel format mismatches
/// in the encoder up to HTTP failures while submitting a label.
#[derive(Error, Debug)]
pub enum Error {
    /// Conflicting or missing input.
    ///
    /// Raised when both an inline source and a file path are supplied for the
    /// same request, when neither is supplied, or when an image has a zero
    /// dimension.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A referenced file could not be opened or read.
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// The raster channel layout does not match the selected kind.
    #[error("Unsupported pixel format: expected {expected}, found {found}")]
    UnsupportedFormat {
        expected: &'static str,
        found: &'static str,
    },

    /// Image decoding failure of a readable file.
    #[error(transparent)]
    ImageError(#[from] image::ImageError),

    #[error("Malformed graphics field: {0}")]
    MalformedField(String),

    /// The barcode library refused the data, e.g. it does not fit the symbol.
    #[error("Symbol encoding failed: {0}")]
    SymbolError(String),

    #[error("Template placeholder has no value: {0}")]
    TemplateKeyError(String),

    #[error("Invalid placeholder in template at line {line}, column {column}")]
    InvalidTemplate { line: usize, column: usize },

    /// Transport failure or non-success status from the printer.
    #[error(transparent)]
    HttpError(#[from] reqwest::Error),

    #[error("Printer response did not contain a preview image")]
    MissingPreview,
}
