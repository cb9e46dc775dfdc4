//! Raster input of the graphics field encoder.
//!
//! Symbol rasters and photographic images are both normalized into a
//! [`FieldImage`], a `{kind, raster}` pair, before they reach the packing
//! pipeline in [`crate::field`].

use image::{DynamicImage, GrayImage, Luma, RgbImage};
use log::debug;
use std::path::PathBuf;

use crate::error::Error;

/// Number of palette levels photographic images are quantized to.
pub const PALETTE_LEVELS: u8 = 255;

/// Selects the thresholding rule applied to a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// RGB data already rendered in two states, e.g. a barcode symbol.
    /// Pure white `255,255,255` is the indicator value.
    Bilevel,
    /// Arbitrary image quantized to [`PALETTE_LEVELS`] levels.
    /// Level `0` is the indicator value.
    Photographic,
}

impl Kind {
    fn expected_format(&self) -> &'static str {
        match self {
            Self::Bilevel => "rgb",
            Self::Photographic => "luma",
        }
    }
}

/// A single pixel sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sample {
    Rgb([u8; 3]),
    Luma(u8),
}

impl Sample {
    fn format(&self) -> &'static str {
        match self {
            Self::Rgb(_) => "rgb",
            Self::Luma(_) => "luma",
        }
    }
}

/// Decoded raster, either three channel or single channel.
#[derive(Debug, Clone)]
pub enum Raster {
    Rgb(RgbImage),
    Luma(GrayImage),
}

impl Raster {
    pub fn width(&self) -> u32 {
        match self {
            Self::Rgb(img) => img.width(),
            Self::Luma(img) => img.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Self::Rgb(img) => img.height(),
            Self::Luma(img) => img.height(),
        }
    }

    /// Sample at column `x` of row `y`. Panics when out of bounds, like
    /// `ImageBuffer::get_pixel`.
    pub fn sample(&self, x: u32, y: u32) -> Sample {
        match self {
            Self::Rgb(img) => Sample::Rgb(img.get_pixel(x, y).0),
            Self::Luma(img) => Sample::Luma(img.get_pixel(x, y).0[0]),
        }
    }

    fn format(&self) -> &'static str {
        match self {
            Self::Rgb(_) => "rgb",
            Self::Luma(_) => "luma",
        }
    }
}

/// Polarity rule of the graphics field.
///
/// Returns `true` when the sample is emitted as bit `1`. A sample inside its
/// kind's indicator domain (white for [`Kind::Bilevel`], level zero for
/// [`Kind::Photographic`]) is emitted as bit `0`; everything else is bit `1`.
///
/// A sample whose layout does not belong to `kind` is an
/// [`Error::UnsupportedFormat`].
pub fn is_marked(sample: Sample, kind: Kind) -> Result<bool, Error> {
    classify(sample, kind).ok_or(Error::UnsupportedFormat {
        expected: kind.expected_format(),
        found: sample.format(),
    })
}

fn classify(sample: Sample, kind: Kind) -> Option<bool> {
    match (kind, sample) {
        (Kind::Bilevel, Sample::Rgb(rgb)) => Some(rgb != [255, 255, 255]),
        (Kind::Photographic, Sample::Luma(level)) => Some(level != 0),
        _ => None,
    }
}

/// Reduce a grayscale image to `levels` evenly spaced intensity levels.
///
/// Level `0` holds only pure black; level `levels - 1` holds pure white.
pub fn quantize(img: &GrayImage, levels: u8) -> GrayImage {
    let top = levels.saturating_sub(1) as u32;
    let mut out = GrayImage::new(img.width(), img.height());
    for (x, y, pixel) in img.enumerate_pixels() {
        let level = (pixel.0[0] as u32 * top + 127) / 255;
        out.put_pixel(x, y, Luma([level as u8]));
    }
    out
}

/// Options of the photographic path.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhotoOptions {
    rotate: bool,
}

impl PhotoOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rotate the image 270° counter-clockwise before quantization, growing
    /// the canvas to fit. Useful when the label feeds sideways.
    pub fn rotate(self, rotate: bool) -> Self {
        PhotoOptions { rotate }
    }
}

/// Where a photographic image comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    Inline(DynamicImage),
    Path(PathBuf),
}

impl ImageSource {
    /// Build a source from the two optional inputs of a request.
    ///
    /// Exactly one of them must be present.
    pub fn from_parts(image: Option<DynamicImage>, path: Option<PathBuf>) -> Result<Self, Error> {
        match (image, path) {
            (Some(image), None) => Ok(Self::Inline(image)),
            (None, Some(path)) => Ok(Self::Path(path)),
            (Some(_), Some(_)) => Err(Error::InvalidInput(
                "provide an image or a file path, not both".to_string(),
            )),
            (None, None) => Err(Error::InvalidInput(
                "either an image or a file path is required".to_string(),
            )),
        }
    }

    /// Decode the image, reading it from storage for [`ImageSource::Path`].
    pub fn load(self) -> Result<DynamicImage, Error> {
        match self {
            Self::Inline(image) => Ok(image),
            Self::Path(path) => {
                debug!("loading image from {:?}", path);
                let image = image::ImageReader::open(&path)?
                    .with_guessed_format()?
                    .decode()?;
                Ok(image)
            }
        }
    }
}

/// Tagged `{kind, raster}` pair accepted by the encoder.
///
/// Construction validates that the raster is non-empty and that its layout
/// matches the kind, so encoding never fails half way.
#[derive(Debug, Clone)]
pub struct FieldImage {
    kind: Kind,
    raster: Raster,
}

impl FieldImage {
    pub fn new(kind: Kind, raster: Raster) -> Result<Self, Error> {
        if raster.width() == 0 || raster.height() == 0 {
            return Err(Error::InvalidInput(format!(
                "image must not be empty, got {}x{}",
                raster.width(),
                raster.height()
            )));
        }
        if raster.format() != kind.expected_format() {
            return Err(Error::UnsupportedFormat {
                expected: kind.expected_format(),
                found: raster.format(),
            });
        }
        Ok(FieldImage { kind, raster })
    }

    /// Bilevel raster, typically the output of [`crate::generate_symbol`].
    pub fn bilevel(raster: RgbImage) -> Result<Self, Error> {
        Self::new(Kind::Bilevel, Raster::Rgb(raster))
    }

    /// Normalize an arbitrary image for the photographic path: optional
    /// rotation, grayscale conversion and quantization.
    pub fn photographic(image: &DynamicImage, options: PhotoOptions) -> Result<Self, Error> {
        let rotated;
        let image = if options.rotate {
            // 270° counter-clockwise is one clockwise quarter turn.
            rotated = image.rotate90();
            &rotated
        } else {
            image
        };
        let levels = quantize(&image.to_luma8(), PALETTE_LEVELS);
        Self::new(Kind::Photographic, Raster::Luma(levels))
    }

    /// Load `source` and normalize it for the photographic path.
    pub fn open(source: ImageSource, options: PhotoOptions) -> Result<Self, Error> {
        let image = source.load()?;
        Self::photographic(&image, options)
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    /// Whether the pixel at `(x, y)` is emitted as bit `1`.
    pub fn is_marked(&self, x: u32, y: u32) -> bool {
        // Layout and kind were matched in `new`.
        classify(self.raster.sample(x, y), self.kind) == Some(true)
    }
}
