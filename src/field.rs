//! ZPL graphics field encoding.
//!
//! A graphics field carries a 1-bit bitmap as
//!
//! ```text
//! A,<total_bytes>,<total_bytes>,<row_bytes>,
//! :B64:<base64 payload>:0000
//! ```
//!
//! The total byte count appears twice (the binary byte count and the graphic
//! field count of `^GF`). Both are always equal here.

use base64::{engine::general_purpose, Engine as _};
use log::debug;
use std::fmt;
use std::str::FromStr;

use crate::{error::Error, raster::FieldImage};

const COMPRESSION: &str = "A";
const B64_MARKER: &str = ":B64:";
const CRC: &str = ":0000";

/// Bytes needed for one row of `width` pixels.
pub fn row_byte_count(width: u32) -> usize {
    width.div_ceil(8) as usize
}

/// Pack one row of bits MSB-first. The last byte is zero padded on the right.
pub fn pack_row(bits: impl IntoIterator<Item = bool>) -> Vec<u8> {
    let mut buf: Vec<u8> = Vec::new();
    let mut byte: u8 = 0;
    let mut filled: u32 = 0;

    for bit in bits {
        byte = (byte << 1) | bit as u8;
        filled += 1;
        if filled == 8 {
            buf.push(byte);
            byte = 0;
            filled = 0;
        }
    }
    if filled != 0 {
        buf.push(byte << (8 - filled));
    }
    buf
}

/// Threshold and pack every row of `image`, top row first.
pub fn pack(image: &FieldImage) -> Vec<u8> {
    let (width, height) = (image.width(), image.height());
    let mut buf = Vec::with_capacity(row_byte_count(width) * height as usize);

    for y in 0..height {
        let row = pack_row((0..width).map(|x| image.is_marked(x, y)));
        buf.extend_from_slice(&row);
    }
    buf
}

/// Encode `image` into a graphics field.
///
/// The output depends only on the pixels and the kind, so encoding the same
/// image twice yields identical fields.
pub fn encode_graphics_field(image: &FieldImage) -> Result<GraphicsField, Error> {
    let row_bytes = row_byte_count(image.width());
    let data = pack(image);
    debug!(
        "packed {}x{} {:?} image into {} bytes ({} per row)",
        image.width(),
        image.height(),
        image.kind(),
        data.len(),
        row_bytes
    );
    GraphicsField::new(data, row_bytes)
}

/// Packed bitmap plus the geometry carried in the field header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphicsField {
    row_bytes: usize,
    data: Vec<u8>,
}

impl GraphicsField {
    /// Wrap already packed rows. `data` must hold a whole number of rows.
    pub fn new(data: Vec<u8>, row_bytes: usize) -> Result<Self, Error> {
        if row_bytes == 0 || data.is_empty() {
            return Err(Error::InvalidInput(
                "graphics field must hold at least one byte".to_string(),
            ));
        }
        if data.len() % row_bytes != 0 {
            return Err(Error::InvalidInput(format!(
                "{} bytes is not a whole number of {}-byte rows",
                data.len(),
                row_bytes
            )));
        }
        Ok(GraphicsField { row_bytes, data })
    }

    pub fn total_bytes(&self) -> usize {
        self.data.len()
    }

    pub fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    pub fn height(&self) -> usize {
        self.data.len() / self.row_bytes
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks(self.row_bytes)
    }

    /// Unpack the bitmap back into `width` bits per row, dropping padding.
    pub fn to_mask(&self, width: u32) -> Result<Vec<Vec<bool>>, Error> {
        if width == 0 || row_byte_count(width) != self.row_bytes {
            return Err(Error::InvalidInput(format!(
                "width {} does not fit {}-byte rows",
                width, self.row_bytes
            )));
        }
        let mask = self
            .rows()
            .map(|row| {
                (0..width as usize)
                    .map(|x| row[x / 8] & (0x80 >> (x % 8)) != 0)
                    .collect()
            })
            .collect();
        Ok(mask)
    }

    /// The field wrapped in `^GF ... ^FS`, ready to drop into a label.
    pub fn to_command(&self) -> String {
        format!("^GF{}^FS", self)
    }
}

impl fmt::Display for GraphicsField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.total_bytes();
        write!(
            f,
            "{},{},{},{},\n{}{}{}",
            COMPRESSION,
            total,
            total,
            self.row_bytes,
            B64_MARKER,
            general_purpose::STANDARD.encode(&self.data),
            CRC
        )
    }
}

impl FromStr for GraphicsField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |msg: &str| Error::MalformedField(msg.to_string());

        let (header, body) = s.split_once('\n').ok_or_else(|| malformed("missing newline"))?;
        let header = header
            .strip_suffix(',')
            .ok_or_else(|| malformed("header must end with a comma"))?;
        let parts: Vec<&str> = header.split(',').collect();
        let (total, count, row_bytes) = match parts.as_slice() {
            [COMPRESSION, total, count, row_bytes] => (
                parse_count(total)?,
                parse_count(count)?,
                parse_count(row_bytes)?,
            ),
            _ => return Err(malformed("expected header A,<total>,<total>,<row>,")),
        };
        if total != count {
            return Err(malformed("byte counts differ"));
        }

        let payload = body
            .strip_prefix(B64_MARKER)
            .and_then(|b| b.strip_suffix(CRC))
            .ok_or_else(|| malformed("expected :B64:<payload>:0000"))?;
        let data = general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| Error::MalformedField(e.to_string()))?;
        if data.len() != total {
            return Err(Error::MalformedField(format!(
                "header announces {} bytes, payload holds {}",
                total,
                data.len()
            )));
        }

        GraphicsField::new(data, row_bytes).map_err(|e| Error::MalformedField(e.to_string()))
    }
}

fn parse_count(token: &str) -> Result<usize, Error> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::MalformedField(format!("invalid count {:?}", token)));
    }
    token
        .parse()
        .map_err(|_| Error::MalformedField(format!("invalid count {:?}", token)))
}
