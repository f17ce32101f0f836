#![allow(dead_code)]

use crate::errors::DecodeErrors;
use std::io::Cursor;

/// Start of Image
pub const START_OF_IMAGE: u16 = 0xffd8;
/// End of Image
pub const END_OF_IMAGE: u16 = 0xffd9;

/// Start of baseline DCT Huffman coding
pub const START_OF_FRAME_BASE: u16 = 0xffc0;
/// Start of another frame
pub const START_OF_FRAME_EXT_SEQ: u16 = 0xffc1;
/// Start of progressive DCT encoding
pub const START_OF_FRAME_PROG_DCT: u16 = 0xffc2;

/// Start of Lossless sequential Huffman coding
pub const START_OF_FRAME_LOS_SEQ: u16 = 0xffc3;
/// Start of extended sequential DCT arithmetic coding
pub const START_OF_FRAME_EXT_AR: u16 = 0xffc9;
/// Start of Progressive DCT arithmetic coding
pub const START_OF_FRAME_PROG_DCT_AR: u16 = 0xffca;
/// Start of Lossless sequential Arithmetic coding
pub const START_OF_FRAME_LOS_SEQ_AR: u16 = 0xffcb;

/// Define Huffman Table(s)
pub const DEFINE_HUFFMAN_TABLE: u16 = 0xffc4;
/// Define Quantization Table(s)
pub const DEFINE_QUANTIZATION_TABLE: u16 = 0xffdb;
/// Start Of Scan
pub const START_OF_SCAN: u16 = 0xffda;
/// Define Restart Interval
pub const DEFINE_RESTART_INTERVAL: u16 = 0xffdd;
/// First restart marker
pub const RESTART_MARKER_BASE: u16 = 0xffd0;
/// Last restart marker
pub const RESTART_MARKER_END: u16 = 0xffd7;

/// Undo run length encoding of coefficients by placing them in natural order
#[rustfmt::skip]
pub const UN_ZIGZAG: [usize; 64] = [
    0,  1,  8,  16, 9,  2,  3, 10,
    17, 24, 32, 25, 18, 11, 4,  5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13, 6,  7,  14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63,
];

/// Align data to a 32 byte boundary
#[repr(align(32))]
#[derive(Clone)]
pub struct Aligned32<T: ?Sized>(pub T);

impl<T> Default for Aligned32<T>
where
    T: Default,
{
    fn default() -> Self {
        Aligned32(T::default())
    }
}

/// Output colorspace of a decoded image.
///
/// This decoder only ever produces grayscale or 3-channel output; CMYK,
/// YCCK and alpha-carrying variants are out of scope.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ColorSpace {
    /// Red, Green, Blue
    RGB,
    /// Monochrome
    GRAYSCALE,
    /// YCbCr, (also known as YUV); this is never the *output* colorspace,
    /// only ever an intermediate one before color conversion
    YCbCr,
}

impl ColorSpace {
    /// Number of channels in this color space
    pub const fn num_components(self) -> usize {
        match self {
            Self::RGB | Self::YCbCr => 3,
            Self::GRAYSCALE => 1,
        }
    }
}

impl Default for ColorSpace {
    /// The common output colorspace for all (sane) decoded images
    fn default() -> Self {
        ColorSpace::RGB
    }
}

/// Read a single byte from an in-memory cursor.
///
/// Unlike the upstream crate this returns a `Result`: running off the end
/// of the buffer is a malformed-stream condition, not a silent zero-fill.
#[inline]
pub fn read_byte(reader: &mut Cursor<&[u8]>) -> Result<u8, DecodeErrors> {
    let pos = reader.position();
    let buf = *reader.get_ref();
    let byte = *buf
        .get(pos as usize)
        .ok_or_else(|| DecodeErrors::MalformedStream("Unexpected end of stream".to_string()))?;
    reader.set_position(pos + 1);
    Ok(byte)
}

/// Read a big-endian `u16` from an in-memory cursor.
#[inline]
pub fn read_u16_be(reader: &mut Cursor<&[u8]>) -> Result<u16, DecodeErrors> {
    let hi = read_byte(reader)?;
    let lo = read_byte(reader)?;
    Ok(u16::from_be_bytes([hi, lo]))
}

/// Skip `n` bytes of an in-memory cursor, erroring instead of running past
/// the end of the buffer.
#[inline]
pub fn skip_bytes(reader: &mut Cursor<&[u8]>, n: usize) -> Result<(), DecodeErrors> {
    let pos = reader.position();
    let buf_len = reader.get_ref().len() as u64;
    let new_pos = pos + n as u64;
    if new_pos > buf_len {
        return Err(DecodeErrors::MalformedStream(
            "Unexpected end of stream while skipping segment data".to_string(),
        ));
    }
    reader.set_position(new_pos);
    Ok(())
}

/// Read `buf.len()` bytes from the cursor into `buf`.
#[inline]
pub fn read_exact(reader: &mut Cursor<&[u8]>, buf: &mut [u8]) -> Result<(), DecodeErrors> {
    for b in buf.iter_mut() {
        *b = read_byte(reader)?;
    }
    Ok(())
}
