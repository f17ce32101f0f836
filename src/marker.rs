//! JPEG marker identification
//!
//! Markers are pairs of bytes, `0xFF` followed by a code byte, that
//! delimit the segments of a JPEG stream. This module gives a name to
//! each marker byte this decoder needs to recognize.

/// A marker found in the JPEG stream.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Marker {
    /// Start of Image
    SOI,
    /// End of Image
    EOI,
    /// Start of Frame, carrying the SOF variant number (0 for baseline)
    SOF(u8),
    /// Define Huffman Table
    DHT,
    /// Define Quantization Table
    DQT,
    /// Start of Scan
    SOS,
    /// Define Restart Interval
    DRI,
    /// Restart marker, carrying its index 0..=7
    RST(u8),
    /// Application segment, carrying its index 0..=15
    APP(u8),
    /// Comment segment
    COM,
    /// Define Arithmetic conditioning table (unsupported)
    DAC,
    /// Define Number of Lines (unsupported)
    DNL,
}

impl Marker {
    /// Map a marker code byte (the byte following `0xFF` in the stream) to
    /// a `Marker`, or `None` if the byte is not a marker this decoder
    /// recognizes at all (reserved/unused values).
    pub fn from_u8(byte: u8) -> Option<Marker> {
        match byte {
            0xd8 => Some(Marker::SOI),
            0xd9 => Some(Marker::EOI),
            0xc0..=0xcf if byte != 0xc4 && byte != 0xc8 && byte != 0xcc => {
                Some(Marker::SOF(byte - 0xc0))
            }
            0xc4 => Some(Marker::DHT),
            0xdb => Some(Marker::DQT),
            0xda => Some(Marker::SOS),
            0xdd => Some(Marker::DRI),
            0xd0..=0xd7 => Some(Marker::RST(byte - 0xd0)),
            0xe0..=0xef => Some(Marker::APP(byte - 0xe0)),
            0xfe => Some(Marker::COM),
            0xcc => Some(Marker::DAC),
            0xdc => Some(Marker::DNL),
            _ => None,
        }
    }
}
