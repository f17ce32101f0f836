//! Contains the error type returned from every fallible operation in this
//! crate.
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Common Decode errors
#[allow(clippy::module_name_repetitions)]
pub enum DecodeErrors {
    /// Failed to read from the underlying source
    Io(String),
    /// The stream does not conform to the JPEG grammar: a missing SOI/EOI,
    /// a segment length that runs past the buffer, or a table whose
    /// declared size doesn't match its payload
    MalformedStream(String),
    /// The stream is well formed JPEG but uses a feature this decoder does
    /// not implement
    UnsupportedFeature(UnsupportedSchemes),
    /// A DQT/DHT/SOF/SOS table selector referenced a table slot outside the
    /// legal range, or a scan component referenced a table that was never
    /// populated by a DHT segment
    InvalidTableId(u8),
    /// Entropy coded data could not be resolved against any Huffman code
    /// within 16 bits
    InvalidHuffmanCode,
    /// A decoded AC coefficient position ran past the 64th element of a
    /// block
    EntropyOverflow,
    /// A restart marker was expected at a restart interval boundary and
    /// was not found, or was found somewhere unexpected
    RestartMismatch,
}

impl From<std::io::Error> for DecodeErrors {
    fn from(err: std::io::Error) -> Self {
        DecodeErrors::Io(err.to_string())
    }
}

impl Debug for DecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
impl Display for DecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(ref reason) => write!(f, "Error reading source: {}", reason),
            Self::MalformedStream(ref reason) => write!(f, "Malformed JPEG stream: {}", reason),
            Self::UnsupportedFeature(ref scheme) => write!(f, "{:?}", scheme),
            Self::InvalidTableId(id) => {
                write!(f, "Invalid table id {}, must be between 0 and 3", id)
            }
            Self::InvalidHuffmanCode => {
                write!(f, "Could not resolve a Huffman code within 16 bits")
            }
            Self::EntropyOverflow => write!(f, "Decoded AC coefficient position overran block"),
            Self::RestartMismatch => write!(f, "Restart marker expected but not found"),
        }
    }
}
impl Error for DecodeErrors {}

/// Unsupported JPEG encoding schemes: anything structurally valid this
/// decoder recognizes but refuses to decode rather than silently
/// misdecode.
#[derive(Eq, PartialEq, Copy, Clone)]
pub enum UnsupportedSchemes {
    /// SOF_1 Extended sequential DCT, Huffman coding
    ExtendedSequentialHuffman,
    /// SOF_2 Progressive DCT, Huffman coding
    ProgressiveDctHuffman,
    /// SOF_3 Lossless (sequential), Huffman coding
    LosslessHuffman,
    /// SOF_9 Extended sequential DCT, arithmetic coding
    ExtendedSequentialDctArithmetic,
    /// SOF_10 Progressive DCT, arithmetic coding
    ProgressiveDctArithmetic,
    /// SOF_11 Lossless (sequential), arithmetic coding
    LosslessArithmetic,
    /// A sample precision other than 8 bits per component
    SamplePrecision(u8),
    /// More than three color components in a frame
    TooManyComponents(u8),
}
impl Debug for UnsupportedSchemes {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExtendedSequentialHuffman => {
                write!(f,"the library cannot decode images encoded using the extended sequential Huffman encoding scheme")
            }
            Self::ProgressiveDctHuffman => {
                write!(f, "the library cannot decode images encoded using the progressive Huffman encoding scheme")
            }
            Self::LosslessHuffman => {
                write!(f,"the library cannot decode images encoded with the lossless Huffman encoding scheme")
            }
            Self::ExtendedSequentialDctArithmetic => {
                write!(f,"the library cannot decode images encoded with the extended sequential DCT arithmetic scheme")
            }
            Self::ProgressiveDctArithmetic => {
                write!(f,"the library cannot decode images encoded with the progressive DCT arithmetic scheme")
            }
            Self::LosslessArithmetic => {
                write!(f,"the library cannot decode images encoded with the lossless arithmetic encoding scheme")
            }
            Self::SamplePrecision(bits) => {
                write!(f, "the library only supports 8-bit sample precision, image declares {bits}")
            }
            Self::TooManyComponents(n) => {
                write!(f, "the library only supports 1 or 3 component images, image declares {n}")
            }
        }
    }
}
