//! A decoder for baseline sequential JPEG/JFIF images.
//!
//! ```no_run
//! let data = std::fs::read("image.jpg").unwrap();
//! let mut decoder = baseline_jpeg::Decoder::new();
//! let pixels = decoder.decode_buffer(&data).unwrap();
//! ```
//!
//! Progressive, lossless and arithmetic-coded JPEGs, 12-bit sample
//! precision and multi-scan files are all out of scope; see
//! [`errors::UnsupportedSchemes`] for the full list this decoder
//! recognizes and rejects rather than misdecodes.
#![allow(clippy::needless_return, clippy::similar_names, clippy::inline_always)]
#![warn(clippy::correctness, clippy::perf, clippy::pedantic, clippy::inline_always)]
#[macro_use]
extern crate log;

pub use crate::decoder::{Decoder, DecoderOptions};
pub use crate::misc::ColorSpace;

mod bitstream;
mod color_convert;
mod components;
pub mod decoder;
pub mod errors;
mod headers;
mod huffman;
mod idct;
mod marker;
mod mcu;
mod misc;
pub mod probe;
mod upsampler;
