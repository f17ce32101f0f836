//! The public decoder façade.
//!
//! A `Decoder` owns every piece of state accumulated while walking a
//! JPEG stream's markers (quantization tables, Huffman tables, frame
//! geometry, per-component sampling) and drives the marker parser, scan
//! decoder and color pipeline in turn to produce a final interleaved
//! pixel buffer.
use std::io::Cursor;

use crate::components::Components;
use crate::errors::DecodeErrors;
use crate::headers::{self, next_marker};
use crate::huffman::HuffmanTable;
use crate::marker::Marker;
use crate::mcu;
use crate::misc::{read_u16_be, ColorSpace};

/// Tunable limits and behavior switches for a [`Decoder`].
#[derive(Debug, Copy, Clone)]
pub struct DecoderOptions {
    /// Images wider than this are rejected with [`DecodeErrors::MalformedStream`]
    /// before any memory is allocated for their planes.
    pub max_width: usize,
    /// Images taller than this are rejected the same way.
    pub max_height: usize,
    /// When set, more than a couple of stray bytes found while scanning
    /// for the next marker is treated as a malformed stream instead of
    /// being silently skipped.
    pub strict_mode: bool,
    /// Whether the final YCbCr-to-RGB color conversion may be split
    /// across a scoped thread pool. Scan decoding itself stays
    /// single-threaded (DC prediction serializes it within a scan), so
    /// this only affects the last pipeline stage. Purely a performance
    /// knob; output is identical either way.
    pub use_threads: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        DecoderOptions {
            max_width: 1 << 16,
            max_height: 1 << 16,
            strict_mode: false,
            use_threads: true,
        }
    }
}

/// A JPEG decoder instance.
///
/// Create one with [`Decoder::new`] or [`Decoder::new_with_options`],
/// then call [`Decoder::decode_buffer`] with an in-memory JPEG file.
/// A single instance may be reused to decode multiple images one after
/// another; each call to `decode_buffer` resets all per-image state
/// first.
#[allow(clippy::upper_case_acronyms)]
pub struct Decoder {
    pub(crate) options: DecoderOptions,

    pub(crate) qt_tables: [Option<[i32; 64]>; 4],
    pub(crate) dc_huffman_tables: [Option<HuffmanTable>; 4],
    pub(crate) ac_huffman_tables: [Option<HuffmanTable>; 4],
    pub(crate) components: Vec<Components>,

    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) input_colorspace: ColorSpace,

    pub(crate) h_max: usize,
    pub(crate) v_max: usize,
    pub(crate) mcu_x: usize,
    pub(crate) mcu_y: usize,
    pub(crate) restart_interval: usize,

    /// JFIF APP0 pixel density, when present. Not used for decoding;
    /// exposed for callers that care about physical image size.
    pub(crate) jfif_density: Option<(u16, u16)>,

    headers_parsed: bool,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    /// Create a decoder with default options.
    #[must_use]
    pub fn new() -> Decoder {
        Decoder::new_with_options(DecoderOptions::default())
    }

    /// Create a decoder with explicit options.
    #[must_use]
    pub fn new_with_options(options: DecoderOptions) -> Decoder {
        Decoder {
            options,
            qt_tables: [None, None, None, None],
            dc_huffman_tables: [None, None, None, None],
            ac_huffman_tables: [None, None, None, None],
            components: Vec::new(),
            width: 0,
            height: 0,
            input_colorspace: ColorSpace::default(),
            h_max: 1,
            v_max: 1,
            mcu_x: 0,
            mcu_y: 0,
            restart_interval: 0,
            jfif_density: None,
            headers_parsed: false,
        }
    }

    fn reset_for_new_image(&mut self) {
        self.qt_tables = [None, None, None, None];
        self.dc_huffman_tables = [None, None, None, None];
        self.ac_huffman_tables = [None, None, None, None];
        self.components.clear();
        self.width = 0;
        self.height = 0;
        self.input_colorspace = ColorSpace::default();
        self.h_max = 1;
        self.v_max = 1;
        self.mcu_x = 0;
        self.mcu_y = 0;
        self.restart_interval = 0;
        self.jfif_density = None;
        self.headers_parsed = false;
    }

    /// Parse every marker segment up to (and including) the frame
    /// header, without touching entropy-coded scan data.
    ///
    /// This is enough to know the image's dimensions and colorspace,
    /// and is what [`crate::probe`] uses to sniff a buffer.
    pub fn read_headers(&mut self, buf: &[u8]) -> Result<(), DecodeErrors> {
        self.reset_for_new_image();
        let mut cursor = Cursor::new(buf);
        self.parse_until_scan(&mut cursor)?;
        self.headers_parsed = true;
        Ok(())
    }

    fn parse_until_scan(&mut self, cursor: &mut Cursor<&[u8]>) -> Result<(), DecodeErrors> {
        let soi_length = read_u16_be(cursor)?;
        if soi_length != 0xffd8 {
            return Err(DecodeErrors::MalformedStream(
                "Stream does not start with a Start Of Image marker".to_string(),
            ));
        }

        loop {
            match next_marker(self, cursor)? {
                Marker::DQT => headers::parse_dqt(self, cursor)?,
                Marker::DHT => headers::parse_huffman(self, cursor)?,
                Marker::SOF(n) => headers::parse_start_of_frame(self, n, cursor)?,
                Marker::DRI => headers::parse_dri(self, cursor)?,
                Marker::APP(n) => headers::parse_app(self, n, cursor)?,
                Marker::COM => headers::skip_segment(cursor)?,
                Marker::DAC => {
                    return Err(DecodeErrors::UnsupportedFeature(
                        crate::errors::UnsupportedSchemes::ExtendedSequentialDctArithmetic,
                    ))
                }
                Marker::SOS => {
                    if self.components.is_empty() {
                        return Err(DecodeErrors::MalformedStream(
                            "Start Of Scan encountered before a Start Of Frame".to_string(),
                        ));
                    }
                    return Ok(());
                }
                Marker::EOI => {
                    return Err(DecodeErrors::MalformedStream(
                        "End Of Image reached before a scan was found".to_string(),
                    ))
                }
                other => {
                    return Err(DecodeErrors::MalformedStream(format!(
                        "Unexpected marker {other:?} before Start Of Scan"
                    )))
                }
            }
        }
    }

    /// Decode a complete in-memory JPEG file into an interleaved pixel
    /// buffer: `width * height * colorspace.num_components()` bytes,
    /// row-major, no padding.
    pub fn decode_buffer(&mut self, buf: &[u8]) -> Result<Vec<u8>, DecodeErrors> {
        self.reset_for_new_image();
        let mut cursor = Cursor::new(buf);
        self.parse_until_scan(&mut cursor)?;

        let scan_order = headers::parse_sos(self, &mut cursor)?;
        mcu::decode_scan(self, &mut cursor, &scan_order)?;

        loop {
            match next_marker(self, &mut cursor)? {
                Marker::EOI => break,
                Marker::SOS => {
                    return Err(DecodeErrors::UnsupportedFeature(
                        crate::errors::UnsupportedSchemes::ProgressiveDctHuffman,
                    ))
                }
                Marker::DNL => headers::skip_segment(&mut cursor)?,
                _ => break,
            }
        }

        Ok(self.assemble_output())
    }

    fn assemble_output(&self) -> Vec<u8> {
        let width = usize::from(self.width);
        let height = usize::from(self.height);

        let mut planes: Vec<Vec<u8>> = Vec::with_capacity(self.components.len());
        for component in &self.components {
            let dst_w = self.mcu_x * 8 * self.h_max;
            let dst_h = self.mcu_y * 8 * self.v_max;
            planes.push((component.upsampler)(
                &component.plane,
                component.plane_stride,
                component.blocks_per_column * 8,
                dst_w,
                dst_h,
            ));
        }

        let full_stride = self.mcu_x * 8 * self.h_max;

        if self.components.len() == 1 {
            crate::color_convert::assemble_grayscale(&planes[0], full_stride, width, height)
        } else {
            crate::color_convert::assemble_rgb(
                &planes[0],
                &planes[1],
                &planes[2],
                full_stride,
                width,
                height,
                self.options.use_threads,
            )
        }
    }

    /// This image's width in pixels, once headers have been parsed.
    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// This image's height in pixels, once headers have been parsed.
    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// The colorspace this decoder will produce pixels in: always
    /// `GRAYSCALE` for single-component frames, `RGB` otherwise.
    #[must_use]
    pub fn output_colorspace(&self) -> ColorSpace {
        match self.input_colorspace {
            ColorSpace::GRAYSCALE => ColorSpace::GRAYSCALE,
            _ => ColorSpace::RGB,
        }
    }
}
