//! This module exports a single struct to store information about
//! JPEG image components.
//!
//! The data is extracted from a SOF header.

use crate::errors::DecodeErrors;
use crate::misc::Aligned32;
use crate::upsampler::{choose_upsampler, Upsampler};

/// Maximum number of color components this decoder supports (Y, Cb, Cr).
pub const MAX_COMPONENTS: usize = 3;

/// Component Data from start of frame.
#[derive(Clone)]
pub(crate) struct Components {
    /// The type of component that has the metadata below, can be Y, Cb or Cr
    pub component_id: ComponentID,
    /// Horizontal sub-sampling factor of this component
    pub horizontal_sample: usize,
    /// Vertical sub-sampling factor of this component
    pub vertical_sample: usize,
    /// DC huffman table position
    pub dc_huff_table: usize,
    /// AC huffman table position for this component
    pub ac_huff_table: usize,
    /// Quantization table number
    pub quantization_table_number: u8,
    /// Quantization table to use with this component, in natural (un-zigzagged) order
    pub quantization_table: Aligned32<[i32; 64]>,
    /// Running DC prediction for this component, reset at restart markers
    pub dc_pred: i32,
    /// Width, in blocks, of this component's decoded plane
    pub blocks_per_line: usize,
    /// Height, in blocks, of this component's decoded plane
    pub blocks_per_column: usize,
    /// Decoded, dequantized and IDCT'd samples for the whole image, one
    /// byte-ish (level shifted 0..=255) sample per pixel of this
    /// component's (possibly sub-sampled) plane
    pub plane: Vec<i16>,
    /// Stride (pixels per row) of `plane`
    pub plane_stride: usize,
    /// Function used to upsample this component's plane to the full
    /// image resolution; a no-op when this component isn't sub-sampled.
    pub upsampler: Upsampler,
}

impl Components {
    /// Create a new instance from three bytes read after the component count
    /// in a start-of-frame header.
    #[inline]
    pub fn from(a: [u8; 3]) -> Result<Components, DecodeErrors> {
        let id = match a[0] {
            1 => ComponentID::Y,
            2 => ComponentID::Cb,
            3 => ComponentID::Cr,
            r => {
                return Err(DecodeErrors::MalformedStream(format!(
                    "Unknown component id {}, expected a value between 1 and 3",
                    r
                )));
            }
        };

        let horizontal_sample = (a[1] >> 4) as usize;
        let vertical_sample = (a[1] & 0x0f) as usize;
        let quantization_table_number = a[2];

        if usize::from(quantization_table_number) >= 4 {
            return Err(DecodeErrors::InvalidTableId(quantization_table_number));
        }

        if horizontal_sample == 0 || vertical_sample == 0 {
            return Err(DecodeErrors::MalformedStream(
                "Component sampling factor of zero is not allowed".to_string(),
            ));
        }

        if !horizontal_sample.is_power_of_two() || horizontal_sample > 4 {
            return Err(DecodeErrors::MalformedStream(format!(
                "Unsupported horizontal sampling factor {}",
                horizontal_sample
            )));
        }

        if !vertical_sample.is_power_of_two() || vertical_sample > 4 {
            return Err(DecodeErrors::MalformedStream(format!(
                "Unsupported vertical sampling factor {}",
                vertical_sample
            )));
        }

        debug!(
            "Component ID: {:?}\tHS:{} VS:{} QT:{}",
            id, horizontal_sample, vertical_sample, quantization_table_number
        );

        Ok(Components {
            component_id: id,
            horizontal_sample,
            vertical_sample,
            quantization_table_number,
            dc_huff_table: 0,
            ac_huff_table: 0,
            quantization_table: Aligned32([0; 64]),
            dc_pred: 0,
            blocks_per_line: 0,
            blocks_per_column: 0,
            plane: Vec::new(),
            plane_stride: 0,
            upsampler: crate::upsampler::upsample_no_op,
        })
    }

    /// Allocate this component's decoded plane and pick its upsampler, given
    /// the image's maximum sampling factors and MCU grid dimensions.
    pub(crate) fn setup_plane(&mut self, mcus_x: usize, mcus_y: usize, h_max: usize, v_max: usize) {
        self.blocks_per_line = mcus_x * self.horizontal_sample;
        self.blocks_per_column = mcus_y * self.vertical_sample;
        self.plane_stride = self.blocks_per_line * 8;
        self.plane = vec![0; self.plane_stride * self.blocks_per_column * 8];
        self.upsampler = choose_upsampler(self.horizontal_sample, self.vertical_sample, h_max, v_max);
    }
}

/// Component identities.
#[derive(Copy, Debug, Clone, PartialEq, Eq)]
pub enum ComponentID {
    /// Luminance channel
    Y,
    /// Blue chrominance
    Cb,
    /// Red chrominance
    Cr,
}
