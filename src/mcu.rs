//! The scan decoder: walks the MCU grid, decoding and dequantizing one
//! block at a time and writing IDCT output into each component's plane.
use std::io::Cursor;

use crate::bitstream::BitStream;
use crate::decoder::Decoder;
use crate::errors::DecodeErrors;
use crate::idct::{dequantize_and_idct_block, unzigzag};
use crate::marker::Marker;

use super::headers::next_marker;

/// Decode every MCU of a single scan into the frame's component planes.
///
/// `scan_order` gives, for each component participating in this scan,
/// its index into `decoder.components`; components are visited in that
/// order within every MCU, per Annex B's interleaved-data-ordering
/// rule.
pub(crate) fn decode_scan(
    decoder: &mut Decoder, cursor: &mut Cursor<&[u8]>, scan_order: &[usize],
) -> Result<(), DecodeErrors> {
    let mcu_x = decoder.mcu_x;
    let mcu_y = decoder.mcu_y;
    let total_mcus = mcu_x * mcu_y;
    let restart_interval = decoder.restart_interval;

    let mut stream = BitStream::new();
    for idx in scan_order {
        decoder.components[*idx].dc_pred = 0;
    }

    let mut mcus_since_restart = 0usize;
    let mut mcus_done = 0usize;

    for mcu_row in 0..mcu_y {
        for mcu_col in 0..mcu_x {
            for &comp_idx in scan_order {
                let (h, v) = {
                    let c = &decoder.components[comp_idx];
                    (c.horizontal_sample, c.vertical_sample)
                };

                for by in 0..v {
                    for bx in 0..h {
                        decode_one_block(decoder, &mut stream, cursor, comp_idx, mcu_col, mcu_row, bx, by, h)?;
                    }
                }
            }

            mcus_done += 1;
            mcus_since_restart += 1;

            if restart_interval > 0 && mcus_since_restart == restart_interval && mcus_done < total_mcus {
                for idx in scan_order {
                    decoder.components[*idx].dc_pred = 0;
                }
                stream.align_to_marker(cursor);
                match next_marker(decoder, cursor)? {
                    Marker::RST(_) => {}
                    _ => return Err(DecodeErrors::RestartMismatch),
                }
                mcus_since_restart = 0;
            }
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn decode_one_block(
    decoder: &mut Decoder, stream: &mut BitStream, cursor: &mut Cursor<&[u8]>, comp_idx: usize,
    mcu_col: usize, mcu_row: usize, bx: usize, by: usize, h: usize,
) -> Result<(), DecodeErrors> {
    let dc_sel = decoder.components[comp_idx].dc_huff_table;
    let ac_sel = decoder.components[comp_idx].ac_huff_table;

    let mut coeffs = [0i16; 64];
    {
        let dc_table = decoder.dc_huffman_tables[dc_sel]
            .as_ref()
            .ok_or(DecodeErrors::InvalidTableId(dc_sel as u8))?;
        let ac_table = decoder.ac_huffman_tables[ac_sel]
            .as_ref()
            .ok_or(DecodeErrors::InvalidTableId(ac_sel as u8))?;
        let dc_pred = &mut decoder.components[comp_idx].dc_pred;
        // `Ok(false)` means the marker was reached exactly at this
        // block's boundary (DC already stored, remaining ACs correctly
        // zero-initialized); that's the legitimate restart-interval or
        // end-of-scan case, not a decode failure.
        stream.decode_block(cursor, dc_table, ac_table, &mut coeffs, dc_pred)?;
    };

    let natural = unzigzag(&coeffs);
    let component = &mut decoder.components[comp_idx];
    let samples = dequantize_and_idct_block(&natural, &component.quantization_table);

    let px = (mcu_col * h + bx) * 8;
    let py = (mcu_row * component.vertical_sample + by) * 8;
    let stride = component.plane_stride;

    for row in 0..8 {
        let dst_start = (py + row) * stride + px;
        let src_start = row * 8;
        for col in 0..8 {
            component.plane[dst_start + col] = i16::from(samples[src_start + col]);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Components;
    use crate::huffman::HuffmanTable;
    use crate::misc::Aligned32;

    /// A fully synthetic single-component, single-MCU scan: one DC
    /// symbol (category 0, diff == 0) and an immediate end-of-block.
    #[test]
    fn decodes_single_flat_block_into_plane() {
        let mut decoder = Decoder::new();
        decoder.width = 8;
        decoder.height = 8;
        decoder.mcu_x = 1;
        decoder.mcu_y = 1;
        decoder.h_max = 1;
        decoder.v_max = 1;

        let mut dc_bits = [0u8; 16];
        dc_bits[0] = 1; // one 1-bit code -> symbol 0
        decoder.dc_huffman_tables[0] = Some(HuffmanTable::new(&dc_bits, vec![0], false).unwrap());

        let mut ac_bits = [0u8; 16];
        ac_bits[0] = 1; // one 1-bit code -> symbol 0x00 (EOB)
        decoder.ac_huffman_tables[0] = Some(HuffmanTable::new(&ac_bits, vec![0], true).unwrap());

        let mut component = Components::from([1, 0x11, 0]).unwrap();
        component.quantization_table = Aligned32([1; 64]);
        component.setup_plane(1, 1, 1, 1);
        decoder.components = vec![component];

        // DC code `0`, AC code `0` (EOB): both are 1-bit codes in the two
        // leading bits; a second all-zero byte just keeps the lookahead
        // buffer full enough for the fast-path table probe.
        let data = [0b00_000000u8, 0x00];
        let mut cursor = Cursor::new(&data[..]);

        decode_scan(&mut decoder, &mut cursor, &[0]).unwrap();

        assert!(decoder.components[0].plane.iter().all(|&v| v == 128));
    }
}
