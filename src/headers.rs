//! Marker-segment parsing.
//!
//! Everything before the entropy-coded scan data is a sequence of
//! marker segments: a `0xFF` byte, a one-byte marker code, and (for
//! every marker except the handful of bare ones like SOI/EOI/RSTn) a
//! two-byte big-endian length covering the segment payload, length
//! field included.
use std::io::Cursor;

use crate::components::Components;
use crate::decoder::Decoder;
use crate::errors::{DecodeErrors, UnsupportedSchemes};
use crate::huffman::HuffmanTable;
use crate::marker::Marker;
use crate::misc::{read_byte, read_exact, read_u16_be, skip_bytes, ColorSpace, UN_ZIGZAG};

/// Scan the stream for the next marker, tolerating the two distinct
/// stuffing conventions that can precede one outside entropy-coded
/// data: runs of `0xFF` pad bytes, and non-`0xFF` garbage when
/// `strict_mode` is off.
///
/// Unlike the bit source's destuffing (which only ever sees `0xFF 0x00`
/// inside a scan), a marker-to-marker walk can legitimately encounter
/// `0xFF 0xFF` padding before the real marker code; that run is simply
/// skipped here rather than treated as a stuffed zero.
pub(crate) fn next_marker(decoder: &Decoder, cursor: &mut Cursor<&[u8]>) -> Result<Marker, DecodeErrors> {
    let mut garbage = 0usize;

    loop {
        let byte = read_byte(cursor)?;
        if byte != 0xFF {
            garbage += 1;
            if decoder.options.strict_mode && garbage > 2 {
                return Err(DecodeErrors::MalformedStream(
                    "Found non-marker bytes while scanning for the next marker".to_string(),
                ));
            }
            continue;
        }

        let mut code = read_byte(cursor)?;
        while code == 0xFF {
            code = read_byte(cursor)?;
        }

        if code == 0x00 {
            // A stuffed zero has no business appearing outside scan
            // data; tolerate it the same as any other garbage byte.
            continue;
        }

        return Marker::from_u8(code).ok_or_else(|| {
            DecodeErrors::MalformedStream(format!("Unknown or reserved marker 0xFF{code:02X}"))
        });
    }
}

/// Read a length-prefixed segment's declared end position, validating
/// that the length field is at least large enough to cover itself.
fn segment_end(cursor: &mut Cursor<&[u8]>) -> Result<u64, DecodeErrors> {
    let length = read_u16_be(cursor)?;
    if length < 2 {
        return Err(DecodeErrors::MalformedStream(
            "Segment length must be at least 2".to_string(),
        ));
    }
    Ok(cursor.position() + u64::from(length) - 2)
}

/// **B.2.4.1 Quantization table-specification syntax**
pub(crate) fn parse_dqt(decoder: &mut Decoder, cursor: &mut Cursor<&[u8]>) -> Result<(), DecodeErrors> {
    let end = segment_end(cursor)?;

    while cursor.position() < end {
        let pq_tq = read_byte(cursor)?;
        let precision = pq_tq >> 4;
        let table_id = usize::from(pq_tq & 0x0F);

        if table_id >= 4 {
            return Err(DecodeErrors::InvalidTableId(pq_tq & 0x0F));
        }
        if precision != 0 {
            return Err(DecodeErrors::UnsupportedFeature(UnsupportedSchemes::SamplePrecision(16)));
        }

        let mut raw = [0u8; 64];
        read_exact(cursor, &mut raw)?;

        let mut natural = [0i32; 64];
        for (k, &v) in raw.iter().enumerate() {
            natural[UN_ZIGZAG[k]] = i32::from(v);
        }

        trace!("Loaded quantization table {}", table_id);
        decoder.qt_tables[table_id] = Some(natural);
    }

    Ok(())
}

/// **B.2.4.2 Huffman table-specification syntax**
pub(crate) fn parse_huffman(decoder: &mut Decoder, cursor: &mut Cursor<&[u8]>) -> Result<(), DecodeErrors> {
    let end = segment_end(cursor)?;

    while cursor.position() < end {
        let tc_th = read_byte(cursor)?;
        let is_ac = (tc_th >> 4) & 1 == 1;
        let table_id = usize::from(tc_th & 0x0F);

        if table_id >= 4 {
            return Err(DecodeErrors::InvalidTableId(tc_th & 0x0F));
        }

        let mut bits = [0u8; 16];
        read_exact(cursor, &mut bits)?;

        let total: usize = bits.iter().map(|&b| usize::from(b)).sum();
        if total > 256 {
            return Err(DecodeErrors::MalformedStream(
                "Huffman table BITS counts sum to more than 256 symbols".to_string(),
            ));
        }

        let mut values = vec![0u8; total];
        read_exact(cursor, &mut values)?;

        let table = HuffmanTable::new(&bits, values, is_ac)?;

        trace!(
            "Loaded {} Huffman table {}",
            if is_ac { "AC" } else { "DC" },
            table_id
        );

        if is_ac {
            decoder.ac_huffman_tables[table_id] = Some(table);
        } else {
            decoder.dc_huffman_tables[table_id] = Some(table);
        }
    }

    Ok(())
}

fn unsupported_sof(sof_id: u8) -> DecodeErrors {
    let scheme = match sof_id {
        1 => UnsupportedSchemes::ExtendedSequentialHuffman,
        2 => UnsupportedSchemes::ProgressiveDctHuffman,
        3 => UnsupportedSchemes::LosslessHuffman,
        9 => UnsupportedSchemes::ExtendedSequentialDctArithmetic,
        10 => UnsupportedSchemes::ProgressiveDctArithmetic,
        11 => UnsupportedSchemes::LosslessArithmetic,
        _ => UnsupportedSchemes::ExtendedSequentialHuffman,
    };
    DecodeErrors::UnsupportedFeature(scheme)
}

/// **B.2.2 Frame header syntax**. `sof_id` is the SOF variant number
/// (`SOFn` minus `0xC0`); only `0` (baseline DCT, Huffman coding) is
/// supported.
pub(crate) fn parse_start_of_frame(
    decoder: &mut Decoder, sof_id: u8, cursor: &mut Cursor<&[u8]>,
) -> Result<(), DecodeErrors> {
    if sof_id != 0 {
        return Err(unsupported_sof(sof_id));
    }

    let _end = segment_end(cursor)?;

    let precision = read_byte(cursor)?;
    if precision != 8 {
        return Err(DecodeErrors::UnsupportedFeature(UnsupportedSchemes::SamplePrecision(precision)));
    }

    let height = read_u16_be(cursor)?;
    let width = read_u16_be(cursor)?;

    if width == 0 || height == 0 {
        return Err(DecodeErrors::MalformedStream(
            "Image dimensions cannot be zero".to_string(),
        ));
    }
    if usize::from(width) > decoder.options.max_width || usize::from(height) > decoder.options.max_height
    {
        return Err(DecodeErrors::MalformedStream(format!(
            "Image dimensions {width}x{height} exceed the configured maximum"
        )));
    }

    let num_components = read_byte(cursor)?;
    if num_components != 1 && num_components != 3 {
        return Err(DecodeErrors::UnsupportedFeature(UnsupportedSchemes::TooManyComponents(
            num_components,
        )));
    }

    decoder.width = width;
    decoder.height = height;
    decoder.input_colorspace = if num_components == 1 {
        ColorSpace::GRAYSCALE
    } else {
        ColorSpace::YCbCr
    };

    let mut components = Vec::with_capacity(usize::from(num_components));
    let mut h_max = 1usize;
    let mut v_max = 1usize;

    for _ in 0..num_components {
        let mut raw = [0u8; 3];
        read_exact(cursor, &mut raw)?;
        let component = Components::from(raw)?;
        h_max = h_max.max(component.horizontal_sample);
        v_max = v_max.max(component.vertical_sample);
        components.push(component);
    }

    decoder.h_max = h_max;
    decoder.v_max = v_max;

    let mcu_x = (usize::from(width) + 8 * h_max - 1) / (8 * h_max);
    let mcu_y = (usize::from(height) + 8 * v_max - 1) / (8 * v_max);
    decoder.mcu_x = mcu_x;
    decoder.mcu_y = mcu_y;

    for component in &mut components {
        let table_id = usize::from(component.quantization_table_number);
        let table = decoder.qt_tables[table_id].ok_or(DecodeErrors::InvalidTableId(
            component.quantization_table_number,
        ))?;
        component.quantization_table = crate::misc::Aligned32(table);
        component.setup_plane(mcu_x, mcu_y, h_max, v_max);
    }

    debug!(
        "Frame header parsed: {}x{}, {} component(s), MCU grid {}x{}",
        width, height, num_components, mcu_x, mcu_y
    );

    decoder.components = components;
    Ok(())
}

/// **B.2.3 Scan header syntax**. Returns the scan's component order as
/// indices into `decoder.components`, and records each scanned
/// component's selected Huffman tables.
pub(crate) fn parse_sos(
    decoder: &mut Decoder, cursor: &mut Cursor<&[u8]>,
) -> Result<Vec<usize>, DecodeErrors> {
    let _end = segment_end(cursor)?;

    let ns = read_byte(cursor)?;
    if usize::from(ns) != decoder.components.len() {
        return Err(DecodeErrors::MalformedStream(
            "Start Of Scan component count does not match the frame header".to_string(),
        ));
    }

    let mut scan_order = Vec::with_capacity(usize::from(ns));

    for _ in 0..ns {
        let component_selector = read_byte(cursor)?;
        let td_ta = read_byte(cursor)?;
        let dc_sel = usize::from(td_ta >> 4);
        let ac_sel = usize::from(td_ta & 0x0F);

        if dc_sel >= 4 {
            return Err(DecodeErrors::InvalidTableId(td_ta >> 4));
        }
        if ac_sel >= 4 {
            return Err(DecodeErrors::InvalidTableId(td_ta & 0x0F));
        }

        let target = match component_selector {
            1 => crate::components::ComponentID::Y,
            2 => crate::components::ComponentID::Cb,
            3 => crate::components::ComponentID::Cr,
            other => {
                return Err(DecodeErrors::MalformedStream(format!(
                    "Scan references unknown component id {other}"
                )))
            }
        };

        let idx = decoder
            .components
            .iter()
            .position(|c| c.component_id == target)
            .ok_or_else(|| {
                DecodeErrors::MalformedStream(
                    "Scan references a component not present in the frame header".to_string(),
                )
            })?;

        if decoder.dc_huffman_tables[dc_sel].is_none() {
            return Err(DecodeErrors::InvalidTableId(td_ta >> 4));
        }
        if decoder.ac_huffman_tables[ac_sel].is_none() {
            return Err(DecodeErrors::InvalidTableId(td_ta & 0x0F));
        }

        decoder.components[idx].dc_huff_table = dc_sel;
        decoder.components[idx].ac_huff_table = ac_sel;
        scan_order.push(idx);
    }

    // Spectral selection start/end and successive-approximation bits:
    // meaningless outside progressive scans, but still present on the
    // wire and must be consumed.
    skip_bytes(cursor, 3)?;

    Ok(scan_order)
}

/// **B.2.4.4 Restart interval definition syntax**
pub(crate) fn parse_dri(decoder: &mut Decoder, cursor: &mut Cursor<&[u8]>) -> Result<(), DecodeErrors> {
    let length = read_u16_be(cursor)?;
    if length != 4 {
        return Err(DecodeErrors::MalformedStream(
            "Define Restart Interval segment must be exactly 4 bytes".to_string(),
        ));
    }
    let interval = read_u16_be(cursor)?;
    debug!("Restart interval set to {} MCUs", interval);
    decoder.restart_interval = usize::from(interval);
    Ok(())
}

/// Application-specific segments are always skipped by their declared
/// length. APP0 carries JFIF pixel density, read here as a bonus that
/// never blocks decoding when absent or malformed.
pub(crate) fn parse_app(decoder: &mut Decoder, app_id: u8, cursor: &mut Cursor<&[u8]>) -> Result<(), DecodeErrors> {
    let end = segment_end(cursor)?;

    if app_id == 0 && end >= cursor.position() + 12 {
        let mut identifier = [0u8; 5];
        read_exact(cursor, &mut identifier)?;
        if &identifier == b"JFIF\0" {
            skip_bytes(cursor, 3)?; // version (2 bytes) + density units (1 byte)
            let x_density = read_u16_be(cursor)?;
            let y_density = read_u16_be(cursor)?;
            decoder.jfif_density = Some((x_density, y_density));
        }
    }

    skip_bytes(cursor, (end - cursor.position()) as usize)
}

/// Skip a generic length-prefixed segment whose contents this decoder
/// has no use for (COM, and APPn segments that weren't JFIF APP0).
pub(crate) fn skip_segment(cursor: &mut Cursor<&[u8]>) -> Result<(), DecodeErrors> {
    let end = segment_end(cursor)?;
    skip_bytes(cursor, (end - cursor.position()) as usize)
}
