//! End-to-end decode scenarios against hand-built, fixture-free JPEG
//! buffers: a single 4:4:4 MCU, a multi-MCU grayscale gradient, 4:2:0
//! subsampling across four quadrants, restart intervals, and
//! `FF 00` byte-stuffing round-tripping through the bit reader.
#[path = "common/mod.rs"]
mod common;

use common::{dht, dqt, dri, flat_quant_table, sof0, sos, trivial_single_symbol, BitWriter, CompSpec, HuffSpec, EOI, SOI};

/// One 8x8 MCU, 4:4:4 (no subsampling), three components each a flat
/// DC-only block: Y=16, Cb=8, Cr=-8 against a unit quantizer.
#[test]
fn solid_color_4_4_4_mcu_decodes_to_expected_rgb() {
    let dc_spec = HuffSpec::new(&[(1, 0), (2, 4), (2, 5)]);
    let ac_spec = trivial_single_symbol(0); // EOB

    let mut bw = BitWriter::new();
    bw.push_bits(0b11, 2); // category 5
    bw.push_bits(16, 5); // Y DC = 16
    bw.push_bits(0, 1); // AC EOB

    bw.push_bits(0b10, 2); // category 4
    bw.push_bits(8, 4); // Cb DC = 8
    bw.push_bits(0, 1);

    bw.push_bits(0b10, 2); // category 4
    bw.push_bits(7, 4); // Cr DC = -8 (v=7 < threshold 8 -> 7 - 15)
    bw.push_bits(0, 1);

    let components = [
        CompSpec { id: 1, h: 1, v: 1, qtable: 0 },
        CompSpec { id: 2, h: 1, v: 1, qtable: 0 },
        CompSpec { id: 3, h: 1, v: 1, qtable: 0 },
    ];

    let mut buf = Vec::new();
    buf.extend_from_slice(&SOI);
    buf.extend(dqt(0, flat_quant_table(1)));
    buf.extend(dht(0, 0, &dc_spec));
    buf.extend(dht(1, 0, &ac_spec));
    buf.extend(sof0(8, 8, &components));
    buf.extend(sos(&[(1, 0, 0), (2, 0, 0), (3, 0, 0)]));
    buf.extend(bw.finish());
    buf.extend_from_slice(&EOI);

    let mut decoder = baseline_jpeg::Decoder::new();
    let pixels = decoder.decode_buffer(&buf).unwrap();

    assert_eq!(decoder.width(), 8);
    assert_eq!(decoder.height(), 8);
    assert_eq!(decoder.output_colorspace(), baseline_jpeg::ColorSpace::RGB);
    assert_eq!(pixels.len(), 8 * 8 * 3);
    assert!(pixels.chunks_exact(3).all(|px| px == [129, 130, 132]));
}

/// 16x8 grayscale, two MCUs side by side; DC prediction carries the
/// second block's differential on top of the first, producing two
/// distinct flat shades left-to-right.
#[test]
fn two_mcu_grayscale_gradient_carries_dc_prediction() {
    let dc_spec = HuffSpec::new(&[(1, 4), (1, 5)]);
    let ac_spec = trivial_single_symbol(0);

    let mut bw = BitWriter::new();
    bw.push_bits(0, 1); // category 4 code
    bw.push_bits(8, 4); // DC = 8
    bw.push_bits(0, 1); // AC EOB

    bw.push_bits(1, 1); // category 5 code
    bw.push_bits(16, 5); // diff = 16, predictor 8 -> 24
    bw.push_bits(0, 1);

    let components = [CompSpec { id: 1, h: 1, v: 1, qtable: 0 }];

    let mut buf = Vec::new();
    buf.extend_from_slice(&SOI);
    buf.extend(dqt(0, flat_quant_table(1)));
    buf.extend(dht(0, 0, &dc_spec));
    buf.extend(dht(1, 0, &ac_spec));
    buf.extend(sof0(16, 8, &components));
    buf.extend(sos(&[(1, 0, 0)]));
    buf.extend(bw.finish());
    buf.extend_from_slice(&EOI);

    let mut decoder = baseline_jpeg::Decoder::new();
    let pixels = decoder.decode_buffer(&buf).unwrap();

    assert_eq!(decoder.output_colorspace(), baseline_jpeg::ColorSpace::GRAYSCALE);
    for row in 0..8 {
        let row_start = row * 16;
        assert!(pixels[row_start..row_start + 8].iter().all(|&v| v == 129));
        assert!(pixels[row_start + 8..row_start + 16].iter().all(|&v| v == 131));
    }
}

/// 16x16, 4:2:0 (Y at 2x2, Cb/Cr at 1x1): four Y blocks each a
/// different flat DC against neutral chroma, producing four distinct
/// gray quadrants after fancy upsampling blends the chroma planes.
#[test]
fn four_two_zero_subsampling_produces_four_quadrants() {
    let dc_spec = HuffSpec::new(&[(1, 0), (1, 4)]);
    let ac_spec = trivial_single_symbol(0);

    let mut bw = BitWriter::new();
    for _ in 0..4 {
        bw.push_bits(1, 1); // category 4 code, diff = +8 each time
        bw.push_bits(8, 4);
        bw.push_bits(0, 1); // AC EOB
    }
    // Cb, then Cr: flat, neutral.
    for _ in 0..2 {
        bw.push_bits(0, 1); // category 0 code, diff = 0
        bw.push_bits(0, 1); // AC EOB
    }

    let components = [
        CompSpec { id: 1, h: 2, v: 2, qtable: 0 },
        CompSpec { id: 2, h: 1, v: 1, qtable: 0 },
        CompSpec { id: 3, h: 1, v: 1, qtable: 0 },
    ];

    let mut buf = Vec::new();
    buf.extend_from_slice(&SOI);
    buf.extend(dqt(0, flat_quant_table(1)));
    buf.extend(dht(0, 0, &dc_spec));
    buf.extend(dht(1, 0, &ac_spec));
    buf.extend(sof0(16, 16, &components));
    buf.extend(sos(&[(1, 0, 0), (2, 0, 0), (3, 0, 0)]));
    buf.extend(bw.finish());
    buf.extend_from_slice(&EOI);

    let mut decoder = baseline_jpeg::Decoder::new();
    let pixels = decoder.decode_buffer(&buf).unwrap();

    let at = |x: usize, y: usize| -> [u8; 3] {
        let idx = (y * 16 + x) * 3;
        [pixels[idx], pixels[idx + 1], pixels[idx + 2]]
    };

    assert_eq!(at(0, 0), [129, 129, 129]);
    assert_eq!(at(15, 0), [130, 130, 130]);
    assert_eq!(at(0, 15), [131, 131, 131]);
    assert_eq!(at(15, 15), [132, 132, 132]);
}

/// A restart interval of 1 MCU: the DC predictor resets at every
/// boundary, so two MCUs that each encode the *same* differential
/// decode to the *same* absolute DC, not a cumulative one.
#[test]
fn restart_interval_resets_dc_prediction() {
    let buf = build_restart_stream(&[0xFF, 0xD0]);
    let mut decoder = baseline_jpeg::Decoder::new();
    let pixels = decoder.decode_buffer(&buf).unwrap();
    assert!(pixels.iter().all(|&v| v == 129));
}

/// The same stream, but with the restart marker swapped out for
/// something else: the scan decoder must reject it rather than
/// silently resync.
#[test]
fn missing_restart_marker_is_rejected() {
    let buf = build_restart_stream(&[0xFF, 0xD9]); // EOI where a RSTn belongs
    let mut decoder = baseline_jpeg::Decoder::new();
    let err = decoder.decode_buffer(&buf).unwrap_err();
    assert!(matches!(err, baseline_jpeg::errors::DecodeErrors::RestartMismatch));
}

fn build_restart_stream(restart_marker: &[u8]) -> Vec<u8> {
    let dc_spec = HuffSpec::new(&[(1, 4)]);
    let ac_spec = trivial_single_symbol(0);

    let mcu_bits = || {
        let mut bw = BitWriter::new();
        bw.push_bits(0, 1); // category 4 code
        bw.push_bits(8, 4); // diff = 8
        bw.push_bits(0, 1); // AC EOB
        bw.finish()
    };

    let components = [CompSpec { id: 1, h: 1, v: 1, qtable: 0 }];

    let mut buf = Vec::new();
    buf.extend_from_slice(&SOI);
    buf.extend(dqt(0, flat_quant_table(1)));
    buf.extend(dht(0, 0, &dc_spec));
    buf.extend(dht(1, 0, &ac_spec));
    buf.extend(sof0(16, 8, &components));
    buf.extend(dri(1));
    buf.extend(sos(&[(1, 0, 0)]));
    buf.extend(mcu_bits());
    buf.extend_from_slice(restart_marker);
    buf.extend(mcu_bits());
    buf.extend_from_slice(&EOI);
    buf
}

/// A Huffman code long enough (8 bits) to land on a literal `0xFF`
/// byte inside the packed entropy stream; the encoder must stuff a
/// trailing `0x00` and the bit reader must destuff it back out,
/// recovering the original code.
#[test]
fn ff_00_byte_stuffing_round_trips() {
    let dc_spec = HuffSpec::new(&[(8, 0)]); // one 8-bit code: 0b11111111
    let ac_spec = trivial_single_symbol(0);

    let mut bw = BitWriter::new();
    bw.push_bits(0xFF, 8); // the only valid DC code, forces a raw 0xFF byte
    bw.push_bits(0, 1); // AC EOB
    let entropy = bw.finish();
    assert_eq!(entropy[0], 0xFF);
    assert_eq!(entropy[1], 0x00, "encoder must stuff a zero after a literal 0xFF byte");

    let components = [CompSpec { id: 1, h: 1, v: 1, qtable: 0 }];

    let mut buf = Vec::new();
    buf.extend_from_slice(&SOI);
    buf.extend(dqt(0, flat_quant_table(1)));
    buf.extend(dht(0, 0, &dc_spec));
    buf.extend(dht(1, 0, &ac_spec));
    buf.extend(sof0(8, 8, &components));
    buf.extend(sos(&[(1, 0, 0)]));
    buf.extend(entropy);
    buf.extend_from_slice(&EOI);

    let mut decoder = baseline_jpeg::Decoder::new();
    let pixels = decoder.decode_buffer(&buf).unwrap();
    assert!(pixels.iter().all(|&v| v == 128));
}
