//! Malformed and truncated inputs: the decoder must reject these with a
//! specific error rather than panicking or silently misdecoding.
#[path = "common/mod.rs"]
mod common;

use common::{dht, dqt, flat_quant_table, raw_dht, sof0, sos, trivial_single_symbol, BitWriter, CompSpec, HuffSpec, SOI};

/// A DHT segment whose BITS counts sum past the 256 symbols a Huffman
/// table can legally hold.
#[test]
fn huffman_table_with_bits_summing_past_256_is_rejected() {
    let mut bits = [0u8; 16];
    bits[0] = 255;
    bits[1] = 255; // 510 symbols total

    let mut buf = Vec::new();
    buf.extend_from_slice(&SOI);
    buf.extend(dqt(0, flat_quant_table(1)));
    buf.extend(raw_dht(0, 0, bits, &[]));

    let mut decoder = baseline_jpeg::Decoder::new();
    let err = decoder.decode_buffer(&buf).unwrap_err();
    assert!(matches!(err, baseline_jpeg::errors::DecodeErrors::MalformedStream(_)));
}

/// A quantization or Huffman table selector naming slot 3 when only 4
/// slots (0-3) exist is fine, but slot 4 and above must be rejected.
#[test]
fn component_referencing_out_of_range_quant_table_is_rejected() {
    let dc_spec = HuffSpec::new(&[(1, 0)]);
    let ac_spec = trivial_single_symbol(0);
    let components = [CompSpec { id: 1, h: 1, v: 1, qtable: 7 }];

    let mut buf = Vec::new();
    buf.extend_from_slice(&SOI);
    buf.extend(dqt(0, flat_quant_table(1)));
    buf.extend(dht(0, 0, &dc_spec));
    buf.extend(dht(1, 0, &ac_spec));
    buf.extend(sof0(8, 8, &components));

    let mut decoder = baseline_jpeg::Decoder::new();
    let err = decoder.decode_buffer(&buf).unwrap_err();
    assert!(matches!(err, baseline_jpeg::errors::DecodeErrors::InvalidTableId(7)));
}

/// Entropy data that ends mid-block, with no EOI and no restart marker
/// to explain the stop, is a truncated file, not a valid end of scan.
#[test]
fn entropy_data_truncated_mid_block_is_rejected() {
    let dc_spec = HuffSpec::new(&[(2, 4)]);
    let ac_spec = trivial_single_symbol(0);

    let mut bw = BitWriter::new();
    bw.push_bits(0b10, 2); // category 4 code
    bw.push_bits(8, 4); // DC = 8, but no AC EOB bit follows, and no more data at all

    let components = [CompSpec { id: 1, h: 1, v: 1, qtable: 0 }];

    let mut buf = Vec::new();
    buf.extend_from_slice(&SOI);
    buf.extend(dqt(0, flat_quant_table(1)));
    buf.extend(dht(0, 0, &dc_spec));
    buf.extend(dht(1, 0, &ac_spec));
    buf.extend(sof0(8, 8, &components));
    buf.extend(sos(&[(1, 0, 0)]));
    buf.extend(bw.finish());

    let mut decoder = baseline_jpeg::Decoder::new();
    let err = decoder.decode_buffer(&buf).unwrap_err();
    assert!(matches!(err, baseline_jpeg::errors::DecodeErrors::MalformedStream(_)));
}

/// `probe` only needs enough of the stream to reach the scan header: a
/// frame header followed by a bare SOS marker (no scan data at all) is
/// already a recognizable JPEG.
#[test]
fn probe_accepts_header_only_buffer_and_rejects_garbage() {
    let dc_spec = HuffSpec::new(&[(1, 0)]);
    let ac_spec = trivial_single_symbol(0);
    let components = [CompSpec { id: 1, h: 1, v: 1, qtable: 0 }];

    let mut buf = Vec::new();
    buf.extend_from_slice(&SOI);
    buf.extend(dqt(0, flat_quant_table(1)));
    buf.extend(dht(0, 0, &dc_spec));
    buf.extend(dht(1, 0, &ac_spec));
    buf.extend(sof0(8, 8, &components));
    buf.extend_from_slice(&[0xFF, 0xDA]); // bare SOS marker, no payload needed

    assert!(baseline_jpeg::probe::probe(&buf));
    assert!(!baseline_jpeg::probe::probe(&[0, 1, 2, 3, 4, 5]));
}
