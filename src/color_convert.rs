//! Chroma-to-RGB color conversion, the last stage of the decode
//! pipeline.
//!
//! ```text
//! R = Y + (91881*(Cr-128) + 32768) >> 16
//! G = Y - (22554*(Cb-128) + 46802*(Cr-128) + 32768) >> 16
//! B = Y + (116130*(Cb-128) + 32768) >> 16
//! ```
//! These are the standard ITU-R BT.601 coefficients scaled by `2^16`
//! with a half-LSB rounding bias baked into the additive constant.
#![allow(clippy::many_single_char_names)]

const SCALEBITS: i32 = 16;
const ONE_HALF: i32 = 1 << (SCALEBITS - 1);

const CR_TO_R: i32 = 91881;
const CB_TO_G: i32 = 22554;
const CR_TO_G: i32 = 46802;
const CB_TO_B: i32 = 116130;

#[inline]
fn clamp_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// Convert a single YCbCr triple to RGB.
#[inline]
pub(crate) fn ycbcr_to_rgb(y: u8, cb: u8, cr: u8) -> [u8; 3] {
    let y = i32::from(y);
    let cb = i32::from(cb) - 128;
    let cr = i32::from(cr) - 128;

    let r = y + ((CR_TO_R * cr + ONE_HALF) >> SCALEBITS);
    let g = y - ((CB_TO_G * cb + CR_TO_G * cr + ONE_HALF) >> SCALEBITS);
    let b = y + ((CB_TO_B * cb + ONE_HALF) >> SCALEBITS);

    [clamp_u8(r), clamp_u8(g), clamp_u8(b)]
}

/// Assemble the final interleaved RGB raster from three full-resolution
/// (already upsampled) component planes, cropping from the padded MCU
/// grid down to the image's actual `width x height`.
///
/// Color conversion over disjoint row ranges has no cross-row
/// dependency, so when `use_threads` is set and the image is tall
/// enough to be worth splitting, rows are handed out to a scoped
/// thread pool; the per-pixel math and output are identical either
/// way.
pub(crate) fn assemble_rgb(
    y_plane: &[u8], cb_plane: &[u8], cr_plane: &[u8], plane_stride: usize, width: usize,
    height: usize, use_threads: bool,
) -> Vec<u8> {
    let mut out = vec![0u8; width * height * 3];
    if width == 0 || height == 0 {
        return out;
    }

    let threads = num_cpus::get().max(1);
    if use_threads && height >= threads * 2 {
        let rows_per_chunk = (height + threads - 1) / threads;
        let chunk_bytes = rows_per_chunk * width * 3;
        let mut pool = scoped_threadpool::Pool::new(threads as u32);

        pool.scoped(|scope| {
            for (chunk_idx, out_chunk) in out.chunks_mut(chunk_bytes).enumerate() {
                let row_start = chunk_idx * rows_per_chunk;
                let rows_in_chunk = out_chunk.len() / (width * 3);
                scope.execute(move || {
                    convert_rgb_rows(
                        y_plane, cb_plane, cr_plane, plane_stride, width, row_start, rows_in_chunk,
                        out_chunk,
                    );
                });
            }
        });
    } else {
        convert_rgb_rows(y_plane, cb_plane, cr_plane, plane_stride, width, 0, height, &mut out);
    }

    out
}

/// Convert `rows` rows of YCbCr starting at `row_start` in the source
/// planes into interleaved RGB, writing into `out` starting at its own
/// row 0 (`out` may be a sub-slice of the full output buffer).
fn convert_rgb_rows(
    y_plane: &[u8], cb_plane: &[u8], cr_plane: &[u8], plane_stride: usize, width: usize,
    row_start: usize, rows: usize, out: &mut [u8],
) {
    for r in 0..rows {
        let src_row = (row_start + r) * plane_stride;
        let dst_row = r * width * 3;
        for col in 0..width {
            let [red, green, blue] = ycbcr_to_rgb(
                y_plane[src_row + col],
                cb_plane[src_row + col],
                cr_plane[src_row + col],
            );
            let dst = dst_row + col * 3;
            out[dst] = red;
            out[dst + 1] = green;
            out[dst + 2] = blue;
        }
    }
}

/// Crop the grayscale luma plane down to `width x height`, with no
/// color conversion needed.
pub(crate) fn assemble_grayscale(
    y_plane: &[u8], plane_stride: usize, width: usize, height: usize,
) -> Vec<u8> {
    let mut out = vec![0u8; width * height];
    for row in 0..height {
        let src = row * plane_stride;
        let dst = row * width;
        out[dst..dst + width].copy_from_slice(&y_plane[src..src + width]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_input_round_trips() {
        // Cb=Cr=128 (neutral chroma) must reproduce Y exactly.
        for y in 0..=255u8 {
            assert_eq!(ycbcr_to_rgb(y, 128, 128), [y, y, y]);
        }
    }

    #[test]
    fn all_channels_clamp_to_byte_range() {
        let [r, g, b] = ycbcr_to_rgb(255, 255, 255);
        assert!(r <= 255 && g <= 255 && b <= 255);
        let [r, g, b] = ycbcr_to_rgb(0, 0, 0);
        assert!(r <= 255 && g <= 255 && b <= 255);
    }

    #[test]
    fn threaded_and_serial_rgb_assembly_agree() {
        let width = 9;
        let height = 37; // deliberately not a multiple of any likely thread count
        let y: Vec<u8> = (0..width * height).map(|i| (i % 256) as u8).collect();
        let cb = vec![140u8; width * height];
        let cr = vec![90u8; width * height];

        let serial = assemble_rgb(&y, &cb, &cr, width, width, height, false);
        let threaded = assemble_rgb(&y, &cb, &cr, width, width, height, true);
        assert_eq!(serial, threaded);
    }

    #[test]
    fn assemble_grayscale_crops_padding() {
        // 8x8 padded plane, only top-left 3x2 is real image data.
        let plane = vec![7u8; 64];
        let out = assemble_grayscale(&plane, 8, 3, 2);
        assert_eq!(out, vec![7u8; 6]);
    }
}
