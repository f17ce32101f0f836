//! Chroma plane up-sampling.
//!
//! A component's decoded plane may be smaller than the image's luma
//! plane whenever its sampling factors are below `(Hmax, Vmax)`. This
//! module brings such a plane up to full resolution before color
//! conversion, picking one of three strategies per spec section 4.6:
//!
//!  - no-op, when the component isn't sub-sampled at all
//!  - "fancy" 9-3-3-1 weighted interpolation, for the common 4:2:0 case
//!    where both factors are exactly half of `(Hmax, Vmax)`
//!  - general bilinear interpolation, for every other ratio (4:2:2,
//!    4:1:1, and anything an encoder might produce)

/// An upsampling function: given a component's plane (row-major,
/// `src_w * src_h` samples) and the full-resolution dimensions it should
/// be expanded to, returns a full-resolution row-major byte plane.
pub(crate) type Upsampler = fn(&[i16], usize, usize, usize, usize) -> Vec<u8>;

/// Pick the upsampling strategy for a component given its sampling
/// factors and the frame's maximum sampling factors.
pub(crate) fn choose_upsampler(h: usize, v: usize, h_max: usize, v_max: usize) -> Upsampler {
    if h == h_max && v == v_max {
        upsample_no_op
    } else if h_max % h == 0 && v_max % v == 0 && h_max / h == 2 && v_max / v == 2 {
        upsample_fancy_h2v2
    } else {
        upsample_bilinear
    }
}

#[inline]
fn clamp_u8(v: i16) -> u8 {
    v.clamp(0, 255) as u8
}

/// A component that isn't sub-sampled: just clamp/cast into place.
pub(crate) fn upsample_no_op(
    src: &[i16], src_w: usize, _src_h: usize, dst_w: usize, dst_h: usize,
) -> Vec<u8> {
    let mut out = vec![0u8; dst_w * dst_h];
    for y in 0..dst_h {
        for x in 0..dst_w {
            out[y * dst_w + x] = clamp_u8(src[y * src_w + x]);
        }
    }
    out
}

/// Blend each source row 3:1 against its nearest vertical neighbor,
/// producing two output rows (near-above-weighted, near-below-weighted)
/// per source row. Edge rows are clamped by reusing the center row as
/// their own neighbor.
fn blend_rows_vertical(src: &[i16], src_w: usize, src_h: usize) -> Vec<i16> {
    let mut out = vec![0i16; src_w * src_h * 2];

    for row in 0..src_h {
        let near = &src[row * src_w..(row + 1) * src_w];
        let above_row = row.saturating_sub(1);
        let below_row = (row + 1).min(src_h - 1);

        let (out_even, rest) = out[row * 2 * src_w..].split_at_mut(src_w);
        let out_odd = &mut rest[..src_w];

        for x in 0..src_w {
            let above = src[above_row * src_w + x];
            let below = src[below_row * src_w + x];
            out_even[x] = (i32::from(near[x]) * 3 + i32::from(above) + 2) as i16 >> 2;
            out_odd[x] = (i32::from(near[x]) * 3 + i32::from(below) + 2) as i16 >> 2;
        }
    }

    out
}

/// Expand one row 2x horizontally with the same 3:1 triangle filter,
/// clamping to `dst_w` (which may be one sample short of `2*src_w` for
/// an odd image width).
fn expand_row_horizontal(src: &[i16], dst_w: usize) -> Vec<i16> {
    let src_w = src.len();
    let mut out = vec![0i16; dst_w];

    if src_w == 0 {
        return out;
    }
    if src_w == 1 {
        out.fill(src[0]);
        return out;
    }

    out[0] = src[0];
    if dst_w > 1 {
        out[1] = (i32::from(src[0]) * 3 + i32::from(src[1]) + 2) as i16 >> 2;
    }

    for i in 1..src_w - 1 {
        let sample = i32::from(src[i]) * 3 + 2;
        if 2 * i < dst_w {
            out[2 * i] = (sample + i32::from(src[i - 1])) as i16 >> 2;
        }
        if 2 * i + 1 < dst_w {
            out[2 * i + 1] = (sample + i32::from(src[i + 1])) as i16 >> 2;
        }
    }

    let last = src_w - 1;
    if 2 * last < dst_w {
        out[2 * last] = (i32::from(src[last - 1]) * 3 + i32::from(src[last]) + 2) as i16 >> 2;
    }
    if 2 * last + 1 < dst_w {
        out[2 * last + 1] = src[last];
    }

    out
}

/// "Fancy" 4:2:0 upsampling: a two-pass separable 3:1 triangle filter
/// (vertical, then horizontal) whose combined corner weights work out
/// to the 9:3:3:1 blend from spec section 4.6.
pub(crate) fn upsample_fancy_h2v2(
    src: &[i16], src_w: usize, src_h: usize, dst_w: usize, dst_h: usize,
) -> Vec<u8> {
    if src_w == 0 || src_h == 0 {
        return vec![0u8; dst_w * dst_h];
    }

    let blended = blend_rows_vertical(src, src_w, src_h);
    let blended_rows = src_h * 2;
    let mut out = vec![0u8; dst_w * dst_h];

    for row in 0..dst_h {
        let src_row_idx = row.min(blended_rows - 1);
        let src_row = &blended[src_row_idx * src_w..(src_row_idx + 1) * src_w];
        let expanded = expand_row_horizontal(src_row, dst_w);
        for (x, &v) in expanded.iter().enumerate() {
            out[row * dst_w + x] = clamp_u8(v);
        }
    }

    out
}

/// General bilinear upsampling for any other subsampling ratio, with
/// sample centers at `(x+0.5)*src/dst - 0.5` clamped to `[0, src-1]`.
pub(crate) fn upsample_bilinear(
    src: &[i16], src_w: usize, src_h: usize, dst_w: usize, dst_h: usize,
) -> Vec<u8> {
    if src_w == 0 || src_h == 0 {
        return vec![0u8; dst_w * dst_h];
    }

    let mut out = vec![0u8; dst_w * dst_h];

    for dy in 0..dst_h {
        let sy = ((dy as f64 + 0.5) * src_h as f64 / dst_h as f64 - 0.5)
            .clamp(0.0, (src_h - 1) as f64);
        let y0 = sy.floor() as usize;
        let y1 = (y0 + 1).min(src_h - 1);
        let fy = sy - y0 as f64;

        for dx in 0..dst_w {
            let sx = ((dx as f64 + 0.5) * src_w as f64 / dst_w as f64 - 0.5)
                .clamp(0.0, (src_w - 1) as f64);
            let x0 = sx.floor() as usize;
            let x1 = (x0 + 1).min(src_w - 1);
            let fx = sx - x0 as f64;

            let v00 = f64::from(src[y0 * src_w + x0]);
            let v01 = f64::from(src[y0 * src_w + x1]);
            let v10 = f64::from(src[y1 * src_w + x0]);
            let v11 = f64::from(src[y1 * src_w + x1]);

            let top = v00 * (1.0 - fx) + v01 * fx;
            let bottom = v10 * (1.0 - fx) + v11 * fx;
            let v = top * (1.0 - fy) + bottom * fy;

            out[dy * dst_w + dx] = v.round().clamp(0.0, 255.0) as u8;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_op_passes_through_clamped() {
        let src = [10i16, 300, -5, 40];
        let out = upsample_no_op(&src, 2, 2, 2, 2);
        assert_eq!(out, vec![10, 255, 0, 40]);
    }

    #[test]
    fn fancy_h2v2_doubles_each_dimension() {
        // A flat chroma plane should stay flat after fancy upsampling.
        let src = vec![64i16; 4 * 4];
        let out = upsample_fancy_h2v2(&src, 4, 4, 8, 8);
        assert!(out.iter().all(|&v| v == 64));
    }

    #[test]
    fn bilinear_flat_plane_stays_flat() {
        let src = vec![200i16; 3 * 2];
        let out = upsample_bilinear(&src, 3, 2, 6, 4);
        assert!(out.iter().all(|&v| v == 200));
    }
}
