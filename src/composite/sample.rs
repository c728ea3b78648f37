use crate::composite::frame::{Frame, PremulPx};

/// Bilinear sample of `src` at `(x, y)`.
///
/// Coordinates outside `[0, width-1] x [0, height-1]` (or non-finite) have no source and yield
/// `None`. Neighbours past the last row/column clamp to it, so sampling the far edge exactly
/// reads only in-bounds pixels.
#[inline]
pub fn sample_bilinear(src: &Frame, x: f32, y: f32) -> Option<PremulPx> {
    if src.width == 0 || src.height == 0 || !x.is_finite() || !y.is_finite() {
        return None;
    }
    let max_x = (src.width - 1) as f32;
    let max_y = (src.height - 1) as f32;
    if x < 0.0 || y < 0.0 || x > max_x || y > max_y {
        return None;
    }

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(src.width - 1);
    let y1 = (y0 + 1).min(src.height - 1);
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let p00 = src.pixel(x0, y0)?;
    let p10 = src.pixel(x1, y0)?;
    let p01 = src.pixel(x0, y1)?;
    let p11 = src.pixel(x1, y1)?;

    let w00 = (1.0 - fx) * (1.0 - fy);
    let w10 = fx * (1.0 - fy);
    let w01 = (1.0 - fx) * fy;
    let w11 = fx * fy;

    let mut out = [0u8; 4];
    for c in 0..4 {
        let v = f32::from(p00[c]) * w00
            + f32::from(p10[c]) * w10
            + f32::from(p01[c]) * w01
            + f32::from(p11[c]) * w11;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    // Rounding each channel independently can push a colour past its alpha.
    for c in 0..3 {
        out[c] = out[c].min(out[3]);
    }
    Some(out)
}

#[cfg(test)]
#[path = "../../tests/unit/composite/sample.rs"]
mod tests;
