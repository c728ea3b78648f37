use crate::composite::frame::PremulPx;

/// Premultiplied source-over.
///
/// An opaque source replaces `dst`, a fully transparent one leaves it untouched.
#[inline]
pub fn over(dst: PremulPx, src: PremulPx) -> PremulPx {
    match src[3] {
        0 => dst,
        255 => src,
        sa => {
            let inv = 255u16 - u16::from(sa);
            let mut out = [0u8; 4];
            for i in 0..4 {
                out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
            }
            out
        }
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/composite/blend.rs"]
mod tests;
