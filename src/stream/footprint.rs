//! Display-aspect-ratio correction of a stream's requested size.

use crate::foundation::core::{Footprint, Fraction};
use crate::foundation::math::{reduce, scale_u64};

/// Reduced display aspect ratio `dar_n/dar_d` of a `width x height` picture with pixel aspect
/// `in_par`, shown on an output with pixel aspect `out_par`.
///
/// `None` when any input term is non-positive or the reduced ratio does not fit in `i32`.
pub fn display_ratio(
    width: u32,
    height: u32,
    in_par: Fraction,
    out_par: Fraction,
) -> Option<(u32, u32)> {
    if width == 0 || height == 0 || !in_par.is_positive() || !out_par.is_positive() {
        return None;
    }
    let num = u128::from(width) * in_par.num as u128 * out_par.den as u128;
    let den = u128::from(height) * in_par.den as u128 * out_par.num as u128;
    let (n, d) = reduce(num, den);
    let limit = i32::MAX as u128;
    if n == 0 || d == 0 || n > limit || d > limit {
        return None;
    }
    Some((n as u32, d as u32))
}

/// Rescale one axis of `width x height` so the result has aspect `dar`.
///
/// The height is kept whenever it is a multiple of `dar_n`, then the width when it is a
/// multiple of `dar_d`; otherwise the height is kept and the width truncated. The order is
/// load-bearing for reproducible canvas sizes.
pub fn scale_to_display_ratio(width: u32, height: u32, dar: (u32, u32)) -> Option<Footprint> {
    let (dar_n, dar_d) = dar;
    if dar_n == 0 || dar_d == 0 {
        return None;
    }
    let (w, h) = if height % dar_n == 0 {
        let w = scale_u64(u64::from(height), u64::from(dar_n), u64::from(dar_d))?;
        (w, u64::from(height))
    } else if width % dar_d == 0 {
        let h = scale_u64(u64::from(width), u64::from(dar_d), u64::from(dar_n))?;
        (u64::from(width), h)
    } else {
        let w = scale_u64(u64::from(height), u64::from(dar_n), u64::from(dar_d))?;
        (w, u64::from(height))
    };

    let limit = i32::MAX as u64;
    if w == 0 || h == 0 || w > limit || h > limit {
        return None;
    }
    Some(Footprint {
        width: w as u32,
        height: h as u32,
    })
}

/// Canvas footprint of a `requested_width x requested_height` picture, or `None` while it
/// cannot be resolved.
pub fn compute_footprint(
    requested_width: u32,
    requested_height: u32,
    input_par: Fraction,
    output_par: Fraction,
) -> Option<Footprint> {
    let dar = display_ratio(requested_width, requested_height, input_par, output_par)?;
    tracing::trace!(
        "scaling {requested_width}x{requested_height} by {}/{} ({input_par} / {output_par})",
        dar.0,
        dar.1
    );
    scale_to_display_ratio(requested_width, requested_height, dar)
}

#[cfg(test)]
#[path = "../../tests/unit/stream/footprint.rs"]
mod tests;
