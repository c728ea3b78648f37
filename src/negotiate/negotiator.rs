use crate::foundation::core::{CanvasSpec, DEFAULT_FPS, Fraction};
use crate::stream::descriptor::StreamDescriptor;

/// Compute the output canvas for the current set of streams.
///
/// Each stream's footprint is refreshed for `output_par` and stored on the descriptor. Streams
/// whose footprint is unavailable contribute neither size nor rate. The canvas is just large
/// enough for every footprint at its non-negative offset; the rate is the fastest announced
/// positive one, kept as its exact fraction, first-seen on ties. Without any positive rate the
/// output runs at 25/1.
#[tracing::instrument(skip(streams))]
pub fn negotiate<'a>(
    streams: impl IntoIterator<Item = &'a mut StreamDescriptor>,
    output_par: Fraction,
) -> CanvasSpec {
    let mut best_width = 0u32;
    let mut best_height = 0u32;
    let mut best_fps = 0.0f64;
    let mut best_rate = Fraction::new(0, 1);

    for stream in streams {
        let Some(fp) = stream.refresh_footprint(output_par) else {
            continue;
        };
        let offset = stream.offset();

        let this_width = fp.width.saturating_add(offset.x.max(0) as u32);
        let this_height = fp.height.saturating_add(offset.y.max(0) as u32);
        best_width = best_width.max(this_width);
        best_height = best_height.max(this_height);

        let rate = stream.fps();
        let cur_fps = rate.as_f64();
        if rate.is_positive() && cur_fps.is_finite() && best_fps < cur_fps {
            best_fps = cur_fps;
            best_rate = rate;
        }
    }

    if !best_rate.is_positive() {
        best_rate = DEFAULT_FPS;
    }

    let canvas = CanvasSpec {
        width: best_width,
        height: best_height,
        fps: best_rate,
        par: output_par,
    };
    tracing::debug!(
        "negotiated {}x{} @ {} (par {})",
        canvas.width,
        canvas.height,
        canvas.fps,
        canvas.par
    );
    canvas
}

#[cfg(test)]
#[path = "../../tests/unit/negotiate/negotiator.rs"]
mod tests;
