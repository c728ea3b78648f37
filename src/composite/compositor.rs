use rayon::prelude::*;

use crate::composite::blend::over;
use crate::composite::frame::Frame;
use crate::composite::sample::sample_bilinear;
use crate::map::transform_map::TransformMap;
use crate::stream::descriptor::StreamDescriptor;

/// Knobs for [`composite`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CompositorOpts {
    /// Split each stream's destination rows across the rayon pool. Output is byte-identical
    /// to the serial path.
    pub parallel: bool,
}

/// One stream's ready frame for the current tick.
#[derive(Clone, Copy, Debug)]
pub struct StreamInput<'a> {
    pub frame: &'a Frame,
    pub stream: &'a StreamDescriptor,
}

/// Resample every ready input through its map into `canvas`, in the given order.
///
/// Streams without a map, without a negotiated footprint, or with a malformed frame are
/// skipped. Destination pixels with no source keep their current value. Returns the number
/// of streams that touched the canvas.
#[tracing::instrument(skip_all, fields(inputs = inputs.len()))]
pub fn composite(canvas: &mut Frame, inputs: &[StreamInput<'_>], opts: CompositorOpts) -> usize {
    if !canvas.is_well_formed() {
        tracing::warn!(
            "output buffer is {} bytes, expected {}x{}x4",
            canvas.data.len(),
            canvas.width,
            canvas.height
        );
        return 0;
    }

    let mut drawn = 0usize;
    for input in inputs {
        let stream = input.stream;
        let Some(map) = stream.map() else {
            continue;
        };
        let Some(fp) = stream.footprint() else {
            tracing::debug!(stream = stream.name(), "no negotiated footprint, skipping");
            continue;
        };
        if !input.frame.is_well_formed() {
            tracing::warn!(
                stream = stream.name(),
                "input frame is {} bytes, expected {}x{}x4",
                input.frame.data.len(),
                input.frame.width,
                input.frame.height
            );
            continue;
        }

        let off = stream.offset();
        let x0 = i64::from(off.x).max(0);
        let y0 = i64::from(off.y).max(0);
        let x1 = (i64::from(off.x) + i64::from(fp.width)).min(i64::from(canvas.width));
        let y1 = (i64::from(off.y) + i64::from(fp.height)).min(i64::from(canvas.height));
        if x0 >= x1 || y0 >= y1 {
            continue;
        }

        let region = Region {
            x0: x0 as usize,
            x1: x1 as usize,
            y0: y0 as usize,
            off_x: i64::from(off.x),
            off_y: i64::from(off.y),
        };
        let stride = canvas.stride();
        let rows = &mut canvas.data[y0 as usize * stride..y1 as usize * stride];
        let frame = input.frame;

        if opts.parallel {
            rows.par_chunks_exact_mut(stride)
                .enumerate()
                .for_each(|(i, row)| draw_row(row, region.y0 + i, &region, map, frame));
        } else {
            rows.chunks_exact_mut(stride)
                .enumerate()
                .for_each(|(i, row)| draw_row(row, region.y0 + i, &region, map, frame));
        }
        drawn += 1;
    }
    drawn
}

/// Clipped destination rectangle of one stream plus its canvas offset.
struct Region {
    x0: usize,
    x1: usize,
    y0: usize,
    off_x: i64,
    off_y: i64,
}

fn draw_row(row: &mut [u8], y: usize, region: &Region, map: &TransformMap, frame: &Frame) {
    // Map coordinates are relative to the footprint origin; the clipping above keeps them
    // non-negative.
    let my = (y as i64 - region.off_y) as u32;
    for x in region.x0..region.x1 {
        let mx = (x as i64 - region.off_x) as u32;
        let Some((sx, sy)) = map.lookup(mx, my) else {
            continue;
        };
        let Some(src) = sample_bilinear(frame, sx, sy) else {
            continue;
        };
        let px = &mut row[x * 4..x * 4 + 4];
        let out = over([px[0], px[1], px[2], px[3]], src);
        px.copy_from_slice(&out);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/compositor.rs"]
mod tests;
