use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::core::{Footprint, Fraction, Offset, VideoInfo};
use crate::map::transform_map::TransformMap;
use crate::stream::footprint::{compute_footprint, display_ratio};

/// Handle of an attached input stream. Issued in increasing order, so ordering by id is
/// attach order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct StreamId(pub u32);

impl std::fmt::Display for StreamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sink_{}", self.0)
    }
}

/// Configuration and derived geometry of one input stream.
#[derive(Clone, Debug)]
pub struct StreamDescriptor {
    name: String,
    offset: Offset,
    width_override: i32,
    height_override: i32,
    map: Option<Arc<TransformMap>>,
    map_path: Option<PathBuf>,
    info: Option<VideoInfo>,
    footprint: Option<Footprint>,
}

impl StreamDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            offset: Offset::default(),
            width_override: 0,
            height_override: 0,
            map: None,
            map_path: None,
            info: None,
            footprint: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Offset) {
        self.offset = offset;
    }

    /// Requested size; a value `<= 0` on an axis defers to the map (or the input frame).
    pub fn size_override(&self) -> (i32, i32) {
        (self.width_override, self.height_override)
    }

    pub fn set_size_override(&mut self, width: i32, height: i32) {
        self.width_override = width;
        self.height_override = height;
        self.footprint = None;
    }

    /// Dimensions of the loaded map, `(0, 0)` without one.
    pub fn native_size(&self) -> (u32, u32) {
        self.map
            .as_deref()
            .map_or((0, 0), |m| (m.width(), m.height()))
    }

    pub fn map(&self) -> Option<&TransformMap> {
        self.map.as_deref()
    }

    pub fn has_map(&self) -> bool {
        self.map.is_some()
    }

    /// Path the current map was loaded from, if it came from a file.
    pub fn map_path(&self) -> Option<&Path> {
        self.map_path.as_deref()
    }

    /// Replace the map wholesale. `None` turns the stream into a no-op.
    pub fn set_map(&mut self, map: Option<Arc<TransformMap>>, path: Option<PathBuf>) {
        self.map = map;
        self.map_path = path;
        self.footprint = None;
    }

    pub fn info(&self) -> Option<VideoInfo> {
        self.info
    }

    pub fn set_info(&mut self, info: Option<VideoInfo>) {
        self.info = info;
        self.footprint = None;
    }

    /// Announced frame rate, `0/1` while unknown.
    pub fn fps(&self) -> Fraction {
        self.info.map_or(Fraction::new(0, 1), |i| i.fps)
    }

    /// Size fed into aspect correction: override, else map size, else input frame size.
    ///
    /// `None` until upstream has announced the input geometry.
    pub fn effective_size(&self) -> Option<(u32, u32)> {
        let info = self.info?;
        let (native_w, native_h) = self.native_size();
        let pick = |over: i32, native: u32, input: u32| {
            if over > 0 {
                over as u32
            } else if native > 0 {
                native
            } else {
                input
            }
        };
        Some((
            pick(self.width_override, native_w, info.width),
            pick(self.height_override, native_h, info.height),
        ))
    }

    /// Footprint on an output with pixel aspect `output_par`, without storing it.
    pub fn compute_footprint(&self, output_par: Fraction) -> Option<Footprint> {
        let Some(info) = self.info else {
            tracing::debug!(stream = %self.name, "have no input info yet");
            return None;
        };
        let (w, h) = self.effective_size()?;
        if display_ratio(w, h, info.par, output_par).is_none() {
            tracing::warn!(
                stream = %self.name,
                "cannot calculate display aspect ratio for {w}x{h} ({} / {output_par})",
                info.par
            );
            return None;
        }
        compute_footprint(w, h, info.par, output_par)
    }

    /// Recompute and store the footprint for `output_par`.
    pub fn refresh_footprint(&mut self, output_par: Fraction) -> Option<Footprint> {
        self.footprint = self.compute_footprint(output_par);
        self.footprint
    }

    /// Footprint stored by the last [`Self::refresh_footprint`]. Any geometry setter drops it.
    pub fn footprint(&self) -> Option<Footprint> {
        self.footprint
    }

    /// Negotiated width, `0` while unavailable.
    pub fn width(&self) -> u32 {
        self.footprint.map_or(0, |f| f.width)
    }

    /// Negotiated height, `0` while unavailable.
    pub fn height(&self) -> u32 {
        self.footprint.map_or(0, |f| f.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stream/descriptor.rs"]
mod tests;
