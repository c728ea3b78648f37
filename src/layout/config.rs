use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::composite::compositor::CompositorOpts;
use crate::composite::frame::{Frame, premultiply};
use crate::foundation::core::{Fraction, Offset, VideoInfo};
use crate::foundation::error::{RemapError, RemapResult};
use crate::session::aggregator_session::{AggregatorSession, SessionOpts, StreamUpdate};
use crate::stream::descriptor::StreamId;

/// A still-frame composition described in JSON: streams, their maps and placement.
///
/// Relative paths are resolved against the directory holding the layout file.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LayoutConfig {
    /// Output pixel aspect ratio.
    pub output_par: Fraction,
    /// Straight-alpha RGBA the canvas is cleared to before compositing.
    pub background: [u8; 4],
    /// Composite rows in parallel.
    pub parallel: bool,
    /// Input streams in attach order.
    pub streams: Vec<StreamLayout>,
}

/// One input stream of a [`LayoutConfig`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StreamLayout {
    #[serde(default)]
    pub name: Option<String>,
    /// Map file; without one the stream is a no-op.
    #[serde(default)]
    pub map: Option<PathBuf>,
    /// Image standing in for the decoded frame of this tick.
    #[serde(default)]
    pub frame: Option<PathBuf>,
    #[serde(default)]
    pub xpos: i32,
    #[serde(default)]
    pub ypos: i32,
    /// Size override; `0` uses the map size.
    #[serde(default)]
    pub width: i32,
    #[serde(default)]
    pub height: i32,
    #[serde(default = "default_stream_fps")]
    pub fps: Fraction,
    #[serde(default)]
    pub par: Fraction,
}

fn default_stream_fps() -> Fraction {
    crate::foundation::core::DEFAULT_FPS
}

/// A session built from a layout, with the frames of its single tick.
pub struct PreparedLayout {
    pub session: AggregatorSession,
    pub ids: Vec<StreamId>,
    pub frames: HashMap<StreamId, Frame>,
    pub background: [u8; 4],
}

impl LayoutConfig {
    /// Read and validate a layout file.
    pub fn load(path: &Path) -> RemapResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read layout '{}'", path.display()))?;
        let cfg: Self = serde_json::from_slice(&bytes)
            .map_err(|e| RemapError::serde(format!("layout '{}': {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> RemapResult<()> {
        if !self.output_par.is_positive() {
            return Err(RemapError::validation(format!(
                "output_par {} must be positive",
                self.output_par
            )));
        }
        for (i, s) in self.streams.iter().enumerate() {
            if !s.par.is_positive() {
                return Err(RemapError::validation(format!(
                    "stream {i}: par {} must be positive",
                    s.par
                )));
            }
            if s.fps.num < 0 || s.fps.den < 0 {
                return Err(RemapError::validation(format!(
                    "stream {i}: fps {} must not be negative",
                    s.fps
                )));
            }
        }
        Ok(())
    }

    /// Attach every stream, load its map and frame, and announce the frame geometry.
    pub fn prepare(&self, root: &Path) -> RemapResult<PreparedLayout> {
        self.validate()?;
        let session = AggregatorSession::new(SessionOpts {
            output_par: self.output_par,
            compositor: CompositorOpts {
                parallel: self.parallel,
            },
        });

        let mut ids = Vec::with_capacity(self.streams.len());
        let mut frames = HashMap::new();
        for s in &self.streams {
            let id = session.attach(s.name.as_deref());
            session.configure(id, StreamUpdate::Offset(Offset::new(s.xpos, s.ypos)))?;
            session.configure(
                id,
                StreamUpdate::SizeOverride {
                    width: s.width,
                    height: s.height,
                },
            )?;
            if let Some(map) = &s.map {
                session.configure(id, StreamUpdate::MapFile(root.join(map)))?;
            }
            if let Some(frame) = &s.frame {
                let path = root.join(frame);
                let img = image::open(&path)
                    .with_context(|| format!("open frame '{}'", path.display()))?
                    .to_rgba8();
                let frame = Frame::from_rgba_image(&img);
                session.set_input_info(
                    id,
                    Some(VideoInfo {
                        width: frame.width,
                        height: frame.height,
                        par: s.par,
                        fps: s.fps,
                    }),
                )?;
                frames.insert(id, frame);
            }
            ids.push(id);
        }

        Ok(PreparedLayout {
            session,
            ids,
            frames,
            background: premultiply(self.background),
        })
    }
}

impl PreparedLayout {
    /// Negotiate and composite the single tick into a fresh canvas.
    pub fn render(&self) -> RemapResult<Frame> {
        let canvas = self.session.negotiate();
        if canvas.is_empty() {
            return Err(RemapError::composition(
                "no stream has a resolvable footprint",
            ));
        }
        let mut out = Frame::filled(canvas.width, canvas.height, self.background);
        let drawn = self.session.aggregate(&mut out, &self.frames);
        tracing::debug!(drawn, "composited layout");
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/config.rs"]
mod tests;
