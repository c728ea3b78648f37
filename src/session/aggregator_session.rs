use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::composite::compositor::{CompositorOpts, StreamInput, composite};
use crate::composite::frame::Frame;
use crate::foundation::core::{CanvasSpec, Fraction, Offset, VideoInfo};
use crate::foundation::error::{RemapError, RemapResult};
use crate::map::transform_map::TransformMap;
use crate::negotiate::negotiator::negotiate;
use crate::stream::descriptor::{StreamDescriptor, StreamId};

/// Options fixed for the lifetime of a session.
#[derive(Clone, Copy, Debug)]
pub struct SessionOpts {
    /// Initial output pixel aspect ratio.
    pub output_par: Fraction,
    /// Compositing knobs applied on every tick.
    pub compositor: CompositorOpts,
}

impl Default for SessionOpts {
    fn default() -> Self {
        Self {
            output_par: Fraction::ONE,
            compositor: CompositorOpts::default(),
        }
    }
}

/// A single configuration change for one stream.
#[derive(Clone, Debug)]
pub enum StreamUpdate {
    /// Move the stream's top-left corner.
    Offset(Offset),
    /// Override the requested size; `<= 0` on an axis restores the map size.
    SizeOverride { width: i32, height: i32 },
    /// Load a map file and swap it in.
    MapFile(PathBuf),
    /// Swap in an already built map.
    Map(Arc<TransformMap>),
    /// Drop the map; the stream stops drawing.
    ClearMap,
}

struct SessionState {
    next_id: u32,
    streams: BTreeMap<StreamId, StreamDescriptor>,
    output_par: Fraction,
    canvas: CanvasSpec,
    needs_negotiation: bool,
}

impl SessionState {
    fn stream_mut(&mut self, id: StreamId) -> RemapResult<&mut StreamDescriptor> {
        self.streams
            .get_mut(&id)
            .ok_or(RemapError::UnknownStream(id.0))
    }
}

/// Owns every attached stream and the negotiated canvas.
///
/// All per-stream state sits behind one lock, held for each mutation and for the enumeration
/// passes of [`AggregatorSession::negotiate`] and [`AggregatorSession::aggregate`]. Map files
/// are read and parsed before the lock is taken.
pub struct AggregatorSession {
    state: Mutex<SessionState>,
    opts: SessionOpts,
}

impl AggregatorSession {
    pub fn new(opts: SessionOpts) -> Self {
        Self {
            state: Mutex::new(SessionState {
                next_id: 0,
                streams: BTreeMap::new(),
                output_par: opts.output_par,
                canvas: CanvasSpec::empty(opts.output_par),
                needs_negotiation: true,
            }),
            opts,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // Critical sections never leave the state half-updated.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Attach a new input stream. Without a name it is called after its id (`sink_N`).
    pub fn attach(&self, name: Option<&str>) -> StreamId {
        let mut st = self.lock();
        let id = StreamId(st.next_id);
        st.next_id += 1;
        let name = name.map_or_else(|| id.to_string(), str::to_owned);
        tracing::debug!(%id, name = %name, "attach stream");
        st.streams.insert(id, StreamDescriptor::new(name));
        st.needs_negotiation = true;
        id
    }

    /// Detach a stream, returning its final state.
    pub fn detach(&self, id: StreamId) -> RemapResult<StreamDescriptor> {
        let mut st = self.lock();
        let d = st
            .streams
            .remove(&id)
            .ok_or(RemapError::UnknownStream(id.0))?;
        tracing::debug!(%id, name = d.name(), "release stream");
        st.needs_negotiation = true;
        Ok(d)
    }

    /// Apply one configuration change and mark the session for renegotiation.
    ///
    /// A failed map load leaves the stream's previous map in place.
    pub fn configure(&self, id: StreamId, update: StreamUpdate) -> RemapResult<()> {
        let (map, path) = match &update {
            StreamUpdate::MapFile(path) => match TransformMap::load(path) {
                Ok(m) => (Some(Arc::new(m)), Some(path.clone())),
                Err(e) => {
                    tracing::warn!(%id, "keeping previous map: {e}");
                    return Err(e.into());
                }
            },
            StreamUpdate::Map(m) => (Some(Arc::clone(m)), None),
            _ => (None, None),
        };

        let mut st = self.lock();
        let par = st.output_par;
        let stream = st.stream_mut(id)?;
        match update {
            StreamUpdate::Offset(off) => stream.set_offset(off),
            StreamUpdate::SizeOverride { width, height } => {
                stream.set_size_override(width, height)
            }
            StreamUpdate::MapFile(_) | StreamUpdate::Map(_) => {
                if let Some(m) = map.as_deref() {
                    tracing::debug!(%id, "map swapped in: {}x{}", m.width(), m.height());
                }
                stream.set_map(map, path);
            }
            StreamUpdate::ClearMap => stream.set_map(None, None),
        }
        // The next tick composites with the new geometry even before renegotiation.
        stream.refresh_footprint(par);
        st.needs_negotiation = true;
        Ok(())
    }

    /// Record the geometry and rate upstream announced for a stream.
    pub fn set_input_info(&self, id: StreamId, info: Option<VideoInfo>) -> RemapResult<()> {
        let mut st = self.lock();
        let par = st.output_par;
        let stream = st.stream_mut(id)?;
        if stream.info() != info {
            stream.set_info(info);
            stream.refresh_footprint(par);
            st.needs_negotiation = true;
        }
        Ok(())
    }

    /// Change the output pixel aspect ratio used for footprints.
    pub fn set_output_par(&self, par: Fraction) -> RemapResult<()> {
        let par = Fraction::positive(par.num, par.den)?;
        let mut st = self.lock();
        if st.output_par != par {
            st.output_par = par;
            for stream in st.streams.values_mut() {
                stream.refresh_footprint(par);
            }
            st.needs_negotiation = true;
        }
        Ok(())
    }

    /// Ask for a negotiation pass on the next opportunity.
    pub fn request_renegotiation(&self) {
        self.lock().needs_negotiation = true;
    }

    /// `true` after any event that may change the canvas, until [`Self::negotiate`] runs.
    pub fn needs_negotiation(&self) -> bool {
        self.lock().needs_negotiation
    }

    /// Recompute every footprint and the canvas, and make it current.
    pub fn negotiate(&self) -> CanvasSpec {
        let mut st = self.lock();
        let par = st.output_par;
        let canvas = negotiate(st.streams.values_mut(), par);
        st.canvas = canvas;
        st.needs_negotiation = false;
        canvas
    }

    /// Canvas from the last negotiation.
    pub fn canvas(&self) -> CanvasSpec {
        self.lock().canvas
    }

    /// Composite one tick. `ready` holds at most one frame per stream; absent streams are
    /// skipped and leave their region unchanged.
    #[tracing::instrument(skip_all, fields(ready = ready.len()))]
    pub fn aggregate(&self, out: &mut Frame, ready: &HashMap<StreamId, Frame>) -> usize {
        let st = self.lock();
        if out.width != st.canvas.width || out.height != st.canvas.height {
            tracing::warn!(
                "output buffer {}x{} does not match negotiated canvas {}x{}",
                out.width,
                out.height,
                st.canvas.width,
                st.canvas.height
            );
        }
        let inputs: Vec<StreamInput<'_>> = st
            .streams
            .iter()
            .filter_map(|(id, stream)| {
                ready.get(id).map(|frame| StreamInput { frame, stream })
            })
            .collect();
        composite(out, &inputs, self.opts.compositor)
    }

    /// Snapshot of one stream.
    pub fn stream(&self, id: StreamId) -> Option<StreamDescriptor> {
        self.lock().streams.get(&id).cloned()
    }

    pub fn stream_count(&self) -> usize {
        self.lock().streams.len()
    }

    /// Attached stream ids in attach order.
    pub fn stream_ids(&self) -> Vec<StreamId> {
        self.lock().streams.keys().copied().collect()
    }

    /// Snapshot of the `index`-th stream in attach order.
    pub fn stream_by_index(&self, index: usize) -> Option<(StreamId, StreamDescriptor)> {
        self.lock()
            .streams
            .iter()
            .nth(index)
            .map(|(id, d)| (*id, d.clone()))
    }
}

impl Default for AggregatorSession {
    fn default() -> Self {
        Self::new(SessionOpts::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/aggregator_session.rs"]
mod tests;
