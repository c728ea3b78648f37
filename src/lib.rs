//! remapmix composites N independently sized video streams into one canvas, resampling each
//! stream through its own per-pixel displacement map (lens or perspective correction).
//!
//! The flow mirrors a video aggregator:
//!
//! - attach streams to an [`AggregatorSession`] and [`configure`](AggregatorSession::configure)
//!   their offset and [`TransformMap`]
//! - announce each stream's [`VideoInfo`] and [`negotiate`](AggregatorSession::negotiate) a
//!   [`CanvasSpec`] once per change
//! - [`aggregate`](AggregatorSession::aggregate) one tick of ready [`Frame`]s per output frame
#![forbid(unsafe_code)]

mod composite;
mod foundation;
mod layout;
mod map;
mod negotiate;
mod session;
mod stream;

pub use crate::composite::blend::over;
pub use crate::composite::compositor::{CompositorOpts, StreamInput, composite};
pub use crate::composite::frame::{Frame, PremulPx, premultiply, unpremultiply};
pub use crate::composite::sample::sample_bilinear;
pub use crate::foundation::core::{
    CanvasSpec, DEFAULT_FPS, Footprint, Fraction, Offset, VideoInfo,
};
pub use crate::foundation::error::{MapLoadError, RemapError, RemapResult};
pub use crate::layout::config::{LayoutConfig, PreparedLayout, StreamLayout};
pub use crate::map::transform_map::TransformMap;
pub use crate::negotiate::negotiator::negotiate;
pub use crate::session::aggregator_session::{AggregatorSession, SessionOpts, StreamUpdate};
pub use crate::stream::descriptor::{StreamDescriptor, StreamId};
pub use crate::stream::footprint::{compute_footprint, display_ratio, scale_to_display_ratio};
