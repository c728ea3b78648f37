use std::sync::Arc;

use super::*;
use crate::foundation::core::{Offset, VideoInfo};
use crate::map::transform_map::TransformMap;

fn stream(w: u32, h: u32, x: i32, y: i32, fps: Fraction) -> StreamDescriptor {
    let mut d = StreamDescriptor::new(format!("{w}x{h}@{x},{y}"));
    d.set_map(Some(Arc::new(TransformMap::identity(w, h).unwrap())), None);
    d.set_offset(Offset::new(x, y));
    d.set_info(Some(VideoInfo::new(w, h, fps)));
    d
}

#[test]
fn canvas_covers_offset_footprints() {
    let mut streams = vec![
        stream(100, 100, 0, 0, Fraction::new(25, 1)),
        stream(50, 50, 120, 10, Fraction::new(25, 1)),
    ];
    let c = negotiate(streams.iter_mut(), Fraction::ONE);
    assert_eq!((c.width, c.height), (170, 100));
    assert_eq!(streams[1].width(), 50);
}

#[test]
fn negative_offset_never_shrinks_below_footprint() {
    let mut streams = vec![stream(40, 30, -10, -10, Fraction::new(25, 1))];
    let c = negotiate(streams.iter_mut(), Fraction::ONE);
    assert_eq!((c.width, c.height), (40, 30));
}

#[test]
fn fastest_rate_is_kept_exactly() {
    let mut streams = vec![
        stream(8, 8, 0, 0, Fraction::new(24, 1)),
        stream(8, 8, 0, 0, Fraction::new(30000, 1001)),
        stream(8, 8, 0, 0, Fraction::new(25, 1)),
    ];
    let c = negotiate(streams.iter_mut(), Fraction::ONE);
    assert_eq!(c.fps, Fraction::new(30000, 1001));
}

#[test]
fn first_seen_wins_equal_rates() {
    let mut streams = vec![
        stream(8, 8, 0, 0, Fraction::new(50, 2)),
        stream(8, 8, 0, 0, Fraction::new(25, 1)),
    ];
    let c = negotiate(streams.iter_mut(), Fraction::ONE);
    assert_eq!(c.fps, Fraction::new(50, 2));
}

#[test]
fn no_streams_is_empty_canvas_at_default_rate() {
    let mut streams: Vec<StreamDescriptor> = Vec::new();
    let c = negotiate(streams.iter_mut(), Fraction::ONE);
    assert_eq!((c.width, c.height), (0, 0));
    assert_eq!(c.fps, Fraction::new(25, 1));
    assert!(c.is_empty());
}

#[test]
fn unknown_rates_fall_back_to_default() {
    let mut streams = vec![
        stream(8, 8, 0, 0, Fraction::new(0, 1)),
        stream(8, 8, 0, 0, Fraction::new(30, 0)),
    ];
    let c = negotiate(streams.iter_mut(), Fraction::ONE);
    assert_eq!(c.fps, DEFAULT_FPS);
    assert_eq!((c.width, c.height), (8, 8));
}

#[test]
fn negative_terms_never_win_the_rate() {
    let mut streams = vec![
        stream(8, 8, 0, 0, Fraction::new(24, 1)),
        stream(8, 8, 0, 0, Fraction::new(-30, -1)),
    ];
    let c = negotiate(streams.iter_mut(), Fraction::ONE);
    assert_eq!(c.fps, Fraction::new(24, 1));
}

#[test]
fn unavailable_streams_contribute_nothing() {
    let mut pending = StreamDescriptor::new("pending");
    pending.set_map(Some(Arc::new(TransformMap::identity(500, 500).unwrap())), None);
    pending.set_offset(Offset::new(100, 100));

    let mut streams = vec![stream(20, 10, 0, 0, Fraction::new(24, 1)), pending];
    let c = negotiate(streams.iter_mut(), Fraction::ONE);
    assert_eq!((c.width, c.height), (20, 10));
    assert_eq!(c.fps, Fraction::new(24, 1));
    assert_eq!(streams[1].footprint(), None);
}

#[test]
fn result_depends_only_on_snapshot() {
    let mut streams = vec![
        stream(100, 100, 0, 0, Fraction::new(24, 1)),
        stream(50, 50, 120, 10, Fraction::new(60, 1)),
    ];
    let a = negotiate(streams.iter_mut(), Fraction::ONE);
    let b = negotiate(streams.iter_mut(), Fraction::ONE);
    assert_eq!(a, b);
}

#[test]
fn output_par_is_carried_through() {
    let mut streams = vec![stream(64, 48, 0, 0, Fraction::new(25, 1))];
    let c = negotiate(streams.iter_mut(), Fraction::new(4, 3));
    assert_eq!(c.par, Fraction::new(4, 3));
}
