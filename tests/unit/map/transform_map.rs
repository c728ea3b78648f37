use super::*;
use std::path::PathBuf;

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("remapmix-map-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[test]
fn load_reads_both_matrices() {
    let path = scratch("ok.json");
    std::fs::write(
        &path,
        r#"{
            "x": { "rows": 2, "cols": 3, "data": [0, 1, 2, 0, 1, 2] },
            "y": { "rows": 2, "cols": 3, "data": [0, 0, 0, 1, 1, null] }
        }"#,
    )
    .unwrap();

    let map = TransformMap::load(&path).unwrap();
    assert_eq!((map.width(), map.height()), (3, 2));
    assert_eq!(map.lookup(1, 0), Some((1.0, 0.0)));
    assert_eq!(map.lookup(1, 1), Some((1.0, 1.0)));
    assert_eq!(map.lookup(2, 1), None);
    assert_eq!(map.lookup(3, 0), None);
}

#[test]
fn missing_file_is_io_error() {
    let err = TransformMap::load(&scratch("does-not-exist.json")).unwrap_err();
    assert!(matches!(err, MapLoadError::Io { .. }));
}

#[test]
fn malformed_json_is_parse_error() {
    let path = scratch("bad.json");
    std::fs::write(&path, "{ x: oops").unwrap();
    let err = TransformMap::load(&path).unwrap_err();
    assert!(matches!(err, MapLoadError::Parse { .. }));
}

#[test]
fn missing_y_is_rejected() {
    let path = scratch("no-y.json");
    std::fs::write(&path, r#"{ "x": { "rows": 1, "cols": 1, "data": [0] } }"#).unwrap();
    let err = TransformMap::load(&path).unwrap_err();
    assert!(matches!(err, MapLoadError::MissingField("y")));
}

#[test]
fn mismatched_dimensions_are_rejected() {
    let err = TransformMap::from_fields(2, 2, vec![0.0; 4], vec![0.0; 3]).unwrap_err();
    assert!(matches!(err, MapLoadError::LengthMismatch { field: "y", .. }));

    let path = scratch("mismatch.json");
    std::fs::write(
        &path,
        r#"{
            "x": { "rows": 1, "cols": 4, "data": [0, 0, 0, 0] },
            "y": { "rows": 2, "cols": 2, "data": [0, 0, 0, 0] }
        }"#,
    )
    .unwrap();
    let err = TransformMap::load(&path).unwrap_err();
    assert!(matches!(err, MapLoadError::DimensionMismatch { .. }));
}

#[test]
fn zero_dimension_is_rejected() {
    let err = TransformMap::from_fields(0, 3, vec![], vec![]).unwrap_err();
    assert!(matches!(err, MapLoadError::ZeroDimension("x")));
}

#[test]
fn non_finite_entries_become_sentinel() {
    let map = TransformMap::from_fields(
        2,
        1,
        vec![f32::INFINITY, 1.0],
        vec![0.0, f32::NAN],
    )
    .unwrap();
    assert_eq!(map.lookup(0, 0), None);
    assert_eq!(map.lookup(1, 0), None);
}

#[test]
fn identity_samples_same_position() {
    let map = TransformMap::identity(4, 3).unwrap();
    assert_eq!(map.lookup(3, 2), Some((3.0, 2.0)));
    assert_eq!(map.lookup(0, 1), Some((0.0, 1.0)));
}

#[test]
fn save_then_load_keeps_sentinels() {
    let mut map = TransformMap::identity(3, 3).unwrap();
    map.clear(1, 1);
    let path = scratch("saved.json");
    map.save(&path).unwrap();

    let back = TransformMap::load(&path).unwrap();
    assert_eq!(back.lookup(1, 1), None);
    assert_eq!(back.lookup(2, 1), Some((2.0, 1.0)));
}
