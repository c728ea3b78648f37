use super::*;

#[test]
fn fraction_as_f64_handles_zero_den() {
    assert_eq!(Fraction::new(30, 0).as_f64(), 0.0);
    assert_eq!(Fraction::new(50, 2).as_f64(), 25.0);
}

#[test]
fn fraction_positive_rejects_non_positive_terms() {
    assert!(Fraction::positive(0, 1).is_err());
    assert!(Fraction::positive(1, 0).is_err());
    assert!(Fraction::positive(-4, 3).is_err());
    assert_eq!(Fraction::positive(4, 3).unwrap(), Fraction::new(4, 3));
}

#[test]
fn fraction_serializes_as_pair() {
    let s = serde_json::to_string(&Fraction::new(30000, 1001)).unwrap();
    assert_eq!(s, "[30000,1001]");
    let f: Fraction = serde_json::from_str("[16,9]").unwrap();
    assert_eq!(f, Fraction::new(16, 9));
}

#[test]
fn empty_canvas_is_zero_sized_at_default_rate() {
    let c = CanvasSpec::default();
    assert!(c.is_empty());
    assert_eq!((c.width, c.height), (0, 0));
    assert_eq!(c.fps, DEFAULT_FPS);
    assert_eq!(c.byte_len(), 0);
}

#[test]
fn canvas_byte_len_is_four_bytes_per_pixel() {
    let c = CanvasSpec {
        width: 170,
        height: 100,
        fps: DEFAULT_FPS,
        par: Fraction::ONE,
    };
    assert!(!c.is_empty());
    assert_eq!(c.byte_len(), 170 * 100 * 4);
}
