use ataxia_screen::geometry::{Canvas, MotorTestKind, Point, ReferenceLine, TargetBox};
use rstest::rstest;
use std::str::FromStr;

fn line(sx: f64, sy: f64, ex: f64, ey: f64) -> ReferenceLine {
    ReferenceLine::new(Point::new(sx, sy), Point::new(ex, ey))
}

#[rstest]
#[case(line(0.0, 0.0, 10.0, 0.0), Point::new(5.0, 5.0), 5.0)] // Horizontal reference
#[case(line(5.0, 0.0, 5.0, 10.0), Point::new(8.0, 3.0), 3.0)] // Vertical reference
#[case(line(0.0, 0.0, 10.0, 10.0), Point::new(10.0, 0.0), 50f64.sqrt())] // Diagonal
#[case(line(0.0, 0.0, 10.0, 10.0), Point::new(3.0, 3.0), 0.0)] // On the line
#[case(line(0.0, 0.0, 10.0, 0.0), Point::new(50.0, -4.0), 4.0)] // Past the end point
fn test_distance_to_line(#[case] l: ReferenceLine, #[case] p: Point, #[case] expected: f64) {
    let d = l.distance_to_line(p);
    assert!(
        (d - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        d
    );
}

#[rstest]
#[case(10.0, 10.0, true)] // Top-left corner
#[case(60.0, 60.0, true)] // Bottom-right corner
#[case(35.0, 35.0, true)]
#[case(9.9, 35.0, false)]
#[case(35.0, 60.1, false)]
fn test_target_box_edges_are_inclusive(#[case] x: f64, #[case] y: f64, #[case] inside: bool) {
    let b = TargetBox::new(10.0, 10.0, 50.0);
    assert_eq!(b.contains(x, y), inside);
}

#[rstest]
#[case(MotorTestKind::Horizontal, (35.0, 300.0), (865.0, 300.0))]
#[case(MotorTestKind::Vertical, (450.0, 35.0), (450.0, 565.0))]
#[case(MotorTestKind::Diagonal1, (35.0, 35.0), (865.0, 565.0))]
#[case(MotorTestKind::Diagonal2, (35.0, 565.0), (865.0, 35.0))]
fn test_preset_target_centers(
    #[case] kind: MotorTestKind,
    #[case] start: (f64, f64),
    #[case] finish: (f64, f64),
) {
    let (s, f) = kind.targets(&Canvas::default());
    assert_eq!(s.center(), Point::new(start.0, start.1));
    assert_eq!(f.center(), Point::new(finish.0, finish.1));
}

#[test]
fn test_reference_line_joins_box_centers() {
    let (s, f) = MotorTestKind::Vertical.targets(&Canvas::default());
    let l = ReferenceLine::between(&s, &f);
    // Vertical presets take the degenerate branch.
    assert_eq!(l.start.x, l.end.x);
    assert_eq!(l.distance_to_line(Point::new(460.0, 200.0)), 10.0);
}

#[rstest]
#[case("horizontal", MotorTestKind::Horizontal)]
#[case("Vertical", MotorTestKind::Vertical)]
#[case("diagonal1", MotorTestKind::Diagonal1)]
#[case("DIAGONAL2", MotorTestKind::Diagonal2)]
fn test_test_kind_parsing(#[case] raw: &str, #[case] expected: MotorTestKind) {
    assert_eq!(MotorTestKind::from_str(raw).unwrap(), expected);
}

#[test]
fn test_unknown_test_kind_is_rejected() {
    assert!(MotorTestKind::from_str("spiral").is_err());
}

#[test]
fn test_every_preset_fits_the_default_canvas() {
    use strum::IntoEnumIterator;
    let canvas = Canvas::default();
    for kind in MotorTestKind::iter() {
        let (s, f) = kind.targets(&canvas);
        for b in [s, f] {
            assert!(b.origin.x >= 0.0 && b.origin.x + b.size <= canvas.width, "{}", kind);
            assert!(b.origin.y >= 0.0 && b.origin.y + b.size <= canvas.height, "{}", kind);
        }
        assert_ne!(s.center(), f.center());
    }
}
