use crate::geometry::BoundingBox;
use crate::spacial::Position;

const EPSILON: f64 = 1e-9;

/// Joins lines into gerber source, as it would be read from a file.
pub fn gerber_source(lines: &[&str]) -> String {
    let mut source = lines.join("\n");
    source.push('\n');
    source
}

pub fn assert_position_eq(actual: Position, expected: (f64, f64)) {
    assert!(
        (actual.x - expected.0).abs() < EPSILON && (actual.y - expected.1).abs() < EPSILON,
        "Position mismatch: expected {:?}, got {:?}",
        expected,
        actual
    );
}

/// `expected` is `(left, top, right, bottom)`.
pub fn assert_bbox_eq(actual: &BoundingBox, expected: (f64, f64, f64, f64)) {
    let (left, top, right, bottom) = expected;
    assert!(
        (actual.left() - left).abs() < EPSILON
            && (actual.top() - top).abs() < EPSILON
            && (actual.right() - right).abs() < EPSILON
            && (actual.bottom() - bottom).abs() < EPSILON,
        "BoundingBox mismatch: expected {:?}, got {:?}",
        expected,
        actual
    );
}
