use crate::spacial::{Position, Size};

/// An axis-aligned rectangle, `min` is the left/top corner and `max` the right/bottom corner.
///
/// 'top' follows the naming used by the layer shapes, it is the smaller Y value.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    pub min: Position,
    pub max: Position,
}

/// The inverted rectangle, which any call to `expand` replaces.
impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            min: Position::new(f64::MAX, f64::MAX),
            max: Position::new(f64::MIN, f64::MIN),
        }
    }
}

impl BoundingBox {
    /// The zero-size rectangle at the origin.
    pub fn zero() -> Self {
        Self {
            min: Position::origin(),
            max: Position::origin(),
        }
    }

    /// Builds a rectangle from an origin and a size, where either component of the size may be negative.
    ///
    /// The result always has a non-negative width and height.
    pub fn from_origin_and_size(origin: Position, size: Size) -> Self {
        let corner = origin + size;
        Self {
            min: Position::new(origin.x.min(corner.x), origin.y.min(corner.y)),
            max: Position::new(origin.x.max(corner.x), origin.y.max(corner.y)),
        }
    }

    pub fn from_points(points: &[Position]) -> Self {
        points
            .iter()
            .fold(Self::default(), |mut bbox, point| {
                bbox.expand(&Self {
                    min: *point,
                    max: *point,
                });
                bbox
            })
    }

    pub fn expand(&mut self, other: &BoundingBox) {
        self.min.x = self.min.x.min(other.min.x);
        self.min.y = self.min.y.min(other.min.y);
        self.max.x = self.max.x.max(other.max.x);
        self.max.y = self.max.y.max(other.max.y);
    }

    pub fn left(&self) -> f64 {
        self.min.x
    }
    pub fn top(&self) -> f64 {
        self.min.y
    }
    pub fn right(&self) -> f64 {
        self.max.x
    }
    pub fn bottom(&self) -> f64 {
        self.max.y
    }
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Position {
        Position::new(self.min.x + self.max.x, self.min.y + self.max.y) / 2.0
    }

    /// Corners in drawing order, usable as a closed path.
    pub fn vertices(&self) -> Vec<Position> {
        vec![
            self.min,
            Position::new(self.right(), self.top()),
            self.max,
            Position::new(self.left(), self.bottom()),
        ]
    }
}
