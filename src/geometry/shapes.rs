use std::f64::consts::PI;

use crate::geometry::BoundingBox;
use crate::spacial::{Position, Size, Vector};

/// Shapes keep the direction they were drawn in, the size of a shape may be negative on either axis.
pub trait WithExtent {
    /// A rectangle with a non-negative width and height, regardless of the drawing direction.
    fn extent(&self) -> BoundingBox;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line(LineShape),
    Rectangle(RectangleShape),
    Ellipse(EllipseShape),
}

/// A stroked segment from `origin` to `origin + size`.
#[derive(Debug, Clone, PartialEq)]
pub struct LineShape {
    pub origin: Position,
    pub size: Size,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RectangleShape {
    pub origin: Position,
    pub size: Size,
}

/// An axis-aligned ellipse, described by its bounding rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct EllipseShape {
    pub origin: Position,
    pub size: Size,
}

impl LineShape {
    pub fn new(start: Position, end: Position, stroke_width: f64) -> Self {
        Self {
            origin: start,
            size: end - start,
            stroke_width,
        }
    }

    pub fn start(&self) -> Position {
        self.origin
    }

    pub fn end(&self) -> Position {
        self.origin + self.size
    }
}

impl RectangleShape {
    pub fn centered(center: Position, size: Size) -> Self {
        Self {
            origin: center - size / 2.0,
            size,
        }
    }
}

impl EllipseShape {
    pub fn centered(center: Position, size: Size) -> Self {
        Self {
            origin: center - size / 2.0,
            size,
        }
    }

    pub fn center(&self) -> Position {
        self.origin + self.size / 2.0
    }

    /// Half of the width and height, never negative.
    pub fn radii(&self) -> Vector {
        Vector::new(self.size.x.abs() / 2.0, self.size.y.abs() / 2.0)
    }

    /// Points on the ellipse, counter-clockwise, starting at the right-most point.
    ///
    /// The path is closed implicitly, the first point is not repeated.
    pub fn outline_points(&self, segments: usize) -> Vec<Position> {
        let center = self.center();
        let radii = self.radii();
        let segments = segments.max(3);

        (0..segments)
            .map(|index| {
                let angle = 2.0 * PI * index as f64 / segments as f64;
                let (sin, cos) = angle.sin_cos();
                Position::new(center.x + radii.x * cos, center.y + radii.y * sin)
            })
            .collect()
    }
}

impl WithExtent for LineShape {
    fn extent(&self) -> BoundingBox {
        BoundingBox::from_origin_and_size(self.origin, self.size)
    }
}

impl WithExtent for RectangleShape {
    fn extent(&self) -> BoundingBox {
        BoundingBox::from_origin_and_size(self.origin, self.size)
    }
}

impl WithExtent for EllipseShape {
    fn extent(&self) -> BoundingBox {
        BoundingBox::from_origin_and_size(self.origin, self.size)
    }
}

impl WithExtent for Shape {
    fn extent(&self) -> BoundingBox {
        match self {
            Shape::Line(line) => line.extent(),
            Shape::Rectangle(rectangle) => rectangle.extent(),
            Shape::Ellipse(ellipse) => ellipse.extent(),
        }
    }
}

impl Shape {
    /// The left/top corner as drawn, i.e. before normalization.
    pub fn origin(&self) -> Position {
        match self {
            Shape::Line(LineShape { origin, .. })
            | Shape::Rectangle(RectangleShape { origin, .. })
            | Shape::Ellipse(EllipseShape { origin, .. }) => *origin,
        }
    }

    /// The width and height as drawn, either may be negative.
    pub fn size(&self) -> Size {
        match self {
            Shape::Line(LineShape { size, .. })
            | Shape::Rectangle(RectangleShape { size, .. })
            | Shape::Ellipse(EllipseShape { size, .. }) => *size,
        }
    }

    /// Moves the shape by subtracting `offset` from its origin, the size is unchanged.
    pub fn relocate(&mut self, offset: Vector) {
        match self {
            Shape::Line(LineShape { origin, .. })
            | Shape::Rectangle(RectangleShape { origin, .. })
            | Shape::Ellipse(EllipseShape { origin, .. }) => *origin -= offset,
        }
    }
}
