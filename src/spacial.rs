#[cfg(feature = "egui")]
use egui::Pos2;

pub type Vector = nalgebra::Vector2<f64>;
pub type Position = nalgebra::Point2<f64>;
pub type Size = nalgebra::Vector2<f64>;

#[cfg(feature = "egui")]
pub trait ToPos2 {
    fn to_pos2(self) -> Pos2;
}

#[cfg(feature = "egui")]
impl ToPos2 for Position {
    fn to_pos2(self) -> Pos2 {
        Pos2::new(self.x as f32, self.y as f32)
    }
}

/// Layer Y grows upwards, screen Y grows downwards.
pub trait Invert {
    fn invert_y(self) -> Self;
}

impl Invert for Position {
    fn invert_y(self) -> Self {
        Self::new(self.x, -self.y)
    }
}
