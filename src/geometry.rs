mod bounding_box;
mod shapes;

pub use bounding_box::*;
pub use shapes::*;
