mod aperture;
mod assembly;
mod command;
mod config;
mod diagnostics;
mod error;
mod geometry;
mod interpreter;
mod layer;
pub mod spacial;

#[cfg(feature = "egui")]
mod renderer;

#[cfg(feature = "egui")]
mod drawing;

pub use aperture::*;
pub use assembly::*;
pub use command::*;
pub use config::*;
pub use diagnostics::*;
#[cfg(feature = "egui")]
pub use drawing::*;
pub use error::*;
pub use geometry::*;
pub use interpreter::*;
pub use layer::*;
#[cfg(feature = "egui")]
pub use renderer::*;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
