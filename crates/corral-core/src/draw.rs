//! Visual definitions for chart elements.
//!
//! - [`CircleDefinition`] - fill and outline of one bubble
//! - [`StrokeDefinition`] / [`StrokeStyle`] - outline properties

mod circle;
mod stroke;

pub use circle::CircleDefinition;
pub use stroke::{StrokeDefinition, StrokeStyle};
