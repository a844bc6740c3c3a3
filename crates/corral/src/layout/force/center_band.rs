use corral_core::geometry::Point;

use crate::{
    error::CorralError,
    layout::{Force, ForceContext},
};

/// Pulls each node vertically toward a horizontal band, scaled by alpha.
#[derive(Debug, Clone)]
pub struct CenterBandForce {
    y: f64,
    strength: f64,
}

impl CenterBandForce {
    pub fn new(y: f64, strength: f64) -> Self {
        Self { y, strength }
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }
}

impl Force for CenterBandForce {
    fn apply(&self, ctx: &mut ForceContext<'_>, deltas: &mut [Point]) -> Result<(), CorralError> {
        let alpha = ctx.alpha();
        for (node, delta) in ctx.nodes().iter().zip(deltas.iter_mut()) {
            *delta = delta.add_point(Point::new(0.0, (self.y - node.y()) * self.strength * alpha));
        }
        Ok(())
    }
}
