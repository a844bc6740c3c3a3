use corral_core::geometry::Point;

use crate::{
    error::CorralError,
    layout::{Force, ForceContext},
};

/// Pulls each node toward a fixed point with per-axis strengths.
///
/// Unlike the other attracting forces this one ignores alpha: it keeps acting
/// at full strength after the simulation has cooled.
#[derive(Debug, Clone)]
pub struct GlobalCenterForce {
    center: Point,
    strength_x: f64,
    strength_y: f64,
}

impl GlobalCenterForce {
    pub fn new(center: Point, strength_x: f64, strength_y: f64) -> Self {
        Self {
            center,
            strength_x,
            strength_y,
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }
}

impl Force for GlobalCenterForce {
    fn apply(&self, ctx: &mut ForceContext<'_>, deltas: &mut [Point]) -> Result<(), CorralError> {
        for (node, delta) in ctx.nodes().iter().zip(deltas.iter_mut()) {
            let offset = self.center.sub_point(node.position());
            *delta = delta.add_point(Point::new(
                offset.x() * self.strength_x,
                offset.y() * self.strength_y,
            ));
        }
        Ok(())
    }
}
