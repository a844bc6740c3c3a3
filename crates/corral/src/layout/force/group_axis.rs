use corral_core::geometry::Point;

use crate::{
    error::CorralError,
    layout::{Force, ForceContext, OrdinalScale},
};

/// Pulls each node horizontally toward the x-coordinate of its group.
///
/// The pull is `strength * (target - x) * alpha`, so it fades as the
/// simulation cools.
#[derive(Debug, Clone)]
pub struct GroupAxisForce {
    scale: OrdinalScale,
    strength: f64,
}

impl GroupAxisForce {
    pub fn new(scale: OrdinalScale, strength: f64) -> Self {
        Self { scale, strength }
    }

    pub fn scale(&self) -> &OrdinalScale {
        &self.scale
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }
}

impl Force for GroupAxisForce {
    fn apply(&self, ctx: &mut ForceContext<'_>, deltas: &mut [Point]) -> Result<(), CorralError> {
        let alpha = ctx.alpha();
        for (index, (node, delta)) in ctx.nodes().iter().zip(deltas.iter_mut()).enumerate() {
            let group = node.entity().group();
            let target = self.scale.get(group).ok_or_else(|| CorralError::Lookup {
                index,
                group,
                force: ctx.name().to_string(),
            })?;
            let pull = self.strength * (target - node.x()) * alpha;
            *delta = delta.add_point(Point::new(pull, 0.0));
        }
        Ok(())
    }
}
