use serde::Deserialize;

use corral_core::geometry::Point;

use crate::{
    error::CorralError,
    layout::{Force, ForceContext},
};

/// Below this squared distance two nodes count as coincident.
const COINCIDENT_DISTANCE_SQUARED: f64 = 1e-12;

/// How repulsion weakens with distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepulsionFalloff {
    /// Magnitude `strength * alpha / d`.
    #[default]
    Inverse,
    /// Magnitude `strength * alpha / d²`.
    InverseSquare,
}

/// Pairwise many-body force between all nodes.
///
/// A positive strength pushes nodes apart, a negative one draws them
/// together. Distances below `distance_min` are clamped so that nearly
/// coincident nodes do not receive unbounded kicks; exactly coincident nodes
/// are separated along a random direction drawn from the seeded source.
///
/// Every pair is visited once, so the cost is quadratic in the node count.
#[derive(Debug, Clone)]
pub struct RepulsionForce {
    strength: f64,
    distance_min: f64,
    falloff: RepulsionFalloff,
}

impl RepulsionForce {
    pub fn new(strength: f64, distance_min: f64) -> Self {
        Self {
            strength,
            distance_min,
            falloff: RepulsionFalloff::default(),
        }
    }

    pub fn with_falloff(mut self, falloff: RepulsionFalloff) -> Self {
        self.falloff = falloff;
        self
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    fn magnitude(&self, distance_squared: f64, alpha: f64) -> f64 {
        let distance_squared = distance_squared.max(self.distance_min * self.distance_min);
        match self.falloff {
            RepulsionFalloff::Inverse => self.strength * alpha / distance_squared.sqrt(),
            RepulsionFalloff::InverseSquare => self.strength * alpha / distance_squared,
        }
    }
}

impl Force for RepulsionForce {
    fn apply(&self, ctx: &mut ForceContext<'_>, deltas: &mut [Point]) -> Result<(), CorralError> {
        if self.strength == 0.0 {
            return Ok(());
        }

        let nodes = ctx.nodes();
        let alpha = ctx.alpha();
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                let offset = nodes[j].position().sub_point(nodes[i].position());
                let distance_squared = offset.length_squared();

                let direction = if distance_squared < COINCIDENT_DISTANCE_SQUARED {
                    ctx.random_unit()
                } else {
                    offset.scale(1.0 / distance_squared.sqrt())
                };

                // `direction` points from i to j.
                let push = direction.scale(self.magnitude(distance_squared, alpha));
                deltas[i] = deltas[i].sub_point(push);
                deltas[j] = deltas[j].add_point(push);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::layout::force::test_support;

    fn pair(distance: f64) -> Vec<crate::layout::Node> {
        test_support::nodes_at(&[
            (1, 5.0, Point::new(0.0, 0.0)),
            (1, 5.0, Point::new(distance, 0.0)),
        ])
    }

    #[test]
    fn test_positive_strength_pushes_apart() {
        let deltas = test_support::apply(&RepulsionForce::new(2.0, 1.0), &pair(4.0), 1.0).unwrap();

        assert_approx_eq!(f64, deltas[0].x(), -0.5);
        assert_approx_eq!(f64, deltas[1].x(), 0.5);
        assert_approx_eq!(f64, deltas[0].y(), 0.0);
    }

    #[test]
    fn test_negative_strength_attracts() {
        let force = RepulsionForce::new(-1.0, 1.0);
        let deltas = test_support::apply(&force, &pair(10.0), 0.5).unwrap();

        assert!(deltas[0].x() > 0.0);
        assert!(deltas[1].x() < 0.0);
        assert_approx_eq!(f64, deltas[1].x(), -0.05);
    }

    #[test]
    fn test_inverse_square_falloff() {
        let force = RepulsionForce::new(2.0, 1.0).with_falloff(RepulsionFalloff::InverseSquare);
        let deltas = test_support::apply(&force, &pair(4.0), 1.0).unwrap();

        assert_approx_eq!(f64, deltas[1].x(), 2.0 / 16.0);
    }

    #[test]
    fn test_distance_is_clamped() {
        let deltas = test_support::apply(&RepulsionForce::new(1.0, 2.0), &pair(0.5), 1.0).unwrap();

        assert_approx_eq!(f64, deltas[1].x(), 0.5);
    }

    #[test]
    fn test_coincident_nodes_get_finite_opposite_kicks() {
        let deltas = test_support::apply(&RepulsionForce::new(1.0, 1.0), &pair(0.0), 1.0).unwrap();

        assert!(deltas.iter().all(|d| d.is_finite()));
        assert_approx_eq!(f64, deltas[0].hypot(), 1.0, epsilon = 1e-9);
        assert_approx_eq!(f64, deltas[0].x(), -deltas[1].x());
        assert_approx_eq!(f64, deltas[0].y(), -deltas[1].y());
    }
}
