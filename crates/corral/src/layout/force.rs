//! The [`Force`] trait and the built-in forces.
//!
//! A force is a pure function of the node snapshot and the current `alpha`
//! that adds velocity deltas into a buffer indexed like the nodes. It must not
//! read the buffer to decide what to add; the driver sums the contributions of
//! all forces before integrating.

use std::{f64::consts::TAU, fmt};

use rand::{Rng, rngs::StdRng};

use corral_core::geometry::Point;

use crate::{error::CorralError, layout::Node};

mod center_band;
mod collision;
mod global_center;
mod group_axis;
mod repulsion;

pub use center_band::CenterBandForce;
pub use collision::CollisionForce;
pub use global_center::GlobalCenterForce;
pub use group_axis::GroupAxisForce;
pub use repulsion::{RepulsionFalloff, RepulsionForce};

/// A velocity contribution evaluated once per step.
pub trait Force: fmt::Debug {
    /// Adds this force's velocity deltas into `deltas`.
    ///
    /// `deltas` has exactly one slot per node in [`ForceContext::nodes`].
    ///
    /// # Errors
    ///
    /// Returns an error if a node cannot be evaluated, e.g. a
    /// [`CorralError::Lookup`] for a group the force knows nothing about.
    fn apply(&self, ctx: &mut ForceContext<'_>, deltas: &mut [Point]) -> Result<(), CorralError>;
}

/// What a force may read while it is evaluated.
///
/// The node slice is the snapshot taken at the start of the step; no node
/// moves until every force has been applied.
pub struct ForceContext<'a> {
    name: &'a str,
    nodes: &'a [Node],
    alpha: f64,
    rng: &'a mut StdRng,
}

impl<'a> ForceContext<'a> {
    pub(crate) fn new(name: &'a str, nodes: &'a [Node], alpha: f64, rng: &'a mut StdRng) -> Self {
        Self {
            name,
            nodes,
            alpha,
            rng,
        }
    }

    /// Returns the name the force is registered under in its field
    pub fn name(&self) -> &str {
        self.name
    }

    /// Returns the node snapshot
    pub fn nodes(&self) -> &'a [Node] {
        self.nodes
    }

    /// Returns the current temperature
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Draws a random unit vector from the simulation's seeded source.
    ///
    /// Used to separate coincident nodes, which have no direction of their own.
    pub fn random_unit(&mut self) -> Point {
        let angle = self.rng.random_range(0.0..TAU);
        Point::new(angle.cos(), angle.sin())
    }
}

impl fmt::Debug for ForceContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForceContext")
            .field("name", &self.name)
            .field("nodes", &self.nodes.len())
            .field("alpha", &self.alpha)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use rand::SeedableRng;

    use super::*;
    use crate::entity::Entity;

    /// Nodes at the given positions with zero velocity.
    pub fn nodes_at(specs: &[(i64, f64, Point)]) -> Vec<Node> {
        specs
            .iter()
            .map(|&(group, radius, position)| {
                let mut node = Node::new(Entity::new(group, radius));
                node.place(position);
                node
            })
            .collect()
    }

    /// Applies a single force to `nodes` and returns the deltas.
    pub fn apply(
        force: &dyn Force,
        nodes: &[Node],
        alpha: f64,
    ) -> Result<Vec<Point>, CorralError> {
        let mut rng = StdRng::seed_from_u64(7);
        let mut ctx = ForceContext::new("test", nodes, alpha, &mut rng);
        let mut deltas = vec![Point::default(); nodes.len()];
        force.apply(&mut ctx, &mut deltas)?;
        Ok(deltas)
    }
}
