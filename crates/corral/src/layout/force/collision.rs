use corral_core::geometry::Point;

use crate::{
    error::CorralError,
    layout::{Force, ForceContext},
};

const COINCIDENT_DISTANCE_SQUARED: f64 = 1e-12;

/// Pushes overlapping circles apart.
///
/// Two nodes overlap when the distance between their predicted positions
/// (snapshot position plus velocity) is below `r_i + r_j + padding`. The
/// overlap times `strength` is split between them so that the larger circle
/// moves less. The correction is not scaled by alpha, which keeps circles
/// apart after the attracting forces have faded.
///
/// With more than one iteration, later passes see the predicted positions
/// already corrected by earlier passes. Only the accumulated correction is
/// written to the deltas.
#[derive(Debug, Clone)]
pub struct CollisionForce {
    radius: Option<f64>,
    padding: f64,
    strength: f64,
    iterations: usize,
}

impl CollisionForce {
    pub fn new(strength: f64, padding: f64, iterations: usize) -> Self {
        Self {
            radius: None,
            padding,
            strength,
            iterations,
        }
    }

    /// Uses one radius for every node instead of each entity's own.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

impl Force for CollisionForce {
    fn apply(&self, ctx: &mut ForceContext<'_>, deltas: &mut [Point]) -> Result<(), CorralError> {
        let nodes = ctx.nodes();
        let radii: Vec<f64> = nodes
            .iter()
            .map(|node| self.radius.unwrap_or_else(|| node.entity().radius()))
            .collect();
        let mut predicted: Vec<Point> = nodes
            .iter()
            .map(|node| node.position().add_point(node.velocity()))
            .collect();
        let mut corrections = vec![Point::default(); nodes.len()];

        for _ in 0..self.iterations {
            for i in 0..nodes.len() {
                for j in (i + 1)..nodes.len() {
                    let reach = radii[i] + radii[j] + self.padding;
                    let offset = predicted[i].sub_point(predicted[j]);
                    let distance_squared = offset.length_squared();
                    if distance_squared >= reach * reach {
                        continue;
                    }

                    let (direction, distance) = if distance_squared < COINCIDENT_DISTANCE_SQUARED {
                        (ctx.random_unit(), 0.0)
                    } else {
                        let distance = distance_squared.sqrt();
                        (offset.scale(1.0 / distance), distance)
                    };

                    let area_i = radii[i] * radii[i];
                    let area_j = radii[j] * radii[j];
                    let share_i = if area_i + area_j > 0.0 {
                        area_j / (area_i + area_j)
                    } else {
                        0.5
                    };

                    // `direction` points from j to i.
                    let push = direction.scale((reach - distance) * self.strength);
                    let push_i = push.scale(share_i);
                    let push_j = push.scale(1.0 - share_i);

                    corrections[i] = corrections[i].add_point(push_i);
                    predicted[i] = predicted[i].add_point(push_i);
                    corrections[j] = corrections[j].sub_point(push_j);
                    predicted[j] = predicted[j].sub_point(push_j);
                }
            }
        }

        for (delta, correction) in deltas.iter_mut().zip(corrections) {
            *delta = delta.add_point(correction);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::layout::force::test_support;

    #[test]
    fn test_separated_circles_are_untouched() {
        let nodes = test_support::nodes_at(&[
            (1, 10.0, Point::new(0.0, 0.0)),
            (1, 10.0, Point::new(30.0, 0.0)),
        ]);
        let deltas = test_support::apply(&CollisionForce::new(1.0, 6.0, 1), &nodes, 1.0).unwrap();

        assert!(deltas.iter().all(|d| d.is_zero()));
    }

    #[test]
    fn test_equal_circles_split_overlap() {
        let nodes = test_support::nodes_at(&[
            (1, 10.0, Point::new(0.0, 0.0)),
            (1, 10.0, Point::new(10.0, 0.0)),
        ]);
        let deltas = test_support::apply(&CollisionForce::new(0.5, 0.0, 1), &nodes, 1.0).unwrap();

        // Overlap of 10, half corrected, split evenly.
        assert_approx_eq!(f64, deltas[0].x(), -2.5);
        assert_approx_eq!(f64, deltas[1].x(), 2.5);
    }

    #[test]
    fn test_correction_ignores_alpha() {
        let nodes = test_support::nodes_at(&[
            (1, 10.0, Point::new(0.0, 0.0)),
            (1, 10.0, Point::new(10.0, 0.0)),
        ]);
        let force = CollisionForce::new(0.5, 0.0, 1);
        let hot = test_support::apply(&force, &nodes, 1.0).unwrap();
        let cold = test_support::apply(&force, &nodes, 0.001).unwrap();

        assert_eq!(hot, cold);
    }

    #[test]
    fn test_larger_circle_moves_less() {
        let nodes = test_support::nodes_at(&[
            (1, 30.0, Point::new(0.0, 0.0)),
            (1, 10.0, Point::new(20.0, 0.0)),
        ]);
        let deltas = test_support::apply(&CollisionForce::new(1.0, 0.0, 1), &nodes, 1.0).unwrap();

        assert!(deltas[0].x().abs() < deltas[1].x().abs());
        assert_approx_eq!(f64, deltas[1].x() - deltas[0].x(), 20.0);
    }

    #[test]
    fn test_radius_override_and_padding() {
        let nodes = test_support::nodes_at(&[
            (1, 1.0, Point::new(0.0, 0.0)),
            (1, 1.0, Point::new(60.0, 0.0)),
        ]);
        let force = CollisionForce::new(1.0, 6.0, 1).with_radius(29.0);
        let deltas = test_support::apply(&force, &nodes, 1.0).unwrap();

        assert_approx_eq!(f64, deltas[1].x() - deltas[0].x(), 4.0);
    }

    #[test]
    fn test_more_iterations_resolve_more_overlap() {
        let nodes = test_support::nodes_at(&[
            (1, 10.0, Point::new(0.0, 0.0)),
            (1, 10.0, Point::new(10.0, 0.0)),
        ]);
        let once = test_support::apply(&CollisionForce::new(0.5, 0.0, 1), &nodes, 1.0).unwrap();
        let thrice = test_support::apply(&CollisionForce::new(0.5, 0.0, 3), &nodes, 1.0).unwrap();

        assert!(thrice[1].x() > once[1].x());
        assert!(thrice[1].x() - thrice[0].x() < 10.0);
    }

    #[test]
    fn test_coincident_circles_are_separated() {
        let nodes = test_support::nodes_at(&[
            (1, 10.0, Point::new(5.0, 5.0)),
            (1, 10.0, Point::new(5.0, 5.0)),
        ]);
        let deltas = test_support::apply(&CollisionForce::new(1.0, 0.0, 1), &nodes, 1.0).unwrap();

        assert!(deltas.iter().all(|d| d.is_finite()));
        assert_approx_eq!(f64, deltas[0].distance(deltas[1]), 20.0, epsilon = 1e-9);
    }
}
