use corral_core::geometry::Point;

use crate::entity::Entity;

/// Simulation-owned state for one entity.
///
/// Outside the crate a node is read-only: observers and forces can inspect
/// the position and velocity but only the driver moves it.
#[derive(Debug, Clone)]
pub struct Node {
    entity: Entity,
    position: Point,
    velocity: Point,
}

impl Node {
    pub(crate) fn new(entity: Entity) -> Self {
        Self {
            entity,
            position: Point::default(),
            velocity: Point::default(),
        }
    }

    /// Returns the wrapped input entity
    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn x(&self) -> f64 {
        self.position.x()
    }

    pub fn y(&self) -> f64 {
        self.position.y()
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn velocity(&self) -> Point {
        self.velocity
    }

    pub(crate) fn place(&mut self, position: Point) {
        self.position = position;
        self.velocity = Point::default();
    }

    pub(crate) fn advance(&mut self, position: Point, velocity: Point) {
        self.position = position;
        self.velocity = velocity;
    }
}
