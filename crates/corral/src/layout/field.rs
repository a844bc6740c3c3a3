use indexmap::IndexMap;

use crate::{
    config::LayoutConfig,
    error::CorralError,
    layout::{
        CenterBandForce, CollisionForce, Force, GlobalCenterForce, GroupAxisForce, OrdinalScale,
        RepulsionForce,
    },
};

/// An ordered set of named forces.
///
/// Forces are applied in insertion order. Replacing a force under an existing
/// name keeps its position.
#[derive(Debug, Default)]
pub struct ForceField {
    forces: IndexMap<String, Box<dyn Force>>,
}

impl ForceField {
    /// Creates an empty field
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the standard field for a layout configuration.
    ///
    /// The field holds, in order: `x` (group axis), `y` (center band),
    /// `center` (global center), `charge` (repulsion) and `collide`
    /// (collision).
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::Config`] if the group scale cannot be built.
    pub fn from_config(config: &LayoutConfig) -> Result<Self, CorralError> {
        let scale = OrdinalScale::new(config.group_domain(), config.group_range())?;

        let mut collision = CollisionForce::new(
            config.collision_strength(),
            config.collision_padding(),
            config.collision_iterations(),
        );
        if let Some(radius) = config.collision_radius() {
            collision = collision.with_radius(radius);
        }

        Ok(Self::new()
            .with("x", GroupAxisForce::new(scale, config.group_strength()))
            .with(
                "y",
                CenterBandForce::new(config.band_center(), config.band_strength()),
            )
            .with(
                "center",
                GlobalCenterForce::new(
                    config.center(),
                    config.center_strength_x(),
                    config.center_strength_y(),
                ),
            )
            .with(
                "charge",
                RepulsionForce::new(
                    config.repulsion_strength(),
                    config.repulsion_distance_min(),
                )
                .with_falloff(config.repulsion_falloff()),
            )
            .with("collide", collision))
    }

    /// Adds a force, builder style.
    pub fn with(mut self, name: impl Into<String>, force: impl Force + 'static) -> Self {
        self.insert(name, Box::new(force));
        self
    }

    /// Adds a force, returning the one it replaced under the same name.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        force: Box<dyn Force>,
    ) -> Option<Box<dyn Force>> {
        self.forces.insert(name.into(), force)
    }

    /// Removes a force, keeping the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<Box<dyn Force>> {
        self.forces.shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&dyn Force> {
        self.forces.get(name).map(Box::as_ref)
    }

    /// Returns the force names in application order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.forces.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.forces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &dyn Force)> {
        self.forces
            .iter()
            .map(|(name, force)| (name.as_str(), force.as_ref()))
    }
}
