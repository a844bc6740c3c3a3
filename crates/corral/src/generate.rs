//! Synthetic populations for demos and stress runs.
//!
//! Everything here is seeded, so the same arguments always produce the same
//! entities.

use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    entity::{AttributeValue, Entity, Group},
    error::CorralError,
};

/// Generates entities spread uniformly over a set of groups.
#[derive(Debug, Clone)]
pub struct PopulationGenerator {
    groups: Vec<Group>,
    radius: f64,
    flag_attribute: String,
    seed: u64,
}

impl PopulationGenerator {
    /// Creates a generator drawing groups from `groups`.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::Config`] if `groups` is empty or `radius` is not
    /// a positive finite number.
    pub fn new(groups: Vec<Group>, radius: f64) -> Result<Self, CorralError> {
        if groups.is_empty() {
            return Err(CorralError::Config(
                "population generator needs at least one group".to_string(),
            ));
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(CorralError::Config(format!(
                "generated radius must be positive, got {radius}"
            )));
        }

        Ok(Self {
            groups,
            radius,
            flag_attribute: "advantage".to_string(),
            seed: 0,
        })
    }

    /// Sets the attribute every generated entity carries, initially `false`.
    pub fn with_flag_attribute(mut self, name: impl Into<String>) -> Self {
        self.flag_attribute = name.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Generates `count` entities.
    pub fn generate(&self, count: usize) -> Vec<Entity> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let entities: Vec<_> = (0..count)
            .map(|_| {
                let group = self.groups[rng.random_range(0..self.groups.len())];
                Entity::new(group, self.radius)
                    .with_attribute(self.flag_attribute.as_str(), AttributeValue::Bool(false))
            })
            .collect();

        debug!(count, seed = self.seed; "Population generated");
        entities
    }
}

/// Sets the flag `attribute` on each entity with the given `probability`.
///
/// Flags are only ever switched on; an entity that already has the flag keeps
/// it. Returns the number of entities that changed.
///
/// # Errors
///
/// Returns [`CorralError::Config`] if `probability` is not in `[0, 1]`.
pub fn mutate_flags(
    entities: &mut [Entity],
    attribute: &str,
    probability: f64,
    seed: u64,
) -> Result<usize, CorralError> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(CorralError::Config(format!(
            "mutation probability must be in [0, 1], got {probability}"
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut changed = 0;
    for entity in entities.iter_mut() {
        if rng.random_bool(probability) && !entity.flag(attribute) {
            entity.set_flag(attribute, true);
            changed += 1;
        }
    }

    debug!(attribute, probability, changed; "Flags mutated");
    Ok(changed)
}
